//! Directory creation.

use crate::core::Result;
use crate::core::file_error::{FileOperation, FileResultExt};
use std::path::Path;

/// Create `path` and any missing parents.
///
/// Succeeds when the directory already exists. Fails when a file occupies
/// `path` or one of its ancestors.
///
/// # Examples
///
/// ```rust,no_run
/// use sturdyfs::fs::mkdir;
///
/// # async fn example() -> sturdyfs::Result<()> {
/// mkdir("build/output/assets").await?;
/// # Ok(())
/// # }
/// ```
pub async fn mkdir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await.with_file_context(
        FileOperation::CreateDir,
        path,
        "creating directory",
        "fs::dirs::mkdir",
    )?;
    Ok(())
}

/// Blocking mirror of [`mkdir`].
pub fn mkdir_sync(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::create_dir_all(path).with_file_context(
        FileOperation::CreateDir,
        path,
        "creating directory",
        "fs::dirs::mkdir_sync",
    )?;
    Ok(())
}

/// Create the parent of `path` if it has one.
pub(crate) async fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => mkdir(parent).await,
        _ => Ok(()),
    }
}

/// Blocking mirror of [`ensure_parent`].
pub(crate) fn ensure_parent_sync(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => mkdir_sync(parent),
        _ => Ok(()),
    }
}
