//! Path resolution: absolute normalization and home directory lookup.

use crate::core::{FsError, Result};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `path` against the current directory and collapse `.` and `..`
/// lexically, so two spellings of the same location compare equal.
///
/// Symlinks are not resolved. `..` at the root stays at the root.
pub fn absolute_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path.as_ref())?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// The current user's home directory.
///
/// # Errors
///
/// [`FsError::HomeDirNotFound`] when the platform cannot report one
/// (`HOME` unset on Unix, no profile on Windows).
pub fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or(FsError::HomeDirNotFound)
}

/// Join `relative` onto the home directory. A leading `~/` is accepted and
/// stripped.
///
/// ```rust,no_run
/// use sturdyfs::fs::resolve_home_path;
///
/// # fn example() -> sturdyfs::Result<()> {
/// let a = resolve_home_path(".config/tool.toml")?;
/// let b = resolve_home_path("~/.config/tool.toml")?;
/// assert_eq!(a, b);
/// # Ok(())
/// # }
/// ```
pub fn resolve_home_path(relative: impl AsRef<Path>) -> Result<PathBuf> {
    let relative = relative.as_ref();
    let relative = relative.strip_prefix("~").unwrap_or(relative);
    Ok(home_dir()?.join(relative))
}
