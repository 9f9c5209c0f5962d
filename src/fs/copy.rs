//! Copying files and directory trees.
//!
//! Directory copies are driven by the traversal engine, so the same ordering
//! and symlink rules apply: a symlinked directory inside the source is copied
//! as whatever it points at but is not descended into.

use crate::core::file_error::{FileOperation, FileOperationContext, FileOperationError};
use crate::core::{FsError, Result};
use crate::fs::dirs::{ensure_parent, mkdir};
use crate::fs::probe::{EntityKind, probe};
use crate::fs::traverse::{TraversalOptions, list};
use std::io;
use std::path::{Path, PathBuf};

/// What to do when a copy destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CopyMode {
    /// Fail with [`FsError::AlreadyExists`].
    #[default]
    ErrorOnExisting,
    /// Replace the existing file.
    Overwrite,
}

/// Options for [`copy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyOptions {
    pub on_existing: CopyMode,
    /// Copy a directory's contents rather than just creating it.
    pub recurse: bool,
}

impl CopyOptions {
    /// Recursive copy that fails on existing files.
    pub fn recursive() -> Self {
        Self {
            recurse: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn overwrite(mut self) -> Self {
        self.on_existing = CopyMode::Overwrite;
        self
    }
}

/// Copy a file to exactly `dest`.
async fn copy_exact(src: &Path, dest: &Path, mode: CopyMode) -> Result<()> {
    if mode == CopyMode::ErrorOnExisting && probe(dest).await.exists() {
        return Err(FsError::AlreadyExists {
            path: dest.to_path_buf(),
        });
    }
    ensure_parent(dest).await?;
    tokio::fs::copy(src, dest).await.map_err(|e| {
        FileOperationError::new(
            FileOperationContext::new(FileOperation::Copy, src, "copying file", "fs::copy")
                .with_related_path(dest),
            e,
        )
    })?;
    Ok(())
}

fn source_kind_error(src: &Path, kind: EntityKind) -> FsError {
    match kind {
        EntityKind::Absent => FsError::NotFound {
            path: src.to_path_buf(),
        },
        _ => FileOperationError::new(
            FileOperationContext::new(
                FileOperation::Copy,
                src,
                "copying file",
                "fs::copy::copy_file",
            ),
            io::Error::from(io::ErrorKind::IsADirectory),
        )
        .into(),
    }
}

/// Copy the file `src` to `target`.
///
/// When `target` is an existing directory the file lands inside it under its
/// own name. Parent directories of the destination are created.
///
/// # Errors
///
/// - [`FsError::NotFound`] when `src` does not exist
/// - a [`FileOperation::Copy`] error when `src` is a directory
/// - [`FsError::AlreadyExists`] when the destination exists and `mode` is
///   [`CopyMode::ErrorOnExisting`]
pub async fn copy_file(src: impl AsRef<Path>, target: impl AsRef<Path>, mode: CopyMode) -> Result<()> {
    let (src, target) = (src.as_ref(), target.as_ref());
    let kind = probe(src).await;
    if kind != EntityKind::File {
        return Err(source_kind_error(src, kind));
    }

    let dest: PathBuf = match (probe(target).await, src.file_name()) {
        (EntityKind::Directory, Some(name)) => target.join(name),
        _ => target.to_path_buf(),
    };
    copy_exact(src, &dest, mode).await
}

/// Copy a file or directory.
///
/// - a file goes through [`copy_file`]
/// - a directory without `recurse` creates `dst/<name of src>`, empty
/// - a directory with `recurse` mirrors the contents of `src` into `dst`
pub async fn copy(src: impl AsRef<Path>, dst: impl AsRef<Path>, options: &CopyOptions) -> Result<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    match probe(src).await {
        EntityKind::Absent => Err(FsError::NotFound {
            path: src.to_path_buf(),
        }),
        EntityKind::File => copy_file(src, dst, options.on_existing).await,
        EntityKind::Directory if !options.recurse => match src.file_name() {
            Some(name) => mkdir(dst.join(name)).await,
            None => mkdir(dst).await,
        },
        EntityKind::Directory => copy_tree(src, dst, options.on_existing).await,
    }
}

async fn copy_tree(src: &Path, dst: &Path, mode: CopyMode) -> Result<()> {
    let entries = list(src, &TraversalOptions::new().recurse(true)).await?;
    tracing::debug!(
        target: "fs::copy",
        "copying {} entries from {} to {}",
        entries.len(),
        src.display(),
        dst.display()
    );

    mkdir(dst).await?;
    for rel in &entries {
        let (from, to) = (src.join(rel), dst.join(rel));
        match probe(&from).await {
            EntityKind::Directory => mkdir(&to).await?,
            EntityKind::File => copy_exact(&from, &to, mode).await?,
            EntityKind::Absent => {}
        }
    }
    Ok(())
}
