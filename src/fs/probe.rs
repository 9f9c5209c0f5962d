//! Existence and kind probing.
//!
//! Two flavours are provided:
//!
//! - [`probe`] and friends follow symlinks and never fail: any stat error reads as
//!   [`EntityKind::Absent`]. The traversal engine uses these for its filters.
//! - [`probe_entry`] does not follow a trailing symlink and propagates
//!   permission errors; every other stat failure (NotFound, a file used as a
//!   directory component) reads as `Absent`. Removal and move use it, so a
//!   permission problem is never mistaken for "already gone".
//!
//! Results are never cached. The filesystem may change between any two calls.

use crate::core::file_error::{FileOperation, file_error};
use crate::core::Result;
use std::fs::Metadata;
use std::io;
use std::path::Path;

/// What a path refers to at the moment it was probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A regular file, or any other non-directory entry.
    File,
    /// A directory.
    Directory,
    /// Nothing exists at the path.
    Absent,
}

impl EntityKind {
    fn from_metadata(metadata: &Metadata) -> Self {
        if metadata.is_dir() {
            EntityKind::Directory
        } else {
            EntityKind::File
        }
    }

    /// `true` unless the kind is [`EntityKind::Absent`].
    pub fn exists(self) -> bool {
        self != EntityKind::Absent
    }
}

/// Stat `path`, following symlinks. `None` on any error.
pub async fn stat(path: impl AsRef<Path>) -> Option<Metadata> {
    tokio::fs::metadata(path.as_ref()).await.ok()
}

/// Synchronous mirror of [`stat`].
pub fn stat_sync(path: impl AsRef<Path>) -> Option<Metadata> {
    std::fs::metadata(path.as_ref()).ok()
}

/// Classify `path`, following symlinks. Never fails.
pub async fn probe(path: impl AsRef<Path>) -> EntityKind {
    stat(path).await.map_or(EntityKind::Absent, |m| EntityKind::from_metadata(&m))
}

/// Synchronous mirror of [`probe`].
pub fn probe_sync(path: impl AsRef<Path>) -> EntityKind {
    stat_sync(path).map_or(EntityKind::Absent, |m| EntityKind::from_metadata(&m))
}

/// `true` if anything exists at `path`.
pub async fn exists(path: impl AsRef<Path>) -> bool {
    probe(path).await.exists()
}

/// Synchronous mirror of [`exists`].
pub fn exists_sync(path: impl AsRef<Path>) -> bool {
    probe_sync(path).exists()
}

/// `true` if `path` is a file.
pub async fn is_file(path: impl AsRef<Path>) -> bool {
    probe(path).await == EntityKind::File
}

/// Synchronous mirror of [`is_file`].
pub fn is_file_sync(path: impl AsRef<Path>) -> bool {
    probe_sync(path) == EntityKind::File
}

/// `true` if `path` is a directory.
pub async fn is_dir(path: impl AsRef<Path>) -> bool {
    probe(path).await == EntityKind::Directory
}

/// Synchronous mirror of [`is_dir`].
pub fn is_dir_sync(path: impl AsRef<Path>) -> bool {
    probe_sync(path) == EntityKind::Directory
}

/// Strictly classify `path` without following a trailing symlink.
///
/// A symlink is reported as [`EntityKind::File`] whatever it points to, so
/// callers unlink the link rather than descending into its target.
///
/// # Errors
///
/// Permission denied. Any other stat failure is reported as
/// [`EntityKind::Absent`].
pub async fn probe_entry(path: impl AsRef<Path>) -> Result<EntityKind> {
    let path = path.as_ref();
    classify_entry(path, tokio::fs::symlink_metadata(path).await)
}

/// Synchronous mirror of [`probe_entry`].
pub fn probe_entry_sync(path: impl AsRef<Path>) -> Result<EntityKind> {
    let path = path.as_ref();
    classify_entry(path, std::fs::symlink_metadata(path))
}

fn classify_entry(path: &Path, metadata: io::Result<Metadata>) -> Result<EntityKind> {
    match metadata {
        Ok(m) if m.file_type().is_dir() => Ok(EntityKind::Directory),
        Ok(_) => Ok(EntityKind::File),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(file_error(
            FileOperation::Metadata,
            path,
            "probing entry",
            "fs::probe::probe_entry",
            e,
        )
        .into()),
        Err(_) => Ok(EntityKind::Absent),
    }
}
