//! Retried removal of files, directories and whole trees.
//!
//! Every unlink and rmdir goes through the retry executor, and a path that
//! disappears underneath us counts as removed. That makes [`remove`] idempotent
//! and safe to race against other cleaners.
//!
//! Trees are deleted bottom-up from a manifest built by the traversal engine:
//! deepest paths first, so no directory is removed before its contents.
//! [`remove_dir`] with `recursive` can instead hand the tree to the platform's
//! bulk remove, depending on the [`RemovalStrategy`].

use crate::core::file_error::{FileOperation, file_error};
use crate::core::{FsError, Result};
use crate::fs::paths::absolute_path;
use crate::fs::probe::{EntityKind, probe_entry, probe_entry_sync};
use crate::fs::retry::{RetryError, RetryPolicy, run_with_retry, run_with_retry_sync};
use crate::fs::traverse::{TraversalOptions, list, list_sync};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// How a recursive [`remove_dir`] deletes a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalStrategy {
    /// One retried call to the platform's recursive remove.
    Native,
    /// Bottom-up deletion from a traversal manifest, each entry retried.
    Manual,
}

static DETECTED_STRATEGY: OnceLock<RemovalStrategy> = OnceLock::new();

impl RemovalStrategy {
    /// The strategy for this process, chosen on first use.
    pub fn detect() -> Self {
        *DETECTED_STRATEGY.get_or_init(|| {
            let strategy = if cfg!(any(unix, windows)) {
                RemovalStrategy::Native
            } else {
                RemovalStrategy::Manual
            };
            tracing::debug!(target: "fs::remove", "recursive removal strategy: {strategy:?}");
            strategy
        })
    }
}

/// Options for [`remove_dir`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemoveDirOptions {
    /// Remove the directory and everything in it.
    pub recursive: bool,
    /// Override the retry count of the policy in use.
    pub retries: Option<u32>,
    /// Override the detected [`RemovalStrategy`] for this call.
    pub strategy: Option<RemovalStrategy>,
}

impl RemoveDirOptions {
    /// Recursive removal with default retries.
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: RemovalStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    fn policy(&self, base: &RetryPolicy) -> RetryPolicy {
        self.retries.map_or(*base, |retries| base.with_max_retries(retries))
    }
}

/// Whether a non-empty directory is worth another rmdir attempt.
#[derive(Clone, Copy)]
enum NotEmpty {
    /// Part of a tree removal: something may still be releasing a child.
    Retry,
    /// A plain rmdir: the caller asked for an empty directory only.
    Fail,
}

fn classify(result: io::Result<()>, not_empty: NotEmpty) -> std::result::Result<(), RetryError<io::Error>> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotADirectory => Err(RetryError::Fatal(e)),
        Err(e) if e.kind() == io::ErrorKind::DirectoryNotEmpty => match not_empty {
            NotEmpty::Retry => Err(RetryError::Transient(e)),
            NotEmpty::Fail => Err(RetryError::Fatal(e)),
        },
        Err(e) => Err(RetryError::Transient(e)),
    }
}

fn retry_failure(
    operation: FileOperation,
    path: &Path,
    policy: &RetryPolicy,
    error: RetryError<io::Error>,
) -> FsError {
    match error {
        RetryError::Transient(source) => FsError::RetriesExhausted {
            operation,
            path: path.to_path_buf(),
            attempts: policy.attempts(),
            source,
        },
        RetryError::Fatal(source) => {
            file_error(operation, path, "removing", "fs::remove", source).into()
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    absolute_path(path).map_err(|e| {
        file_error(FileOperation::Resolve, path, "resolving removal target", "fs::remove", e).into()
    })
}

/// Deepest first, then reverse name order within a depth.
fn order_children_first(manifest: &mut [PathBuf]) {
    manifest.sort_by(|a, b| {
        b.components().count().cmp(&a.components().count()).then_with(|| b.cmp(a))
    });
}

fn manifest_options() -> TraversalOptions {
    TraversalOptions::new().recurse(true).full_paths(true)
}

async fn unlink(path: &Path, policy: &RetryPolicy) -> Result<()> {
    run_with_retry(policy, "removing file", || async move {
        classify(tokio::fs::remove_file(path).await, NotEmpty::Retry)
    })
    .await
    .map_err(|e| retry_failure(FileOperation::RemoveFile, path, policy, e))
}

async fn rmdir(path: &Path, policy: &RetryPolicy, not_empty: NotEmpty) -> Result<()> {
    run_with_retry(policy, "removing directory", || async move {
        classify(tokio::fs::remove_dir(path).await, not_empty)
    })
    .await
    .map_err(|e| retry_failure(FileOperation::RemoveDir, path, policy, e))
}

async fn deltree(root: &Path, policy: &RetryPolicy) -> Result<()> {
    let mut manifest = list(root, &manifest_options()).await?;
    order_children_first(&mut manifest);
    tracing::debug!(
        target: "fs::remove",
        "removing tree {} ({} entries)",
        root.display(),
        manifest.len()
    );

    for entry in &manifest {
        match probe_entry(entry).await? {
            EntityKind::Absent => {}
            EntityKind::Directory => rmdir(entry, policy, NotEmpty::Retry).await?,
            EntityKind::File => unlink(entry, policy).await?,
        }
    }
    rmdir(root, policy, NotEmpty::Retry).await
}

/// Remove a file, symlink or directory tree. A missing path is not an error.
///
/// Uses the default removal budget (50 retries, 100ms apart).
///
/// # Errors
///
/// [`FsError::RetriesExhausted`] when an entry stays locked for the whole
/// budget; [`FsError::Traversal`] when part of the tree cannot be listed.
pub async fn remove(path: impl AsRef<Path>) -> Result<()> {
    remove_with_policy(path, &RetryPolicy::removal()).await
}

/// [`remove`] with an explicit retry policy.
pub async fn remove_with_policy(path: impl AsRef<Path>, policy: &RetryPolicy) -> Result<()> {
    let path = absolute(path.as_ref())?;
    match probe_entry(&path).await? {
        EntityKind::Absent => {
            tracing::debug!(target: "fs::remove", "{} already absent", path.display());
            Ok(())
        }
        EntityKind::File => unlink(&path, policy).await,
        EntityKind::Directory => deltree(&path, policy).await,
    }
}

/// Remove a directory.
///
/// Without `recursive` only an empty directory is removed; a non-empty one
/// fails at once instead of burning the retry budget. With `recursive` the
/// whole tree goes, using [`RemovalStrategy::detect`] unless the options name
/// a strategy. A missing directory is not an error.
pub async fn remove_dir(path: impl AsRef<Path>, options: &RemoveDirOptions) -> Result<()> {
    remove_dir_with_policy(path, options, &RetryPolicy::removal()).await
}

/// [`remove_dir`] with an explicit base policy; `options.retries` still wins.
pub async fn remove_dir_with_policy(
    path: impl AsRef<Path>,
    options: &RemoveDirOptions,
    policy: &RetryPolicy,
) -> Result<()> {
    let path = absolute(path.as_ref())?;
    let policy = options.policy(policy);

    if probe_entry(&path).await? == EntityKind::Absent {
        return Ok(());
    }
    if !options.recursive {
        return rmdir(&path, &policy, NotEmpty::Fail).await;
    }

    match options.strategy.unwrap_or_else(RemovalStrategy::detect) {
        RemovalStrategy::Native => {
            let target = path.as_path();
            run_with_retry(&policy, "removing directory tree", || async move {
                classify(tokio::fs::remove_dir_all(target).await, NotEmpty::Retry)
            })
            .await
            .map_err(|e| retry_failure(FileOperation::RemoveTree, &path, &policy, e))
        }
        RemovalStrategy::Manual => match probe_entry(&path).await? {
            EntityKind::Absent => Ok(()),
            EntityKind::Directory => deltree(&path, &policy).await,
            EntityKind::File => rmdir(&path, &policy, NotEmpty::Fail).await,
        },
    }
}

fn unlink_sync(path: &Path, policy: &RetryPolicy) -> Result<()> {
    run_with_retry_sync(policy, "removing file", || {
        classify(std::fs::remove_file(path), NotEmpty::Retry)
    })
    .map_err(|e| retry_failure(FileOperation::RemoveFile, path, policy, e))
}

fn rmdir_sync(path: &Path, policy: &RetryPolicy, not_empty: NotEmpty) -> Result<()> {
    run_with_retry_sync(policy, "removing directory", || {
        classify(std::fs::remove_dir(path), not_empty)
    })
    .map_err(|e| retry_failure(FileOperation::RemoveDir, path, policy, e))
}

fn deltree_sync(root: &Path, policy: &RetryPolicy) -> Result<()> {
    let mut manifest = list_sync(root, &manifest_options())?;
    order_children_first(&mut manifest);
    tracing::debug!(
        target: "fs::remove",
        "removing tree {} ({} entries)",
        root.display(),
        manifest.len()
    );

    for entry in &manifest {
        match probe_entry_sync(entry)? {
            EntityKind::Absent => {}
            EntityKind::Directory => rmdir_sync(entry, policy, NotEmpty::Retry)?,
            EntityKind::File => unlink_sync(entry, policy)?,
        }
    }
    rmdir_sync(root, policy, NotEmpty::Retry)
}

/// Blocking mirror of [`remove`].
pub fn remove_sync(path: impl AsRef<Path>) -> Result<()> {
    remove_with_policy_sync(path, &RetryPolicy::removal())
}

/// Blocking mirror of [`remove_with_policy`].
pub fn remove_with_policy_sync(path: impl AsRef<Path>, policy: &RetryPolicy) -> Result<()> {
    let path = absolute(path.as_ref())?;
    match probe_entry_sync(&path)? {
        EntityKind::Absent => {
            tracing::debug!(target: "fs::remove", "{} already absent", path.display());
            Ok(())
        }
        EntityKind::File => unlink_sync(&path, policy),
        EntityKind::Directory => deltree_sync(&path, policy),
    }
}

/// Blocking mirror of [`remove_dir`].
pub fn remove_dir_sync(path: impl AsRef<Path>, options: &RemoveDirOptions) -> Result<()> {
    remove_dir_with_policy_sync(path, options, &RetryPolicy::removal())
}

/// Blocking mirror of [`remove_dir_with_policy`].
pub fn remove_dir_with_policy_sync(
    path: impl AsRef<Path>,
    options: &RemoveDirOptions,
    policy: &RetryPolicy,
) -> Result<()> {
    let path = absolute(path.as_ref())?;
    let policy = options.policy(policy);

    if probe_entry_sync(&path)? == EntityKind::Absent {
        return Ok(());
    }
    if !options.recursive {
        return rmdir_sync(&path, &policy, NotEmpty::Fail);
    }

    match options.strategy.unwrap_or_else(RemovalStrategy::detect) {
        RemovalStrategy::Native => run_with_retry_sync(&policy, "removing directory tree", || {
            classify(std::fs::remove_dir_all(&path), NotEmpty::Retry)
        })
        .map_err(|e| retry_failure(FileOperation::RemoveTree, &path, &policy, e)),
        RemovalStrategy::Manual => match probe_entry_sync(&path)? {
            EntityKind::Absent => Ok(()),
            EntityKind::Directory => deltree_sync(&path, &policy),
            EntityKind::File => rmdir_sync(&path, &policy, NotEmpty::Fail),
        },
    }
}
