//! Move with optional forced overwrite.

use crate::core::file_error::{FileOperation, file_error};
use crate::core::{FsError, Result};
use crate::fs::paths::absolute_path;
use crate::fs::probe::{EntityKind, probe_entry, probe_entry_sync};
use crate::fs::remove::{remove_with_policy, remove_with_policy_sync};
use crate::fs::retry::{RetryError, RetryPolicy, run_with_retry, run_with_retry_sync};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};

/// Retry budgets used by a move: one for the rename itself, one for clearing
/// the destination under `force`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePolicy {
    pub rename: RetryPolicy,
    pub remove: RetryPolicy,
}

impl Default for MovePolicy {
    fn default() -> Self {
        Self {
            rename: RetryPolicy::rename(),
            remove: RetryPolicy::removal(),
        }
    }
}

struct Endpoints {
    from: PathBuf,
    to: PathBuf,
}

impl Endpoints {
    fn resolve(from: &Path, to: &Path) -> Result<Self> {
        let absolute = |p: &Path| {
            absolute_path(p).map_err(|e| {
                FsError::from(file_error(
                    FileOperation::Resolve,
                    p,
                    "resolving move endpoint",
                    "fs::rename::move_path",
                    e,
                ))
            })
        };
        Ok(Self {
            from: absolute(from)?,
            to: absolute(to)?,
        })
    }

    fn same(&self) -> bool {
        self.from == self.to
    }

    /// Both endpoints name one directory entry, e.g. through a symlinked parent.
    async fn aliased(&self) -> bool {
        match (
            tokio::fs::symlink_metadata(&self.from).await,
            tokio::fs::symlink_metadata(&self.to).await,
        ) {
            (Ok(a), Ok(b)) => same_entry(&a, &b),
            _ => false,
        }
    }

    fn aliased_sync(&self) -> bool {
        match (std::fs::symlink_metadata(&self.from), std::fs::symlink_metadata(&self.to)) {
            (Ok(a), Ok(b)) => same_entry(&a, &b),
            _ => false,
        }
    }

    fn noop(&self) -> Result<()> {
        tracing::debug!(
            target: "fs::move",
            "{} and {} are the same entry, nothing to move",
            self.from.display(),
            self.to.display()
        );
        Ok(())
    }

    fn occupied(&self, kind: EntityKind, force: bool) -> Result<bool> {
        if !kind.exists() {
            return Ok(false);
        }
        if !force {
            return Err(FsError::AlreadyExists {
                path: self.to.clone(),
            });
        }
        tracing::debug!(
            target: "fs::move",
            "removing existing target {} before move",
            self.to.display()
        );
        Ok(true)
    }

    fn failure(&self, policy: &RetryPolicy, error: RetryError<io::Error>) -> FsError {
        match error {
            RetryError::Transient(source) => FsError::RetriesExhausted {
                operation: FileOperation::Rename,
                path: self.from.clone(),
                attempts: policy.attempts(),
                source,
            },
            RetryError::Fatal(source) => FsError::Aborted {
                operation: FileOperation::Rename,
                path: self.from.clone(),
                source,
            },
        }
    }
}

#[cfg(unix)]
fn same_entry(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

// No stable file identity outside unix; the lexical comparison is all we have.
#[cfg(not(unix))]
fn same_entry(_a: &Metadata, _b: &Metadata) -> bool {
    false
}

/// A vanished source cannot reappear by waiting.
fn classify(result: io::Result<()>) -> std::result::Result<(), RetryError<io::Error>> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RetryError::Fatal(e)),
        Err(e) => Err(RetryError::Transient(e)),
    }
}

/// Move `from` to `to`.
///
/// Moving a path onto itself does nothing, however either side is spelled. An existing `to` is an error unless
/// `force` is set, in which case it is removed first (files and whole trees
/// alike). The rename is retried up to 10 times, 500ms apart.
///
/// # Errors
///
/// - [`FsError::AlreadyExists`] when `to` exists and `force` is false
/// - [`FsError::Aborted`] when `from` does not exist
/// - [`FsError::RetriesExhausted`] when the rename keeps failing
pub async fn move_path(from: impl AsRef<Path>, to: impl AsRef<Path>, force: bool) -> Result<()> {
    move_path_with_policy(from, to, force, &MovePolicy::default()).await
}

/// [`move_path`] with explicit retry budgets.
pub async fn move_path_with_policy(
    from: impl AsRef<Path>,
    to: impl AsRef<Path>,
    force: bool,
    policy: &MovePolicy,
) -> Result<()> {
    let ends = Endpoints::resolve(from.as_ref(), to.as_ref())?;
    if ends.same() || ends.aliased().await {
        return ends.noop();
    }

    if ends.occupied(probe_entry(&ends.to).await?, force)? {
        remove_with_policy(&ends.to, &policy.remove).await?;
    }

    let (src, dst) = (ends.from.as_path(), ends.to.as_path());
    run_with_retry(&policy.rename, "renaming", || async move {
        classify(tokio::fs::rename(src, dst).await)
    })
    .await
    .map_err(|e| ends.failure(&policy.rename, e))?;

    tracing::debug!(target: "fs::move", "moved {} -> {}", src.display(), dst.display());
    Ok(())
}

/// Blocking mirror of [`move_path`].
pub fn move_path_sync(from: impl AsRef<Path>, to: impl AsRef<Path>, force: bool) -> Result<()> {
    move_path_with_policy_sync(from, to, force, &MovePolicy::default())
}

/// Blocking mirror of [`move_path_with_policy`].
pub fn move_path_with_policy_sync(
    from: impl AsRef<Path>,
    to: impl AsRef<Path>,
    force: bool,
    policy: &MovePolicy,
) -> Result<()> {
    let ends = Endpoints::resolve(from.as_ref(), to.as_ref())?;
    if ends.same() || ends.aliased_sync() {
        return ends.noop();
    }

    if ends.occupied(probe_entry_sync(&ends.to)?, force)? {
        remove_with_policy_sync(&ends.to, &policy.remove)?;
    }

    run_with_retry_sync(&policy.rename, "renaming", || classify(std::fs::rename(&ends.from, &ends.to)))
        .map_err(|e| ends.failure(&policy.rename, e))?;

    tracing::debug!(target: "fs::move", "moved {} -> {}", ends.from.display(), ends.to.display());
    Ok(())
}
