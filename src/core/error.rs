//! Error handling for sturdyfs
//!
//! Every library operation returns [`Result<T>`](crate::Result), whose error is
//! [`FsError`]. Variants are grouped into the categories reported by
//! [`FsError::category`]:
//!
//! - **NotFound** - the target is absent. Most operations swallow this into an
//!   empty result or a no-op; it only surfaces for strict calls
//!   (`throw_on_missing_root`, [`read_json_strict`](crate::fs::read_json_strict)).
//! - **AlreadyExists** - a precondition failure such as an unforced move onto an
//!   existing path. Raised immediately, never retried.
//! - **TransientIo** - a failure that was retried until the budget ran out.
//! - **Aborted** - a failure recognized mid-retry as hopeless (the source of a
//!   rename vanished), surfaced without spending the remaining budget.
//! - **Other** - traversal failures, parse errors and plain I/O errors.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sturdyfs::core::{ErrorCategory, FsError};
//! use sturdyfs::fs::move_path;
//!
//! # async fn example() -> sturdyfs::Result<()> {
//! match move_path("draft.txt", "final.txt", false).await {
//!     Err(e) if e.category() == ErrorCategory::AlreadyExists => {
//!         move_path("draft.txt", "final.txt", true).await?;
//!     }
//!     other => other?,
//! }
//! # Ok(())
//! # }
//! ```

use crate::core::file_error::{FileOperation, FileOperationError};
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of an [`FsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The target does not exist.
    NotFound,
    /// The target already exists and the operation refused to replace it.
    AlreadyExists,
    /// Retries were exhausted on a transient failure.
    TransientIo,
    /// Retrying was abandoned because the failure cannot recover.
    Aborted,
    /// Anything else.
    Other,
}

/// Errors produced by sturdyfs operations.
#[derive(Error, Debug)]
pub enum FsError {
    /// The path does not exist and the caller asked for strict behaviour.
    #[error("Path not found: {}", path.display())]
    NotFound {
        /// The missing path
        path: PathBuf,
    },

    /// The destination of a move or copy already exists.
    #[error("Target '{}' already exists: specify force to overwrite", path.display())]
    AlreadyExists {
        /// The existing path
        path: PathBuf,
    },

    /// A retried operation failed on every attempt.
    #[error("Failed {operation} '{}' after {attempts} attempts: {source}", path.display())]
    RetriesExhausted {
        /// The operation being retried
        operation: FileOperation,
        /// The path being operated on
        path: PathBuf,
        /// How many attempts were made
        attempts: u32,
        /// The error from the final attempt
        #[source]
        source: std::io::Error,
    },

    /// A retried operation hit an error that made further attempts pointless.
    #[error("Gave up {operation} '{}': {source}", path.display())]
    Aborted {
        /// The operation being retried
        operation: FileOperation,
        /// The path being operated on
        path: PathBuf,
        /// The error that stopped the retries
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be read while listing.
    #[error("Failed to read directory '{}' during traversal: {source}", path.display())]
    Traversal {
        /// The directory that could not be read
        path: PathBuf,
        /// The underlying error
        #[source]
        source: std::io::Error,
    },

    /// A file held text that is not valid JSON for the requested type.
    #[error("Invalid JSON in '{}': {source}", path.display())]
    InvalidJson {
        /// The file being parsed
        path: PathBuf,
        /// The parse error
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be serialized to JSON.
    #[error("Failed to serialize JSON for '{}': {source}", path.display())]
    Serialize {
        /// The file being written
        path: PathBuf,
        /// The serialization error
        #[source]
        source: serde_json::Error,
    },

    /// The home directory of the current user could not be determined.
    #[error("Unable to determine the user home directory")]
    HomeDirNotFound,

    /// A plain I/O failure with operation context.
    #[error(transparent)]
    File(#[from] FileOperationError),
}

impl FsError {
    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            FsError::NotFound {
                ..
            } => ErrorCategory::NotFound,
            FsError::AlreadyExists {
                ..
            } => ErrorCategory::AlreadyExists,
            FsError::RetriesExhausted {
                ..
            } => ErrorCategory::TransientIo,
            FsError::Aborted {
                ..
            } => ErrorCategory::Aborted,
            FsError::File(e) if e.kind() == std::io::ErrorKind::NotFound => {
                ErrorCategory::NotFound
            }
            FsError::File(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                ErrorCategory::AlreadyExists
            }
            FsError::Traversal {
                source,
                ..
            } if source.kind() == std::io::ErrorKind::NotFound => ErrorCategory::NotFound,
            _ => ErrorCategory::Other,
        }
    }

    /// The underlying IO error, when this error wraps one.
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            FsError::RetriesExhausted {
                source,
                ..
            }
            | FsError::Aborted {
                source,
                ..
            }
            | FsError::Traversal {
                source,
                ..
            } => Some(source),
            FsError::File(e) => Some(&e.source),
            _ => None,
        }
    }
}
