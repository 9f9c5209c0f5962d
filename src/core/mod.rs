//! Core types for sturdyfs
//!
//! - [`FsError`] and [`ErrorCategory`] - the error every operation returns
//! - [`FileOperationError`] and [`FileResultExt`] - operation-site context for
//!   plain I/O failures

pub mod error;
pub mod file_error;

pub use error::{ErrorCategory, FsError};
pub use file_error::{FileOperation, FileOperationContext, FileOperationError, FileResultExt};

/// Result alias used by all filesystem operations.
pub type Result<T> = std::result::Result<T, FsError>;
