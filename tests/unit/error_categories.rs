//! Error categories and messages as seen by callers

use std::error::Error as _;
use std::io;
use std::path::PathBuf;
use sturdyfs::core::{FileOperation, FileOperationContext, FileOperationError};
use sturdyfs::{ErrorCategory, FsError};

#[test]
fn test_traversal_error_category_depends_on_cause() {
    let missing = FsError::Traversal {
        path: PathBuf::from("/gone"),
        source: io::Error::from(io::ErrorKind::NotFound),
    };
    assert_eq!(missing.category(), ErrorCategory::NotFound);

    let denied = FsError::Traversal {
        path: PathBuf::from("/locked"),
        source: io::Error::from(io::ErrorKind::PermissionDenied),
    };
    assert_eq!(denied.category(), ErrorCategory::Other);
    assert!(denied.to_string().contains("/locked"));
}

#[test]
fn test_file_operation_error_is_transparent() {
    let inner = FileOperationError::new(
        FileOperationContext::new(FileOperation::Copy, "/a.txt", "copying file", "test")
            .with_related_path("/b.txt"),
        io::Error::from(io::ErrorKind::AlreadyExists),
    );
    let message = inner.to_string();
    let err = FsError::from(inner);

    assert_eq!(err.to_string(), message);
    assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    assert!(err.source().is_some());
}

#[test]
fn test_retries_exhausted_keeps_last_cause() {
    let err = FsError::RetriesExhausted {
        operation: FileOperation::Rename,
        path: PathBuf::from("/busy"),
        attempts: 11,
        source: io::Error::new(io::ErrorKind::PermissionDenied, "sharing violation"),
    };

    assert_eq!(err.category(), ErrorCategory::TransientIo);
    assert_eq!(err.io_error().map(io::Error::kind), Some(io::ErrorKind::PermissionDenied));
    assert!(err.to_string().contains("renaming"));
    assert!(err.to_string().contains("11 attempts"));
}
