//! Test utilities for sturdyfs
//!
//! Compiled for unit tests and for downstream test targets through the
//! `test-utils` feature:
//!
//! - [`init_test_logging`] installs a `tracing` subscriber once per process
//! - [`TestTree`] builds throwaway directory trees
//!
//! # Example
//!
//! ```rust,no_run
//! use sturdyfs::test_utils::TestTree;
//!
//! let tree = TestTree::builder()
//!     .with_file("src/lib.rs", "")
//!     .with_dir("target/debug")
//!     .build()
//!     .unwrap();
//! assert!(tree.exists("src/lib.rs"));
//! ```

pub mod tree;

pub use tree::{TestTree, TestTreeBuilder};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, logging stays
/// off. Safe to call from every test.
///
/// ```bash
/// RUST_LOG=fs::retry=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true) // show fs::retry, fs::list, ...
            .with_thread_ids(false)
            .try_init();
    });
}
