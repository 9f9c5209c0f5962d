//! sturdyfs - forgiving filesystem operations for scripts and tools
//!
//! Async wrappers (with blocking `_sync` mirrors) around the primitive
//! filesystem calls, smoothing over the things that make them awkward to use
//! directly: missing parent directories on write, deletes racing other
//! deletes, files briefly locked by scanners or indexers, and listing trees
//! with filters.
//!
//! # Core Modules
//!
//! - [`fs`] - traversal, removal, move, copy, read/write and probing
//! - [`core`] - [`FsError`], its [`ErrorCategory`], and file operation context
//! - [`config`] - retry budgets and removal strategy loaded from TOML
//! - [`constants`] - the built-in retry defaults
//!
//! # Listing
//!
//! ```rust,no_run
//! use regex::Regex;
//! use sturdyfs::fs::{TraversalOptions, list};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let options = TraversalOptions::new()
//!     .recurse(true)
//!     .include(Regex::new(r"\.md$")?)
//!     .prune(Regex::new("node_modules")?);
//! let docs = list("project", &options).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Removing and Moving
//!
//! Removal and rename retry transient failures with a fixed backoff. A target
//! that is already gone counts as removed.
//!
//! ```rust,no_run
//! use sturdyfs::fs::{move_path, remove};
//!
//! # async fn example() -> sturdyfs::Result<()> {
//! remove("build/output").await?;
//! move_path("build/staging", "build/output", true).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Logging
//!
//! The library logs through `tracing` and installs no subscriber of its own.
//! See [`fs`] for the targets used.

pub mod config;
pub mod constants;
pub mod core;
pub mod fs;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::core::{ErrorCategory, FsError, Result};
