//! Filesystem operations.
//!
//! The core is the traversal engine ([`list`]) and the retrying destructive
//! operations built on it ([`remove`], [`remove_dir`], [`move_path`]). Around
//! them sit thin wrappers for reading, writing, copying and probing paths.
//!
//! Every async function has a blocking `_sync` mirror with the same semantics,
//! except the JSON and copy helpers, which are async only.
//!
//! # Logging
//!
//! Events are emitted through `tracing` under these targets:
//!
//! - `fs::list` - skipped directories and descent decisions
//! - `fs::retry` - every failed attempt
//! - `fs::remove` - tree removals and strategy detection
//! - `fs::move` - completed moves and forced overwrites
//! - `fs::copy` - tree copies
//! - `fs::read` - JSON files ignored by the lenient reader
//!
//! Configuration loading logs under `config`.

pub mod copy;
pub mod dirs;
pub mod formats;
pub mod handle;
pub mod paths;
pub mod probe;
pub mod remove;
pub mod rename;
pub mod retry;
pub mod traverse;

pub use copy::{CopyMode, CopyOptions, copy, copy_file};
pub use dirs::{mkdir, mkdir_sync};
pub use formats::{
    read_file, read_file_sync, read_json, read_json_strict, read_text_file,
    read_text_file_lines, read_text_file_lines_sync, read_text_file_sync, split_lines,
    write_file, write_file_sync, write_json, write_text_file, write_text_file_sync,
    write_text_lines, write_text_lines_sync,
};
pub use handle::Fs;
pub use paths::{absolute_path, home_dir, resolve_home_path};
pub use probe::{
    EntityKind, exists, exists_sync, is_dir, is_dir_sync, is_file, is_file_sync, probe,
    probe_entry, probe_entry_sync, probe_sync, stat, stat_sync,
};
pub use remove::{
    RemovalStrategy, RemoveDirOptions, remove, remove_dir, remove_dir_sync,
    remove_dir_with_policy, remove_dir_with_policy_sync, remove_sync, remove_with_policy,
    remove_with_policy_sync,
};
pub use rename::{
    MovePolicy, move_path, move_path_sync, move_path_with_policy, move_path_with_policy_sync,
};
pub use retry::{RetryError, RetryPolicy, run_with_retry, run_with_retry_sync};
pub use traverse::{
    EntityFilter, TraversalAction, TraversalErrorHandler, TraversalOptions, list, list_sync,
};
