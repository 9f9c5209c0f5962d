//! Default retry budgets and other numeric constants used by the destructive
//! operations.
//!
//! These are only defaults: every operation that retries takes an explicit
//! [`RetryPolicy`](crate::fs::RetryPolicy), and [`FsConfig`](crate::config::FsConfig)
//! can override each budget from a TOML file.

/// Retries for a single unlink or rmdir during removal.
///
/// Together with [`REMOVE_BACKOFF_MS`] this gives roughly five seconds for a
/// locked file (antivirus scanners, indexers) to be released.
pub const REMOVE_MAX_RETRIES: u32 = 50;

/// Delay between removal attempts, in milliseconds.
pub const REMOVE_BACKOFF_MS: u64 = 100;

/// Retries for a rename.
pub const RENAME_MAX_RETRIES: u32 = 10;

/// Delay between rename attempts, in milliseconds.
pub const RENAME_BACKOFF_MS: u64 = 500;

/// Line separator used when joining lines for text writes.
pub const DEFAULT_EOL: &str = "\n";

/// Environment variable naming a TOML file that overrides the retry defaults.
pub const CONFIG_PATH_ENV: &str = "STURDYFS_CONFIG";
