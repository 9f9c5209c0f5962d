//! Bounded retry with a fixed backoff.
//!
//! Removal and rename are wrapped in [`run_with_retry`] so that transient OS
//! failures (a scanner holding a file open, an unlink that has not propagated
//! on a network share) are absorbed. The action classifies each failure:
//!
//! - [`RetryError::Transient`] - log it, wait `backoff`, try again while the
//!   budget lasts.
//! - [`RetryError::Fatal`] - stop now and hand the error back untouched.
//!
//! The returned error keeps its classification, so callers can tell an
//! exhausted budget from an early abort.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sturdyfs::fs::{RetryError, RetryPolicy, run_with_retry};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), RetryError<std::io::Error>> {
//! let policy = RetryPolicy::new(3, Duration::from_millis(50));
//! run_with_retry(&policy, "removing lock file", || async {
//!     tokio::fs::remove_file("app.lock").await.map_err(RetryError::Transient)
//! })
//! .await?;
//! # Ok(())
//! # }
//! ```

use crate::constants::{
    REMOVE_BACKOFF_MS, REMOVE_MAX_RETRIES, RENAME_BACKOFF_MS, RENAME_MAX_RETRIES,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_retry::RetryIf;
use tokio_retry::strategy::FixedInterval;

/// How many times to retry and how long to wait in between.
///
/// `max_retries` counts retries, not attempts: zero means the action runs
/// exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay between attempts, in milliseconds
    #[serde(default)]
    pub backoff_ms: u64,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_retries,
            backoff_ms: u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// A single attempt with no retries.
    pub const fn once() -> Self {
        Self {
            max_retries: 0,
            backoff_ms: 0,
        }
    }

    /// Default budget for unlink/rmdir: 50 retries, 100ms apart.
    pub const fn removal() -> Self {
        Self {
            max_retries: REMOVE_MAX_RETRIES,
            backoff_ms: REMOVE_BACKOFF_MS,
        }
    }

    /// Default budget for rename: 10 retries, 500ms apart.
    pub const fn rename() -> Self {
        Self {
            max_retries: RENAME_MAX_RETRIES,
            backoff_ms: RENAME_BACKOFF_MS,
        }
    }

    /// Same backoff, different retry count.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Total number of attempts this policy allows.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay between attempts.
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::removal()
    }
}

/// A failure classified for the retry executor.
#[derive(Debug)]
pub enum RetryError<E> {
    /// Worth another attempt.
    Transient(E),
    /// Retrying cannot help; stop immediately.
    Fatal(E),
}

impl<E> RetryError<E> {
    /// `true` for [`RetryError::Transient`].
    pub fn is_transient(&self) -> bool {
        matches!(self, RetryError::Transient(_))
    }

    /// The wrapped error, whatever its classification.
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Transient(e) | RetryError::Fatal(e) => e,
        }
    }

    /// Borrow the wrapped error.
    pub fn inner(&self) -> &E {
        match self {
            RetryError::Transient(e) | RetryError::Fatal(e) => e,
        }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryError::Transient(e) => write!(f, "{e}"),
            RetryError::Fatal(e) => write!(f, "{e} (not retried)"),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner())
    }
}

/// Run `action` until it succeeds, fails fatally, or the policy is spent.
///
/// Each transient failure is logged at warn level under the `fs::retry`
/// target. The wait between attempts is a `tokio` sleep and does not block
/// other tasks.
pub async fn run_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    action: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError<E>>>,
    E: std::fmt::Display,
{
    let strategy = FixedInterval::new(policy.backoff()).take(policy.max_retries as usize);
    let total = policy.attempts();
    let mut attempt = 0u32;

    RetryIf::spawn(strategy, action, |e: &RetryError<E>| {
        attempt += 1;
        log_failure(label, e, attempt, total);
        e.is_transient()
    })
    .await
}

/// Blocking mirror of [`run_with_retry`]; sleeps the current thread between
/// attempts.
pub fn run_with_retry_sync<T, E, F>(
    policy: &RetryPolicy,
    label: &str,
    mut action: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Result<T, RetryError<E>>,
    E: std::fmt::Display,
{
    let total = policy.attempts();
    let mut attempt = 0u32;
    loop {
        match action() {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                log_failure(label, &e, attempt, total);
                if !e.is_transient() || attempt >= total {
                    return Err(e);
                }
                std::thread::sleep(policy.backoff());
            }
        }
    }
}

fn log_failure<E: std::fmt::Display>(label: &str, e: &RetryError<E>, attempt: u32, total: u32) {
    match e {
        RetryError::Fatal(inner) => {
            tracing::debug!(
                target: "fs::retry",
                "{label}: non-retryable failure on attempt {attempt}/{total}: {inner}"
            );
        }
        RetryError::Transient(inner) if attempt < total => {
            tracing::warn!(
                target: "fs::retry",
                "{label}: attempt {attempt}/{total} failed, retrying: {inner}"
            );
        }
        RetryError::Transient(inner) => {
            tracing::warn!(
                target: "fs::retry",
                "{label}: all {total} attempts failed: {inner}"
            );
        }
    }
}
