//! Retry policy values and the retry executor's public contract

use std::io;
use std::time::Duration;
use sturdyfs::constants::{REMOVE_MAX_RETRIES, RENAME_BACKOFF_MS};
use sturdyfs::fs::{RetryError, RetryPolicy, run_with_retry, run_with_retry_sync};

#[test]
fn test_policy_deserializes_with_default_backoff() {
    let policy: RetryPolicy = serde_json::from_str(r#"{ "max_retries": 3 }"#).unwrap();
    assert_eq!(policy.attempts(), 4);
    assert_eq!(policy.backoff(), Duration::ZERO);

    let policy: RetryPolicy = toml::from_str("max_retries = 1\nbackoff_ms = 250").unwrap();
    assert_eq!(policy, RetryPolicy::new(1, Duration::from_millis(250)));
}

#[test]
fn test_defaults_come_from_constants() {
    assert_eq!(RetryPolicy::default().max_retries, REMOVE_MAX_RETRIES);
    assert_eq!(RetryPolicy::rename().backoff_ms, RENAME_BACKOFF_MS);
}

#[test]
fn test_retry_error_display_marks_fatal() {
    let transient: RetryError<io::Error> = RetryError::Transient(io::Error::other("busy"));
    let fatal: RetryError<io::Error> = RetryError::Fatal(io::Error::other("gone"));

    assert_eq!(transient.to_string(), "busy");
    assert_eq!(fatal.to_string(), "gone (not retried)");
}

#[tokio::test]
async fn test_async_and_sync_agree_on_attempt_count() {
    sturdyfs::test_utils::init_test_logging(None);
    let policy = RetryPolicy::new(2, Duration::ZERO);

    let mut async_calls = 0;
    let _ = run_with_retry(&policy, "counting", || {
        async_calls += 1;
        async { Err::<(), _>(RetryError::Transient(io::Error::other("again"))) }
    })
    .await;

    let mut sync_calls = 0;
    let _ = run_with_retry_sync(&policy, "counting", || {
        sync_calls += 1;
        Err::<(), _>(RetryError::Transient(io::Error::other("again")))
    });

    assert_eq!(async_calls, 3);
    assert_eq!(sync_calls, 3);
}
