//! Removal scenarios

use anyhow::Result;
use std::time::{Duration, Instant};
use sturdyfs::FsError;
use sturdyfs::core::FileOperation;
use sturdyfs::fs::{
    RemovalStrategy, RemoveDirOptions, RetryPolicy, remove, remove_dir, remove_sync,
    remove_with_policy, remove_with_policy_sync,
};
use sturdyfs::test_utils::{TestTree, init_test_logging};

fn nested() -> Result<TestTree> {
    TestTree::builder()
        .with_file("victim/a.txt", "a")
        .with_file("victim/sub/b.txt", "b")
        .with_file("victim/sub/deeper/c.txt", "c")
        .with_dir("victim/sub/empty")
        .with_file("bystander.txt", "keep")
        .build()
}

#[tokio::test]
async fn test_remove_nested_directory_leaves_nothing() -> Result<()> {
    init_test_logging(None);
    let tree = nested()?;

    remove(tree.path("victim")).await?;
    assert!(!tree.exists("victim"));
    assert_eq!(tree.snapshot("")?, vec!["bystander.txt"]);
    Ok(())
}

#[tokio::test]
async fn test_remove_is_idempotent() -> Result<()> {
    let tree = nested()?;

    remove(tree.path("victim")).await?;
    remove(tree.path("victim")).await?;
    remove_sync(tree.path("victim"))?;
    remove(tree.path("bystander.txt")).await?;
    remove(tree.path("bystander.txt")).await?;
    assert!(tree.snapshot("")?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_concurrent_removals_of_same_tree() -> Result<()> {
    let tree = TestTree::new()?;
    for i in 0..20 {
        tree.file(format!("shared/d{}/f{i}.txt", i % 4), "x")?;
    }
    let target = tree.path("shared");
    let policy = RetryPolicy::new(5, Duration::from_millis(5));

    let (a, b) = tokio::join!(
        remove_with_policy(&target, &policy),
        remove_with_policy(&target, &policy)
    );
    a?;
    b?;
    assert!(!target.exists());
    Ok(())
}

#[tokio::test]
async fn test_remove_dir_modes() -> Result<()> {
    let tree = nested()?;

    let start = Instant::now();
    assert!(remove_dir(tree.path("victim"), &RemoveDirOptions::default()).await.is_err());
    assert!(start.elapsed() < Duration::from_secs(1));

    remove_dir(tree.path("victim/sub/empty"), &RemoveDirOptions::default()).await?;
    assert!(!tree.exists("victim/sub/empty"));

    let options = RemoveDirOptions::recursive().with_strategy(RemovalStrategy::Manual);
    remove_dir(tree.path("victim"), &options).await?;
    assert!(!tree.exists("victim"));

    remove_dir(tree.path("victim"), &RemoveDirOptions::recursive()).await?;
    Ok(())
}

#[tokio::test]
async fn test_path_below_a_file_counts_as_absent() -> Result<()> {
    let tree = TestTree::builder().with_file("plain.txt", "keep").build()?;
    let below = tree.path("plain.txt/child");

    remove(&below).await?;
    remove_sync(&below)?;
    remove_dir(&below, &RemoveDirOptions::recursive()).await?;
    assert_eq!(tree.read("plain.txt")?, "keep");
    Ok(())
}

#[tokio::test]
#[cfg(unix)]
async fn test_locked_entries_exhaust_the_retry_budget() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tree = TestTree::builder()
        .with_file("locked/file.txt", "x")
        .with_dir("locked/sub")
        .build()?;
    let locked = tree.path("locked");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o555))?;

    // root ignores directory permissions; nothing to assert in that case
    if std::fs::write(locked.join("write-check"), "").is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let policy = RetryPolicy::new(3, Duration::from_millis(1));
    let file = remove_with_policy(tree.path("locked/file.txt"), &policy).await;
    let sub = remove_with_policy_sync(tree.path("locked/sub"), &policy);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755))?;

    match file {
        Err(FsError::RetriesExhausted {
            operation,
            path,
            attempts,
            ..
        }) => {
            assert_eq!(operation, FileOperation::RemoveFile);
            assert_eq!(path, tree.path("locked/file.txt"));
            assert_eq!(attempts, policy.attempts());
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
    match sub {
        Err(FsError::RetriesExhausted {
            operation,
            attempts,
            ..
        }) => {
            assert_eq!(operation, FileOperation::RemoveDir);
            assert_eq!(attempts, policy.attempts());
        }
        other => panic!("expected exhausted retries, got {other:?}"),
    }
    assert!(tree.exists("locked/file.txt"));
    assert!(tree.exists("locked/sub"));
    Ok(())
}
