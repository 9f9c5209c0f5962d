//! Move scenarios

use anyhow::Result;
use std::time::{Duration, Instant};
use sturdyfs::ErrorCategory;
use sturdyfs::fs::{move_path, move_path_sync};
use sturdyfs::test_utils::{TestTree, init_test_logging};

#[tokio::test]
async fn test_unforced_move_onto_existing_target_fails_quickly() -> Result<()> {
    init_test_logging(None);
    let tree = TestTree::builder()
        .with_file("from.txt", "new")
        .with_file("to.txt", "old")
        .build()?;

    let start = Instant::now();
    let err = move_path(tree.path("from.txt"), tree.path("to.txt"), false).await.unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    assert_eq!(tree.read("to.txt")?, "old");
    assert_eq!(tree.read("from.txt")?, "new");
    Ok(())
}

#[tokio::test]
async fn test_forced_move_of_directory_over_directory() -> Result<()> {
    let tree = TestTree::builder()
        .with_file("staging/index.html", "fresh")
        .with_file("live/index.html", "stale")
        .with_file("live/old/asset.css", "")
        .build()?;

    move_path(tree.path("staging"), tree.path("live"), true).await?;
    assert_eq!(tree.snapshot("")?, vec!["live", "live/index.html"]);
    assert_eq!(tree.read("live/index.html")?, "fresh");
    Ok(())
}

#[tokio::test]
async fn test_move_missing_source_aborts_quickly() -> Result<()> {
    let tree = TestTree::new()?;

    let start = Instant::now();
    let err = move_path(tree.path("nope"), tree.path("dest"), true).await.unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(err.category(), ErrorCategory::Aborted);
    Ok(())
}

#[test]
fn test_move_onto_itself_is_a_noop() -> Result<()> {
    let tree = TestTree::builder().with_file("same.txt", "x").build()?;

    move_path_sync(tree.path("same.txt"), tree.path("same.txt"), false)?;
    move_path_sync(tree.path("same.txt"), tree.path("same.txt"), true)?;
    assert_eq!(tree.read("same.txt")?, "x");
    Ok(())
}
