//! Copy scenarios

use anyhow::Result;
use sturdyfs::ErrorCategory;
use sturdyfs::fs::{CopyMode, CopyOptions, copy, copy_file};
use sturdyfs::test_utils::TestTree;

#[tokio::test]
async fn test_recursive_copy_mirrors_tree() -> Result<()> {
    let tree = TestTree::builder()
        .with_file("src/a.txt", "a")
        .with_file("src/nested/b.txt", "b")
        .with_dir("src/nested/empty")
        .build()?;

    copy(tree.path("src"), tree.path("dst"), &CopyOptions::recursive()).await?;
    assert_eq!(tree.snapshot("dst")?, tree.snapshot("src")?);
    assert_eq!(tree.read("dst/nested/b.txt")?, "b");
    Ok(())
}

#[tokio::test]
async fn test_copy_respects_existing_files() -> Result<()> {
    let tree = TestTree::builder()
        .with_file("src/a.txt", "new")
        .with_file("dst/a.txt", "old")
        .build()?;

    let err = copy(tree.path("src"), tree.path("dst"), &CopyOptions::recursive())
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::AlreadyExists);
    assert_eq!(tree.read("dst/a.txt")?, "old");

    copy(tree.path("src"), tree.path("dst"), &CopyOptions::recursive().overwrite()).await?;
    assert_eq!(tree.read("dst/a.txt")?, "new");
    Ok(())
}

#[tokio::test]
async fn test_copy_file_creates_missing_parents() -> Result<()> {
    let tree = TestTree::builder().with_file("one.txt", "1").build()?;

    copy_file(tree.path("one.txt"), tree.path("deep/er/two.txt"), CopyMode::ErrorOnExisting)
        .await?;
    assert_eq!(tree.read("deep/er/two.txt")?, "1");
    Ok(())
}
