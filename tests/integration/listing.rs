//! Listing scenarios

use anyhow::Result;
use regex::Regex;
use serial_test::serial;
use std::path::PathBuf;
use sturdyfs::fs::{EntityFilter, TraversalAction, TraversalOptions, list, list_sync};
use sturdyfs::test_utils::{TestTree, init_test_logging};
use sturdyfs::{ErrorCategory, FsError};

fn paths(items: &[&str]) -> Vec<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[tokio::test]
async fn test_max_depth_limits_reporting_and_descent() -> Result<()> {
    init_test_logging(None);
    let tree = TestTree::builder().with_dir("foo/bar/quux").build()?;

    let result = list(tree.root(), &TraversalOptions::new().recurse(true).max_depth(2)).await?;
    assert_eq!(result, paths(&["foo", "foo/bar"]));
    Ok(())
}

#[tokio::test]
async fn test_prune_keeps_directory_but_hides_contents() -> Result<()> {
    let tree = TestTree::builder()
        .with_file("node_modules/pkg/index.js", "")
        .with_file("src/main.js", "")
        .build()?;

    let options = TraversalOptions::new().recurse(true).prune(Regex::new("node_modules")?);
    let result = list(tree.root(), &options).await?;
    assert_eq!(result, paths(&["node_modules", "src", "src/main.js"]));
    Ok(())
}

#[tokio::test]
async fn test_include_patterns_are_or_combined() -> Result<()> {
    let tree = TestTree::builder()
        .with_dir("include1")
        .with_dir("include2")
        .with_dir("exclude1")
        .with_dir("exclude2")
        .with_file("include1/file.txt", "x")
        .build()?;

    let options = TraversalOptions::new()
        .recurse(true)
        .include(Regex::new("include")?)
        .include(Regex::new("exclude")?);
    let result = list(tree.root(), &options).await?;
    assert_eq!(result.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_stop_on_first_match() -> Result<()> {
    let tree = TestTree::builder().with_files(&["a.js", "b.js", "c.js"]).build()?;

    let options = TraversalOptions::new().include(Regex::new("b")?).stop_on_first_match(true);
    assert_eq!(list(tree.root(), &options).await?, paths(&["b.js"]));
    assert_eq!(list_sync(tree.root(), &options)?, paths(&["b.js"]));
    Ok(())
}

#[tokio::test]
async fn test_filtered_out_directories_are_still_walked() -> Result<()> {
    let tree = TestTree::builder()
        .with_file("docs/guide/intro.md", "")
        .with_file("docs/notes.txt", "")
        .build()?;

    let options = TraversalOptions::new()
        .recurse(true)
        .entities(EntityFilter::Files)
        .include(Regex::new(r"\.md$")?);
    assert_eq!(list(tree.root(), &options).await?, paths(&["docs/guide/intro.md"]));
    Ok(())
}

#[tokio::test]
async fn test_exclude_wins_over_include() -> Result<()> {
    let tree = TestTree::builder()
        .with_files(&["lib.rs", "lib_test.rs", "main.rs"])
        .build()?;

    let options = TraversalOptions::new()
        .include(Regex::new(r"\.rs$")?)
        .exclude(Regex::new("_test")?);
    assert_eq!(list(tree.root(), &options).await?, paths(&["lib.rs", "main.rs"]));
    Ok(())
}

#[tokio::test]
async fn test_missing_root() -> Result<()> {
    let tree = TestTree::new()?;
    let missing = tree.path("absent");

    assert!(list(&missing, &TraversalOptions::new()).await?.is_empty());

    let err = list(&missing, &TraversalOptions::new().throw_on_missing_root(true))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);
    Ok(())
}

#[test]
#[cfg(unix)]
fn test_unreadable_subdirectory_goes_through_handler() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let tree = TestTree::builder()
        .with_file("open/a.txt", "")
        .with_file("sealed/b.txt", "")
        .build()?;
    let sealed = tree.path("sealed");
    std::fs::set_permissions(&sealed, std::fs::Permissions::from_mode(0o000))?;

    // root ignores directory permissions; nothing to assert in that case
    if std::fs::read_dir(&sealed).is_ok() {
        std::fs::set_permissions(&sealed, std::fs::Permissions::from_mode(0o755))?;
        return Ok(());
    }

    let lenient = TraversalOptions::new().recurse(true).on_error(|_, _| TraversalAction::Continue);
    let result = list_sync(tree.root(), &lenient);

    let strict = list_sync(tree.root(), &TraversalOptions::new().recurse(true));
    std::fs::set_permissions(&sealed, std::fs::Permissions::from_mode(0o755))?;

    assert_eq!(result?, paths(&["open", "open/a.txt", "sealed"]));
    assert!(matches!(strict, Err(FsError::Traversal { .. })));
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_relative_results_ignore_working_directory() -> Result<()> {
    let tree = TestTree::builder().with_file("project/src/lib.rs", "").build()?;
    let original = std::env::current_dir()?;

    std::env::set_current_dir(tree.root())?;
    let relative_root = list("project", &TraversalOptions::new().recurse(true)).await;
    std::env::set_current_dir(&original)?;

    let absolute_root = list(tree.path("project"), &TraversalOptions::new().recurse(true)).await?;
    assert_eq!(relative_root?, absolute_root);
    assert_eq!(absolute_root, paths(&["src", "src/lib.rs"]));
    Ok(())
}

#[tokio::test]
async fn test_full_paths_are_absolute() -> Result<()> {
    let tree = TestTree::builder().with_file("a/b.txt", "").build()?;

    let result = list(tree.root(), &TraversalOptions::new().recurse(true).full_paths(true)).await?;
    assert_eq!(result, vec![tree.path("a"), tree.path("a/b.txt")]);
    assert!(result.iter().all(|p| p.is_absolute()));
    Ok(())
}
