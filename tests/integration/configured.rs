//! The `Fs` handle driven by a config file

use anyhow::Result;
use sturdyfs::config::FsConfig;
use sturdyfs::fs::{Fs, RemovalStrategy, RemoveDirOptions};
use sturdyfs::test_utils::TestTree;

#[tokio::test]
async fn test_handle_uses_config_from_file() -> Result<()> {
    let tree = TestTree::builder()
        .with_file(
            "sturdyfs.toml",
            r#"
removal_strategy = "manual"

[remove]
max_retries = 2
backoff_ms = 1

[rename]
max_retries = 1
backoff_ms = 1
"#,
        )
        .with_file("work/a/b.txt", "b")
        .with_file("incoming.txt", "in")
        .build()?;

    let config = FsConfig::load_with_optional(Some(tree.path("sturdyfs.toml"))).await?;
    assert_eq!(config.removal_strategy, Some(RemovalStrategy::Manual));
    assert_eq!(config.rename_policy().attempts(), 2);

    let fs = Fs::new(config);
    fs.move_path(tree.path("incoming.txt"), tree.path("work/a/b.txt"), true).await?;
    assert_eq!(tree.read("work/a/b.txt")?, "in");

    fs.remove_dir(tree.path("work"), &RemoveDirOptions::recursive()).await?;
    assert!(!tree.exists("work"));
    Ok(())
}

#[tokio::test]
async fn test_bad_config_file_reports_path() -> Result<()> {
    let tree = TestTree::builder().with_file("bad.toml", "[rename\n").build()?;

    let err = FsConfig::load_from(&tree.path("bad.toml")).await.unwrap_err();
    assert!(err.to_string().contains("bad.toml"));
    Ok(())
}
