//! Temporary directory trees for tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A builder for laying out a [`TestTree`] before the test runs
pub struct TestTreeBuilder {
    dirs: Vec<String>,
    files: Vec<(String, String)>,
}

impl TestTreeBuilder {
    /// Add an (empty) directory, created with its parents
    pub fn with_dir(mut self, path: impl Into<String>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// Add a file, created with its parents
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Add several empty files at once
    pub fn with_files(mut self, paths: &[&str]) -> Self {
        for path in paths {
            self.files.push(((*path).to_string(), String::new()));
        }
        self
    }

    /// Create the temp directory and everything registered so far
    pub fn build(self) -> Result<TestTree> {
        let tree = TestTree::new()?;
        for dir in &self.dirs {
            tree.dir(dir)?;
        }
        for (path, content) in &self.files {
            tree.file(path, content)?;
        }
        Ok(tree)
    }
}

/// A temp directory that is deleted on drop, addressed by relative paths
pub struct TestTree {
    temp_dir: TempDir,
}

impl TestTree {
    /// Start a builder
    pub fn builder() -> TestTreeBuilder {
        TestTreeBuilder {
            dirs: Vec::new(),
            files: Vec::new(),
        }
    }

    /// An empty tree
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create temp dir")?,
        })
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the tree
    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.root().join(rel)
    }

    /// Create a directory inside the tree
    pub fn dir(&self, rel: impl AsRef<Path>) -> Result<PathBuf> {
        let path = self.path(rel);
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(path)
    }

    /// Create a file inside the tree
    pub fn file(&self, rel: impl AsRef<Path>, content: impl AsRef<str>) -> Result<PathBuf> {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content.as_ref())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn exists(&self, rel: impl AsRef<Path>) -> bool {
        self.path(rel).exists()
    }

    pub fn read(&self, rel: impl AsRef<Path>) -> Result<String> {
        let path = self.path(rel);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    /// Every path below `rel`, relative to it, `/`-separated and sorted.
    ///
    /// Walks with `std::fs` directly so assertions do not depend on the
    /// listing code under test.
    pub fn snapshot(&self, rel: impl AsRef<Path>) -> Result<Vec<String>> {
        fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) -> Result<()> {
            for entry in std::fs::read_dir(dir)? {
                let path = entry?.path();
                let rel = path.strip_prefix(base)?;
                out.push(
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/"),
                );
                if std::fs::symlink_metadata(&path)?.is_dir() {
                    walk(base, &path, out)?;
                }
            }
            Ok(())
        }

        let base = self.path(rel);
        let mut out = Vec::new();
        if base.exists() {
            walk(&base, &base, &mut out)?;
        }
        out.sort();
        Ok(out)
    }
}
