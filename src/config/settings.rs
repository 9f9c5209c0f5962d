//! Retry and removal settings loaded from TOML.

use crate::constants::CONFIG_PATH_ENV;
use crate::fs::{MovePolicy, RemovalStrategy, RetryPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Partial override of a [`RetryPolicy`]. Unset fields keep the built-in
/// default for that operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backoff_ms: Option<u64>,
}

impl PolicyConfig {
    /// Apply the override on top of `base`.
    pub fn apply(&self, base: RetryPolicy) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries.unwrap_or(base.max_retries),
            backoff_ms: self.backoff_ms.unwrap_or(base.backoff_ms),
        }
    }

    fn is_unset(&self) -> bool {
        self.max_retries.is_none() && self.backoff_ms.is_none()
    }
}

/// Library-wide settings.
///
/// ```toml
/// removal_strategy = "manual"
///
/// [remove]
/// max_retries = 5
///
/// [rename]
/// max_retries = 3
/// backoff_ms = 200
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FsConfig {
    /// Forces a strategy for recursive `remove_dir` instead of detecting one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_strategy: Option<RemovalStrategy>,
    /// Unlink and per-entry rmdir during [`remove`](crate::fs::remove).
    #[serde(skip_serializing_if = "PolicyConfig::is_unset")]
    pub remove: PolicyConfig,
    /// [`remove_dir`](crate::fs::remove_dir).
    #[serde(skip_serializing_if = "PolicyConfig::is_unset")]
    pub remove_dir: PolicyConfig,
    /// The rename step of [`move_path`](crate::fs::move_path).
    #[serde(skip_serializing_if = "PolicyConfig::is_unset")]
    pub rename: PolicyConfig,
}

impl FsConfig {
    pub fn remove_policy(&self) -> RetryPolicy {
        self.remove.apply(RetryPolicy::removal())
    }

    pub fn remove_dir_policy(&self) -> RetryPolicy {
        self.remove_dir.apply(RetryPolicy::removal())
    }

    pub fn rename_policy(&self) -> RetryPolicy {
        self.rename.apply(RetryPolicy::rename())
    }

    /// Budgets for a move: the rename policy, plus the remove policy for
    /// clearing a forced destination.
    pub fn move_policy(&self) -> MovePolicy {
        MovePolicy {
            rename: self.rename_policy(),
            remove: self.remove_policy(),
        }
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse sturdyfs config")
    }

    /// Load settings from `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this struct.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read sturdyfs config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse sturdyfs config from {}", path.display()))
    }

    /// Load from `path`, or from the file named by `STURDYFS_CONFIG` when
    /// `path` is `None`. A missing file yields the defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
        else {
            return Ok(Self::default());
        };
        if path.exists() {
            Self::load_from(&path).await
        } else {
            tracing::debug!(
                target: "config",
                "config file {} not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Write the settings to `path` as TOML, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize sturdyfs config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write sturdyfs config to {}", path.display()))
    }
}
