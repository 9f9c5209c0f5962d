//! A filesystem handle bound to one [`FsConfig`].

use crate::config::FsConfig;
use crate::core::Result;
use crate::fs::remove::{
    RemoveDirOptions, remove_dir_with_policy, remove_dir_with_policy_sync, remove_with_policy,
    remove_with_policy_sync,
};
use crate::fs::rename::{move_path_with_policy, move_path_with_policy_sync};
use std::path::Path;

/// Runs the destructive operations with the retry budgets and removal
/// strategy from a config, instead of the built-in defaults.
///
/// Cheap to clone; it holds no open resources.
#[derive(Debug, Clone, Default)]
pub struct Fs {
    config: FsConfig,
}

impl Fs {
    pub fn new(config: FsConfig) -> Self {
        Self {
            config,
        }
    }

    pub fn config(&self) -> &FsConfig {
        &self.config
    }

    /// Fill in the configured strategy unless the caller chose one.
    fn dir_options(&self, options: &RemoveDirOptions) -> RemoveDirOptions {
        RemoveDirOptions {
            strategy: options.strategy.or(self.config.removal_strategy),
            ..*options
        }
    }

    /// [`remove`](crate::fs::remove) with the configured policy.
    pub async fn remove(&self, path: impl AsRef<Path>) -> Result<()> {
        remove_with_policy(path, &self.config.remove_policy()).await
    }

    pub fn remove_sync(&self, path: impl AsRef<Path>) -> Result<()> {
        remove_with_policy_sync(path, &self.config.remove_policy())
    }

    /// [`remove_dir`](crate::fs::remove_dir) with the configured policy and
    /// strategy.
    pub async fn remove_dir(&self, path: impl AsRef<Path>, options: &RemoveDirOptions) -> Result<()> {
        let options = self.dir_options(options);
        remove_dir_with_policy(path, &options, &self.config.remove_dir_policy()).await
    }

    pub fn remove_dir_sync(&self, path: impl AsRef<Path>, options: &RemoveDirOptions) -> Result<()> {
        let options = self.dir_options(options);
        remove_dir_with_policy_sync(path, &options, &self.config.remove_dir_policy())
    }

    /// [`move_path`](crate::fs::move_path) with the configured rename and
    /// remove policies.
    pub async fn move_path(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
        force: bool,
    ) -> Result<()> {
        move_path_with_policy(from, to, force, &self.config.move_policy()).await
    }

    pub fn move_path_sync(
        &self,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
        force: bool,
    ) -> Result<()> {
        move_path_with_policy_sync(from, to, force, &self.config.move_policy())
    }
}

impl From<FsConfig> for Fs {
    fn from(config: FsConfig) -> Self {
        Self::new(config)
    }
}
