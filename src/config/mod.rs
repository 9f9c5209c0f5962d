//! Configuration for sturdyfs.
//!
//! Every retrying operation has a built-in budget (see [`crate::constants`]).
//! [`FsConfig`] overrides those budgets per operation and can pin the
//! recursive removal strategy. It is plain data: load it from TOML and hand it
//! to an [`Fs`](crate::fs::Fs) handle.
//!
//! ```rust,no_run
//! use sturdyfs::config::FsConfig;
//! use sturdyfs::fs::Fs;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = FsConfig::load_with_optional(None).await?;
//! let fs = Fs::new(config);
//! fs.remove("target/tmp").await?;
//! # Ok(())
//! # }
//! ```

mod settings;

pub use settings::{FsConfig, PolicyConfig};
