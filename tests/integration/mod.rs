//! Integration test suite for sturdyfs
//!
//! End-to-end scenarios against real temporary directory trees.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **listing**: traversal filters, depth, pruning and early exit
//! - **removal**: idempotent removal and bottom-up tree deletion
//! - **moving**: forced and unforced moves, retry short-circuits
//! - **copying**: file and tree copies built on listing
//! - **configured**: the `Fs` handle driven by a TOML config file

mod configured;
mod copying;
mod listing;
mod moving;
mod removal;
