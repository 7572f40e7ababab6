//! Time ledger CLI library.
//!
//! This crate provides the `tj` command-line interface over `tj-core` and `tj-db`.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
