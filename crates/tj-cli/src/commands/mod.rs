//! CLI subcommand implementations.

pub mod catalog;
pub mod dashboard;
pub mod gaps;
pub mod log;
pub mod logs;
pub mod status;
pub mod suggest;
pub mod util;
