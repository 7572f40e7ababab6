//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tj_core::Slot;

/// Half-hour time ledger.
///
/// Records how each block of the day was spent and how it felt, and
/// summarizes the history into daily and weekly views.
#[derive(Debug, Parser)]
#[command(name = "tj", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a block of time.
    ///
    /// Missing times continue from the day's latest entry; missing activity
    /// and satisfaction fall back to the first visible catalog entry.
    Log {
        /// Day of the entry: YYYY-MM-DD, today, yesterday, or "N days ago".
        #[arg(long, default_value = "today")]
        date: String,

        /// Start time on the half-hour grid (e.g. 09:30).
        #[arg(long)]
        start: Option<Slot>,

        /// End time on the half-hour grid, up to 24:00.
        #[arg(long)]
        end: Option<Slot>,

        /// Activity type ID (e.g. act_1).
        #[arg(long)]
        activity: Option<String>,

        /// Satisfaction tag ID (e.g. sat_1).
        #[arg(long)]
        tag: Option<String>,

        /// Free-form note.
        #[arg(long)]
        details: Option<String>,
    },

    /// Show the suggested range for the next entry of a day.
    Suggest {
        /// Day to inspect.
        #[arg(long, default_value = "today")]
        date: String,
    },

    /// Show the unlogged time of a day.
    Gaps {
        /// Day to inspect.
        #[arg(long, default_value = "today")]
        date: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show today's totals, weekly comparisons and the happiness trend.
    Dashboard {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List recorded entries, newest first.
    Logs {
        /// Include entries older than the last seven days.
        #[arg(long)]
        all: bool,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List activity types and satisfaction tags.
    Catalog,

    /// Show database location and logging summary.
    Status,
}
