//! Configuration loading and management.
//!
//! Layers, later ones winning: built-in defaults, `~/.config/tj/config.toml`,
//! the file passed with `--config`, then `TJ_*` environment variables.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tj_core::{UserId, ValidationError};

/// User the ledger is kept for when none is configured.
pub const DEFAULT_USER: &str = "local";

const ENV_PREFIX: &str = "TJ_";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file.
    pub database_path: PathBuf,

    /// Owner of the entries written and read by this CLI.
    pub user_id: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            database_path: data_dir.join("tj.db"),
            user_id: DEFAULT_USER.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        layers(config_path).extract()
    }

    /// The configured user as a validated ID.
    pub fn user(&self) -> Result<UserId, ValidationError> {
        UserId::new(self.user_id.clone())
    }
}

fn layers(config_path: Option<&Path>) -> Figment {
    let user_file = dirs_config_path().map(|dir| dir.join("config.toml"));

    [user_file.as_deref(), config_path]
        .into_iter()
        .flatten()
        .fold(
            Figment::from(Serialized::defaults(Config::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(Env::prefixed(ENV_PREFIX))
}

/// Returns the platform-specific config directory for tj.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tj"))
}

/// Returns the platform-specific data directory for tj.
///
/// On Linux: `~/.local/share/tj`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("tj"))
}
