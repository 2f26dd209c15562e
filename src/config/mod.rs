//! Tunable tables read from a config directory, with built-in defaults.

pub mod loader;
pub mod settings;

pub use loader::{load_section, ConfigReport, ConfigSource, GameConfig};
pub use settings::{CombatSettings, GameSettings, PlayerSettings, WaveSettings};

use std::path::PathBuf;
use thiserror::Error;

/// Why a config section could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {section}: {reason}")]
    Invalid { section: String, reason: String },
}

impl ConfigError {
    pub fn invalid(section: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            section: section.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the file simply does not exist.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
