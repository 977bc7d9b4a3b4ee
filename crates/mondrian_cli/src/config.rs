//! Optional `mondrian.toml` configuration.
//!
//! Holds defaults for the search parameters that are otherwise given as CLI
//! flags; explicit flags always win over file values.

use serde::Deserialize;
use std::path::Path;

/// Errors that can occur when loading or validating a `mondrian.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}

/// The top-level configuration parsed from `mondrian.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Search parameter defaults.
    #[serde(default)]
    pub search: SearchSection,
}

/// The `[search]` table: defaults for the CLI's search flags.
#[derive(Debug, Default, Deserialize)]
pub struct SearchSection {
    /// Number of parallel workers.
    pub workers: Option<usize>,
    /// Number of synchronization rounds.
    pub rounds: Option<u32>,
    /// Wall-clock seconds per worker per round.
    pub slice_secs: Option<f64>,
    /// Base random seed.
    pub seed: Option<u64>,
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<FileConfig, ConfigError> {
    let config: FileConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that configured values are usable.
fn validate_config(config: &FileConfig) -> Result<(), ConfigError> {
    if config.search.workers == Some(0) {
        return Err(ConfigError::Validation(
            "search.workers must be at least 1".to_string(),
        ));
    }
    if config.search.rounds == Some(0) {
        return Err(ConfigError::Validation(
            "search.rounds must be at least 1".to_string(),
        ));
    }
    if let Some(slice) = config.search.slice_secs {
        if !(slice > 0.0) {
            return Err(ConfigError::Validation(
                "search.slice_secs must be positive".to_string(),
            ));
        }
    }
    Ok(())
}
