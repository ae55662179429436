//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::translation::{TranslationError, TranslationTable};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
    Translation(TranslationError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
            ConfigError::Translation(e) => write!(f, "Translation table error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<TranslationError> for ConfigError {
    fn from(e: TranslationError) -> Self {
        ConfigError::Translation(e)
    }
}

/// Read a TOML configuration file without validating it.
///
/// Validation happens once command-line overrides are applied.
pub fn read_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Load, resolve and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let mut config = read_config(path)?;
    config.resolve_destination();

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load the translation table named by the configuration.
///
/// A missing or unreadable file yields an empty table; duplicate names fail.
pub fn load_translation(config: &ServiceConfig) -> Result<TranslationTable, ConfigError> {
    let table = TranslationTable::load(
        config.translation.path.as_deref(),
        &config.translation.format(),
    )?;
    Ok(table)
}
