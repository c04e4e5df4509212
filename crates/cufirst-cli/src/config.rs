//! Configuration file loading.
//!
//! The file is TOML with the layout of [`SiteConfig`]; every key is optional.

use std::path::{Path, PathBuf};

use cufirst_core::SiteConfig;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Loads configuration from the default path, or defaults when it is absent.
pub fn load() -> CliResult<SiteConfig> {
    let path = default_path();
    if path.exists() {
        load_from(&path)
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok(SiteConfig::default())
    }
}

/// Loads configuration from a specific path.
pub fn load_from(path: &Path) -> CliResult<SiteConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    parse(&content)
}

/// Parses configuration text.
pub fn parse(content: &str) -> CliResult<SiteConfig> {
    toml::from_str(content).map_err(|e| CliError::Config(format!("failed to parse config: {e}")))
}

/// Serializes configuration back to TOML.
pub fn to_toml(config: &SiteConfig) -> CliResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| CliError::Config(format!("failed to serialize config: {e}")))
}

/// Returns the default configuration file path.
pub fn default_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Returns the default configuration directory.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cufirst")
}
