use crate::analyzer::UnmarkedPolicy;
use crate::error::{GitShipError, Result};
use crate::manifest::UnreadablePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "gitship.toml";

/// File looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".gitship.toml";

/// Represents the complete configuration for git-ship.
///
/// Split into the release pipeline's settings and the manifest builder's.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Settings for release assembly.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ReleaseConfig {
    /// Repository owner stamped on the release; derived from `origin` when unset
    #[serde(default)]
    pub owner: Option<String>,

    /// Repository name stamped on the release; derived from `origin` when unset
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub unmarked_commits: UnmarkedPolicy,
}

/// Settings for manifest building.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ManifestConfig {
    /// Exclusion regex fragments added to the built-in set
    #[serde(default)]
    pub exclude: Vec<String>,

    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitship.toml` in current directory
/// 3. `.gitship.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        read(Path::new(path))?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        read(Path::new(LOCAL_CONFIG_FILE))?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            read(&config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).map_err(|e| GitShipError::config(e.to_string()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| GitShipError::config(format!("Cannot read {}: {}", path.display(), e)))
}
