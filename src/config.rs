//! Configuration handling for mesh-analyzer
//!
//! Every section and field has a default, so a config file only needs the
//! values it changes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const LOCAL_CONFIG: &str = "mesh-analyzer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analyzer: AnalyzerConfig,
    pub storage: StorageConfig,
    pub roaming: RoamingConfig,
    pub power: PowerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Wireless interface; when unset, the first nmcli wifi device, then the
    /// first `/sys/class/net` entry with a `wireless` directory
    pub interface: Option<String>,
    pub scan_interval_secs: u64,
    pub link_poll_secs: u64,
    /// Window for problem pattern detection
    pub history_window_hours: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            interface: None,
            scan_interval_secs: 60,
            link_poll_secs: 10,
            history_window_hours: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Overrides `~/.mesh_analyzer`
    pub data_dir: Option<PathBuf>,
    pub retention_days: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            retention_days: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoamingConfig {
    pub poll_interval_ms: u64,
    pub dropout_poll_interval_ms: u64,
    pub dropout_duration_secs: u64,
    pub test_duration_secs: u64,
    pub log_file: PathBuf,
}

impl Default for RoamingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            dropout_poll_interval_ms: 50,
            dropout_duration_secs: 30,
            test_duration_secs: 120,
            log_file: PathBuf::from("/tmp/mesh_roaming_log.txt"),
        }
    }
}

impl RoamingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn dropout_poll_interval(&self) -> Duration {
        Duration::from_millis(self.dropout_poll_interval_ms.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub fix_script: PathBuf,
    pub monitor_duration_secs: u64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            fix_script: PathBuf::from(crate::power::DEFAULT_FIX_SCRIPT),
            monitor_duration_secs: 60,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the first config found
    ///
    /// An explicit path must exist. Otherwise `./mesh-analyzer.toml` and then
    /// `home_config` are tried, falling back to defaults.
    pub fn discover(explicit: Option<&Path>, home_config: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        for path in std::iter::once(local.as_path()).chain(home_config) {
            if path.is_file() {
                debug!("Loading config from {}", path.display());
                return Self::load(path);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}
