//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::errors::ConfigError;
use crate::application::messaging::DEFAULT_MAX_COUNT;
use crate::application::services::{DEFAULT_QUEUE_CAPACITY, DEFAULT_SEND_TIMEOUT};

/// Relay configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub server: ServerConfig,
    pub hub: HubConfig,
    pub dice: DiceConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ServerConfig {
    pub bind: String,
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HubConfig {
    pub queue_capacity: usize,
    pub send_timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiceConfig {
    pub max_count: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8001".to_string(),
            static_dir: PathBuf::from("../public"),
        }
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            send_timeout_ms: u64::try_from(DEFAULT_SEND_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl HubConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Apply `RELAY_BIND` and `RELAY_STATIC_DIR` overrides
    pub fn apply_env(&mut self) {
        if let Ok(bind) = std::env::var("RELAY_BIND") {
            self.server.bind = bind;
        }

        if let Ok(dir) = std::env::var("RELAY_STATIC_DIR") {
            self.server.static_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::MissingField("server.bind".to_string()));
        }
        if self.hub.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue("hub.queue-capacity must be at least 1".to_string()));
        }
        if self.hub.send_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue("hub.send-timeout-ms must be at least 1".to_string()));
        }
        if self.dice.max_count == 0 {
            return Err(ConfigError::InvalidValue("dice.max-count must be at least 1".to_string()));
        }
        Ok(())
    }
}
