//! Configuration for a ping-pong instance.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use crate::error::GameError;

/// Main configuration structure for the server binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP endpoints listen on.
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    /// Delay used before the first Start call sets one.
    #[serde(default = "default_delay_ms")]
    pub default_delay_ms: u64,
    /// Upper bound for a single outbound ping.
    #[serde(default = "default_ping_timeout_ms")]
    pub ping_timeout_ms: u64,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_ping_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            default_delay_ms: default_delay_ms(),
            ping_timeout_ms: default_ping_timeout_ms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GameError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| GameError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        let config = Self::from_toml(&content).map_err(|e| match e {
            GameError::Config { message } => GameError::Config {
                message: format!("{} ({})", message, path.display()),
            },
            other => other,
        })?;

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, GameError> {
        let config: ServerConfig = toml::from_str(content).map_err(|e| GameError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout_ms)
    }

    fn validate(&self) -> Result<(), GameError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(GameError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(GameError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.ping_timeout_ms == 0 {
            return Err(GameError::Config {
                message: "ping_timeout_ms must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
