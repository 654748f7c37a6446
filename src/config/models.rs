// src/config/models.rs

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("probe_timeout_ms must be between 1 and {max}, got {got}")]
    InvalidProbeTimeout { got: u64, max: u64 },
}

/// Service configuration. Every field has a default, so the service runs
/// usefully with no config file at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP endpoint binds to.
    pub listen_addr: SocketAddr,

    /// Framework settings file holding the database connection block.
    pub settings_path: PathBuf,

    /// Writable-storage directory the filesystem probe exercises.
    pub files_dir: PathBuf,

    /// Bound on each probe's blocking work, in milliseconds. A single
    /// unreachable dependency must not stall report generation.
    pub probe_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: ([0, 0, 0, 0], 8080).into(),
            settings_path: PathBuf::from("sites/default/settings.yml"),
            files_dir: PathBuf::from("sites/default/files"),
            probe_timeout_ms: 1000,
        }
    }
}

impl Config {
    const MAX_PROBE_TIMEOUT_MS: u64 = 10_000;

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.probe_timeout_ms == 0 || self.probe_timeout_ms > Self::MAX_PROBE_TIMEOUT_MS {
            return Err(ConfigError::InvalidProbeTimeout {
                got: self.probe_timeout_ms,
                max: Self::MAX_PROBE_TIMEOUT_MS,
            });
        }
        Ok(())
    }
}
