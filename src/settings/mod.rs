// src/settings/mod.rs
//
// The database probe does not own a config-loading mechanism; it is handed
// a `SettingsProvider` that knows where the deployed framework keeps its
// connection parameters. The file-backed implementation reads a YAML
// settings document with an optional `database:` block.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file not found: {0}")]
    Missing(PathBuf),

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed settings file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Connection parameters for the framework's relational database.
/// Field defaults mirror the deployment's stock settings; each one can be
/// overridden by the matching `DB_*` environment variable.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            host: "mariadb".to_string(),
            port: 3306,
            database: "app_delivery_dev".to_string(),
            username: "drupal".to_string(),
            password: "password".to_string(),
        }
    }
}

impl DatabaseSettings {
    /// Apply `DB_HOST`/`DB_PORT`/`DB_NAME`/`DB_USER`/`DB_PASSWORD` on top
    /// of the file values. The lookup is injected so tests don't have to
    /// mutate the process environment.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("DB_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("DB_PORT").and_then(|p| p.parse().ok()) {
            self.port = port;
        }
        if let Some(database) = lookup("DB_NAME") {
            self.database = database;
        }
        if let Some(username) = lookup("DB_USER") {
            self.username = username;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.password = password;
        }
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameworkSettings {
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
}

pub trait SettingsProvider: Send + Sync {
    fn load(&self) -> Result<FrameworkSettings, SettingsError>;
}

/// Reads the framework settings file from disk on every call, so a probe
/// always sees the deployed state rather than a snapshot from startup.
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsProvider for FileSettings {
    fn load(&self) -> Result<FrameworkSettings, SettingsError> {
        if !self.path.exists() {
            return Err(SettingsError::Missing(self.path.clone()));
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let settings = serde_yaml::from_str(&contents)?;
        Ok(settings)
    }
}
