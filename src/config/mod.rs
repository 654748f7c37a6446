// src/config/mod.rs
mod models;

pub use models::{Config, ConfigError};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::warn;

/// Load configuration from a file (YAML or JSON). A missing file is not an
/// error: every field has a default, and containerized deployments often
/// run the endpoint with no config mounted at all.
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();

    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;

    let config: Config = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
        }
        _ => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };

    config.validate()?;
    Ok(config)
}

/// An ordered chain of environment variable names, resolved first-set-wins.
/// Keeps `VALKEY_HOST`-or-`REDIS_HOST`-or-default style fallbacks in one
/// place instead of scattered through probe logic.
pub struct EnvChain {
    names: &'static [&'static str],
}

impl EnvChain {
    pub fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }

    pub fn resolve_or(&self, default: &str) -> String {
        self.resolve_with(|name| std::env::var(name).ok())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn resolve_with(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        self.names
            .iter()
            .find_map(|name| lookup(name).filter(|value| !value.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_complete() {
        let config = Config::default();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.probe_timeout_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let config = load_config("/nonexistent/config.yaml").await.unwrap();
        assert_eq!(config.probe_timeout_ms, Config::default().probe_timeout_ms);
    }

    #[tokio::test]
    async fn yaml_config_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(b"listen_addr: 127.0.0.1:9090\nprobe_timeout_ms: 250\n")
            .unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.listen_addr.port(), 9090);
        assert_eq!(config.probe_timeout_ms, 250);
        assert_eq!(config.files_dir, Config::default().files_dir);
    }

    #[tokio::test]
    async fn zero_probe_timeout_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(b"probe_timeout_ms: 0\n").unwrap();

        assert!(load_config(file.path()).await.is_err());
    }

    #[test]
    fn env_chain_prefers_earlier_names() {
        let chain = EnvChain::new(&["PRIMARY", "FALLBACK"]);
        let lookup = |name: &str| match name {
            "PRIMARY" => Some("first".to_string()),
            "FALLBACK" => Some("second".to_string()),
            _ => None,
        };

        assert_eq!(chain.resolve_with(lookup), Some("first".to_string()));
    }

    #[test]
    fn env_chain_skips_unset_and_empty_values() {
        let chain = EnvChain::new(&["PRIMARY", "FALLBACK"]);
        let lookup = |name: &str| match name {
            "PRIMARY" => Some(String::new()),
            "FALLBACK" => Some("second".to_string()),
            _ => None,
        };

        assert_eq!(chain.resolve_with(lookup), Some("second".to_string()));
        assert_eq!(chain.resolve_with(|_| None), None);
    }
}
