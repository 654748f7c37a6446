// src/probe/database.rs

use crate::health::ProbeResult;
use crate::probe::Probe;
use crate::settings::{DatabaseSettings, SettingsError, SettingsProvider};
use async_trait::async_trait;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, warn};

/// Checks the relational database by opening a fresh connection and
/// issuing `SELECT 1`. A configured-but-broken database is the one
/// condition that makes the whole stack unhealthy; an absent or
/// unconfigured settings file is reported but stays non-fatal, since the
/// probe cannot assess what it cannot see.
pub struct DatabaseProbe {
    settings: Arc<dyn SettingsProvider>,
    timeout: Duration,
}

impl DatabaseProbe {
    pub fn new(settings: Arc<dyn SettingsProvider>, timeout: Duration) -> Self {
        Self { settings, timeout }
    }

    async fn check_connection(db: &DatabaseSettings) -> Result<(), sqlx::Error> {
        let options = MySqlConnectOptions::new()
            .host(&db.host)
            .port(db.port)
            .database(&db.database)
            .username(&db.username)
            .password(&db.password);

        // One scoped connection per probe run; no pooling across requests.
        let mut conn = options.connect().await?;
        sqlx::query("SELECT 1").execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Probe for DatabaseProbe {
    fn name(&self) -> &str {
        "database"
    }

    async fn run(&self) -> ProbeResult {
        let settings = match self.settings.load() {
            Ok(settings) => settings,
            Err(SettingsError::Missing(path)) => {
                debug!(path = %path.display(), "settings file missing, skipping database check");
                return ProbeResult::ok("settings_missing");
            }
            Err(err) => {
                error!(%err, "could not read database settings");
                return ProbeResult::failed("failed");
            }
        };

        let Some(db) = settings.database else {
            debug!("no database block configured");
            return ProbeResult::ok("not_configured");
        };
        let db = db.with_overrides(|key| std::env::var(key).ok());

        match timeout(self.timeout, Self::check_connection(&db)).await {
            Ok(Ok(())) => {
                debug!(host = %db.host, port = db.port, "database reachable");
                ProbeResult::ok("connected")
            }
            Ok(Err(err)) => {
                warn!(host = %db.host, port = db.port, %err, "database check failed");
                ProbeResult::failed("failed")
            }
            Err(_) => {
                warn!(host = %db.host, port = db.port, "database check timed out");
                ProbeResult::failed("failed")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Outcome;
    use crate::settings::FrameworkSettings;
    use std::path::PathBuf;

    struct StubSettings(Result<Option<DatabaseSettings>, ()>);

    impl SettingsProvider for StubSettings {
        fn load(&self) -> Result<FrameworkSettings, SettingsError> {
            match &self.0 {
                Ok(database) => Ok(FrameworkSettings {
                    database: database.clone(),
                }),
                Err(()) => Err(SettingsError::Missing(PathBuf::from("settings.yml"))),
            }
        }
    }

    fn probe(settings: StubSettings) -> DatabaseProbe {
        DatabaseProbe::new(Arc::new(settings), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn missing_settings_is_healthy() {
        let result = probe(StubSettings(Err(()))).run().await;

        assert_eq!(result.outcome, Outcome::Ok);
        assert_eq!(result.detail, "settings_missing");
    }

    #[tokio::test]
    async fn absent_database_block_is_healthy() {
        let result = probe(StubSettings(Ok(None))).run().await;

        assert_eq!(result.outcome, Outcome::Ok);
        assert_eq!(result.detail, "not_configured");
    }

    #[tokio::test]
    async fn unreachable_database_is_fatal() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let settings = DatabaseSettings {
            host: "127.0.0.1".to_string(),
            port,
            ..DatabaseSettings::default()
        };
        let result = probe(StubSettings(Ok(Some(settings)))).run().await;

        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.detail, "failed");
    }

    #[tokio::test]
    async fn unreadable_settings_is_fatal() {
        struct BrokenSettings;
        impl SettingsProvider for BrokenSettings {
            fn load(&self) -> Result<FrameworkSettings, SettingsError> {
                Err(SettingsError::Io(std::io::Error::other("permission denied")))
            }
        }

        let probe = DatabaseProbe::new(Arc::new(BrokenSettings), Duration::from_secs(1));
        let result = probe.run().await;

        assert_eq!(result.outcome, Outcome::Failed);
        assert_eq!(result.detail, "failed");
    }
}
