// src/probe/cache.rs

use crate::config::EnvChain;
use crate::health::ProbeResult;
use crate::probe::Probe;
use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

const DEFAULT_HOST: &str = "valkey";
const DEFAULT_PORT: u16 = 6379;

/// Checks the Valkey/Redis cache with a raw TCP connect. Cache
/// unavailability degrades the stack but is never fatal on its own.
pub struct CacheProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl CacheProbe {
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            timeout,
        }
    }

    /// Resolve the cache target from the environment once, at construction.
    /// `VALKEY_*` wins over the legacy `REDIS_*` names.
    pub fn from_env(timeout: Duration) -> Self {
        let host = EnvChain::new(&["VALKEY_HOST", "REDIS_HOST"]).resolve_or(DEFAULT_HOST);
        let port = EnvChain::new(&["VALKEY_PORT", "REDIS_PORT"])
            .resolve_or(&DEFAULT_PORT.to_string())
            .parse()
            .unwrap_or(DEFAULT_PORT);

        Self::new(host, port, timeout)
    }
}

#[async_trait]
impl Probe for CacheProbe {
    fn name(&self) -> &str {
        "cache"
    }

    async fn run(&self) -> ProbeResult {
        let target = format!("{}:{}", self.host, self.port);

        match timeout(self.timeout, TcpStream::connect(&target)).await {
            Ok(Ok(stream)) => {
                // Reachability is all we need; drop the socket right away.
                drop(stream);
                debug!(%target, "cache reachable");
                ProbeResult::ok("connected")
            }
            Ok(Err(err)) => {
                warn!(%target, %err, "cache unreachable");
                ProbeResult::degraded("unreachable")
            }
            Err(_) => {
                warn!(%target, timeout_ms = self.timeout.as_millis() as u64, "cache connect timed out");
                ProbeResult::degraded("unreachable")
            }
        }
    }
}
