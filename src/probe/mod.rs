// src/probe/mod.rs
mod cache;
mod database;
mod files;

pub use cache::CacheProbe;
pub use database::DatabaseProbe;
pub use files::FilesProbe;

use crate::health::ProbeResult;
use async_trait::async_trait;

/// One dependency check. Probes are stateless, constructed once at startup
/// and invoked per request; a failure is returned as data, never as an Err.
#[async_trait]
pub trait Probe: Send + Sync {
    fn name(&self) -> &str;

    async fn run(&self) -> ProbeResult;
}
