// src/probe/files.rs

use crate::health::ProbeResult;
use crate::probe::Probe;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Checks that the writable-storage directory exists and actually accepts
/// writes from this process. Permission bits lie often enough (ACLs,
/// read-only mounts) that the probe writes and removes a marker file
/// instead of inspecting metadata.
pub struct FilesProbe {
    dir: PathBuf,
}

impl FilesProbe {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn try_write(&self) -> std::io::Result<()> {
        let marker = self.dir.join(format!(".health-probe-{}", std::process::id()));
        tokio::fs::write(&marker, b"ok").await?;
        tokio::fs::remove_file(&marker).await?;
        Ok(())
    }
}

#[async_trait]
impl Probe for FilesProbe {
    fn name(&self) -> &str {
        "files_directory"
    }

    async fn run(&self) -> ProbeResult {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                warn!(dir = %self.dir.display(), "files path is not a directory");
                return ProbeResult::degraded("not_writable");
            }
            Err(err) => {
                warn!(dir = %self.dir.display(), %err, "files directory missing");
                return ProbeResult::degraded("not_writable");
            }
        }

        match self.try_write().await {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "files directory writable");
                ProbeResult::ok("writable")
            }
            Err(err) => {
                warn!(dir = %self.dir.display(), %err, "files directory not writable");
                ProbeResult::degraded("not_writable")
            }
        }
    }
}
