// src/health/aggregator.rs

use crate::health::{HealthReport, OverallStatus, ProbeResult};
use crate::probe::Probe;
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info};

// Margin on top of each probe's own IO timeout. The outer bound only
// fires when a probe fails to police its own blocking work.
const GUARD_MARGIN: Duration = Duration::from_millis(500);

/// Runs every registered probe in registration order and folds the
/// outcomes into a single report. Report generation is infallible: a
/// probe failure, panic or stall becomes data in the report, never a
/// fault propagated to the caller.
pub struct HealthAggregator {
    probes: Vec<Box<dyn Probe>>,
    guard_timeout: Duration,
}

impl HealthAggregator {
    pub fn new(probe_timeout: Duration) -> Self {
        Self {
            probes: Vec::new(),
            guard_timeout: probe_timeout + GUARD_MARGIN,
        }
    }

    /// Register a probe. Registration order is report order.
    pub fn register(mut self, probe: impl Probe + 'static) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    pub async fn produce_report(&self) -> HealthReport {
        let mut status = OverallStatus::Healthy;
        let mut checks = Vec::with_capacity(self.probes.len());

        for probe in &self.probes {
            let result = self.run_guarded(probe.as_ref()).await;
            debug!(probe = probe.name(), outcome = ?result.outcome, detail = %result.detail, "probe finished");

            status = status.absorb(result.outcome);
            checks.push((probe.name().to_string(), result.detail));
        }

        info!(status = status.as_str(), "health report generated");

        HealthReport {
            status,
            timestamp: Utc::now(),
            checks,
        }
    }

    // Last-resort boundary around a probe: a panic or a stall past the
    // guard timeout is converted into a Failed result so the endpoint
    // still answers with a complete report.
    async fn run_guarded(&self, probe: &dyn Probe) -> ProbeResult {
        let checked = AssertUnwindSafe(probe.run()).catch_unwind();

        match timeout(self.guard_timeout, checked).await {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => {
                error!(probe = probe.name(), "probe panicked");
                ProbeResult::failed("failed")
            }
            Err(_) => {
                error!(
                    probe = probe.name(),
                    timeout_ms = self.guard_timeout.as_millis() as u64,
                    "probe exceeded guard timeout"
                );
                ProbeResult::failed("failed")
            }
        }
    }
}
