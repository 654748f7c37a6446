// src/health/mod.rs
mod aggregator;
mod report;

pub use aggregator::HealthAggregator;
pub use report::{HealthReport, Outcome, OverallStatus, ProbeResult};
