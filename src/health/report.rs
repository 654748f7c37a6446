// src/health/report.rs

use chrono::{DateTime, Utc};
use hyper::StatusCode;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single probe's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Degraded,
    Failed,
}

/// What one probe found: its verdict plus a short machine-readable detail
/// such as `connected` or `unreachable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub outcome: Outcome,
    pub detail: String,
}

impl ProbeResult {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Ok,
            detail: detail.into(),
        }
    }

    pub fn degraded(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Degraded,
            detail: detail.into(),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Failed,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl OverallStatus {
    /// Fold one probe outcome into the running status. Worst outcome wins:
    /// any `Failed` forces `Unhealthy`, any `Degraded` forces at least
    /// `Degraded`, and nothing ever moves the status back toward `Healthy`.
    pub fn absorb(self, outcome: Outcome) -> Self {
        match (self, outcome) {
            (_, Outcome::Failed) => OverallStatus::Unhealthy,
            (OverallStatus::Unhealthy, _) => OverallStatus::Unhealthy,
            (_, Outcome::Degraded) => OverallStatus::Degraded,
            (status, Outcome::Ok) => status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Healthy => "healthy",
            OverallStatus::Degraded => "degraded",
            OverallStatus::Unhealthy => "unhealthy",
        }
    }
}

/// The aggregated report served to the caller. Built fresh per request,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "checks_as_object")]
    pub checks: Vec<(String, String)>,
}

impl HealthReport {
    /// HTTP status the report should be served with: `200` only when
    /// everything is healthy, `503` otherwise so load balancers and
    /// orchestrators treat degraded stacks as not ready.
    pub fn status_code(&self) -> StatusCode {
        match self.status {
            OverallStatus::Healthy => StatusCode::OK,
            _ => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

// `checks` must serialize as a JSON object whose key order matches probe
// registration order, so it is kept as a Vec rather than a map.
fn checks_as_object<S>(checks: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(checks.len()))?;
    for (name, detail) in checks {
        map.serialize_entry(name, detail)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_is_worst_outcome_wins() {
        use Outcome::{Failed, Ok};
        use OverallStatus::{Healthy, Unhealthy};

        assert_eq!(Healthy.absorb(Ok), Healthy);
        assert_eq!(Healthy.absorb(Outcome::Degraded), OverallStatus::Degraded);
        assert_eq!(Healthy.absorb(Failed), Unhealthy);
        assert_eq!(OverallStatus::Degraded.absorb(Ok), OverallStatus::Degraded);
        assert_eq!(
            OverallStatus::Degraded.absorb(Outcome::Degraded),
            OverallStatus::Degraded
        );
        assert_eq!(OverallStatus::Degraded.absorb(Failed), Unhealthy);
        assert_eq!(Unhealthy.absorb(Ok), Unhealthy);
        assert_eq!(Unhealthy.absorb(Outcome::Degraded), Unhealthy);
        assert_eq!(Unhealthy.absorb(Failed), Unhealthy);
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OverallStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&OverallStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
        assert_eq!(OverallStatus::Degraded.as_str(), "degraded");
    }

    #[test]
    fn status_code_mapping() {
        let report = |status| HealthReport {
            status,
            timestamp: Utc::now(),
            checks: Vec::new(),
        };

        assert_eq!(report(OverallStatus::Healthy).status_code(), StatusCode::OK);
        assert_eq!(
            report(OverallStatus::Degraded).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            report(OverallStatus::Unhealthy).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn checks_serialize_in_registration_order() {
        let report = HealthReport {
            status: OverallStatus::Healthy,
            timestamp: Utc::now(),
            checks: vec![
                ("database".to_string(), "connected".to_string()),
                ("cache".to_string(), "connected".to_string()),
                ("files_directory".to_string(), "writable".to_string()),
            ],
        };

        let json = serde_json::to_string(&report).unwrap();
        let database = json.find("\"database\"").unwrap();
        let cache = json.find("\"cache\"").unwrap();
        let files = json.find("\"files_directory\"").unwrap();
        assert!(database < cache && cache < files);
    }

    #[test]
    fn timestamp_serializes_as_iso8601() {
        let report = HealthReport {
            status: OverallStatus::Healthy,
            timestamp: Utc::now(),
            checks: Vec::new(),
        };

        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        let ts = value["timestamp"].as_str().unwrap();
        assert!(ts.contains('T'));
        assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }
}
