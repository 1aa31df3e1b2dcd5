//! Response envelopes and failure mapping.
//!
//! Shapes are fixed by the site's front end: camelCase keys, a `status`
//! tag, and zeroed/empty payloads alongside `error` on failure.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use streamsync_core::{ChangelogEntry, SiteMetrics, VersionInfo};
use streamsync_store::StoreError;

/// Outer `status` tag of every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Error,
    Fallback,
}

// ── Metrics ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBody {
    pub server_count: u64,
    pub songs_played: u64,
    pub last_updated: Option<DateTime<Utc>>,
    pub status: ReplyStatus,
}

impl From<SiteMetrics> for MetricsBody {
    fn from(metrics: SiteMetrics) -> Self {
        Self {
            server_count: metrics.server_count,
            songs_played: metrics.songs_played,
            last_updated: metrics.last_updated,
            status: ReplyStatus::Success,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsFailure {
    pub error: String,
    pub server_count: u64,
    pub songs_played: u64,
    pub status: ReplyStatus,
}

impl MetricsFailure {
    pub fn new(error: String) -> Self {
        Self {
            error,
            server_count: 0,
            songs_played: 0,
            status: ReplyStatus::Error,
        }
    }
}

// ── Changelog ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChangelogBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub changelog: Vec<ChangelogEntry>,
    pub status: ReplyStatus,
}

impl ChangelogBody {
    pub fn ok(changelog: Vec<ChangelogEntry>) -> Self {
        Self {
            error: None,
            changelog,
            status: ReplyStatus::Success,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            changelog: Vec::new(),
            status: ReplyStatus::Error,
        }
    }
}

// ── Version ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VersionBody {
    pub version: VersionInfo,
    pub status: ReplyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Failure mapping ─────────────────────────────────────────────

/// Which endpoint a failure is reported from; only affects wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Metrics,
    Changelog,
    Version,
}

impl Endpoint {
    fn table_label(self) -> &'static str {
        match self {
            Endpoint::Metrics => "Analytics",
            Endpoint::Changelog | Endpoint::Version => "Changelog",
        }
    }

    fn unclassified(self) -> &'static str {
        match self {
            Endpoint::Metrics => "Failed to fetch server count",
            Endpoint::Changelog => "Failed to fetch changelog",
            Endpoint::Version => "Failed to fetch version",
        }
    }
}

/// HTTP status and user-facing message for a store failure.
pub fn failure_reply(endpoint: Endpoint, err: &StoreError) -> (StatusCode, String) {
    match err {
        StoreError::ConfigMissing => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database configuration missing".to_string(),
        ),
        StoreError::ConnectionRefused => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Database connection refused".to_string(),
        ),
        StoreError::MissingRelation(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            format!(
                "{} table not found - database may need initialization",
                endpoint.table_label()
            ),
        ),
        StoreError::Timeout => (
            StatusCode::GATEWAY_TIMEOUT,
            "Database query timeout".to_string(),
        ),
        StoreError::Authentication => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Database authentication failed".to_string(),
        ),
        StoreError::Query(_) | StoreError::Io(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            endpoint.unclassified().to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_per_error() {
        let cases = [
            (StoreError::ConfigMissing, StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::ConnectionRefused, StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::MissingRelation("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Timeout, StatusCode::GATEWAY_TIMEOUT),
            (StoreError::Authentication, StatusCode::INTERNAL_SERVER_ERROR),
            (StoreError::Query("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(failure_reply(Endpoint::Metrics, &err).0, expected, "{err:?}");
        }
    }

    #[test]
    fn missing_table_wording_depends_on_endpoint() {
        let err = StoreError::MissingRelation("relation does not exist".into());
        assert_eq!(
            failure_reply(Endpoint::Metrics, &err).1,
            "Analytics table not found - database may need initialization"
        );
        assert_eq!(
            failure_reply(Endpoint::Changelog, &err).1,
            "Changelog table not found - database may need initialization"
        );
    }

    #[test]
    fn unclassified_wording_depends_on_endpoint() {
        let err = StoreError::Query("boom".into());
        assert_eq!(failure_reply(Endpoint::Metrics, &err).1, "Failed to fetch server count");
        assert_eq!(failure_reply(Endpoint::Changelog, &err).1, "Failed to fetch changelog");
        assert_eq!(failure_reply(Endpoint::Version, &err).1, "Failed to fetch version");
    }

    #[test]
    fn failure_shapes() {
        let metrics = serde_json::to_value(MetricsFailure::new("down".into())).unwrap();
        assert_eq!(
            metrics,
            serde_json::json!({"error": "down", "serverCount": 0, "songsPlayed": 0, "status": "error"})
        );

        let changelog = serde_json::to_value(ChangelogBody::failed("down".into())).unwrap();
        assert_eq!(
            changelog,
            serde_json::json!({"error": "down", "changelog": [], "status": "error"})
        );
    }

    #[test]
    fn success_metrics_keeps_null_last_updated() {
        let body = MetricsBody::from(SiteMetrics {
            server_count: 42,
            songs_played: 1000,
            last_updated: None,
        });
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"serverCount": 42, "songsPlayed": 1000, "lastUpdated": null, "status": "success"})
        );
    }
}
