//! JSON API handlers.
//!
//! Store failures never escape as faults: each handler catches them,
//! logs them, and answers with the endpoint's failure shape.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use streamsync_core::{latest_entries, today, SiteMetrics, VersionInfo, CHANGELOG_LIMIT};

use crate::response::*;
use crate::ApiState;

/// GET /api/analytics
pub async fn analytics(State(state): State<ApiState>) -> Response {
    match state.metrics.fetch_metrics().await {
        Ok(records) => {
            let metrics = SiteMetrics::from_records(&records);
            Json(MetricsBody::from(metrics)).into_response()
        }
        Err(e) => {
            error!(error = %e, "error fetching server count");
            let (status, message) = failure_reply(Endpoint::Metrics, &e);
            (status, Json(MetricsFailure::new(message))).into_response()
        }
    }
}

/// GET /api/changelog
pub async fn changelog(State(state): State<ApiState>) -> Response {
    match state.changelog.recent_releases(CHANGELOG_LIMIT).await {
        Ok(rows) => {
            let entries = rows.into_iter().map(|row| row.into_entry()).collect();
            Json(ChangelogBody::ok(latest_entries(entries))).into_response()
        }
        Err(e) => {
            error!(error = %e, "error fetching changelog");
            let (status, message) = failure_reply(Endpoint::Changelog, &e);
            (status, Json(ChangelogBody::failed(message))).into_response()
        }
    }
}

/// GET /api/version
///
/// Always answers 200. Anything short of a real release yields the
/// fallback version tagged `fallback`.
pub async fn version(State(state): State<ApiState>) -> Response {
    let body = match state.version.latest_release().await {
        Ok(Some(version)) => VersionBody {
            version,
            status: ReplyStatus::Success,
            error: None,
        },
        Ok(None) => {
            warn!("no releases recorded, serving fallback version");
            VersionBody {
                version: VersionInfo::fallback(today()),
                status: ReplyStatus::Fallback,
                error: None,
            }
        }
        Err(e) => {
            error!(error = %e, "error fetching version, serving fallback");
            let (_, message) = failure_reply(Endpoint::Version, &e);
            VersionBody {
                version: VersionInfo::fallback(today()),
                status: ReplyStatus::Fallback,
                error: Some(message),
            }
        }
    };
    (StatusCode::OK, Json(body)).into_response()
}
