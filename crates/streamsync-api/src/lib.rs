//! streamsync-api: read-only JSON API for the StreamSync site.
//!
//! # API Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/api/analytics` | Server count and songs played |
//! | GET | `/api/changelog` | Ten most recent releases |
//! | GET | `/api/version` | Current release, never fails |

pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tracing::{info, warn};

use streamsync_core::config::SourceConfig;
use streamsync_core::{SiteConfig, SourceKind};
use streamsync_store::{ChangelogFile, MetricsSource, PgStore, ReleaseSource, StoreResult};

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub metrics: Arc<dyn MetricsSource>,
    pub changelog: Arc<dyn ReleaseSource>,
    pub version: Arc<dyn ReleaseSource>,
}

impl ApiState {
    pub fn new(
        metrics: Arc<dyn MetricsSource>,
        changelog: Arc<dyn ReleaseSource>,
        version: Arc<dyn ReleaseSource>,
    ) -> Self {
        Self {
            metrics,
            changelog,
            version,
        }
    }

    /// Wire up backends as selected in site.toml.
    ///
    /// Metrics always come from Postgres; changelog and version each use
    /// Postgres or a markdown file.
    pub fn from_config(config: &SiteConfig) -> StoreResult<Self> {
        let pg = Arc::new(PgStore::new(&config.database));
        if !pg.is_configured() {
            warn!(
                env = %config.database.url_env,
                "database URL not configured; database-backed endpoints will report it"
            );
        }

        let metrics: Arc<dyn MetricsSource> = pg.clone();
        let changelog = release_source(&config.changelog, &pg)?;
        let version = release_source(&config.version, &pg)?;
        info!(
            changelog = ?config.changelog.source,
            version = ?config.version.source,
            "api backends selected"
        );
        Ok(Self::new(metrics, changelog, version))
    }
}

fn release_source(
    config: &SourceConfig,
    pg: &Arc<PgStore>,
) -> StoreResult<Arc<dyn ReleaseSource>> {
    let source: Arc<dyn ReleaseSource> = match config.source {
        SourceKind::Database => pg.clone(),
        SourceKind::File => Arc::new(ChangelogFile::new(&config.path)?),
    };
    Ok(source)
}

/// Build the API router.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .route("/api/analytics", get(handlers::analytics))
        .route("/api/changelog", get(handlers::changelog))
        .route("/api/version", get(handlers::version))
        .with_state(state)
}
