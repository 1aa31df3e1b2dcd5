//! streamsync-site: server-rendered landing page for StreamSync.
//!
//! The page renders every data-bearing section in its loading state; HTMX
//! then swaps in partials that fetch from the JSON API through
//! [`client::ApiClient`].
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `/` | Landing page |
//! | `/partials/hero-stats` | Server and song counters (retries with backoff) |
//! | `/partials/version-badge` | Current version badge |
//! | `/partials/changelog` | Recent releases |

pub mod client;
pub mod content;
pub mod pages;
pub mod partials;
pub mod task;
pub mod views;

use axum::routing::get;
use axum::Router;

use streamsync_core::SiteConfig;

use crate::client::ApiClient;
use crate::task::RetryPolicy;

/// Shared state for page and partial handlers.
#[derive(Clone)]
pub struct SiteState {
    pub client: ApiClient,
    /// Retry policy for the hero statistics; other views fetch once.
    pub stats_retry: RetryPolicy,
    pub show_creator_message: bool,
}

impl SiteState {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            client: ApiClient::new(config.api_address(), config.site.request_timeout),
            stats_retry: RetryPolicy::new(config.site.stats_retries, config.site.retry_base),
            show_creator_message: config.site.show_creator_message,
        }
    }
}

/// Build the site router.
pub fn site_router(state: SiteState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/partials/hero-stats", get(partials::hero_stats))
        .route("/partials/version-badge", get(partials::version_badge))
        .route("/partials/changelog", get(partials::changelog))
        .with_state(state)
}
