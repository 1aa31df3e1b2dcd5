//! HTMX partial endpoints.
//!
//! These return HTML fragments for HTMX to swap over the loading
//! placeholders rendered by the landing page. Each fetch runs in a
//! [`FetchTask`] owned by the handler future; if the browser goes away
//! the future is dropped and so are any pending retries.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::SiteState;
use crate::client::{ANALYTICS_PATH, ApiClient, CHANGELOG_PATH, ClientError, VERSION_PATH};
use crate::pages::render;
use crate::task::{FetchTask, RetryPolicy};
use crate::views::*;

fn fetch<T>(client: &ApiClient, path: &'static str, policy: RetryPolicy) -> FetchTask<T>
where
    T: DeserializeOwned + Send + 'static,
{
    let client = client.clone();
    FetchTask::spawn(policy, move || {
        let client = client.clone();
        async move { client.get_json::<T>(path).await }
    })
}

// ── Hero Statistics ─────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/hero_stats.html")]
struct HeroStatsPartial {
    stats: ViewState<StatsView>,
}

pub async fn hero_stats(State(state): State<SiteState>) -> Html<String> {
    let task = fetch::<StatsPayload>(&state.client, ANALYTICS_PATH, state.stats_retry);
    let stats = match task.join().await {
        Ok(payload) => ViewState::Loaded(StatsView::from_payload(&payload)),
        Err(e) => {
            warn!(error = %e, "hero statistics unavailable");
            ViewState::Failed(stats_error_message(&e).to_string())
        }
    };
    render(HeroStatsPartial { stats })
}

// ── Version Badge ───────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/version_badge.html")]
struct VersionBadgePartial {
    badge: ViewState<VersionBadgeView>,
}

pub async fn version_badge(State(state): State<SiteState>) -> Html<String> {
    let task = fetch::<VersionPayload>(&state.client, VERSION_PATH, RetryPolicy::once());
    let badge = match task.join().await {
        Ok(payload) => ViewState::Loaded(VersionBadgeView::from_info(&payload.version)),
        Err(e) => {
            warn!(error = %e, "version unavailable, showing fallback badge");
            ViewState::Failed(failure_note(&e))
        }
    };
    render(VersionBadgePartial { badge })
}

// ── Changelog ───────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/changelog.html")]
struct ChangelogPartial {
    changelog: ViewState<ChangelogView>,
}

pub async fn changelog(State(state): State<SiteState>) -> Html<String> {
    let task = fetch::<ChangelogPayload>(&state.client, CHANGELOG_PATH, RetryPolicy::once());
    let changelog = match task.join().await {
        Ok(payload) => ViewState::Loaded(ChangelogView::from_entries(&payload.changelog)),
        Err(e) => {
            warn!(error = %e, "changelog unavailable");
            ViewState::Failed("Failed to load changelog".to_string())
        }
    };
    render(ChangelogPartial { changelog })
}

fn failure_note(err: &ClientError) -> String {
    format!("Version unavailable ({err})")
}
