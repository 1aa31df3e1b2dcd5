//! End-to-end partial rendering: the site router talks to a live API router
//! over a loopback socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceExt;

use streamsync_api::{ApiState, api_router};
use streamsync_core::{MetricRecord, RawChangelogRow};
use streamsync_site::client::ApiClient;
use streamsync_site::task::RetryPolicy;
use streamsync_site::{SiteState, site_router};
use streamsync_store::{MemoryStore, StoreError};

/// Serve the API over `store` on an ephemeral port.
async fn spawn_api(store: MemoryStore) -> String {
    let store = Arc::new(store);
    let router = api_router(ApiState::new(store.clone(), store.clone(), store));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

fn site(api_addr: String) -> axum::Router {
    site_router(SiteState {
        client: ApiClient::new(api_addr, Duration::from_secs(5)),
        stats_retry: RetryPolicy::new(2, Duration::from_millis(10)),
        show_creator_message: false,
    })
}

async fn get_html(router: axum::Router, uri: &str) -> String {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn release(version: &str, day: u32) -> RawChangelogRow {
    RawChangelogRow {
        version: version.to_string(),
        title: Some("Queue rework".to_string()),
        description: None,
        changes: Some(json!({"bot": ["Added shuffle"], "fixed": ["Fixed skip"]})),
        release_date: NaiveDate::from_ymd_opt(2025, 6, day),
        status: Some("live".to_string()),
    }
}

#[tokio::test]
async fn index_renders_loading_placeholders() {
    let html = get_html(site(spawn_api(MemoryStore::new()).await), "/").await;
    assert!(html.contains(r#"hx-get="/partials/hero-stats""#));
    assert!(html.contains(r#"hx-get="/partials/version-badge""#));
    assert!(html.contains(r#"hx-get="/partials/changelog""#));
    assert!(html.contains("Loading changelog..."));
    assert!(html.contains("Crystal Clear Audio"));
    assert!(html.contains("/create-playlist &lt;name&gt; [description]"));
    assert!(!html.contains("From The Creator"));
}

#[tokio::test]
async fn index_creator_message_toggle() {
    let addr = spawn_api(MemoryStore::new()).await;
    let router = site_router(SiteState {
        client: ApiClient::new(addr, Duration::from_secs(5)),
        stats_retry: RetryPolicy::once(),
        show_creator_message: true,
    });
    assert!(get_html(router, "/").await.contains("From The Creator"));
}

#[tokio::test]
async fn hero_stats_loaded() {
    let store = MemoryStore::new()
        .with_metric(MetricRecord::new("server_count", Some("1234".to_string())))
        .with_metric(MetricRecord::new("songs_played", Some("98765".to_string())));
    let html = get_html(site(spawn_api(store).await), "/partials/hero-stats").await;
    assert!(html.contains(r#"data-state="loaded""#));
    assert!(html.contains("1,234"));
    assert!(html.contains("98,765"));
    assert!(!html.contains("hx-get"));
}

#[tokio::test]
async fn hero_stats_retries_then_fails() {
    let store = MemoryStore::failing(StoreError::ConnectionRefused);
    let counter = store.clone();
    let html = get_html(site(spawn_api(store).await), "/partials/hero-stats").await;

    assert!(html.contains(r#"data-state="error""#));
    assert!(html.contains("Server error. Analytics temporarily unavailable."));
    assert!(html.contains("Servers (offline)"));
    assert_eq!(counter.calls(), 3);
}

#[tokio::test]
async fn hero_stats_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let html = get_html(site(addr), "/partials/hero-stats").await;
    assert!(html.contains(r#"data-state="error""#));
    assert!(html.contains("Network error. Please check your connection."));
}

#[tokio::test]
async fn version_badge_states() {
    let store = MemoryStore::new().with_release(release("2.1.0b2", 1));
    let html = get_html(site(spawn_api(store).await), "/partials/version-badge").await;
    assert!(html.contains(r#"data-state="loaded""#));
    assert!(html.contains("StreamSync v2.1.0b2"));

    // The API itself falls back with 200 when the store fails.
    let store = MemoryStore::failing(StoreError::Timeout);
    let html = get_html(site(spawn_api(store).await), "/partials/version-badge").await;
    assert!(html.contains("Now Live"));
    assert!(html.contains("v1.1.0"));
}

#[tokio::test]
async fn version_badge_unreachable_api() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let html = get_html(site(addr), "/partials/version-badge").await;
    assert!(html.contains(r#"data-state="error""#));
    assert!(html.contains("Now Live"));
    assert!(html.contains("v1.1.0"));
}

#[tokio::test]
async fn changelog_loaded() {
    let store = MemoryStore::new()
        .with_release(release("1.2.0", 1))
        .with_release(release("1.3.0", 20));
    let html = get_html(site(spawn_api(store).await), "/partials/changelog").await;

    assert!(html.contains(r#"data-state="loaded""#));
    let newer = html.find("Version 1.3.0").unwrap();
    let older = html.find("Version 1.2.0").unwrap();
    assert!(newer < older);
    assert!(html.contains("June 20, 2025"));
    assert!(html.contains("✨"));
    assert!(html.contains("text-yellow-400"));
}

#[tokio::test]
async fn changelog_empty() {
    let html = get_html(site(spawn_api(MemoryStore::new()).await), "/partials/changelog").await;
    assert!(html.contains(r#"data-state="empty""#));
    assert!(html.contains("No changelog entries found."));
}

#[tokio::test]
async fn changelog_error() {
    let store = MemoryStore::failing(StoreError::MissingRelation("changelog".into()));
    let counter = store.clone();
    let html = get_html(site(spawn_api(store).await), "/partials/changelog").await;
    assert!(html.contains(r#"data-state="error""#));
    assert!(html.contains("Failed to load changelog"));
    assert!(!html.contains("Loading changelog..."));
    assert_eq!(counter.calls(), 1);
}
