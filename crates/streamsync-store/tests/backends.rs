//! Backends behind the shared traits, as the API wires them.

use std::sync::Arc;

use streamsync_core::config::DatabaseConfig;
use streamsync_store::{
    ChangelogFile, MemoryStore, MetricsSource, PgStore, ReleaseSource, StoreError,
};

#[tokio::test]
async fn unconfigured_postgres_reports_config_missing_everywhere() {
    let pg = Arc::new(PgStore::new(&DatabaseConfig::default()));
    assert!(!pg.is_configured());

    let metrics: Arc<dyn MetricsSource> = pg.clone();
    let releases: Arc<dyn ReleaseSource> = pg;

    assert_eq!(metrics.fetch_metrics().await.unwrap_err(), StoreError::ConfigMissing);
    assert_eq!(releases.recent_releases(10).await.unwrap_err(), StoreError::ConfigMissing);
    assert_eq!(releases.latest_release().await.unwrap_err(), StoreError::ConfigMissing);
}

#[tokio::test]
async fn file_and_memory_backends_agree_on_latest_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("CHANGELOG.md");
    std::fs::write(
        &path,
        "# Changelog\n\n## [Unreleased]\n- Lyrics\n\n## [1.4.0] - 2025-07-01\n### Added\n- Radio\n\n## [1.3.0] - 2025-06-01\n",
    )
    .unwrap();

    let file: Arc<dyn ReleaseSource> = Arc::new(ChangelogFile::new(&path).unwrap());
    let rows = file.recent_releases(10).await.unwrap();
    assert_eq!(rows.len(), 2);

    let memory: Arc<dyn ReleaseSource> =
        Arc::new(rows.iter().cloned().fold(MemoryStore::new(), MemoryStore::with_release));

    let from_file = file.latest_release().await.unwrap().unwrap();
    let from_memory = memory.latest_release().await.unwrap().unwrap();
    assert_eq!(from_file.version, "1.4.0");
    assert_eq!(from_memory.version, from_file.version);
    assert_eq!(from_memory.release_date, from_file.release_date);
}

#[tokio::test]
async fn missing_file_is_io_error() {
    let file = ChangelogFile::new("/nonexistent/CHANGELOG.md").unwrap();
    assert!(matches!(file.latest_release().await, Err(StoreError::Io(_))));
}
