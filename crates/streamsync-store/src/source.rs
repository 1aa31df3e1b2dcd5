//! Read-path traits implemented by every backend.

use async_trait::async_trait;

use streamsync_core::{MetricRecord, RawChangelogRow, VersionInfo};

use crate::error::StoreResult;

/// Source of the bot's display counters.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Fetch the `server_count` and `songs_played` rows in one read.
    async fn fetch_metrics(&self) -> StoreResult<Vec<MetricRecord>>;
}

/// Source of release history.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// The `limit` most recent releases, newest first.
    async fn recent_releases(&self, limit: usize) -> StoreResult<Vec<RawChangelogRow>>;

    /// The current release, or `None` when there is no release at all.
    async fn latest_release(&self) -> StoreResult<Option<VersionInfo>>;
}
