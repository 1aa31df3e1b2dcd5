//! In-memory backend for tests and local development.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use streamsync_core::{newest_rows, today, MetricRecord, RawChangelogRow, VersionInfo};

use crate::error::{StoreError, StoreResult};
use crate::source::{MetricsSource, ReleaseSource};

/// Fixed rows, or a fixed failure, served from memory.
///
/// Releases are kept in insertion order; reads order them the way a
/// database query would.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    metrics: Vec<MetricRecord>,
    releases: Vec<RawChangelogRow>,
    failure: Option<StoreError>,
    calls: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every read fails with `error`.
    pub fn failing(error: StoreError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_metric(mut self, record: MetricRecord) -> Self {
        self.metrics.push(record);
        self
    }

    pub fn with_release(mut self, row: RawChangelogRow) -> Self {
        self.releases.push(row);
        self
    }

    /// Number of reads served so far, across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MetricsSource for MemoryStore {
    async fn fetch_metrics(&self) -> StoreResult<Vec<MetricRecord>> {
        self.begin()?;
        Ok(self.metrics.clone())
    }
}

#[async_trait]
impl ReleaseSource for MemoryStore {
    async fn recent_releases(&self, limit: usize) -> StoreResult<Vec<RawChangelogRow>> {
        self.begin()?;
        Ok(newest_rows(self.releases.clone(), limit))
    }

    async fn latest_release(&self) -> StoreResult<Option<VersionInfo>> {
        self.begin()?;
        let newest = self
            .releases
            .iter()
            .filter(|r| r.release_date.is_some())
            .max_by_key(|r| r.release_date)
            .or_else(|| self.releases.first());
        Ok(newest.cloned().map(|row| VersionInfo::from_row(row, today())))
    }
}
