//! Postgres backend.
//!
//! Deliberately pool-less: every call connects, runs one query and closes.
//! Both phases are bounded by the configured timeouts, and the connection
//! is closed whether the query succeeded, failed or timed out.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection};
use tokio::time::{error::Elapsed, timeout};
use tracing::{debug, warn};

use streamsync_core::config::DatabaseConfig;
use streamsync_core::{
    today, MetricRecord, RawChangelogRow, VersionInfo, SERVER_COUNT_METRIC, SONGS_PLAYED_METRIC,
};

use crate::error::{StoreError, StoreResult};
use crate::source::{MetricsSource, ReleaseSource};

const METRICS_QUERY: &str = "\
    SELECT metric_name, metric_value::text AS metric_value, \
           last_updated::timestamptz AS last_updated \
    FROM bot_analytics \
    WHERE metric_name = ANY($1)";

const CHANGELOG_QUERY: &str = "\
    SELECT version, title, description, changes::text AS changes, \
           release_date::date AS release_date, status \
    FROM changelog \
    ORDER BY release_date DESC NULLS LAST \
    LIMIT $1";

#[derive(sqlx::FromRow)]
struct MetricRow {
    metric_name: String,
    metric_value: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl From<MetricRow> for MetricRecord {
    fn from(row: MetricRow) -> Self {
        MetricRecord {
            metric_name: row.metric_name,
            metric_value: row.metric_value,
            last_updated: row.last_updated,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ChangelogRow {
    version: String,
    title: Option<String>,
    description: Option<String>,
    changes: Option<String>,
    release_date: Option<NaiveDate>,
    status: Option<String>,
}

impl From<ChangelogRow> for RawChangelogRow {
    fn from(row: ChangelogRow) -> Self {
        RawChangelogRow {
            version: row.version,
            title: row.title,
            description: row.description,
            // Always handed over as text; normalization parses it.
            changes: row.changes.map(serde_json::Value::String),
            release_date: row.release_date,
            status: row.status,
        }
    }
}

/// Connect-per-call Postgres store.
#[derive(Debug, Clone)]
pub struct PgStore {
    url: Option<String>,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl PgStore {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            url: config.url.clone(),
            connect_timeout: config.connect_timeout,
            query_timeout: config.query_timeout,
        }
    }

    /// Whether a connection string is available at all.
    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }

    /// Open a connection, bounded by the connect timeout.
    ///
    /// Fails with [`StoreError::ConfigMissing`] before touching the network
    /// when no URL is configured.
    async fn connect(&self) -> StoreResult<PgConnection> {
        let url = self.url.as_deref().ok_or(StoreError::ConfigMissing)?;
        let options = PgConnectOptions::from_str(url)?;
        match timeout(self.connect_timeout, PgConnection::connect_with(&options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(StoreError::Timeout),
        }
    }

    /// Close `conn` and turn the bounded query outcome into a store result.
    ///
    /// Close failures are logged and swallowed; they never mask the query
    /// outcome.
    async fn finish<T>(
        &self,
        conn: PgConnection,
        outcome: Result<Result<T, sqlx::Error>, Elapsed>,
    ) -> StoreResult<T> {
        match timeout(self.connect_timeout, conn.close()).await {
            Ok(Ok(())) => debug!("database connection closed"),
            Ok(Err(e)) => warn!(error = %e, "error closing database connection"),
            Err(_) => warn!("timed out closing database connection"),
        }
        match outcome {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(StoreError::Timeout),
        }
    }

    async fn query_releases(&self, limit: usize) -> StoreResult<Vec<RawChangelogRow>> {
        let mut conn = self.connect().await?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let outcome = timeout(
            self.query_timeout,
            sqlx::query_as::<_, ChangelogRow>(CHANGELOG_QUERY)
                .bind(limit)
                .fetch_all(&mut conn),
        )
        .await;
        let rows = self.finish(conn, outcome).await?;
        Ok(rows.into_iter().map(RawChangelogRow::from).collect())
    }
}

#[async_trait]
impl MetricsSource for PgStore {
    async fn fetch_metrics(&self) -> StoreResult<Vec<MetricRecord>> {
        let mut conn = self.connect().await?;
        let names = [SERVER_COUNT_METRIC, SONGS_PLAYED_METRIC];
        let outcome = timeout(
            self.query_timeout,
            sqlx::query_as::<_, MetricRow>(METRICS_QUERY)
                .bind(&names[..])
                .fetch_all(&mut conn),
        )
        .await;
        let rows = self.finish(conn, outcome).await?;
        debug!(rows = rows.len(), "metrics fetched");
        Ok(rows.into_iter().map(MetricRecord::from).collect())
    }
}

#[async_trait]
impl ReleaseSource for PgStore {
    async fn recent_releases(&self, limit: usize) -> StoreResult<Vec<RawChangelogRow>> {
        let rows = self.query_releases(limit).await?;
        debug!(rows = rows.len(), "changelog fetched");
        Ok(rows)
    }

    async fn latest_release(&self) -> StoreResult<Option<VersionInfo>> {
        let mut rows = self.query_releases(1).await?;
        Ok(rows.pop().map(|row| VersionInfo::from_row(row, today())))
    }
}
