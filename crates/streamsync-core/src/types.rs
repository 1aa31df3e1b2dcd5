//! Read-side data model shared across StreamSync crates.
//!
//! Rows are written by the bot process; everything here is only ever read.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::changes::normalize_changes;

/// Metric key holding the number of guilds the bot is in.
pub const SERVER_COUNT_METRIC: &str = "server_count";

/// Metric key holding the lifetime number of tracks played.
pub const SONGS_PLAYED_METRIC: &str = "songs_played";

/// Version reported when no authoritative release can be read.
pub const FALLBACK_VERSION: &str = "1.1.0";

/// Maximum number of changelog entries returned by the changelog service.
pub const CHANGELOG_LIMIT: usize = 10;

// ── Metrics ─────────────────────────────────────────────────────

/// A row of the `bot_analytics` table.
///
/// `metric_value` is read as text so that integer, numeric and text
/// columns all decode the same way; coercion happens in
/// [`SiteMetrics::from_records`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub metric_name: String,
    pub metric_value: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl MetricRecord {
    pub fn new(name: &str, value: impl Into<Option<String>>) -> Self {
        Self {
            metric_name: name.to_string(),
            metric_value: value.into(),
            last_updated: None,
        }
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = Some(at);
        self
    }
}

/// Display counters derived from the metrics table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteMetrics {
    pub server_count: u64,
    pub songs_played: u64,
    pub last_updated: Option<DateTime<Utc>>,
}

impl SiteMetrics {
    /// Fold metric rows into counters.
    ///
    /// Absent or unusable values become `0`. `last_updated` prefers the
    /// server count's timestamp over the songs played one.
    pub fn from_records(records: &[MetricRecord]) -> Self {
        let find = |name: &str| records.iter().find(|r| r.metric_name == name);
        let servers = find(SERVER_COUNT_METRIC);
        let songs = find(SONGS_PLAYED_METRIC);

        Self {
            server_count: coerce_metric_value(servers.and_then(|r| r.metric_value.as_deref())),
            songs_played: coerce_metric_value(songs.and_then(|r| r.metric_value.as_deref())),
            last_updated: servers
                .and_then(|r| r.last_updated)
                .or_else(|| songs.and_then(|r| r.last_updated)),
        }
    }
}

/// Coerce a stored metric value into a non-negative counter.
///
/// Fractions are truncated. Missing, non-numeric, negative and non-finite
/// values all map to `0`.
pub fn coerce_metric_value(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else { return 0 };
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v.trunc().min(u64::MAX as f64) as u64,
        _ => 0,
    }
}

// ── Changelog ───────────────────────────────────────────────────

/// Closed set of change categories shown on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
    Updated,
    Fixed,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Added => "added",
            ChangeType::Removed => "removed",
            ChangeType::Updated => "updated",
            ChangeType::Fixed => "fixed",
        }
    }
}

/// One line of a release's change list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeItem {
    #[serde(rename = "type")]
    pub kind: ChangeType,
    pub description: String,
}

impl ChangeItem {
    pub fn new(kind: ChangeType, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }
}

/// A `changelog` row as read from a backend, before normalization.
///
/// `changes` is whatever the backend handed over: JSON text, an array of
/// items, or a category map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChangelogRow {
    pub version: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub changes: Option<serde_json::Value>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl RawChangelogRow {
    /// Normalize the row into its wire shape.
    pub fn into_entry(self) -> ChangelogEntry {
        let changes = normalize_changes(self.changes.as_ref());
        ChangelogEntry {
            version: self.version,
            title: self.title,
            description: self.description,
            changes,
            release_date: self.release_date,
            status: self.status,
        }
    }
}

/// A release as served by the changelog endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogEntry {
    pub version: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub changes: Vec<ChangeItem>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<String>,
}

/// Order entries newest first and cap them at [`CHANGELOG_LIMIT`].
///
/// Undated entries sort after every dated one. The sort is stable, so
/// entries sharing a date keep their backend order.
pub fn latest_entries(mut entries: Vec<ChangelogEntry>) -> Vec<ChangelogEntry> {
    entries.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    entries.truncate(CHANGELOG_LIMIT);
    entries
}

/// The `limit` newest rows, newest first, undated rows last.
///
/// Backends that cannot order in their query use this before capping, so
/// the cap never drops a newer release in favour of an older one.
pub fn newest_rows(mut rows: Vec<RawChangelogRow>, limit: usize) -> Vec<RawChangelogRow> {
    rows.sort_by(|a, b| b.release_date.cmp(&a.release_date));
    rows.truncate(limit);
    rows
}

// ── Version ─────────────────────────────────────────────────────

/// Release channel derived from a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseChannel {
    Live,
    Beta,
    Development,
}

impl ReleaseChannel {
    /// Classify a version token.
    ///
    /// Anything mentioning `beta`/`b` is beta; `alpha`/`a` or a `0.` major
    /// is development; everything else is live.
    pub fn classify(version: &str) -> Self {
        let v = version.trim().to_ascii_lowercase();
        if v.contains("beta") || v.contains('b') {
            ReleaseChannel::Beta
        } else if v.contains("alpha") || v.contains('a') || v.starts_with("0.") {
            ReleaseChannel::Development
        } else {
            ReleaseChannel::Live
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseChannel::Live => "live",
            ReleaseChannel::Beta => "beta",
            ReleaseChannel::Development => "development",
        }
    }
}

/// Current release as served by the version endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub status: String,
    pub release_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl VersionInfo {
    /// The hardcoded release reported when nothing better is available.
    pub fn fallback(today: NaiveDate) -> Self {
        Self {
            version: FALLBACK_VERSION.to_string(),
            status: ReleaseChannel::Live.as_str().to_string(),
            release_date: today,
            title: None,
        }
    }

    /// Build from the newest changelog row, filling gaps the way the site
    /// expects: no status means live, no date means today.
    pub fn from_row(row: RawChangelogRow, today: NaiveDate) -> Self {
        Self {
            version: row.version,
            status: row
                .status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| ReleaseChannel::Live.as_str().to_string()),
            release_date: row.release_date.unwrap_or(today),
            title: row.title,
        }
    }
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
