//! View types for landing page templates.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings and computed fields so templates stay simple.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use streamsync_core::{
    ChangeItem, ChangeType, ChangelogEntry, FALLBACK_VERSION, ReleaseChannel, VersionInfo,
};

use crate::client::ClientError;

/// Every data-bearing section is in exactly one of these.
pub enum ViewState<T> {
    Loading,
    Failed(String),
    Loaded(T),
}

// ── API payloads ────────────────────────────────────────────────

/// `/api/analytics` body. Counts that are missing, negative or not
/// integers read as zero.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    #[serde(default)]
    server_count: Value,
    #[serde(default)]
    songs_played: Value,
}

impl StatsPayload {
    pub fn server_count(&self) -> u64 {
        self.server_count.as_u64().unwrap_or(0)
    }

    pub fn songs_played(&self) -> u64 {
        self.songs_played.as_u64().unwrap_or(0)
    }
}

/// `/api/changelog` body.
#[derive(Debug, Deserialize)]
pub struct ChangelogPayload {
    #[serde(default)]
    pub changelog: Vec<ChangelogEntry>,
}

/// `/api/version` body.
#[derive(Debug, Deserialize)]
pub struct VersionPayload {
    pub version: VersionInfo,
}

// ── Hero Statistics ─────────────────────────────────────────────

pub struct StatsView {
    pub server_count: String,
    pub songs_played: String,
}

impl StatsView {
    pub fn from_payload(payload: &StatsPayload) -> Self {
        Self {
            server_count: format_count(payload.server_count()),
            songs_played: format_count(payload.songs_played()),
        }
    }
}

/// What the hero section says when the statistics could not be loaded.
pub fn stats_error_message(err: &ClientError) -> &'static str {
    match err {
        ClientError::Timeout => "Request timed out. Please try again later.",
        e if e.is_network() => "Network error. Please check your connection.",
        ClientError::Status(_) => "Server error. Analytics temporarily unavailable.",
        _ => "Unable to load server statistics.",
    }
}

// ── Version Badge ───────────────────────────────────────────────

pub struct VersionBadgeView {
    pub label: &'static str,
    pub dot_color: &'static str,
    pub version: String,
}

impl VersionBadgeView {
    pub fn from_info(info: &VersionInfo) -> Self {
        let (label, dot_color) = match info.status.as_str() {
            "beta" => ("Beta Testing", "bg-yellow-400"),
            "development" => ("In Development", "bg-orange-400"),
            _ => ("Now Live", "bg-green-400"),
        };
        Self {
            label,
            dot_color,
            version: display_version(&info.version),
        }
    }

    /// Badge shown when the version could not be fetched.
    pub fn fallback() -> Self {
        Self {
            label: "Now Live",
            dot_color: "bg-green-400",
            version: display_version(FALLBACK_VERSION),
        }
    }
}

fn display_version(version: &str) -> String {
    if version.starts_with(['v', 'V']) {
        version.to_string()
    } else {
        format!("v{version}")
    }
}

// ── Changelog ───────────────────────────────────────────────────

pub struct ChangelogView {
    pub entries: Vec<EntryView>,
}

impl ChangelogView {
    pub fn from_entries(entries: &[ChangelogEntry]) -> Self {
        Self {
            entries: entries.iter().map(EntryView::from_entry).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct EntryView {
    pub version: String,
    pub title: String,
    pub description: String,
    pub date_display: String,
    pub channel: String,
    pub channel_color: &'static str,
    pub changes: Vec<ChangeView>,
}

impl EntryView {
    pub fn from_entry(entry: &ChangelogEntry) -> Self {
        let (channel, channel_color) = entry_channel(entry);
        Self {
            version: entry.version.clone(),
            title: entry.title.clone().unwrap_or_default(),
            description: entry.description.clone().unwrap_or_default(),
            date_display: entry
                .release_date
                .map(format_date)
                .unwrap_or_else(|| "Unreleased".to_string()),
            channel,
            channel_color,
            changes: entry.changes.iter().map(ChangeView::from_item).collect(),
        }
    }
}

/// The stored status wins, shown verbatim; only entries without one fall
/// back to the channel implied by the version string.
fn entry_channel(entry: &ChangelogEntry) -> (String, &'static str) {
    match entry.status.as_deref().map(str::trim) {
        Some(status) if !status.is_empty() => {
            let color = if status == "released" {
                "bg-green-500/20 text-green-300"
            } else {
                "bg-yellow-500/20 text-yellow-300"
            };
            (status.to_string(), color)
        }
        _ => {
            let (channel, color) = match ReleaseChannel::classify(&entry.version) {
                ReleaseChannel::Live => ("live", "bg-green-500/20 text-green-300"),
                ReleaseChannel::Beta => ("beta", "bg-yellow-500/20 text-yellow-300"),
                ReleaseChannel::Development => ("development", "bg-orange-500/20 text-orange-300"),
            };
            (channel.to_string(), color)
        }
    }
}

pub struct ChangeView {
    pub icon: &'static str,
    pub color: &'static str,
    pub description: String,
}

impl ChangeView {
    pub fn from_item(item: &ChangeItem) -> Self {
        let (icon, color) = match item.kind {
            ChangeType::Added => ("✨", "text-green-400"),
            ChangeType::Removed => ("🗑️", "text-red-400"),
            ChangeType::Updated => ("📝", "text-blue-400"),
            ChangeType::Fixed => ("🔧", "text-yellow-400"),
        };
        Self {
            icon,
            color,
            description: item.description.clone(),
        }
    }
}

// ── Format Helpers ──────────────────────────────────────────────

/// Thousands separated with commas: `1234567` → `1,234,567`.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}
