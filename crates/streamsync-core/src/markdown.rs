//! Markdown changelog parsing for file-backed deployments.
//!
//! Understands the Keep-a-Changelog layout:
//!
//! ```text
//! ## [1.2.0] - 2025-03-01
//! ### Added
//! - Shuffle command
//! ### Fixed
//! - Crash on empty queue
//! ```
//!
//! Entries are assumed newest-first, so the first release heading is the
//! current version.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Value, json};

use crate::types::{RawChangelogRow, ReleaseChannel, VersionInfo};

/// Compiled line patterns for changelog markdown.
#[derive(Debug, Clone)]
pub struct ChangelogParser {
    release: Regex,
    category: Regex,
}

impl ChangelogParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            release: Regex::new(r"^##\s*\[([^\]]+)\]\s*-\s*(\d{4}-\d{2}-\d{2})")?,
            category: Regex::new(r"^###\s+(.+?)\s*$")?,
        })
    }

    /// Match a `## [<version>] - <date>` line.
    fn release_heading(&self, line: &str) -> Option<(String, NaiveDate)> {
        let caps = self.release.captures(line.trim())?;
        let version = caps.get(1)?.as_str().trim().to_string();
        let date = NaiveDate::parse_from_str(caps.get(2)?.as_str(), "%Y-%m-%d").ok()?;
        Some((version, date))
    }

    /// Read the current release from the first release heading.
    pub fn latest_release(&self, text: &str) -> Option<VersionInfo> {
        text.lines()
            .find_map(|line| self.release_heading(line))
            .map(|(version, date)| VersionInfo {
                status: ReleaseChannel::classify(&version).as_str().to_string(),
                version,
                release_date: date,
                title: None,
            })
    }

    /// Parse every release in the file into raw changelog rows.
    ///
    /// Each bullet becomes a `{type, description}` item typed by its `###`
    /// category heading, in file order, so it goes through the normal
    /// `changes` normalization. A repeated heading does not regroup earlier
    /// bullets. Bullets before any
    /// category heading are filed under "added". Prose between the release
    /// heading and the first category becomes the description.
    pub fn parse_releases(&self, text: &str) -> Vec<RawChangelogRow> {
        let mut rows = Vec::new();
        let mut current: Option<ReleaseBuilder> = None;

        for line in text.lines() {
            if let Some((version, date)) = self.release_heading(line) {
                if let Some(done) = current.take() {
                    rows.push(done.finish());
                }
                current = Some(ReleaseBuilder::new(version, date));
                continue;
            }
            let trimmed = line.trim();
            if trimmed.starts_with("## ") {
                // A level-two heading that is not a release ends the entry.
                if let Some(done) = current.take() {
                    rows.push(done.finish());
                }
                continue;
            }
            let Some(release) = current.as_mut() else { continue };

            if let Some(caps) = self.category.captures(trimmed) {
                release.category = caps[1].to_string();
            } else if let Some(item) =
                trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* "))
            {
                release.push_item(item.trim());
            } else if !trimmed.is_empty() && release.items.is_empty() {
                release.push_description(trimmed);
            }
        }
        if let Some(done) = current {
            rows.push(done.finish());
        }
        rows
    }
}

struct ReleaseBuilder {
    version: String,
    date: NaiveDate,
    description: Vec<String>,
    category: String,
    items: Vec<Value>,
}

impl ReleaseBuilder {
    fn new(version: String, date: NaiveDate) -> Self {
        Self {
            version,
            date,
            description: Vec::new(),
            category: "added".to_string(),
            items: Vec::new(),
        }
    }

    fn push_item(&mut self, item: &str) {
        self.items.push(json!({"type": self.category, "description": item}));
    }

    fn push_description(&mut self, line: &str) {
        self.description.push(line.to_string());
    }

    fn finish(self) -> RawChangelogRow {
        let status = ReleaseChannel::classify(&self.version).as_str().to_string();
        RawChangelogRow {
            title: None,
            description: (!self.description.is_empty()).then(|| self.description.join(" ")),
            changes: Some(Value::Array(self.items)),
            release_date: Some(self.date),
            status: Some(status),
            version: self.version,
        }
    }
}
