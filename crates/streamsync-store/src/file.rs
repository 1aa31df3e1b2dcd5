//! Markdown changelog backend.
//!
//! Re-reads the file on every call so edits show up without a restart.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use streamsync_core::{ChangelogParser, RawChangelogRow, VersionInfo, newest_rows};

use crate::error::{StoreError, StoreResult};
use crate::source::ReleaseSource;

/// A Keep-a-Changelog file used as the release source.
#[derive(Debug, Clone)]
pub struct ChangelogFile {
    path: PathBuf,
    parser: ChangelogParser,
}

impl ChangelogFile {
    pub fn new(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let parser = ChangelogParser::new().map_err(|e| StoreError::Io(e.to_string()))?;
        Ok(Self {
            path: path.into(),
            parser,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> StoreResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Io(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl ReleaseSource for ChangelogFile {
    async fn recent_releases(&self, limit: usize) -> StoreResult<Vec<RawChangelogRow>> {
        let text = self.read().await?;
        let rows = newest_rows(self.parser.parse_releases(&text), limit);
        debug!(path = %self.path.display(), rows = rows.len(), "changelog file parsed");
        Ok(rows)
    }

    async fn latest_release(&self) -> StoreResult<Option<VersionInfo>> {
        let text = self.read().await?;
        Ok(self.parser.latest_release(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_changelog(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("CHANGELOG.md");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn reads_latest_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_changelog(
            &dir,
            "# Changelog\n\n## [0.9.0] - 2025-05-05\n- Preview\n\n## [0.8.0] - 2025-04-01\n",
        );
        let source = ChangelogFile::new(path).unwrap();

        let info = source.latest_release().await.unwrap().unwrap();
        assert_eq!(info.version, "0.9.0");
        assert_eq!(info.status, "development");
    }

    #[tokio::test]
    async fn limits_recent_releases() {
        let dir = tempfile::tempdir().unwrap();
        let body: String = (1..=5)
            .rev()
            .map(|d| format!("## [1.0.{d}] - 2025-01-0{d}\n- change {d}\n"))
            .collect();
        let source = ChangelogFile::new(write_changelog(&dir, &body)).unwrap();

        let rows = source.recent_releases(3).await.unwrap();
        let versions: Vec<&str> = rows.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions, ["1.0.5", "1.0.4", "1.0.3"]);
    }

    #[tokio::test]
    async fn oldest_first_file_still_yields_newest() {
        let dir = tempfile::tempdir().unwrap();
        let body: String = (1..=12)
            .map(|d| format!("## [1.0.{d}] - 2025-01-{d:02}\n- change {d}\n"))
            .collect();
        let source = ChangelogFile::new(write_changelog(&dir, &body)).unwrap();

        let rows = source.recent_releases(10).await.unwrap();
        let versions: Vec<&str> = rows.iter().map(|r| r.version.as_str()).collect();
        assert_eq!(versions.len(), 10);
        assert_eq!(versions[0], "1.0.12");
        assert_eq!(versions[9], "1.0.3");
    }

    #[tokio::test]
    async fn empty_file_has_no_release() {
        let dir = tempfile::tempdir().unwrap();
        let source = ChangelogFile::new(write_changelog(&dir, "# Changelog\n")).unwrap();
        assert_eq!(source.latest_release().await, Ok(None));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = ChangelogFile::new(dir.path().join("missing.md")).unwrap();
        assert!(matches!(source.latest_release().await, Err(StoreError::Io(_))));
    }
}
