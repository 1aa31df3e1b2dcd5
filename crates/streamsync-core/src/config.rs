//! site.toml configuration.
//!
//! Every section is optional; an empty file yields a working local setup.
//! The database URL is never read from the file. It comes from the
//! environment, once, via [`SiteConfig::apply_env`].
//!
//! ```toml
//! [server]
//! port = 8080
//!
//! [database]
//! url_env = "NEON_DATABASE_URL"
//! connect_timeout = "10s"
//! query_timeout = "10s"
//!
//! [changelog]
//! source = "database"
//!
//! [version]
//! source = "file"
//! path = "CHANGELOG.md"
//!
//! [site]
//! request_timeout = "10s"
//! stats_retries = 2
//! retry_base = "2s"
//! show_creator_message = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Secondary variable consulted when the configured one is unset.
pub const FALLBACK_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid site.toml: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub changelog: SourceConfig,
    pub version: SourceConfig,
    pub site: PresentationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Environment variable holding the connection string.
    pub url_env: String,
    #[serde(deserialize_with = "duration_str")]
    pub connect_timeout: Duration,
    #[serde(deserialize_with = "duration_str")]
    pub query_timeout: Duration,
    /// Resolved connection string; only ever set from the environment.
    #[serde(skip)]
    pub url: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url_env: "NEON_DATABASE_URL".to_string(),
            connect_timeout: Duration::from_secs(10),
            query_timeout: Duration::from_secs(10),
            url: None,
        }
    }
}

/// Where a read path gets its data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Database,
    File,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub source: SourceKind,
    /// Markdown changelog consulted when `source = "file"`.
    pub path: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Database,
            path: PathBuf::from("CHANGELOG.md"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// `host:port` of the JSON API. Defaults to the local server.
    pub api_base: Option<String>,
    #[serde(deserialize_with = "duration_str")]
    pub request_timeout: Duration,
    /// Extra attempts the hero statistics make after the first failure.
    pub stats_retries: u32,
    #[serde(deserialize_with = "duration_str")]
    pub retry_base: Duration,
    pub show_creator_message: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            request_timeout: Duration::from_secs(10),
            stats_retries: 2,
            retry_base: Duration::from_secs(2),
            show_creator_message: false,
        }
    }
}

impl SiteConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the database URL from the process environment.
    pub fn with_env(mut self) -> Self {
        self.apply_env(|key| std::env::var(key).ok());
        self
    }

    /// Resolve the database URL through `lookup`.
    ///
    /// The configured variable wins over [`FALLBACK_URL_ENV`]. Blank values
    /// count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        self.database.url = non_blank(&self.database.url_env).or_else(|| non_blank(FALLBACK_URL_ENV));
    }

    /// Address the presentation layer uses to reach the JSON API.
    pub fn api_address(&self) -> String {
        self.site
            .api_base
            .clone()
            .unwrap_or_else(|| format!("127.0.0.1:{}", self.server.port))
    }
}

fn duration_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid duration {raw:?}")))
}

/// Parse a duration string like "5s", "500ms", "1m".
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
