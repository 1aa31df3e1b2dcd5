//! streamsync-core: shared types for the StreamSync site.
//!
//! Holds the read-side data model (metrics, changelog entries, version
//! info), normalization of the free-form `changes` column, the markdown
//! changelog parser used by file-backed deployments, and `site.toml`
//! configuration.

pub mod changes;
pub mod config;
pub mod markdown;
pub mod types;

pub use changes::normalize_changes;
pub use config::{ConfigError, SiteConfig, SourceKind};
pub use markdown::ChangelogParser;
pub use types::*;
