//! streamsync-store: read-side store access for the StreamSync site.
//!
//! Two traits split the read paths: [`MetricsSource`] for the bot's
//! counters and [`ReleaseSource`] for changelog and version data. Backends:
//!
//! - [`PgStore`]: Postgres, one connection per call, bounded by connect
//!   and query timeouts and closed on every exit path.
//! - [`ChangelogFile`]: a Keep-a-Changelog markdown file.
//! - [`MemoryStore`]: fixed data or an injected failure, for tests and
//!   local development.
//!
//! Every backend reports failures through the closed [`StoreError`] set.

pub mod error;
pub mod file;
pub mod memory;
pub mod pg;
pub mod source;

pub use error::{StoreError, StoreResult};
pub use file::ChangelogFile;
pub use memory::MemoryStore;
pub use pg::PgStore;
pub use source::{MetricsSource, ReleaseSource};
