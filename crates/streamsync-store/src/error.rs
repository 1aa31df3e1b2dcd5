//! Error taxonomy for store access.

use std::io;

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Every way a read against a backend can fail.
///
/// Driver errors are classified once, in [`StoreError::from_sqlx`], so
/// callers only ever match on this enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No connection string was configured; nothing was attempted.
    #[error("database configuration missing")]
    ConfigMissing,

    #[error("database connection refused")]
    ConnectionRefused,

    /// The schema has not been initialized.
    #[error("relation missing: {0}")]
    MissingRelation(String),

    /// Connecting or querying exceeded its bound.
    #[error("database timeout")]
    Timeout,

    #[error("database authentication failed")]
    Authentication,

    #[error("query failed: {0}")]
    Query(String),

    /// A file-backed source could not be read.
    #[error("io error: {0}")]
    Io(String),
}

/// SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";
/// SQLSTATEs for `invalid_password` and `invalid_authorization_specification`.
const AUTH_FAILURES: [&str; 2] = ["28P01", "28000"];
/// SQLSTATE for `query_canceled`, raised by `statement_timeout`.
const QUERY_CANCELED: &str = "57014";

impl StoreError {
    /// Classify a driver error.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => match db.code().as_deref() {
                Some(UNDEFINED_TABLE) => StoreError::MissingRelation(db.message().to_string()),
                Some(code) if AUTH_FAILURES.contains(&code) => StoreError::Authentication,
                Some(QUERY_CANCELED) => StoreError::Timeout,
                _ => Self::from_message(db.message()),
            },
            sqlx::Error::Io(io) => match io.kind() {
                io::ErrorKind::ConnectionRefused => StoreError::ConnectionRefused,
                io::ErrorKind::TimedOut => StoreError::Timeout,
                _ => Self::from_message(&io.to_string()),
            },
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            other => Self::from_message(&other.to_string()),
        }
    }

    /// Last-resort classification for errors that carry no code.
    fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            StoreError::Timeout
        } else if lower.contains("authentication") {
            StoreError::Authentication
        } else if lower.contains("connection refused") {
            StoreError::ConnectionRefused
        } else {
            StoreError::Query(message.to_string())
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::from_sqlx(err)
    }
}
