//! Sync error model.

use thiserror::Error;

/// Result type used across the sync pipeline.
pub type SyncResult<T> = Result<T, SyncError>;

/// Pipeline-level error.
///
/// Per-order failures (`Validation`, `RemoteWrite`) are caught at the
/// order-processing boundary and turned into audit records; fatal
/// failures (`RemoteFetch`, `Ledger`) abort the whole run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// A source record failed validation (bad/inconsistent input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The source system could not be read. No records can be processed.
    #[error("source fetch failed: {0}")]
    RemoteFetch(String),

    /// The destination rejected or could not accept one record.
    #[error("destination write failed: {0}")]
    RemoteWrite(String),

    /// The local ledger store is unavailable. Duplicate prevention
    /// cannot be guaranteed without it.
    #[error("ledger error: {0}")]
    Ledger(String),

    /// The audit trail could not be appended to.
    #[error("audit append failed: {0}")]
    Audit(String),

    /// Startup configuration was missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn remote_fetch(msg: impl Into<String>) -> Self {
        Self::RemoteFetch(msg.into())
    }

    pub fn remote_write(msg: impl Into<String>) -> Self {
        Self::RemoteWrite(msg.into())
    }

    pub fn ledger(msg: impl Into<String>) -> Self {
        Self::Ledger(msg.into())
    }

    pub fn audit(msg: impl Into<String>) -> Self {
        Self::Audit(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error aborts the run instead of skipping one record.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RemoteFetch(_) | Self::Ledger(_) | Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_ledger_errors_are_fatal() {
        assert!(SyncError::remote_fetch("down").is_fatal());
        assert!(SyncError::ledger("locked").is_fatal());
        assert!(SyncError::config("missing").is_fatal());
    }

    #[test]
    fn per_order_errors_are_not_fatal() {
        assert!(!SyncError::validation("total mismatch").is_fatal());
        assert!(!SyncError::remote_write("rejected").is_fatal());
        assert!(!SyncError::audit("disk full").is_fatal());
    }
}
