//! Runtime configuration.
//!
//! One explicit struct passed to component constructors; there is no
//! ambient global settings object.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{SyncError, SyncResult};

/// Retry knobs applied at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(10),
        }
    }
}

/// Calls-per-window limit applied at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_calls: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 80 calls/minute, matching the destination API's default quota.
        Self {
            max_calls: 80,
            window: Duration::from_secs(60),
        }
    }
}

/// Full configuration for one sync process.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Shop API base URL (e.g. `https://shop.example.com/wp-json/wc/v3`).
    pub source_url: String,
    /// Shop API consumer key.
    pub source_key: String,
    /// Shop API consumer secret.
    pub source_secret: String,
    /// ERP API base URL.
    pub destination_url: String,
    /// ERP API bearer token.
    pub destination_token: String,
    /// Path of the SQLite ledger database.
    pub ledger_path: PathBuf,
    /// Path of the append-only audit trail.
    pub audit_path: PathBuf,
    /// Default order status filter.
    pub status: String,
    pub retry: RetryConfig,
    pub rate_limit: RateLimitConfig,
}

impl SyncConfig {
    /// Load configuration from `STORESYNC_*` environment variables.
    ///
    /// Fails with a single `Config` error naming every missing variable,
    /// so operators fix them in one pass.
    pub fn from_env() -> SyncResult<Self> {
        let mut missing = Vec::new();

        let mut require = |name: &str| -> String {
            match std::env::var(name) {
                Ok(v) if !v.is_empty() => v,
                _ => {
                    missing.push(name.to_string());
                    String::new()
                }
            }
        };

        let source_url = require("STORESYNC_SOURCE_URL");
        let source_key = require("STORESYNC_SOURCE_KEY");
        let source_secret = require("STORESYNC_SOURCE_SECRET");
        let destination_url = require("STORESYNC_DEST_URL");
        let destination_token = require("STORESYNC_DEST_TOKEN");

        if !missing.is_empty() {
            return Err(SyncError::config(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }

        let ledger_path = std::env::var("STORESYNC_LEDGER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("storesync.db"));
        let audit_path = std::env::var("STORESYNC_AUDIT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("storesync_audit.csv"));
        let status = std::env::var("STORESYNC_STATUS")
            .unwrap_or_else(|_| "processing".to_string());

        Ok(Self {
            source_url,
            source_key,
            source_secret,
            destination_url,
            destination_token,
            ledger_path,
            audit_path,
            status,
            retry: RetryConfig::default(),
            rate_limit: RateLimitConfig::default(),
        })
    }
}
