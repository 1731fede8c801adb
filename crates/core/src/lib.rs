//! `storesync-core` — shared primitives for the sync pipeline.
//!
//! This crate contains the error taxonomy, run identifiers and the
//! configuration struct. It has no I/O of its own.

pub mod config;
pub mod error;
pub mod id;

pub use config::{RateLimitConfig, RetryConfig, SyncConfig};
pub use error::{SyncError, SyncResult};
pub use id::RunId;
