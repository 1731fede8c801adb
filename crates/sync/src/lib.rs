//! `storesync-sync` — run orchestration.
//!
//! The manager wires the clients, ledger and audit trail into the
//! per-run pipeline: fetch, dedupe, validate, transform, submit, mark.

pub mod manager;

pub use manager::{RunSummary, SyncManager};
