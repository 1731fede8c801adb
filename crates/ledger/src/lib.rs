//! `storesync-ledger` — durable record of already-synced source orders.
//!
//! SQLite-backed. The primary key on `order_id` is the sole mechanism
//! preventing duplicate submissions across runs: `mark` uses
//! `INSERT OR IGNORE`, so marking an already-marked id is a no-op, and
//! two concurrent markers of the same id cannot both insert.
//!
//! The same database carries the incremental-sync watermark in a small
//! key/value table.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use storesync_core::{SyncError, SyncResult};

const WATERMARK_KEY: &str = "last_synced_at";

/// SQLite-backed sync ledger.
///
/// Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct SyncLedger {
    pool: SqlitePool,
}

impl SyncLedger {
    /// Open (creating if necessary) the ledger database at `path`.
    pub async fn open(path: &Path) -> SyncResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SyncError::ledger(format!("creating ledger directory {parent:?}: {e}"))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| SyncError::ledger(format!("opening ledger at {path:?}: {e}")))?;

        Self::init(pool).await
    }

    /// Open an in-memory ledger (tests, dry runs).
    ///
    /// Pinned to a single pooled connection that never idles out: every
    /// `:memory:` connection is its own database, so the pool must not
    /// open a second one or drop the first.
    pub async fn open_in_memory() -> SyncResult<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| SyncError::ledger(format!("opening in-memory ledger: {e}")))?;
        Self::init(pool).await
    }

    async fn init(pool: SqlitePool) -> SyncResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS synced_orders (
                order_id  TEXT PRIMARY KEY,
                synced_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| SyncError::ledger(format!("creating synced_orders table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sync_state (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| SyncError::ledger(format!("creating sync_state table: {e}")))?;

        Ok(Self { pool })
    }

    /// Close the connection pool. Any later call on this ledger (or a
    /// clone of it) fails with a `Ledger` error.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Whether `order_id` has already been synced.
    pub async fn exists(&self, order_id: &str) -> SyncResult<bool> {
        let row = sqlx::query("SELECT 1 FROM synced_orders WHERE order_id = ?")
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SyncError::ledger(format!("exists({order_id}): {e}")))?;
        Ok(row.is_some())
    }

    /// Record `order_id` as synced. Idempotent: marking an existing id
    /// is a silent no-op.
    pub async fn mark(&self, order_id: &str) -> SyncResult<()> {
        sqlx::query("INSERT OR IGNORE INTO synced_orders (order_id, synced_at) VALUES (?, ?)")
            .bind(order_id)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::ledger(format!("mark({order_id}): {e}")))?;
        Ok(())
    }

    /// Drop every ledger entry. Destructive, out-of-band operation.
    pub async fn purge(&self) -> SyncResult<()> {
        let result = sqlx::query("DELETE FROM synced_orders")
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::ledger(format!("purge: {e}")))?;
        tracing::warn!(purged = result.rows_affected(), "ledger purged");
        Ok(())
    }

    /// Number of ledger entries.
    pub async fn len(&self) -> SyncResult<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM synced_orders")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SyncError::ledger(format!("len: {e}")))?;
        let n: i64 = row.get("n");
        Ok(n as u64)
    }

    pub async fn is_empty(&self) -> SyncResult<bool> {
        Ok(self.len().await? == 0)
    }

    /// Watermark of the last completed incremental run, if any.
    pub async fn last_synced_at(&self) -> SyncResult<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT value FROM sync_state WHERE key = ?")
            .bind(WATERMARK_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| SyncError::ledger(format!("last_synced_at: {e}")))?;

        match row {
            Some(row) => {
                let raw: String = row.get("value");
                let parsed = DateTime::<Utc>::from_str(&raw).map_err(|e| {
                    SyncError::ledger(format!("corrupt watermark {raw:?}: {e}"))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Advance the incremental-sync watermark.
    pub async fn set_last_synced_at(&self, at: DateTime<Utc>) -> SyncResult<()> {
        sqlx::query("INSERT OR REPLACE INTO sync_state (key, value) VALUES (?, ?)")
            .bind(WATERMARK_KEY)
            .bind(at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| SyncError::ledger(format!("set_last_synced_at: {e}")))?;
        Ok(())
    }
}
