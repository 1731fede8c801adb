//! `storesync-clients` — remote API collaborators.
//!
//! The sync manager only sees the two traits here. Retry and rate
//! limiting are composed around the HTTP implementations at this
//! boundary, never inside orchestration logic.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use storesync_core::SyncResult;
use storesync_customers::{DestinationCustomer, SourceCustomer};
use storesync_orders::{DestinationOrder, SourceOrder};

pub mod http;
pub mod retry;

pub use http::{ErpClient, ShopClient};
pub use retry::{RateLimiter, RetryPolicy};

/// Read filter for pending source orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: String,
    /// Lower bound on creation time for incremental fetches.
    pub since: Option<DateTime<Utc>>,
}

impl OrderFilter {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            since: None,
        }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }
}

impl Default for OrderFilter {
    fn default() -> Self {
        Self::status("processing")
    }
}

/// Upstream system holding the records to synchronize.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Fetch pending orders matching the filter.
    ///
    /// Transport or auth failures surface as `SyncError::RemoteFetch`.
    async fn fetch_pending(&self, filter: &OrderFilter) -> SyncResult<Vec<SourceOrder>>;

    /// Fetch customers.
    async fn fetch_customers(&self) -> SyncResult<Vec<SourceCustomer>>;
}

/// Downstream system receiving transformed records.
#[async_trait]
pub trait DestinationClient: Send + Sync {
    /// Create an order, returning the destination-assigned id.
    ///
    /// Transport or rejection failures surface as `SyncError::RemoteWrite`.
    async fn create_order(&self, order: &DestinationOrder) -> SyncResult<u64>;

    /// Create a customer, returning the destination-assigned id.
    async fn create_customer(&self, customer: &DestinationCustomer) -> SyncResult<u64>;
}
