//! Sync run orchestration.
//!
//! Orders are processed sequentially and independently: a per-order
//! failure is audited and the run continues, while a source-fetch or
//! ledger failure aborts the whole run. The ledger is marked strictly
//! after the destination confirms the write, so a crash in between can
//! produce at most one destination-side duplicate per order on retry.

use std::sync::Arc;

use chrono::Utc;
use storesync_audit::{AuditLog, AuditOutcome};
use storesync_clients::{DestinationClient, OrderFilter, SourceClient};
use storesync_core::{RunId, SyncError, SyncResult};
use storesync_customers::{transform_customer, validate_customer};
use storesync_ledger::SyncLedger;
use storesync_orders::{PartnerLookup, SourceOrder, transform_order, validate_order};

/// Aggregate counts of one run. Always reflects the work actually
/// committed before any fatal abort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: u64,
    pub succeeded: u64,
    pub ignored: u64,
    pub failed: u64,
}

impl core::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "processed={} succeeded={} ignored={} failed={}",
            self.processed, self.succeeded, self.ignored, self.failed
        )
    }
}

enum OrderOutcome {
    Synced(u64),
    AlreadySynced,
}

/// Orchestrates one sync run over the collaborator boundary.
pub struct SyncManager {
    source: Arc<dyn SourceClient>,
    destination: Arc<dyn DestinationClient>,
    lookup: Arc<dyn PartnerLookup>,
    ledger: SyncLedger,
    audit: AuditLog,
}

impl SyncManager {
    pub fn new(
        source: Arc<dyn SourceClient>,
        destination: Arc<dyn DestinationClient>,
        lookup: Arc<dyn PartnerLookup>,
        ledger: SyncLedger,
        audit: AuditLog,
    ) -> Self {
        Self {
            source,
            destination,
            lookup,
            ledger,
            audit,
        }
    }

    /// Run one order sync pass over everything matching `filter`.
    pub async fn run(&self, filter: &OrderFilter) -> SyncResult<RunSummary> {
        let run_id = RunId::new();
        tracing::info!(%run_id, status = %filter.status, since = ?filter.since, "starting order sync");

        let orders = self.source.fetch_pending(filter).await?;
        tracing::info!(%run_id, count = orders.len(), "fetched candidate orders");

        let mut summary = RunSummary::default();
        for order in &orders {
            summary.processed += 1;
            let order_id = order.id.to_string();

            match self.process_order(order).await {
                Ok(OrderOutcome::Synced(destination_id)) => {
                    summary.succeeded += 1;
                    self.record(
                        &order_id,
                        AuditOutcome::Success,
                        &format!("created as {destination_id}"),
                    );
                }
                Ok(OrderOutcome::AlreadySynced) => {
                    summary.ignored += 1;
                    tracing::debug!(%run_id, order_id, "order already synced");
                    self.record(&order_id, AuditOutcome::Ignored, "already synced");
                }
                Err(err) if err.is_fatal() => {
                    // The summary still reflects the work committed
                    // before the abort.
                    tracing::error!(%run_id, order_id, error = %err, %summary, "fatal error, aborting run");
                    return Err(err);
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::warn!(%run_id, order_id, error = %err, "order skipped");
                    self.record(&order_id, AuditOutcome::Error, &err.to_string());
                }
            }
        }

        tracing::info!(%run_id, %summary, "order sync finished");
        Ok(summary)
    }

    /// Incremental run: fetch only orders created since the last
    /// completed run, then advance the watermark to this run's start.
    ///
    /// The watermark moves to the run *start* time, so records created
    /// while the run was in flight are fetched again next time instead
    /// of being skipped.
    pub async fn run_incremental(&self, status: &str) -> SyncResult<RunSummary> {
        let started_at = Utc::now();

        let mut filter = OrderFilter::status(status);
        if let Some(watermark) = self.ledger.last_synced_at().await? {
            filter = filter.with_since(watermark);
        }

        let summary = self.run(&filter).await?;
        self.ledger.set_last_synced_at(started_at).await?;
        Ok(summary)
    }

    /// Push customers to the destination.
    ///
    /// Customers are not ledgered; the destination is expected to upsert
    /// on its own key. Audit ids carry a `customer:` prefix to keep the
    /// trail unambiguous.
    pub async fn sync_customers(&self) -> SyncResult<RunSummary> {
        let run_id = RunId::new();
        tracing::info!(%run_id, "starting customer sync");

        let customers = self.source.fetch_customers().await?;
        tracing::info!(%run_id, count = customers.len(), "fetched customers");

        let mut summary = RunSummary::default();
        for customer in &customers {
            summary.processed += 1;
            let audit_id = format!("customer:{}", customer.id);

            let outcome = async {
                validate_customer(customer)?;
                let partner = transform_customer(customer);
                self.destination.create_customer(&partner).await
            }
            .await;

            match outcome {
                Ok(destination_id) => {
                    summary.succeeded += 1;
                    self.record(
                        &audit_id,
                        AuditOutcome::Success,
                        &format!("created as {destination_id}"),
                    );
                }
                Err(err) if err.is_fatal() => {
                    tracing::error!(%run_id, audit_id, error = %err, %summary, "fatal error, aborting run");
                    return Err(err);
                }
                Err(err) => {
                    summary.failed += 1;
                    tracing::warn!(%run_id, audit_id, error = %err, "customer skipped");
                    self.record(&audit_id, AuditOutcome::Error, &err.to_string());
                }
            }
        }

        tracing::info!(%run_id, %summary, "customer sync finished");
        Ok(summary)
    }

    /// The per-order pipeline. Non-fatal errors bubble to the caller's
    /// boundary where they become audit records.
    async fn process_order(&self, order: &SourceOrder) -> SyncResult<OrderOutcome> {
        let order_id = order.id.to_string();

        if self.ledger.exists(&order_id).await? {
            return Ok(OrderOutcome::AlreadySynced);
        }

        validate_order(order)?;

        let partner_ref = self.lookup.resolve(order.customer_id).ok_or_else(|| {
            SyncError::validation(format!(
                "no destination partner for customer {}",
                order.customer_id
            ))
        })?;

        let destination_order = transform_order(order, &partner_ref);
        let destination_id = self.destination.create_order(&destination_order).await?;

        // Mark only after the destination confirmed the write.
        self.ledger.mark(&order_id).await?;

        Ok(OrderOutcome::Synced(destination_id))
    }

    /// Append an audit record. An append failure is logged on its own
    /// channel and never masks the sync outcome it was recording.
    fn record(&self, order_id: &str, outcome: AuditOutcome, message: &str) {
        if let Err(err) = self.audit.append(order_id, outcome, message) {
            tracing::error!(order_id, %outcome, error = %err, "audit append failed");
        }
    }
}
