//! storesync binary: `storesync [sync|sync-customers|purge]`.

use std::sync::Arc;

use anyhow::{Context, bail};
use storesync_audit::AuditLog;
use storesync_clients::{ErpClient, ShopClient};
use storesync_core::SyncConfig;
use storesync_ledger::SyncLedger;
use storesync_orders::IdentityLookup;
use storesync_sync::SyncManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    storesync_observability::init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "sync".to_string());

    let config = SyncConfig::from_env().context("loading configuration")?;
    let ledger = SyncLedger::open(&config.ledger_path)
        .await
        .context("opening sync ledger")?;

    match command.as_str() {
        "sync" => {
            let manager = build_manager(&config, ledger);
            let summary = manager
                .run_incremental(&config.status)
                .await
                .context("order sync failed")?;
            tracing::info!(%summary, "order sync complete");
        }
        "sync-customers" => {
            let manager = build_manager(&config, ledger);
            let summary = manager
                .sync_customers()
                .await
                .context("customer sync failed")?;
            tracing::info!(%summary, "customer sync complete");
        }
        "purge" => {
            ledger.purge().await.context("purging ledger")?;
            tracing::info!("ledger purged");
        }
        other => {
            bail!("unknown command {other:?}; expected sync, sync-customers or purge");
        }
    }

    Ok(())
}

fn build_manager(config: &SyncConfig, ledger: SyncLedger) -> SyncManager {
    SyncManager::new(
        Arc::new(ShopClient::new(config)),
        Arc::new(ErpClient::new(config)),
        Arc::new(IdentityLookup),
        ledger,
        AuditLog::new(config.audit_path.clone()),
    )
}
