//! Background worker for pending-transaction confirmation.
//!
//! Polls receipts for every tracked submission, settles entries the node has
//! decided on, keeps the gas estimator fed, and prunes settled history from
//! the in-memory map.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::tracker::PendingTxTracker;
use super::types::PendingTxStatus;
use crate::db::Database;
use crate::gas::GasFeeEstimator;
use crate::gateway::{EventBroadcaster, UiEvent};
use crate::rpc::RpcClient;

/// Settled transactions stay visible in the tracker for this long.
const PRUNE_AFTER_HOURS: i64 = 24;

/// A submitted transaction unknown to the node for this long is dropped.
const DROP_AFTER_SECS: i64 = 600;

pub async fn run_worker(
    tracker: Arc<PendingTxTracker>,
    client: Arc<RpcClient>,
    estimator: Arc<GasFeeEstimator>,
    db: Option<Arc<Database>>,
    broadcaster: Arc<EventBroadcaster>,
    poll_interval_secs: u64,
    shutdown: CancellationToken,
) {
    log::info!(
        "[TxTracker] Confirmation worker started (poll interval: {}s)",
        poll_interval_secs
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(poll_interval_secs)) => {}
        }

        match client.gas_price().await {
            Ok(price) => estimator.record_sample(price),
            Err(e) => log::debug!("[TxTracker] Gas price sample failed: {}", e),
        }

        for tx in tracker.list_submitted() {
            let settled = match client.transaction_receipt(&tx.hash).await {
                Ok(Some(receipt)) => {
                    let reverted = receipt
                        .get("status")
                        .and_then(|s| s.as_str())
                        .map(|s| s == "0x0")
                        .unwrap_or(false);
                    if reverted {
                        tracker.mark_failed(&tx.hash, "Transaction reverted");
                        Some(PendingTxStatus::Failed)
                    } else {
                        tracker.mark_confirmed(&tx.hash);
                        Some(PendingTxStatus::Confirmed)
                    }
                }
                Ok(None) => {
                    // Not mined yet. If the node no longer knows the
                    // transaction at all after a grace period, consider it
                    // dropped.
                    let age = chrono::Utc::now() - tx.submitted_at;
                    if age.num_seconds() > DROP_AFTER_SECS {
                        match client.transaction_by_hash(&tx.hash).await {
                            Ok(None) => {
                                tracker.mark_dropped(&tx.hash);
                                Some(PendingTxStatus::Dropped)
                            }
                            _ => None,
                        }
                    } else {
                        None
                    }
                }
                Err(e) => {
                    log::warn!("[TxTracker] Receipt poll failed for {}: {}", tx.hash, e);
                    None
                }
            };

            if let Some(status) = settled {
                if let Some(db) = &db {
                    let error = (status == PendingTxStatus::Failed).then_some("Transaction reverted");
                    if let Err(e) = db.update_submitted_tx_status(&tx.hash, status, error) {
                        log::error!("[TxTracker] Failed to update DB status: {}", e);
                    }
                }
                broadcaster.try_post(UiEvent::TransactionStatusChanged {
                    hash: tx.hash.clone(),
                    status,
                });
            }
        }

        tracker.prune_terminal(PRUNE_AFTER_HOURS);
    }

    log::info!("[TxTracker] Confirmation worker shutting down");
}
