//! Pending-transaction tracker
//!
//! Thread-safe, hash-keyed storage for locally submitted transactions.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use super::types::{PendingTransaction, PendingTxStatus};
use crate::rpc::client::RpcClient;
use crate::rpc::pending_nonce::PendingNonceProvider;
use crate::rpc::pending_tx::PendingTransactionSource;
use crate::rpc::types::RpcError;
use crate::util::{format_hex_quantity, normalize_address};

/// Tracker for locally submitted transactions.
/// Uses DashMap for thread-safe concurrent access; keyed by tx hash.
pub struct PendingTxTracker {
    transactions: DashMap<String, PendingTransaction>,
}

impl PendingTxTracker {
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
        }
    }

    /// Register a freshly submitted transaction. The hash key is normalized
    /// so lookups are case-insensitive.
    pub fn register(&self, mut tx: PendingTransaction) -> String {
        tx.hash = tx.hash.to_lowercase();
        tx.tx_params.from = normalize_address(&tx.tx_params.from);
        let hash = tx.hash.clone();
        log::info!(
            "[TxTracker] Tracking transaction {} (nonce {})",
            hash,
            tx.tx_params.nonce
        );
        self.transactions.insert(hash.clone(), tx);
        hash
    }

    /// Get a transaction by hash
    pub fn by_hash(&self, hash: &str) -> Option<PendingTransaction> {
        self.transactions
            .get(&hash.to_lowercase())
            .map(|r| r.clone())
    }

    /// List transactions still awaiting confirmation
    pub fn list_submitted(&self) -> Vec<PendingTransaction> {
        self.transactions
            .iter()
            .filter(|r| r.value().status == PendingTxStatus::Submitted)
            .map(|r| r.value().clone())
            .collect()
    }

    /// Next usable nonce for an address: one past the highest locally
    /// pending nonce, but never below the network's own count.
    pub fn next_nonce(&self, address: &str, network_count: u64) -> u64 {
        let address = normalize_address(address);
        let highest_pending = self
            .transactions
            .iter()
            .filter(|r| {
                r.value().status == PendingTxStatus::Submitted
                    && r.value().tx_params.from == address
            })
            .map(|r| r.value().tx_params.nonce)
            .max();

        match highest_pending {
            Some(nonce) => network_count.max(nonce + 1),
            None => network_count,
        }
    }

    /// Mark a transaction confirmed
    pub fn mark_confirmed(&self, hash: &str) -> bool {
        if let Some(mut tx) = self.transactions.get_mut(&hash.to_lowercase()) {
            log::info!("[TxTracker] Transaction {} confirmed", hash);
            tx.status = PendingTxStatus::Confirmed;
            tx.confirmed_at = Some(Utc::now());
            true
        } else {
            false
        }
    }

    /// Mark a transaction dropped
    pub fn mark_dropped(&self, hash: &str) -> bool {
        if let Some(mut tx) = self.transactions.get_mut(&hash.to_lowercase()) {
            log::warn!("[TxTracker] Transaction {} dropped by the network", hash);
            tx.status = PendingTxStatus::Dropped;
            true
        } else {
            false
        }
    }

    /// Mark a transaction failed with error
    pub fn mark_failed(&self, hash: &str, error: &str) -> bool {
        if let Some(mut tx) = self.transactions.get_mut(&hash.to_lowercase()) {
            log::warn!("[TxTracker] Transaction {} failed: {}", hash, error);
            tx.status = PendingTxStatus::Failed;
            tx.error = Some(error.to_string());
            true
        } else {
            false
        }
    }

    /// Remove terminal transactions older than the given age
    pub fn prune_terminal(&self, max_age_hours: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::hours(max_age_hours);
        let stale: Vec<String> = self
            .transactions
            .iter()
            .filter(|r| {
                let tx = r.value();
                matches!(
                    tx.status,
                    PendingTxStatus::Confirmed | PendingTxStatus::Dropped | PendingTxStatus::Failed
                ) && tx.submitted_at < cutoff
            })
            .map(|r| r.key().clone())
            .collect();

        let count = stale.len();
        for hash in stale {
            self.transactions.remove(&hash);
        }

        if count > 0 {
            log::info!("[TxTracker] Pruned {} settled transactions", count);
        }
        count
    }

    pub fn count(&self) -> usize {
        self.transactions.len()
    }
}

impl Default for PendingTxTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingTransactionSource for PendingTxTracker {
    fn pending_transaction_by_hash(&self, hash: &str) -> Option<PendingTransaction> {
        self.by_hash(hash)
            .filter(|tx| tx.status == PendingTxStatus::Submitted)
    }
}

/// Pending-nonce provider backed by the tracker plus the upstream node's
/// confirmed count.
pub struct PendingNonceOracle {
    tracker: Arc<PendingTxTracker>,
    client: Arc<RpcClient>,
}

impl PendingNonceOracle {
    pub fn new(tracker: Arc<PendingTxTracker>, client: Arc<RpcClient>) -> Self {
        Self { tracker, client }
    }
}

#[async_trait]
impl PendingNonceProvider for PendingNonceOracle {
    async fn pending_nonce(&self, address: &str) -> Result<String, RpcError> {
        let network_count = self.client.transaction_count(address, "latest").await?;
        let nonce = self.tracker.next_nonce(address, network_count);
        Ok(format_hex_quantity(nonce as u128))
    }
}
