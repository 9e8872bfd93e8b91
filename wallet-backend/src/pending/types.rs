//! Pending-transaction data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a locally tracked transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingTxStatus {
    /// Accepted by the node, not yet included in a block
    Submitted,
    /// Confirmed on-chain
    Confirmed,
    /// No longer known to the node (replaced or evicted)
    Dropped,
    /// Submission or confirmation failed
    Failed,
}

impl std::fmt::Display for PendingTxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingTxStatus::Submitted => write!(f, "submitted"),
            PendingTxStatus::Confirmed => write!(f, "confirmed"),
            PendingTxStatus::Dropped => write!(f, "dropped"),
            PendingTxStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PendingTxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "submitted" => Ok(PendingTxStatus::Submitted),
            "confirmed" => Ok(PendingTxStatus::Confirmed),
            "dropped" => Ok(PendingTxStatus::Dropped),
            "failed" => Ok(PendingTxStatus::Failed),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Parameters of a signed transaction as the UI knows them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxParams {
    /// Sender address (normalized lowercase)
    pub from: String,
    /// Recipient address, absent for contract creation
    pub to: Option<String>,
    /// Value in wei (as string to handle large numbers)
    pub value: String,
    /// Gas limit
    pub gas_limit: String,
    /// Legacy gas price in wei
    pub gas_price: Option<String>,
    /// Max fee per gas in wei (fee-market transactions)
    pub max_fee_per_gas: Option<String>,
    /// Max priority fee per gas in wei (fee-market transactions)
    pub max_priority_fee_per_gas: Option<String>,
    /// Transaction nonce
    pub nonce: u64,
    /// Hex-encoded calldata
    pub data: String,
}

/// A locally submitted transaction awaiting confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Backend identifier, stable across status changes
    pub uuid: String,
    /// Transaction hash (normalized lowercase), the tracker key
    pub hash: String,
    pub chain_id: u64,
    pub tx_params: TxParams,
    pub status: PendingTxStatus,
    /// Error message if failed
    pub error: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl PendingTransaction {
    pub fn new(uuid: String, hash: String, chain_id: u64, tx_params: TxParams) -> Self {
        Self {
            uuid,
            hash,
            chain_id,
            tx_params,
            status: PendingTxStatus::Submitted,
            error: None,
            submitted_at: Utc::now(),
            confirmed_at: None,
        }
    }
}
