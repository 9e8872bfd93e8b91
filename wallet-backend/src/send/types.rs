//! Send-flow data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum gas limit for a plain value transfer.
pub const MIN_GAS_LIMIT: u128 = 21_000;

/// Stage the send flow is in. `Inactive` means no send screen is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStage {
    Inactive,
    AddRecipient,
    Draft,
    Edit,
}

/// Whether the current draft can be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendStatus {
    Valid,
    Invalid,
}

/// How the amount field is being set: typed by the user, or computed from
/// balance minus gas when the MAX button is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountMode {
    Input,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Native,
    Token,
}

/// Envelope type the draft will be signed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionEnvelope {
    Legacy,
    FeeMarket,
}

/// Validation failures attached to individual draft fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendError {
    /// Native amount plus gas exceeds the account balance
    InsufficientFunds,
    /// Gas total alone exceeds the native balance
    InsufficientFundsForGas,
    /// Token amount exceeds the token balance
    InsufficientTokens,
    /// Token amount is zero
    NegativeOrZeroAmount,
    /// Recipient is not a valid hex address
    InvalidRecipient,
    /// Recipient is the selected token's own contract
    RecipientIsTokenContract,
    /// Gas limit below the transfer minimum
    GasLimitTooLow,
    /// No gas estimate has loaded yet
    GasEstimateUnavailable,
}

impl std::fmt::Display for SendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SendError::InsufficientFunds => "insufficient_funds",
            SendError::InsufficientFundsForGas => "insufficient_funds_for_gas",
            SendError::InsufficientTokens => "insufficient_tokens",
            SendError::NegativeOrZeroAmount => "negative_or_zero_amount",
            SendError::InvalidRecipient => "invalid_recipient",
            SendError::RecipientIsTokenContract => "recipient_is_token_contract",
            SendError::GasLimitTooLow => "gas_limit_too_low",
            SendError::GasEstimateUnavailable => "gas_estimate_unavailable",
        };
        write!(f, "{}", s)
    }
}

/// Non-blocking advisories surfaced next to the recipient field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendWarning {
    /// Recipient matches a known token contract address
    KnownTokenContract,
}

/// The account funds are sent from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Hex address (normalized lowercase)
    pub address: String,
    /// Native balance in wei (as string to handle large numbers)
    pub balance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDetails {
    pub contract_address: String,
    pub symbol: String,
    pub decimals: u8,
}

/// The asset being sent. `details` is set only for tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub kind: AssetKind,
    /// Balance of this asset held by the sender, in its smallest unit
    pub balance: String,
    pub details: Option<TokenDetails>,
}

impl Asset {
    pub fn native(balance: &str) -> Self {
        Self {
            kind: AssetKind::Native,
            balance: balance.to_string(),
            details: None,
        }
    }

    pub fn token(balance: &str, details: TokenDetails) -> Self {
        Self {
            kind: AssetKind::Token,
            balance: balance.to_string(),
            details: Some(details),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amount {
    /// Amount in the asset's smallest unit (decimal string)
    pub value: String,
    pub error: Option<SendError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub address: String,
    pub nickname: String,
    pub error: Option<SendError>,
    pub warning: Option<SendWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasSettings {
    /// Gas limit (decimal string)
    pub limit: String,
    /// Legacy gas price in wei
    pub price: String,
    /// Fee-market fields, used when the network supports them
    pub max_fee_per_gas: String,
    pub max_priority_fee_per_gas: String,
    /// limit * effective price, recomputed on every gas mutation
    pub total: String,
    pub was_manually_edited: bool,
    pub error: Option<SendError>,
}

/// One line in the draft's mutation log, kept for support diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub entry: String,
}

/// A transaction being composed in the send flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftTransaction {
    pub id: String,
    pub amount: Amount,
    pub asset: Asset,
    pub recipient: Recipient,
    pub gas: GasSettings,
    pub from_account: Option<Account>,
    pub envelope: TransactionEnvelope,
    pub user_input_hex_data: Option<String>,
    pub status: SendStatus,
    pub history: Vec<DraftHistoryEntry>,
}

impl DraftTransaction {
    pub fn new(id: String, envelope: TransactionEnvelope) -> Self {
        Self {
            id,
            amount: Amount {
                value: "0".to_string(),
                error: None,
            },
            asset: Asset::native("0"),
            recipient: Recipient {
                address: String::new(),
                nickname: String::new(),
                error: None,
                warning: None,
            },
            gas: GasSettings {
                limit: MIN_GAS_LIMIT.to_string(),
                price: "0".to_string(),
                max_fee_per_gas: "0".to_string(),
                max_priority_fee_per_gas: "0".to_string(),
                total: "0".to_string(),
                was_manually_edited: false,
                error: None,
            },
            from_account: None,
            envelope,
            user_input_hex_data: None,
            status: SendStatus::Valid,
            history: Vec::new(),
        }
    }

    pub fn log_history(&mut self, entry: impl Into<String>) {
        self.history.push(DraftHistoryEntry {
            timestamp: Utc::now(),
            entry: entry.into(),
        });
    }
}
