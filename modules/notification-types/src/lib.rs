//! Shared notification model for the wallet backend.
//!
//! The backend consumes two notification feeds with different shapes: the
//! feature-announcement content service (camelCase payloads, no read flag)
//! and the on-chain activity service (snake_case payloads, an `unread`
//! boolean). This crate defines both raw shapes, the single normalized
//! `Notification` the UI renders, and the pure functions that convert
//! between them.

mod process;

pub use process::{
    is_feature_announcement_read, process_feature_announcement, process_notification,
    process_onchain_notification,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a notification, shared by raw and normalized shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    FeaturesAnnouncement,
    EthSent,
    EthReceived,
    Erc20Sent,
    Erc20Received,
    Erc721Sent,
    Erc721Received,
    SwapCompleted,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::FeaturesAnnouncement => write!(f, "features_announcement"),
            NotificationKind::EthSent => write!(f, "eth_sent"),
            NotificationKind::EthReceived => write!(f, "eth_received"),
            NotificationKind::Erc20Sent => write!(f, "erc20_sent"),
            NotificationKind::Erc20Received => write!(f, "erc20_received"),
            NotificationKind::Erc721Sent => write!(f, "erc721_sent"),
            NotificationKind::Erc721Received => write!(f, "erc721_received"),
            NotificationKind::SwapCompleted => write!(f, "swap_completed"),
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "features_announcement" => Ok(NotificationKind::FeaturesAnnouncement),
            "eth_sent" => Ok(NotificationKind::EthSent),
            "eth_received" => Ok(NotificationKind::EthReceived),
            "erc20_sent" => Ok(NotificationKind::Erc20Sent),
            "erc20_received" => Ok(NotificationKind::Erc20Received),
            "erc721_sent" => Ok(NotificationKind::Erc721Sent),
            "erc721_received" => Ok(NotificationKind::Erc721Received),
            "swap_completed" => Ok(NotificationKind::SwapCompleted),
            _ => Err(format!("Unknown notification kind: {}", s)),
        }
    }
}

/// A notification after normalization. Every instance has a string id, a
/// parsed UTC creation time, and a definite read flag, regardless of which
/// feed it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    /// Kind-specific payload, carried through untouched for the UI.
    pub data: Value,
}

/// Body of a feature announcement as served by the content service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAnnouncementData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
}

/// Raw feature-announcement notification. The content service speaks
/// camelCase and carries no read state of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAnnouncementRawNotification {
    pub created_at: String,
    pub data: FeatureAnnouncementData,
}

/// Raw on-chain notification. The activity service speaks snake_case and
/// tracks read state as an `unread` boolean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainRawNotification {
    pub id: String,
    pub trigger_id: String,
    pub kind: NotificationKind,
    pub chain_id: u64,
    pub block_number: u64,
    #[serde(default)]
    pub block_timestamp: Option<String>,
    #[serde(default)]
    pub tx_hash: Option<String>,
    pub unread: bool,
    pub created_at: String,
    pub data: Value,
}

/// Union of the two raw shapes, as received from either feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNotification {
    OnChain(OnChainRawNotification),
    FeatureAnnouncement(FeatureAnnouncementRawNotification),
}
