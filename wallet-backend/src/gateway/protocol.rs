//! Events pushed to connected UI contexts.

use serde::Serialize;

use crate::pending::PendingTxStatus;
use crate::send::SendViewModel;
use notification_types::Notification;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum UiEvent {
    /// The normalized notification list changed.
    NotificationsUpdated {
        unread_count: usize,
        notifications: Vec<Notification>,
    },
    /// A notification sync started or finished.
    SyncStatusChanged { is_syncing: bool },
    /// The send flow state changed; carries the freshly computed view model.
    SendStateChanged { view: SendViewModel },
    /// A tracked transaction moved to a new status.
    TransactionStatusChanged {
        hash: String,
        status: PendingTxStatus,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::NotificationsUpdated { .. } => "notifications_updated",
            UiEvent::SyncStatusChanged { .. } => "sync_status_changed",
            UiEvent::SendStateChanged { .. } => "send_state_changed",
            UiEvent::TransactionStatusChanged { .. } => "transaction_status_changed",
        }
    }
}
