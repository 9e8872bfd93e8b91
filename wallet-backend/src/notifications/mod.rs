//! Notification syncing.
//!
//! Fetches the two raw feeds, normalizes them through `notification-types`,
//! overlays locally persisted read state, and pushes the merged list to the
//! UI. Syncs are serialized by a status mutex so the UI can render a
//! "refreshing" indicator without blocking.

pub mod service;
pub mod worker;

pub use service::{MarkReadItem, NotificationService};
