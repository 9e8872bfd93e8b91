//! UI push gateway.
//!
//! Popup and notification UI contexts connect over WebSocket and receive
//! typed events (view models, notification updates, transaction status
//! changes) instead of polling. The broadcaster is constructed once at
//! startup and torn down through the shared cancellation token on unload.

pub mod actix_ws;
pub mod events;
pub mod protocol;

pub use events::EventBroadcaster;
pub use protocol::UiEvent;
