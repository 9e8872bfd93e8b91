//! Pending-transaction tracking.
//!
//! Transactions submitted locally are tracked here until the node confirms
//! or drops them. The RPC shims consult (but never own) this state so the UI
//! stays consistent with what the user just submitted.

mod types;
mod tracker;
pub mod worker;

pub use tracker::{PendingNonceOracle, PendingTxTracker};
pub use types::{PendingTransaction, PendingTxStatus, TxParams};
