//! Send-transaction workflow.
//!
//! Holds the draft being composed (recipient, amount, asset, gas), validates
//! it after every mutation, and projects a view model the UI renders. On
//! submit the draft is signed through the external transaction service and
//! handed to the pending tracker.

mod flow;
mod types;
mod view;

#[cfg(test)]
mod flow_tests;

pub use flow::{SendFlowManager, TransactionSigner};
pub use types::{
    Account, AmountMode, Asset, AssetKind, DraftTransaction, SendError, SendStage, SendStatus,
    SendWarning, TokenDetails, TransactionEnvelope, MIN_GAS_LIMIT,
};
pub use view::{GasInputMode, SendViewModel};
