//! JSON-RPC plumbing between the in-page provider and the upstream node.
//!
//! Requests from the UI enter an ordered middleware pipeline. Middlewares may
//! answer from locally known pending state (nonce, submitted transactions);
//! anything unanswered is forwarded to the configured node.

pub mod client;
pub mod pending_nonce;
pub mod pending_tx;
pub mod pipeline;
pub mod types;

pub use client::RpcClient;
pub use pending_nonce::PendingNonceMiddleware;
pub use pending_tx::PendingTxMiddleware;
pub use pipeline::{RpcMiddleware, RpcPipeline};
