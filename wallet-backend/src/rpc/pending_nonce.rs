//! Shim answering `eth_getTransactionCount` for the pending block tag.
//!
//! The UI asks for the pending count when building a transaction; answering
//! from local state keeps consecutive submissions from reusing a nonce while
//! earlier ones are still in flight. Every other method or block tag passes
//! through untouched.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::pipeline::RpcMiddleware;
use super::types::{RpcError, RpcRequest};

/// Supplies the next usable nonce for an address, hex encoded.
#[async_trait]
pub trait PendingNonceProvider: Send + Sync {
    async fn pending_nonce(&self, address: &str) -> Result<String, RpcError>;
}

pub struct PendingNonceMiddleware {
    provider: Arc<dyn PendingNonceProvider>,
}

impl PendingNonceMiddleware {
    pub fn new(provider: Arc<dyn PendingNonceProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl RpcMiddleware for PendingNonceMiddleware {
    fn name(&self) -> &'static str {
        "pending-nonce"
    }

    async fn handle(&self, req: &RpcRequest) -> Result<Option<Value>, RpcError> {
        if req.method != "eth_getTransactionCount" {
            return Ok(None);
        }
        let (Some(address), Some(tag)) = (req.param_str(0), req.param_str(1)) else {
            return Ok(None);
        };
        if tag != "pending" {
            return Ok(None);
        }

        let nonce = self.provider.pending_nonce(address).await?;
        Ok(Some(Value::String(nonce)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedNonce(&'static str);

    #[async_trait]
    impl PendingNonceProvider for FixedNonce {
        async fn pending_nonce(&self, _address: &str) -> Result<String, RpcError> {
            Ok(self.0.to_string())
        }
    }

    fn request(method: &str, params: Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn answers_pending_block_tag() {
        let mw = PendingNonceMiddleware::new(Arc::new(FixedNonce("0x7")));
        let req = request("eth_getTransactionCount", json!(["0xabc", "pending"]));

        let result = mw.handle(&req).await.unwrap();
        assert_eq!(result, Some(Value::String("0x7".to_string())));
    }

    #[tokio::test]
    async fn other_block_tags_pass_through() {
        let mw = PendingNonceMiddleware::new(Arc::new(FixedNonce("0x7")));

        for tag in ["latest", "earliest", "0x10"] {
            let req = request("eth_getTransactionCount", json!(["0xabc", tag]));
            assert_eq!(mw.handle(&req).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn other_methods_pass_through() {
        let mw = PendingNonceMiddleware::new(Arc::new(FixedNonce("0x7")));
        let req = request("eth_blockNumber", json!([]));
        assert_eq!(mw.handle(&req).await.unwrap(), None);
    }

    #[tokio::test]
    async fn malformed_params_pass_through() {
        let mw = PendingNonceMiddleware::new(Arc::new(FixedNonce("0x7")));
        let req = request("eth_getTransactionCount", json!(["0xabc"]));
        assert_eq!(mw.handle(&req).await.unwrap(), None);
    }
}
