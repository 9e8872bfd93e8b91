//! Shim answering `eth_getTransactionByHash` from local pending state.
//!
//! A transaction the user just submitted may not be visible through the node
//! yet. When the requested hash matches a locally pending transaction, the
//! shim formats it into the wire shape (block fields null) and answers;
//! otherwise the request falls through to the node.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::pipeline::RpcMiddleware;
use super::types::{RpcError, RpcRequest, RpcTransaction};
use crate::pending::PendingTransaction;
use crate::util::{format_hex_quantity, parse_wei};

/// Lookup of locally pending transactions by hash.
pub trait PendingTransactionSource: Send + Sync {
    fn pending_transaction_by_hash(&self, hash: &str) -> Option<PendingTransaction>;
}

pub struct PendingTxMiddleware {
    source: Arc<dyn PendingTransactionSource>,
}

impl PendingTxMiddleware {
    pub fn new(source: Arc<dyn PendingTransactionSource>) -> Self {
        Self { source }
    }
}

fn hex_or_zero(decimal_wei: &str) -> String {
    parse_wei(decimal_wei)
        .map(format_hex_quantity)
        .unwrap_or_else(|_| "0x0".to_string())
}

/// Format a tracked transaction into the `eth_getTransactionByHash` result
/// shape for a not-yet-included transaction.
pub fn format_tx_for_rpc(tx: &PendingTransaction) -> RpcTransaction {
    RpcTransaction {
        block_hash: None,
        block_number: None,
        transaction_index: None,
        hash: tx.hash.clone(),
        from: tx.tx_params.from.clone(),
        to: tx.tx_params.to.clone(),
        value: hex_or_zero(&tx.tx_params.value),
        gas: hex_or_zero(&tx.tx_params.gas_limit),
        gas_price: tx.tx_params.gas_price.as_deref().map(hex_or_zero),
        max_fee_per_gas: tx.tx_params.max_fee_per_gas.as_deref().map(hex_or_zero),
        max_priority_fee_per_gas: tx
            .tx_params
            .max_priority_fee_per_gas
            .as_deref()
            .map(hex_or_zero),
        nonce: format_hex_quantity(tx.tx_params.nonce as u128),
        input: tx.tx_params.data.clone(),
    }
}

#[async_trait]
impl RpcMiddleware for PendingTxMiddleware {
    fn name(&self) -> &'static str {
        "pending-tx"
    }

    async fn handle(&self, req: &RpcRequest) -> Result<Option<Value>, RpcError> {
        if req.method != "eth_getTransactionByHash" {
            return Ok(None);
        }
        let Some(hash) = req.param_str(0) else {
            return Ok(None);
        };

        match self.source.pending_transaction_by_hash(hash) {
            Some(tx) => {
                let formatted = serde_json::to_value(format_tx_for_rpc(&tx))
                    .map_err(|e| RpcError::internal(e.to_string()))?;
                Ok(Some(formatted))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pending::{PendingTxStatus, TxParams};
    use serde_json::json;

    struct OneTx(PendingTransaction);

    impl PendingTransactionSource for OneTx {
        fn pending_transaction_by_hash(&self, hash: &str) -> Option<PendingTransaction> {
            (self.0.hash == hash.to_lowercase()).then(|| self.0.clone())
        }
    }

    fn pending_tx() -> PendingTransaction {
        let mut tx = PendingTransaction::new(
            "uuid-1".to_string(),
            "0xaa11".to_string(),
            1,
            TxParams {
                from: "0x1111".to_string(),
                to: Some("0x2222".to_string()),
                value: "1000000000000000".to_string(),
                gas_limit: "21000".to_string(),
                gas_price: Some("1000000000".to_string()),
                max_fee_per_gas: None,
                max_priority_fee_per_gas: None,
                nonce: 7,
                data: "0x".to_string(),
            },
        );
        tx.status = PendingTxStatus::Submitted;
        tx
    }

    fn request(hash: &str) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            method: "eth_getTransactionByHash".to_string(),
            params: json!([hash]),
        }
    }

    #[tokio::test]
    async fn known_hash_is_served_in_wire_shape() {
        let mw = PendingTxMiddleware::new(Arc::new(OneTx(pending_tx())));
        let result = mw.handle(&request("0xAA11")).await.unwrap().unwrap();

        assert!(result["blockHash"].is_null());
        assert!(result["blockNumber"].is_null());
        assert!(result["transactionIndex"].is_null());
        assert_eq!(result["hash"], "0xaa11");
        assert_eq!(result["value"], "0x38d7ea4c68000");
        assert_eq!(result["gas"], "0x5208");
        assert_eq!(result["gasPrice"], "0x3b9aca00");
        assert_eq!(result["nonce"], "0x7");
    }

    #[tokio::test]
    async fn unknown_hash_passes_through() {
        let mw = PendingTxMiddleware::new(Arc::new(OneTx(pending_tx())));
        assert_eq!(mw.handle(&request("0xdead")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn other_methods_pass_through() {
        let mw = PendingTxMiddleware::new(Arc::new(OneTx(pending_tx())));
        let req = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: json!(1),
            method: "eth_getTransactionCount".to_string(),
            params: json!(["0xaa11", "pending"]),
        };
        assert_eq!(mw.handle(&req).await.unwrap(), None);
    }
}
