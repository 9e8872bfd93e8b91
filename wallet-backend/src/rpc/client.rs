//! HTTP JSON-RPC client for the upstream node.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{RpcError, RpcResponse};
use crate::util::parse_hex_quantity;

pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Issue a single JSON-RPC call and unwrap the result value.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let resp = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| RpcError::upstream(format!("Node request failed: {}", e)))?;

        let parsed: RpcResponse = resp
            .json()
            .await
            .map_err(|e| RpcError::upstream(format!("Malformed node response: {}", e)))?;

        if let Some(err) = parsed.error {
            return Err(err);
        }
        Ok(parsed.result.unwrap_or(Value::Null))
    }

    /// `eth_getTransactionCount` for an address at a block tag, as a number.
    pub async fn transaction_count(&self, address: &str, tag: &str) -> Result<u64, RpcError> {
        let result = self
            .request("eth_getTransactionCount", json!([address, tag]))
            .await?;
        let hex = result
            .as_str()
            .ok_or_else(|| RpcError::upstream("Non-string transaction count"))?;
        parse_hex_quantity(hex)
            .map(|v| v as u64)
            .map_err(RpcError::upstream)
    }

    /// Current `eth_gasPrice` in wei.
    pub async fn gas_price(&self) -> Result<u128, RpcError> {
        let result = self.request("eth_gasPrice", json!([])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| RpcError::upstream("Non-string gas price"))?;
        parse_hex_quantity(hex).map_err(RpcError::upstream)
    }

    /// `eth_getTransactionReceipt`; None until the transaction is included.
    pub async fn transaction_receipt(&self, hash: &str) -> Result<Option<Value>, RpcError> {
        let result = self
            .request("eth_getTransactionReceipt", json!([hash]))
            .await?;
        Ok(if result.is_null() { None } else { Some(result) })
    }

    /// `eth_getTransactionByHash` against the node, bypassing local state.
    pub async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, RpcError> {
        let result = self
            .request("eth_getTransactionByHash", json!([hash]))
            .await?;
        Ok(if result.is_null() { None } else { Some(result) })
    }
}
