//! Keyring service client.
//!
//! Signing and key management live in an external keyring service; this
//! process only prepares transaction parameters and hands them over. The
//! client implements the send flow's `TransactionSigner` seam.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::pending::TxParams;
use crate::send::TransactionSigner;

pub struct RemoteSigner {
    http: reqwest::Client,
    url: String,
}

impl RemoteSigner {
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SignResponse {
    success: bool,
    #[serde(default)]
    hash: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl TransactionSigner for RemoteSigner {
    async fn sign_and_submit(&self, params: &TxParams, chain_id: u64) -> Result<String, String> {
        let body = json!({
            "chain_id": chain_id,
            "params": params,
        });

        let resp = self
            .http
            .post(format!("{}/sign-and-submit", self.url))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("Keyring service unreachable: {}", e))?;

        if !resp.status().is_success() {
            return Err(format!("Keyring service returned {}", resp.status()));
        }

        let parsed: SignResponse = resp
            .json()
            .await
            .map_err(|e| format!("Malformed keyring response: {}", e))?;

        if !parsed.success {
            return Err(parsed
                .error
                .unwrap_or_else(|| "Keyring service rejected the transaction".to_string()));
        }
        parsed
            .hash
            .ok_or_else(|| "Keyring response missing transaction hash".to_string())
    }
}
