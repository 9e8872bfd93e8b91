//! Integration tests for the send flow: drive the manager through the same
//! sequence of mutations the UI performs and check the projected views, the
//! pending tracker, and the RPC shims all agree.

use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::gas::GasFeeEstimator;
use crate::gateway::EventBroadcaster;
use crate::pending::PendingTxTracker;
use crate::rpc::pending_nonce::PendingNonceProvider;
use crate::rpc::pending_tx::PendingTxMiddleware;
use crate::rpc::pipeline::RpcMiddleware;
use crate::rpc::types::{RpcError, RpcRequest};
use crate::send::{
    Account, AmountMode, SendFlowManager, SendStage, SendStatus, TransactionSigner,
};
use crate::util::format_hex_quantity;

/// Emulates the pending-nonce oracle with a fixed network count, still
/// consulting the real tracker for locally pending submissions.
struct StubNonceProvider {
    tracker: Arc<PendingTxTracker>,
    network_count: u64,
}

#[async_trait]
impl PendingNonceProvider for StubNonceProvider {
    async fn pending_nonce(&self, address: &str) -> Result<String, RpcError> {
        let nonce = self.tracker.next_nonce(address, self.network_count);
        Ok(format_hex_quantity(nonce as u128))
    }
}

struct MockSigner {
    hash: String,
    calls: AtomicUsize,
}

impl MockSigner {
    fn new(hash: &str) -> Self {
        Self {
            hash: hash.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TransactionSigner for MockSigner {
    async fn sign_and_submit(
        &self,
        params: &crate::pending::TxParams,
        _chain_id: u64,
    ) -> Result<String, String> {
        assert!(!params.from.is_empty());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        // Distinct hash per submission.
        Ok(format!("{}{:02x}", self.hash, call))
    }
}

struct Harness {
    manager: SendFlowManager,
    tracker: Arc<PendingTxTracker>,
    signer: Arc<MockSigner>,
}

fn harness() -> Harness {
    let estimator = Arc::new(GasFeeEstimator::new());
    estimator.record_sample(1_000_000_000);

    let tracker = Arc::new(PendingTxTracker::new());
    let signer = Arc::new(MockSigner::new("0xAB12CD34"));
    let broadcaster = Arc::new(EventBroadcaster::new(CancellationToken::new()));

    let manager = SendFlowManager::new(
        estimator,
        Arc::new(StubNonceProvider {
            tracker: tracker.clone(),
            network_count: 5,
        }),
        signer.clone(),
        tracker.clone(),
        broadcaster,
        1,
    );

    Harness {
        manager,
        tracker,
        signer,
    }
}

fn funded_account() -> Account {
    Account {
        address: "0x00AA00aa00aa00aa00aa00aa00aa00aa00aa00aa".to_string(),
        balance: "1000000000000000000".to_string(),
    }
}

const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";

#[tokio::test]
async fn happy_path_from_draft_to_pending_transaction() {
    let h = harness();

    let view = h.manager.begin_new_draft(funded_account(), false);
    assert_eq!(view.stage, SendStage::AddRecipient);
    assert!(!view.can_submit);

    let view = h.manager.update_recipient(RECIPIENT, "alice").unwrap();
    assert_eq!(view.stage, SendStage::Draft);

    let view = h.manager.update_amount("250000000000000000").unwrap();
    assert_eq!(view.status, SendStatus::Valid);
    assert!(view.can_submit);

    let receipt = h.manager.submit().await.unwrap();
    assert_eq!(receipt.hash, "0xab12cd3400");
    assert_eq!(h.signer.calls.load(Ordering::SeqCst), 1);

    // The tracker owns the pending entry now, with the stubbed nonce.
    let pending = h.tracker.by_hash(&receipt.hash).unwrap();
    assert_eq!(pending.tx_params.nonce, 5);
    assert_eq!(pending.tx_params.to.as_deref(), Some(RECIPIENT));
    assert_eq!(pending.tx_params.value, "250000000000000000");

    // The flow returned to inactive.
    let view = h.manager.view();
    assert_eq!(view.stage, SendStage::Inactive);
    assert!(!view.is_submitting);
}

#[tokio::test]
async fn submitted_transaction_is_served_by_the_rpc_shim() {
    let h = harness();
    h.manager.begin_new_draft(funded_account(), false);
    h.manager.update_recipient(RECIPIENT, "").unwrap();
    h.manager.update_amount("1000").unwrap();
    let receipt = h.manager.submit().await.unwrap();

    let shim = PendingTxMiddleware::new(h.tracker.clone());
    let req = RpcRequest {
        jsonrpc: "2.0".to_string(),
        id: json!(1),
        method: "eth_getTransactionByHash".to_string(),
        params: json!([receipt.hash]),
    };

    let result = shim.handle(&req).await.unwrap().unwrap();
    assert_eq!(result["hash"], receipt.hash);
    assert!(result["blockNumber"].is_null());
    assert_eq!(result["nonce"], "0x5");
}

#[tokio::test]
async fn consecutive_submissions_get_consecutive_nonces() {
    let h = harness();

    for expected_nonce in [5u64, 6] {
        h.manager.begin_new_draft(funded_account(), false);
        h.manager.update_recipient(RECIPIENT, "").unwrap();
        h.manager.update_amount("1000").unwrap();
        let receipt = h.manager.submit().await.unwrap();
        let pending = h.tracker.by_hash(&receipt.hash).unwrap();
        assert_eq!(pending.tx_params.nonce, expected_nonce);
    }
}

#[tokio::test]
async fn invalid_draft_is_refused() {
    let h = harness();
    h.manager.begin_new_draft(funded_account(), false);
    // No recipient yet.
    let err = h.manager.submit().await.unwrap_err();
    assert!(err.contains("not valid"));
    assert_eq!(h.signer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn mutations_without_a_draft_are_rejected() {
    let h = harness();
    assert!(h.manager.update_amount("1").is_err());
    assert!(h.manager.update_recipient(RECIPIENT, "").is_err());

    h.manager.begin_new_draft(funded_account(), false);
    h.manager.reset();
    assert!(h.manager.update_amount("1").is_err());
}

#[tokio::test]
async fn max_mode_follows_gas_changes() {
    let h = harness();
    h.manager.begin_new_draft(funded_account(), false);
    h.manager.update_recipient(RECIPIENT, "").unwrap();

    let view = h.manager.update_amount_mode(AmountMode::Max).unwrap();
    let max_with_estimate: u128 = view.amount.unwrap().parse().unwrap();

    // Doubling the gas price shrinks the max amount.
    let view = h
        .manager
        .update_gas(None, Some("2000000000"), None, None)
        .unwrap();
    let max_with_manual: u128 = view.amount.unwrap().parse().unwrap();
    assert!(max_with_manual < max_with_estimate);
    assert_eq!(view.amount_mode, AmountMode::Max);
}
