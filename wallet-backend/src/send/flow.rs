//! Send-flow state machine.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::types::{
    Account, AmountMode, Asset, AssetKind, DraftTransaction, SendError, SendStage, SendStatus,
    SendWarning, TransactionEnvelope, MIN_GAS_LIMIT,
};
use super::view::SendViewModel;
use crate::db::tables::transactions::RecordSubmittedTxRequest;
use crate::db::Database;
use crate::gas::{GasFeeEstimator, GasLevel};
use crate::gateway::{EventBroadcaster, UiEvent};
use crate::lock::StatusMutex;
use crate::pending::{PendingTransaction, PendingTxStatus, PendingTxTracker, TxParams};
use crate::rpc::pending_nonce::PendingNonceProvider;
use crate::util::{is_valid_address, normalize_address, parse_hex_quantity, parse_wei};

/// External transaction service: signs the prepared parameters and
/// broadcasts them, returning the transaction hash. Key material never
/// enters this process.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_and_submit(&self, params: &TxParams, chain_id: u64) -> Result<String, String>;
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubmitReceipt {
    pub uuid: String,
    pub hash: String,
}

struct SendState {
    stage: SendStage,
    amount_mode: AmountMode,
    drafts: HashMap<String, DraftTransaction>,
    current_draft_id: Option<String>,
    selected_account: Account,
}

impl SendState {
    fn initial() -> Self {
        Self {
            stage: SendStage::Inactive,
            amount_mode: AmountMode::Input,
            drafts: HashMap::new(),
            current_draft_id: None,
            selected_account: Account {
                address: String::new(),
                balance: "0".to_string(),
            },
        }
    }

    fn current_draft_mut(&mut self) -> Option<&mut DraftTransaction> {
        let id = self.current_draft_id.as_ref()?;
        self.drafts.get_mut(id)
    }

    fn current_draft(&self) -> Option<&DraftTransaction> {
        let id = self.current_draft_id.as_ref()?;
        self.drafts.get(id)
    }
}

pub struct SendFlowManager {
    state: RwLock<SendState>,
    estimator: Arc<GasFeeEstimator>,
    nonce_provider: Arc<dyn PendingNonceProvider>,
    signer: Arc<dyn TransactionSigner>,
    tracker: Arc<PendingTxTracker>,
    broadcaster: Arc<EventBroadcaster>,
    submit_lock: StatusMutex,
    chain_id: u64,
    db: Option<Arc<Database>>,
    /// Contract addresses the recipient field warns about (normalized)
    known_token_contracts: Vec<String>,
}

impl SendFlowManager {
    pub fn new(
        estimator: Arc<GasFeeEstimator>,
        nonce_provider: Arc<dyn PendingNonceProvider>,
        signer: Arc<dyn TransactionSigner>,
        tracker: Arc<PendingTxTracker>,
        broadcaster: Arc<EventBroadcaster>,
        chain_id: u64,
    ) -> Self {
        Self {
            state: RwLock::new(SendState::initial()),
            estimator,
            nonce_provider,
            signer,
            tracker,
            broadcaster,
            submit_lock: StatusMutex::new(),
            chain_id,
            db: None,
            known_token_contracts: Vec::new(),
        }
    }

    pub fn with_db(mut self, db: Arc<Database>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_known_token_contracts(mut self, contracts: Vec<String>) -> Self {
        self.known_token_contracts = contracts
            .iter()
            .map(|c| normalize_address(c))
            .collect();
        self
    }

    /// Whether a submission is currently in flight.
    pub fn is_submitting(&self) -> bool {
        self.submit_lock.is_locked()
    }

    /// Current view model, without mutating anything.
    pub fn view(&self) -> SendViewModel {
        let state = self.state.read();
        self.project(&state)
    }

    fn project(&self, state: &SendState) -> SendViewModel {
        match state.current_draft() {
            Some(draft) if state.stage != SendStage::Inactive => SendViewModel::project(
                state.stage,
                state.amount_mode,
                draft,
                self.estimator.levels(),
                self.is_submitting(),
            ),
            _ => SendViewModel::inactive(),
        }
    }

    fn broadcast_view(&self, state: &SendState) -> SendViewModel {
        let view = self.project(state);
        self.broadcaster.try_post(UiEvent::SendStateChanged {
            view: view.clone(),
        });
        view
    }

    /// Drop any previous drafts and open a fresh one for the given account.
    pub fn begin_new_draft(&self, account: Account, eip1559_support: bool) -> SendViewModel {
        let mut state = self.state.write();

        let envelope = if eip1559_support {
            TransactionEnvelope::FeeMarket
        } else {
            TransactionEnvelope::Legacy
        };
        let id = uuid::Uuid::new_v4().to_string();
        let mut draft = DraftTransaction::new(id.clone(), envelope);
        draft.asset = Asset::native(&account.balance);
        draft.log_history("Draft created");

        state.drafts.clear();
        state.drafts.insert(id.clone(), draft);
        state.current_draft_id = Some(id);
        state.selected_account = Account {
            address: normalize_address(&account.address),
            balance: account.balance,
        };
        state.amount_mode = AmountMode::Input;
        state.stage = SendStage::AddRecipient;

        // Seed gas from the estimate when one is available.
        if let Some(levels) = self.estimator.levels() {
            if let Some(draft) = state.current_draft_mut() {
                apply_gas_price(draft, levels.average);
            }
        }

        self.validate_current(&mut state);
        log::info!("[SendFlow] New draft started");
        self.broadcast_view(&state)
    }

    /// Copy the current draft into a new one for editing, preserving the
    /// original in the draft map until reset.
    pub fn edit_current_draft(&self) -> Result<SendViewModel, String> {
        let mut state = self.state.write();
        let draft = state
            .current_draft()
            .cloned()
            .ok_or_else(|| "No active draft".to_string())?;

        let id = uuid::Uuid::new_v4().to_string();
        let mut copy = draft;
        copy.id = id.clone();
        copy.log_history("Editing draft");
        state.drafts.insert(id.clone(), copy);
        state.current_draft_id = Some(id);
        state.stage = SendStage::Edit;

        self.validate_current(&mut state);
        Ok(self.broadcast_view(&state))
    }

    /// Return the flow to its initial state.
    pub fn reset(&self) -> SendViewModel {
        let mut state = self.state.write();
        let account = state.selected_account.clone();
        *state = SendState::initial();
        state.selected_account = account;
        log::info!("[SendFlow] Reset");
        self.broadcast_view(&state)
    }

    fn mutate<F>(&self, op: F) -> Result<SendViewModel, String>
    where
        F: FnOnce(&mut SendState, &mut DraftTransaction),
    {
        let mut state = self.state.write();
        if state.current_draft_id.is_none() || state.stage == SendStage::Inactive {
            return Err("No active draft".to_string());
        }

        // Split borrow: take the draft out, mutate, put it back.
        let id = state.current_draft_id.clone().unwrap_or_default();
        let mut draft = state
            .drafts
            .remove(&id)
            .ok_or_else(|| "No active draft".to_string())?;
        op(&mut state, &mut draft);
        state.drafts.insert(id, draft);

        self.validate_current(&mut state);
        Ok(self.broadcast_view(&state))
    }

    /// Set the recipient; a non-empty address advances AddRecipient → Draft.
    pub fn update_recipient(
        &self,
        address: &str,
        nickname: &str,
    ) -> Result<SendViewModel, String> {
        let address = normalize_address(address);
        let nickname = nickname.to_string();
        self.mutate(|state, draft| {
            draft.recipient.address = address.clone();
            draft.recipient.nickname = nickname.clone();
            draft.log_history(format!("Recipient set to {}", address));
            if state.stage == SendStage::AddRecipient && !address.is_empty() {
                state.stage = SendStage::Draft;
            }
        })
    }

    pub fn update_amount(&self, value: &str) -> Result<SendViewModel, String> {
        let value = value.to_string();
        self.mutate(|state, draft| {
            state.amount_mode = AmountMode::Input;
            draft.amount.value = value.clone();
            draft.log_history(format!("Amount set to {}", value));
        })
    }

    pub fn update_amount_mode(&self, mode: AmountMode) -> Result<SendViewModel, String> {
        self.mutate(|state, draft| {
            state.amount_mode = mode;
            if mode == AmountMode::Max {
                set_amount_to_max(draft);
                draft.log_history("Amount set to max");
            }
        })
    }

    /// Recompute the max sendable amount (balance minus gas for the native
    /// asset, full balance for tokens).
    pub fn update_amount_to_max(&self) -> Result<SendViewModel, String> {
        self.mutate(|state, draft| {
            state.amount_mode = AmountMode::Max;
            set_amount_to_max(draft);
            draft.log_history("Amount set to max");
        })
    }

    pub fn update_asset(&self, asset: Asset) -> Result<SendViewModel, String> {
        self.mutate(|state, draft| {
            draft.log_history(format!("Asset changed to {:?}", asset.kind));
            draft.asset = asset.clone();
            if state.amount_mode == AmountMode::Max {
                set_amount_to_max(draft);
            }
        })
    }

    /// Manually set gas fields; marks the draft as custom-gas.
    pub fn update_gas(
        &self,
        limit: Option<&str>,
        price: Option<&str>,
        max_fee_per_gas: Option<&str>,
        max_priority_fee_per_gas: Option<&str>,
    ) -> Result<SendViewModel, String> {
        let limit = limit.map(str::to_string);
        let price = price.map(str::to_string);
        let max_fee = max_fee_per_gas.map(str::to_string);
        let max_priority = max_priority_fee_per_gas.map(str::to_string);
        self.mutate(|state, draft| {
            if let Some(l) = &limit {
                draft.gas.limit = l.clone();
            }
            if let Some(p) = &price {
                draft.gas.price = p.clone();
            }
            if let Some(f) = &max_fee {
                draft.gas.max_fee_per_gas = f.clone();
            }
            if let Some(p) = &max_priority {
                draft.gas.max_priority_fee_per_gas = p.clone();
            }
            draft.gas.was_manually_edited = true;
            recompute_gas_total(draft);
            draft.log_history("Gas manually edited");
            if state.amount_mode == AmountMode::Max {
                set_amount_to_max(draft);
            }
        })
    }

    /// Apply one of the estimated fee levels.
    pub fn use_gas_estimate(&self, level: GasLevel) -> Result<SendViewModel, String> {
        let levels = self
            .estimator
            .levels()
            .ok_or_else(|| "No gas estimate available".to_string())?;
        let price = levels.pick(level);
        self.mutate(|state, draft| {
            apply_gas_price(draft, price);
            draft.gas.was_manually_edited = false;
            draft.log_history(format!("Gas estimate applied ({:?})", level));
            if state.amount_mode == AmountMode::Max {
                set_amount_to_max(draft);
            }
        })
    }

    fn validate_current(&self, state: &mut SendState) {
        let account = state.selected_account.clone();
        let gas_loaded = self.estimator.levels().is_some();
        let known_contracts = self.known_token_contracts.clone();
        if let Some(draft) = state.current_draft_mut() {
            validate_draft(draft, &account, gas_loaded, &known_contracts);
        }
    }

    /// Sign and hand off the current draft. Serialized so two rapid clicks
    /// cannot double-submit; `is_submitting` is observable throughout.
    pub async fn submit(&self) -> Result<SubmitReceipt, String> {
        let result = {
            let _guard = self.submit_lock.acquire().await;
            {
                // The view flips to is_submitting while the guard is held.
                let state = self.state.read();
                self.broadcast_view(&state);
            }
            self.do_submit().await
        };

        // Guard released; push the settled view.
        let state = self.state.read();
        self.broadcast_view(&state);
        result
    }

    async fn do_submit(&self) -> Result<SubmitReceipt, String> {
        let (draft, from_address) = {
            let state = self.state.read();
            let draft = state
                .current_draft()
                .cloned()
                .ok_or_else(|| "No active draft".to_string())?;
            let from = draft
                .from_account
                .as_ref()
                .map(|a| a.address.clone())
                .unwrap_or_else(|| state.selected_account.address.clone());
            (draft, normalize_address(&from))
        };

        if draft.status != SendStatus::Valid {
            return Err("Draft is not valid for submission".to_string());
        }

        let nonce_hex = self
            .nonce_provider
            .pending_nonce(&from_address)
            .await
            .map_err(|e| e.to_string())?;
        let nonce = parse_hex_quantity(&nonce_hex)? as u64;

        let params = build_tx_params(&draft, &from_address, nonce)?;
        let hash = self.signer.sign_and_submit(&params, self.chain_id).await?;
        let hash = hash.to_lowercase();
        log::info!("[SendFlow] Submitted transaction {}", hash);

        let uuid = uuid::Uuid::new_v4().to_string();
        let pending =
            PendingTransaction::new(uuid.clone(), hash.clone(), self.chain_id, params.clone());
        self.tracker.register(pending);

        if let Some(db) = &self.db {
            let req = RecordSubmittedTxRequest {
                uuid: uuid.clone(),
                hash: hash.clone(),
                chain_id: self.chain_id,
                from_address: params.from.clone(),
                to_address: params.to.clone().unwrap_or_default(),
                value: params.value.clone(),
            };
            if let Err(e) = db.record_submitted_tx(req) {
                log::error!("[SendFlow] Failed to persist submission: {}", e);
            }
        }

        self.broadcaster.try_post(UiEvent::TransactionStatusChanged {
            hash: hash.clone(),
            status: PendingTxStatus::Submitted,
        });

        {
            let mut state = self.state.write();
            let account = state.selected_account.clone();
            *state = SendState::initial();
            state.selected_account = account;
        }

        Ok(SubmitReceipt { uuid, hash })
    }
}

fn effective_gas_price(draft: &DraftTransaction) -> u128 {
    let field = match draft.envelope {
        TransactionEnvelope::Legacy => &draft.gas.price,
        TransactionEnvelope::FeeMarket => &draft.gas.max_fee_per_gas,
    };
    parse_wei(field).unwrap_or(0)
}

fn recompute_gas_total(draft: &mut DraftTransaction) {
    let limit = parse_wei(&draft.gas.limit).unwrap_or(0);
    let total = limit.saturating_mul(effective_gas_price(draft));
    draft.gas.total = total.to_string();
}

fn apply_gas_price(draft: &mut DraftTransaction, price: u128) {
    match draft.envelope {
        TransactionEnvelope::Legacy => {
            draft.gas.price = price.to_string();
        }
        TransactionEnvelope::FeeMarket => {
            draft.gas.max_fee_per_gas = price.to_string();
            // Tip defaults to a tenth of the max fee, floored at 1 wei.
            draft.gas.max_priority_fee_per_gas = (price / 10).max(1).to_string();
        }
    }
    recompute_gas_total(draft);
}

fn set_amount_to_max(draft: &mut DraftTransaction) {
    let amount = match draft.asset.kind {
        AssetKind::Token => parse_wei(&draft.asset.balance).unwrap_or(0),
        AssetKind::Native => {
            let balance = parse_wei(&draft.asset.balance).unwrap_or(0);
            let gas_total = parse_wei(&draft.gas.total).unwrap_or(0);
            balance.saturating_sub(gas_total)
        }
    };
    draft.amount.value = amount.to_string();
}

fn validate_draft(
    draft: &mut DraftTransaction,
    account: &Account,
    gas_loaded: bool,
    known_token_contracts: &[String],
) {
    draft.amount.error = None;
    draft.recipient.error = None;
    draft.recipient.warning = None;
    draft.gas.error = None;

    let native_balance = parse_wei(&account.balance).unwrap_or(0);
    let amount = parse_wei(&draft.amount.value).unwrap_or(0);
    let gas_total = parse_wei(&draft.gas.total).unwrap_or(0);
    let gas_limit = parse_wei(&draft.gas.limit).unwrap_or(0);

    // Recipient
    let recipient = normalize_address(&draft.recipient.address);
    let recipient_missing = recipient.is_empty();
    if !recipient_missing {
        if !is_valid_address(&recipient) {
            draft.recipient.error = Some(SendError::InvalidRecipient);
        } else if let Some(details) = draft.asset.details.as_ref() {
            if draft.asset.kind == AssetKind::Token
                && recipient == normalize_address(&details.contract_address)
            {
                draft.recipient.error = Some(SendError::RecipientIsTokenContract);
            }
        }
        if draft.recipient.error.is_none() && known_token_contracts.contains(&recipient) {
            draft.recipient.warning = Some(SendWarning::KnownTokenContract);
        }
    }

    // Amount
    match draft.asset.kind {
        AssetKind::Native => {
            if amount.saturating_add(gas_total) > native_balance {
                draft.amount.error = Some(SendError::InsufficientFunds);
            }
        }
        AssetKind::Token => {
            let token_balance = parse_wei(&draft.asset.balance).unwrap_or(0);
            if amount == 0 {
                draft.amount.error = Some(SendError::NegativeOrZeroAmount);
            } else if amount > token_balance {
                draft.amount.error = Some(SendError::InsufficientTokens);
            }
        }
    }

    // Gas
    if gas_total > native_balance {
        draft.gas.error = Some(SendError::InsufficientFundsForGas);
    }
    if !gas_loaded && !draft.gas.was_manually_edited {
        draft.gas.error = Some(SendError::GasEstimateUnavailable);
    }
    if gas_limit < MIN_GAS_LIMIT {
        draft.gas.error = Some(SendError::GasLimitTooLow);
    }

    let has_error = draft.amount.error.is_some()
        || draft.recipient.error.is_some()
        || draft.gas.error.is_some();

    draft.status = if recipient_missing || has_error {
        SendStatus::Invalid
    } else {
        SendStatus::Valid
    };
}

/// ERC-20 `transfer(address,uint256)` calldata.
fn erc20_transfer_data(recipient: &str, amount: u128) -> String {
    let addr_body = recipient.strip_prefix("0x").unwrap_or(recipient);
    format!("0xa9059cbb{:0>64}{:064x}", addr_body, amount)
}

fn build_tx_params(
    draft: &DraftTransaction,
    from_address: &str,
    nonce: u64,
) -> Result<TxParams, String> {
    let amount = parse_wei(&draft.amount.value)?;
    let recipient = normalize_address(&draft.recipient.address);

    let (to, value, data) = match draft.asset.kind {
        AssetKind::Native => (
            Some(recipient),
            amount.to_string(),
            draft
                .user_input_hex_data
                .clone()
                .unwrap_or_else(|| "0x".to_string()),
        ),
        AssetKind::Token => {
            let details = draft
                .asset
                .details
                .as_ref()
                .ok_or_else(|| "Token asset without details".to_string())?;
            (
                Some(normalize_address(&details.contract_address)),
                "0".to_string(),
                erc20_transfer_data(&recipient, amount),
            )
        }
    };

    let (gas_price, max_fee, max_priority) = match draft.envelope {
        TransactionEnvelope::Legacy => (Some(draft.gas.price.clone()), None, None),
        TransactionEnvelope::FeeMarket => (
            None,
            Some(draft.gas.max_fee_per_gas.clone()),
            Some(draft.gas.max_priority_fee_per_gas.clone()),
        ),
    };

    Ok(TxParams {
        from: from_address.to_string(),
        to,
        value,
        gas_limit: draft.gas.limit.clone(),
        gas_price,
        max_fee_per_gas: max_fee,
        max_priority_fee_per_gas: max_priority,
        nonce,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::send::types::TokenDetails;

    fn draft_with(account_balance: &str) -> (DraftTransaction, Account) {
        let mut draft = DraftTransaction::new("d1".to_string(), TransactionEnvelope::Legacy);
        draft.asset = Asset::native(account_balance);
        let account = Account {
            address: "0x00aa00aa00aa00aa00aa00aa00aa00aa00aa00aa".to_string(),
            balance: account_balance.to_string(),
        };
        (draft, account)
    }

    const RECIPIENT: &str = "0x1111111111111111111111111111111111111111";

    #[test]
    fn missing_recipient_invalidates_without_field_error() {
        let (mut draft, account) = draft_with("1000000000000000000");
        draft.gas.price = "1000000000".to_string();
        recompute_gas_total(&mut draft);

        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(draft.status, SendStatus::Invalid);
        assert_eq!(draft.recipient.error, None);
    }

    #[test]
    fn invalid_recipient_address_is_flagged() {
        let (mut draft, account) = draft_with("1000000000000000000");
        draft.recipient.address = "0xnothex".to_string();
        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(draft.recipient.error, Some(SendError::InvalidRecipient));
    }

    #[test]
    fn native_overspend_is_insufficient_funds() {
        let (mut draft, account) = draft_with("1000000");
        draft.recipient.address = RECIPIENT.to_string();
        draft.amount.value = "900000".to_string();
        draft.gas.price = "100".to_string();
        recompute_gas_total(&mut draft); // 21000 * 100 = 2_100_000

        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(draft.amount.error, Some(SendError::InsufficientFunds));
        assert_eq!(draft.gas.error, Some(SendError::InsufficientFundsForGas));
        assert_eq!(draft.status, SendStatus::Invalid);
    }

    #[test]
    fn token_validation_covers_zero_balance_and_contract_recipient() {
        let (mut draft, account) = draft_with("1000000000000000000");
        let contract = "0x2222222222222222222222222222222222222222";
        draft.asset = Asset::token(
            "500",
            TokenDetails {
                contract_address: contract.to_string(),
                symbol: "DAI".to_string(),
                decimals: 18,
            },
        );
        draft.gas.price = "1".to_string();
        recompute_gas_total(&mut draft);

        draft.recipient.address = RECIPIENT.to_string();
        draft.amount.value = "0".to_string();
        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(draft.amount.error, Some(SendError::NegativeOrZeroAmount));

        draft.amount.value = "501".to_string();
        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(draft.amount.error, Some(SendError::InsufficientTokens));

        draft.amount.value = "100".to_string();
        draft.recipient.address = contract.to_string();
        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(
            draft.recipient.error,
            Some(SendError::RecipientIsTokenContract)
        );
    }

    #[test]
    fn known_contract_recipient_warns_but_stays_valid() {
        let (mut draft, account) = draft_with("1000000000000000000");
        draft.recipient.address = RECIPIENT.to_string();
        draft.amount.value = "1000".to_string();
        draft.gas.price = "1".to_string();
        recompute_gas_total(&mut draft);

        validate_draft(&mut draft, &account, true, &[RECIPIENT.to_string()]);
        assert_eq!(
            draft.recipient.warning,
            Some(SendWarning::KnownTokenContract)
        );
        assert_eq!(draft.status, SendStatus::Valid);
    }

    #[test]
    fn gas_limit_below_minimum_invalidates() {
        let (mut draft, account) = draft_with("1000000000000000000");
        draft.recipient.address = RECIPIENT.to_string();
        draft.amount.value = "1000".to_string();
        draft.gas.limit = "20000".to_string();
        draft.gas.price = "1".to_string();
        recompute_gas_total(&mut draft);

        validate_draft(&mut draft, &account, true, &[]);
        assert_eq!(draft.gas.error, Some(SendError::GasLimitTooLow));
        assert_eq!(draft.status, SendStatus::Invalid);
    }

    #[test]
    fn missing_gas_estimate_invalidates_unless_manual() {
        let (mut draft, account) = draft_with("1000000000000000000");
        draft.recipient.address = RECIPIENT.to_string();
        draft.amount.value = "1000".to_string();
        draft.gas.price = "1".to_string();
        recompute_gas_total(&mut draft);

        validate_draft(&mut draft, &account, false, &[]);
        assert_eq!(draft.gas.error, Some(SendError::GasEstimateUnavailable));

        draft.gas.was_manually_edited = true;
        validate_draft(&mut draft, &account, false, &[]);
        assert_eq!(draft.gas.error, None);
        assert_eq!(draft.status, SendStatus::Valid);
    }

    #[test]
    fn max_amount_arithmetic() {
        let (mut draft, _account) = draft_with("1000000");
        draft.gas.price = "10".to_string();
        recompute_gas_total(&mut draft); // 210_000
        set_amount_to_max(&mut draft);
        assert_eq!(draft.amount.value, "790000");

        // Token max ignores gas.
        draft.asset = Asset::token(
            "12345",
            TokenDetails {
                contract_address: "0x2222222222222222222222222222222222222222".to_string(),
                symbol: "DAI".to_string(),
                decimals: 18,
            },
        );
        set_amount_to_max(&mut draft);
        assert_eq!(draft.amount.value, "12345");
    }

    #[test]
    fn erc20_transfer_calldata_layout() {
        let data = erc20_transfer_data("0x1111111111111111111111111111111111111111", 1000);
        assert!(data.starts_with("0xa9059cbb"));
        // 4-byte selector + two 32-byte words
        assert_eq!(data.len(), 2 + 8 + 64 + 64);
        assert!(data.ends_with("3e8"));
    }

    #[test]
    fn tx_params_for_token_send_target_the_contract() {
        let (mut draft, _account) = draft_with("1000000000000000000");
        let contract = "0x2222222222222222222222222222222222222222";
        draft.asset = Asset::token(
            "500",
            TokenDetails {
                contract_address: contract.to_string(),
                symbol: "DAI".to_string(),
                decimals: 18,
            },
        );
        draft.recipient.address = RECIPIENT.to_string();
        draft.amount.value = "100".to_string();

        let params = build_tx_params(&draft, "0xfrom", 3).unwrap();
        assert_eq!(params.to.as_deref(), Some(contract));
        assert_eq!(params.value, "0");
        assert!(params.data.starts_with("0xa9059cbb"));
        assert_eq!(params.nonce, 3);
    }
}
