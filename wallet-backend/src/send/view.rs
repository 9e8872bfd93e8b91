//! View model projected from the send state.
//!
//! The UI never reads the state tree directly; after every mutation the flow
//! manager computes one of these and pushes it over the gateway.

use serde::Serialize;

use super::types::{
    AmountMode, AssetKind, DraftTransaction, SendError, SendStage, SendStatus, SendWarning,
};
use crate::gas::GasFeeLevels;

/// What the gas row renders: estimate buttons, a read-only display of manual
/// values, or inline limit/price fields when no estimate is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GasInputMode {
    Basic,
    Custom,
    Inline,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendViewModel {
    pub stage: SendStage,
    pub status: SendStatus,
    pub amount_mode: AmountMode,
    pub gas_input_mode: GasInputMode,
    pub asset_kind: Option<AssetKind>,
    pub asset_symbol: Option<String>,
    pub amount: Option<String>,
    pub amount_error: Option<SendError>,
    pub recipient_address: Option<String>,
    pub recipient_nickname: Option<String>,
    pub recipient_error: Option<SendError>,
    pub recipient_warning: Option<SendWarning>,
    pub gas_limit: Option<String>,
    pub gas_total: Option<String>,
    pub gas_error: Option<SendError>,
    pub gas_levels: Option<GasFeeLevels>,
    pub can_submit: bool,
    pub is_submitting: bool,
}

impl SendViewModel {
    /// Project the view for an inactive flow (no draft on screen).
    pub fn inactive() -> Self {
        Self {
            stage: SendStage::Inactive,
            status: SendStatus::Valid,
            amount_mode: AmountMode::Input,
            gas_input_mode: GasInputMode::Inline,
            asset_kind: None,
            asset_symbol: None,
            amount: None,
            amount_error: None,
            recipient_address: None,
            recipient_nickname: None,
            recipient_error: None,
            recipient_warning: None,
            gas_limit: None,
            gas_total: None,
            gas_error: None,
            gas_levels: None,
            can_submit: false,
            is_submitting: false,
        }
    }

    /// Project the view for an active draft.
    pub fn project(
        stage: SendStage,
        amount_mode: AmountMode,
        draft: &DraftTransaction,
        gas_levels: Option<GasFeeLevels>,
        is_submitting: bool,
    ) -> Self {
        let gas_input_mode = if draft.gas.was_manually_edited {
            GasInputMode::Custom
        } else if gas_levels.is_some() {
            GasInputMode::Basic
        } else {
            GasInputMode::Inline
        };

        let asset_symbol = match draft.asset.kind {
            AssetKind::Native => Some("ETH".to_string()),
            AssetKind::Token => draft.asset.details.as_ref().map(|d| d.symbol.clone()),
        };

        Self {
            stage,
            status: draft.status,
            amount_mode,
            gas_input_mode,
            asset_kind: Some(draft.asset.kind),
            asset_symbol,
            amount: Some(draft.amount.value.clone()),
            amount_error: draft.amount.error,
            recipient_address: Some(draft.recipient.address.clone()),
            recipient_nickname: Some(draft.recipient.nickname.clone()),
            recipient_error: draft.recipient.error,
            recipient_warning: draft.recipient.warning,
            gas_limit: Some(draft.gas.limit.clone()),
            gas_total: Some(draft.gas.total.clone()),
            gas_error: draft.gas.error,
            gas_levels,
            can_submit: draft.status == SendStatus::Valid
                && stage != SendStage::Inactive
                && !is_submitting,
            is_submitting,
        }
    }
}
