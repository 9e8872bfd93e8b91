//! Send-flow API endpoints
//!
//! The UI drives the draft through these routes; every mutation returns the
//! freshly computed view model (also pushed over the gateway).

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::gas::GasLevel;
use crate::send::{Account, AmountMode, Asset, SendViewModel};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/send")
            .route("", web::get().to(current_view))
            .route("", web::delete().to(reset))
            .route("/draft", web::post().to(begin_draft))
            .route("/edit", web::post().to(edit_draft))
            .route("/recipient", web::post().to(update_recipient))
            .route("/amount", web::post().to(update_amount))
            .route("/amount-mode", web::post().to(update_amount_mode))
            .route("/amount-max", web::post().to(update_amount_to_max))
            .route("/asset", web::post().to(update_asset))
            .route("/gas", web::post().to(update_gas))
            .route("/gas-estimate", web::post().to(use_gas_estimate))
            .route("/submit", web::post().to(submit)),
    );
}

#[derive(Debug, Serialize)]
struct ViewResponse {
    success: bool,
    view: SendViewModel,
}

fn view_ok(view: SendViewModel) -> HttpResponse {
    HttpResponse::Ok().json(ViewResponse {
        success: true,
        view,
    })
}

fn flow_error(error: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": error,
    }))
}

fn view_result(result: Result<SendViewModel, String>) -> HttpResponse {
    match result {
        Ok(view) => view_ok(view),
        Err(e) => flow_error(e),
    }
}

async fn current_view(state: web::Data<AppState>) -> impl Responder {
    view_ok(state.send_flow.view())
}

#[derive(Debug, Deserialize)]
struct BeginDraftRequest {
    address: String,
    balance: String,
    #[serde(default)]
    eip1559_support: bool,
}

async fn begin_draft(
    state: web::Data<AppState>,
    body: web::Json<BeginDraftRequest>,
) -> impl Responder {
    let account = Account {
        address: body.address.clone(),
        balance: body.balance.clone(),
    };
    view_ok(state.send_flow.begin_new_draft(account, body.eip1559_support))
}

async fn reset(state: web::Data<AppState>) -> impl Responder {
    view_ok(state.send_flow.reset())
}

async fn edit_draft(state: web::Data<AppState>) -> impl Responder {
    view_result(state.send_flow.edit_current_draft())
}

#[derive(Debug, Deserialize)]
struct RecipientRequest {
    address: String,
    #[serde(default)]
    nickname: String,
}

async fn update_recipient(
    state: web::Data<AppState>,
    body: web::Json<RecipientRequest>,
) -> impl Responder {
    view_result(state.send_flow.update_recipient(&body.address, &body.nickname))
}

#[derive(Debug, Deserialize)]
struct AmountRequest {
    value: String,
}

async fn update_amount(
    state: web::Data<AppState>,
    body: web::Json<AmountRequest>,
) -> impl Responder {
    view_result(state.send_flow.update_amount(&body.value))
}

#[derive(Debug, Deserialize)]
struct AmountModeRequest {
    mode: AmountMode,
}

async fn update_amount_mode(
    state: web::Data<AppState>,
    body: web::Json<AmountModeRequest>,
) -> impl Responder {
    view_result(state.send_flow.update_amount_mode(body.mode))
}

async fn update_amount_to_max(state: web::Data<AppState>) -> impl Responder {
    view_result(state.send_flow.update_amount_to_max())
}

async fn update_asset(state: web::Data<AppState>, body: web::Json<Asset>) -> impl Responder {
    view_result(state.send_flow.update_asset(body.into_inner()))
}

#[derive(Debug, Deserialize)]
struct GasRequest {
    limit: Option<String>,
    price: Option<String>,
    max_fee_per_gas: Option<String>,
    max_priority_fee_per_gas: Option<String>,
}

async fn update_gas(state: web::Data<AppState>, body: web::Json<GasRequest>) -> impl Responder {
    view_result(state.send_flow.update_gas(
        body.limit.as_deref(),
        body.price.as_deref(),
        body.max_fee_per_gas.as_deref(),
        body.max_priority_fee_per_gas.as_deref(),
    ))
}

#[derive(Debug, Deserialize)]
struct GasEstimateRequest {
    level: GasLevel,
}

async fn use_gas_estimate(
    state: web::Data<AppState>,
    body: web::Json<GasEstimateRequest>,
) -> impl Responder {
    view_result(state.send_flow.use_gas_estimate(body.level))
}

async fn submit(state: web::Data<AppState>) -> impl Responder {
    match state.send_flow.submit().await {
        Ok(receipt) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "uuid": receipt.uuid,
            "hash": receipt.hash,
        })),
        Err(e) => {
            log::error!("Failed to submit transaction: {}", e);
            flow_error(e)
        }
    }
}
