//! Transaction history API endpoints
//!
//! REST access to the persistent submission history and the live pending
//! set.

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::db::tables::transactions::SubmittedTransaction;
use crate::pending::PendingTransaction;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/transactions")
            .route("", web::get().to(list_transactions))
            .route("/pending", web::get().to(list_pending))
            .route("/{hash}", web::get().to(get_transaction)),
    );
}

/// Query parameters for listing submitted transactions
#[derive(Debug, Deserialize)]
pub struct ListParams {
    status: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ListResponse {
    success: bool,
    transactions: Vec<SubmittedTransaction>,
    total: usize,
}

async fn list_transactions(
    state: web::Data<AppState>,
    query: web::Query<ListParams>,
) -> impl Responder {
    let limit = query.limit.unwrap_or(100).min(500);

    match state
        .db
        .list_submitted_transactions(query.status.as_deref(), Some(limit))
    {
        Ok(transactions) => {
            let total = transactions.len();
            HttpResponse::Ok().json(ListResponse {
                success: true,
                transactions,
                total,
            })
        }
        Err(e) => {
            log::error!("Failed to list submitted transactions: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to fetch transactions"
            }))
        }
    }
}

#[derive(Debug, Serialize)]
struct PendingResponse {
    success: bool,
    transactions: Vec<PendingTransaction>,
    total: usize,
}

async fn list_pending(state: web::Data<AppState>) -> impl Responder {
    let transactions = state.tracker.list_submitted();
    let total = transactions.len();
    HttpResponse::Ok().json(PendingResponse {
        success: true,
        transactions,
        total,
    })
}

async fn get_transaction(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let hash = path.into_inner();
    if !crate::util::is_valid_tx_hash(&hash) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "Invalid transaction hash"
        }));
    }

    match state.db.get_submitted_tx(&hash.to_lowercase()) {
        Ok(Some(tx)) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "transaction": tx,
        })),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "success": false,
            "error": "Unknown transaction"
        })),
        Err(e) => {
            log::error!("Failed to fetch transaction {}: {}", hash, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to fetch transaction"
            }))
        }
    }
}
