//! Health endpoint

use actix_web::{web, HttpResponse, Responder};

use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}

async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "version": env!("CARGO_PKG_VERSION"),
        "chain_id": state.config.chain_id,
        "ui_clients": state.broadcaster.client_count(),
        "pending_transactions": state.tracker.count(),
        "gas_samples": state.estimator.sample_count(),
    }))
}
