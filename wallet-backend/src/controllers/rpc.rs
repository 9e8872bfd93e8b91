//! JSON-RPC endpoint for the in-page provider.
//!
//! Every request runs through the middleware pipeline; anything the shims
//! don't answer is forwarded to the upstream node.

use actix_web::{web, HttpResponse, Responder};

use crate::rpc::types::RpcRequest;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/rpc", web::post().to(handle_rpc));
}

async fn handle_rpc(state: web::Data<AppState>, body: web::Json<RpcRequest>) -> impl Responder {
    let response = state.pipeline.dispatch(body.into_inner()).await;
    HttpResponse::Ok().json(response)
}
