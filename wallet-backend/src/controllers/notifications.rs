//! Notification API endpoints

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::notifications::MarkReadItem;
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notifications")
            .route("", web::get().to(list_notifications))
            .route("/sync", web::post().to(sync_now))
            .route("/read", web::post().to(mark_read)),
    );
}

async fn list_notifications(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "unread_count": state.notifications.unread_count(),
        "is_syncing": state.notifications.is_syncing(),
        "notifications": state.notifications.list(),
    }))
}

async fn sync_now(state: web::Data<AppState>) -> impl Responder {
    match state.notifications.fetch_and_update().await {
        Ok(notifications) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "total": notifications.len(),
        })),
        Err(e) => {
            log::error!("Failed to sync notifications: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to sync notifications"
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
struct MarkReadRequest {
    items: Vec<MarkReadItem>,
}

async fn mark_read(
    state: web::Data<AppState>,
    body: web::Json<MarkReadRequest>,
) -> impl Responder {
    match state.notifications.mark_as_read(&body.items).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            log::error!("Failed to mark notifications read: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to mark notifications read"
            }))
        }
    }
}
