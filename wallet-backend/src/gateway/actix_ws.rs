//! Actix-Web WebSocket handler for the UI gateway.
//! UI contexts connect on the same port as the HTTP API; on connect they
//! receive a replay of recent events, then live events as they happen.

use actix_web::{web, HttpRequest, HttpResponse};
use actix_ws::AggregatedMessage;
use futures_util::StreamExt;
use std::sync::Arc;

use super::events::EventBroadcaster;
use crate::AppState;

/// WebSocket route handler
pub async fn ws_handler(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, actix_web::Error> {
    let (response, session, msg_stream) = actix_ws::handle(&req, stream)?;

    let broadcaster = state.broadcaster.clone();
    actix_web::rt::spawn(handle_ws_connection(session, msg_stream, broadcaster));

    Ok(response)
}

async fn handle_ws_connection(
    mut session: actix_ws::Session,
    msg_stream: actix_ws::MessageStream,
    broadcaster: Arc<EventBroadcaster>,
) {
    log::info!("[Gateway] New UI connection");

    let mut msg_stream = msg_stream
        .aggregate_continuations()
        .max_continuation_size(64 * 1024);

    let (client_id, mut event_rx) = broadcaster.subscribe();
    log::info!(
        "[Gateway] Client {} connected (total: {})",
        client_id,
        broadcaster.client_count()
    );

    // Replay the recent buffer so a freshly opened popup has current state.
    for event in broadcaster.recent_events() {
        if let Ok(json) = serde_json::to_string(&event) {
            if session.text(json).await.is_err() {
                broadcaster.unsubscribe(&client_id);
                return;
            }
        }
    }

    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => {
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if session.text(json).await.is_err() {
                            log::warn!(
                                "[Gateway] Failed to deliver '{}' to client {}",
                                event.name(),
                                client_id
                            );
                            break;
                        }
                    }
                    Err(e) => {
                        log::error!("[Gateway] Failed to serialize '{}': {}", event.name(), e);
                    }
                }
            }
            msg = msg_stream.next() => {
                match msg {
                    Some(Ok(AggregatedMessage::Ping(data))) => {
                        if session.pong(&data).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(AggregatedMessage::Close(_))) | None => break,
                    Some(Err(e)) => {
                        log::error!("[Gateway] WebSocket error: {:?}", e);
                        break;
                    }
                    _ => {}
                }
            }
            else => break,
        }
    }

    broadcaster.unsubscribe(&client_id);
    let _ = session.close(None).await;
    log::info!("[Gateway] Client {} disconnected", client_id);
}
