use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::protocol::UiEvent;

/// Max number of recent events kept for replay on connect
const EVENT_BUFFER_SIZE: usize = 50;

/// Internal commands sent to the background broadcast task.
enum BroadcastCmd {
    /// Deliver an event to all current subscribers and buffer it for replay.
    Send(UiEvent),
    /// Remove a subscriber.
    Unsubscribe(String),
}

/// Broadcasts events to all connected UI contexts.
///
/// `try_post` is non-blocking: the event goes onto an internal channel and a
/// background task handles cloning and per-client delivery, so callers in
/// request handlers or workers are never stalled by a slow UI.
pub struct EventBroadcaster {
    cmd_tx: mpsc::UnboundedSender<BroadcastCmd>,
    /// Shared client map, readable from any thread for `client_count`.
    clients: Arc<DashMap<String, mpsc::Sender<UiEvent>>>,
    /// Ring buffer replayed to newly connected clients.
    recent_events: Arc<std::sync::Mutex<VecDeque<UiEvent>>>,
}

impl EventBroadcaster {
    pub fn new(shutdown: CancellationToken) -> Self {
        let clients: Arc<DashMap<String, mpsc::Sender<UiEvent>>> = Arc::new(DashMap::new());
        let recent_events = Arc::new(std::sync::Mutex::new(VecDeque::with_capacity(
            EVENT_BUFFER_SIZE,
        )));

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();

        tokio::spawn(Self::run_loop(
            cmd_rx,
            clients.clone(),
            recent_events.clone(),
            shutdown,
        ));

        Self {
            cmd_tx,
            clients,
            recent_events,
        }
    }

    /// Subscribe a new UI context and return (client_id, receiver).
    pub fn subscribe(&self) -> (String, mpsc::Receiver<UiEvent>) {
        let client_id = Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(100);
        self.clients.insert(client_id.clone(), tx);
        log::debug!("[Gateway] Client {} subscribed", client_id);
        (client_id, rx)
    }

    pub fn unsubscribe(&self, client_id: &str) {
        self.clients.remove(client_id);
        let _ = self
            .cmd_tx
            .send(BroadcastCmd::Unsubscribe(client_id.to_string()));
        log::debug!("[Gateway] Client {} unsubscribed", client_id);
    }

    /// Snapshot of recent events for replay to a newly connected client.
    pub fn recent_events(&self) -> Vec<UiEvent> {
        match self.recent_events.lock() {
            Ok(buffer) => buffer.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Queue an event for delivery. Best-effort: a delivery problem is
    /// logged, never raised. The return value only says whether the event
    /// was accepted for broadcast at all.
    pub fn try_post(&self, event: UiEvent) -> bool {
        match self.cmd_tx.send(BroadcastCmd::Send(event)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[Gateway] Broadcast loop gone, event dropped: {}", e);
                false
            }
        }
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    async fn run_loop(
        mut cmd_rx: mpsc::UnboundedReceiver<BroadcastCmd>,
        clients: Arc<DashMap<String, mpsc::Sender<UiEvent>>>,
        recent_events: Arc<std::sync::Mutex<VecDeque<UiEvent>>>,
        shutdown: CancellationToken,
    ) {
        loop {
            let cmd = tokio::select! {
                _ = shutdown.cancelled() => break,
                cmd = cmd_rx.recv() => match cmd {
                    Some(cmd) => cmd,
                    None => break,
                },
            };

            match cmd {
                BroadcastCmd::Send(event) => {
                    if let Ok(mut buffer) = recent_events.lock() {
                        if buffer.len() >= EVENT_BUFFER_SIZE {
                            buffer.pop_front();
                        }
                        buffer.push_back(event.clone());
                    }

                    let mut disconnected = Vec::new();

                    for entry in clients.iter() {
                        let client_id = entry.key().clone();
                        match entry.value().try_send(event.clone()) {
                            Ok(()) => {}
                            Err(mpsc::error::TrySendError::Full(_)) => {
                                log::warn!(
                                    "[Gateway] Channel full for client {}, dropping '{}'",
                                    client_id,
                                    event.name()
                                );
                            }
                            Err(mpsc::error::TrySendError::Closed(_)) => {
                                disconnected.push(client_id);
                            }
                        }
                    }

                    for client_id in disconnected {
                        clients.remove(&client_id);
                        log::debug!("[Gateway] Removed disconnected client {}", client_id);
                    }
                }
                BroadcastCmd::Unsubscribe(client_id) => {
                    clients.remove(&client_id);
                }
            }
        }

        log::info!("[Gateway] Broadcast loop shutting down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn subscriber_receives_posted_events() {
        let broadcaster = EventBroadcaster::new(CancellationToken::new());
        let (_id, mut rx) = broadcaster.subscribe();

        assert!(broadcaster.try_post(UiEvent::SyncStatusChanged { is_syncing: true }));

        let event = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("event delivery timed out")
            .expect("channel closed");
        assert_eq!(event.name(), "sync_status_changed");
    }

    #[tokio::test]
    async fn recent_events_replay_in_order() {
        let broadcaster = EventBroadcaster::new(CancellationToken::new());
        let (_id, mut rx) = broadcaster.subscribe();

        broadcaster.try_post(UiEvent::SyncStatusChanged { is_syncing: true });
        broadcaster.try_post(UiEvent::SyncStatusChanged { is_syncing: false });
        // Wait for the background loop to process both.
        rx.recv().await.unwrap();
        rx.recv().await.unwrap();

        let replay = broadcaster.recent_events();
        assert_eq!(replay.len(), 2);
        assert_eq!(replay[0].name(), "sync_status_changed");
    }

    #[tokio::test]
    async fn unsubscribed_clients_stop_counting() {
        let broadcaster = EventBroadcaster::new(CancellationToken::new());
        let (id, _rx) = broadcaster.subscribe();
        assert_eq!(broadcaster.client_count(), 1);

        broadcaster.unsubscribe(&id);
        assert_eq!(broadcaster.client_count(), 0);
    }
}
