//! Background worker for notification syncing.
//!
//! Polls both feeds on a fixed interval until the shutdown token fires.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::service::NotificationService;

pub async fn run_worker(
    service: Arc<NotificationService>,
    poll_interval_secs: u64,
    shutdown: CancellationToken,
) {
    log::info!(
        "[NotificationSync] Worker started (poll interval: {}s)",
        poll_interval_secs
    );

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(poll_interval_secs)) => {}
        }

        if let Err(e) = service.fetch_and_update().await {
            log::error!("[NotificationSync] Tick error: {}", e);
        }
    }

    log::info!("[NotificationSync] Worker shutting down");
}
