//! Notification fetch/normalize/store service.

use moka::sync::Cache;
use parking_lot::RwLock;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::db::Database;
use crate::gateway::{EventBroadcaster, UiEvent};
use crate::lock::StatusMutex;
use notification_types::{
    is_feature_announcement_read, process_feature_announcement, process_onchain_notification,
    FeatureAnnouncementRawNotification, Notification, NotificationKind, OnChainRawNotification,
};

/// Feature announcements change rarely; cache fetches for five minutes.
const FEATURE_CACHE_TTL_SECS: u64 = 300;

/// One entry in a mark-as-read request.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkReadItem {
    pub id: String,
    pub kind: NotificationKind,
    pub is_read: bool,
}

pub struct NotificationService {
    http: reqwest::Client,
    feature_url: Option<String>,
    onchain_url: Option<String>,
    auth_token: Option<String>,
    db: Arc<Database>,
    broadcaster: Arc<EventBroadcaster>,
    sync_lock: StatusMutex,
    notifications: RwLock<Vec<Notification>>,
    feature_cache: Cache<&'static str, Arc<Vec<FeatureAnnouncementRawNotification>>>,
}

impl NotificationService {
    pub fn new(
        feature_url: Option<String>,
        onchain_url: Option<String>,
        auth_token: Option<String>,
        db: Arc<Database>,
        broadcaster: Arc<EventBroadcaster>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            feature_url,
            onchain_url,
            auth_token,
            db,
            broadcaster,
            sync_lock: StatusMutex::new(),
            notifications: RwLock::new(Vec::new()),
            feature_cache: Cache::builder()
                .time_to_live(Duration::from_secs(FEATURE_CACHE_TTL_SECS))
                .build(),
        }
    }

    /// Whether a sync is currently running.
    pub fn is_syncing(&self) -> bool {
        self.sync_lock.is_locked()
    }

    /// Snapshot of the current normalized list, newest first.
    pub fn list(&self) -> Vec<Notification> {
        self.notifications.read().clone()
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.read().iter().filter(|n| !n.is_read).count()
    }

    /// Fetch both feeds, normalize, overlay read state, store and broadcast.
    /// Concurrent calls are serialized; `is_syncing` is observable throughout.
    pub async fn fetch_and_update(&self) -> Result<Vec<Notification>, String> {
        let result = {
            let _guard = self.sync_lock.acquire().await;
            self.broadcaster
                .try_post(UiEvent::SyncStatusChanged { is_syncing: true });
            self.sync_once().await
        };

        self.broadcaster
            .try_post(UiEvent::SyncStatusChanged { is_syncing: false });
        result
    }

    async fn sync_once(&self) -> Result<Vec<Notification>, String> {
        // Either feed failing yields an empty slice, not a failed sync.
        let features = match self.fetch_feature_announcements().await {
            Ok(list) => list,
            Err(e) => {
                log::warn!("[NotificationSync] Feature announcement fetch failed: {}", e);
                Arc::new(Vec::new())
            }
        };
        let onchain = match self.fetch_onchain_notifications().await {
            Ok(list) => list,
            Err(e) => {
                log::warn!("[NotificationSync] On-chain fetch failed: {}", e);
                Vec::new()
            }
        };

        let read_ids = self
            .db
            .list_feature_announcement_read_ids()
            .map_err(|e| format!("Failed to load read ids: {}", e))?;

        let merged = assemble_notifications(&features, &onchain, &read_ids);

        *self.notifications.write() = merged.clone();
        log::info!(
            "[NotificationSync] Synced {} notifications ({} unread)",
            merged.len(),
            merged.iter().filter(|n| !n.is_read).count()
        );

        self.broadcast_list();
        Ok(merged)
    }

    /// Mark notifications as read: feature announcements persist locally,
    /// on-chain reads are reported to the activity service.
    pub async fn mark_as_read(&self, items: &[MarkReadItem]) -> Result<(), String> {
        let feature_ids: Vec<String> = items
            .iter()
            .filter(|i| i.kind == NotificationKind::FeaturesAnnouncement && !i.is_read)
            .map(|i| i.id.clone())
            .collect();
        let onchain_ids: Vec<String> = items
            .iter()
            .filter(|i| i.kind != NotificationKind::FeaturesAnnouncement && !i.is_read)
            .map(|i| i.id.clone())
            .collect();

        if !feature_ids.is_empty() {
            self.db
                .mark_feature_announcements_read(&feature_ids)
                .map_err(|e| format!("Failed to persist read ids: {}", e))?;
        }

        if !onchain_ids.is_empty() {
            if let Err(e) = self.post_onchain_reads(&onchain_ids).await {
                // Local state still updates; the service converges on the
                // next sync.
                log::warn!("[NotificationSync] Failed to report reads upstream: {}", e);
            }
        }

        {
            let mut notifications = self.notifications.write();
            for n in notifications.iter_mut() {
                if feature_ids.contains(&n.id) || onchain_ids.contains(&n.id) {
                    n.is_read = true;
                }
            }
        }

        self.broadcast_list();
        Ok(())
    }

    fn broadcast_list(&self) {
        let notifications = self.list();
        let unread_count = notifications.iter().filter(|n| !n.is_read).count();
        self.broadcaster.try_post(UiEvent::NotificationsUpdated {
            unread_count,
            notifications,
        });
    }

    async fn fetch_feature_announcements(
        &self,
    ) -> Result<Arc<Vec<FeatureAnnouncementRawNotification>>, String> {
        let Some(url) = &self.feature_url else {
            return Ok(Arc::new(Vec::new()));
        };

        if let Some(cached) = self.feature_cache.get("feature") {
            return Ok(cached);
        }

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("Content service returned {}", resp.status()));
        }
        let list: Vec<FeatureAnnouncementRawNotification> =
            resp.json().await.map_err(|e| e.to_string())?;

        let list = Arc::new(list);
        self.feature_cache.insert("feature", list.clone());
        Ok(list)
    }

    async fn fetch_onchain_notifications(&self) -> Result<Vec<OnChainRawNotification>, String> {
        let Some(url) = &self.onchain_url else {
            return Ok(Vec::new());
        };

        let mut req = self.http.get(url);
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("Activity service returned {}", resp.status()));
        }
        resp.json().await.map_err(|e| e.to_string())
    }

    async fn post_onchain_reads(&self, ids: &[String]) -> Result<(), String> {
        let Some(url) = &self.onchain_url else {
            return Err("No activity service configured".to_string());
        };

        let mut req = self
            .http
            .post(format!("{}/mark-as-read", url.trim_end_matches('/')))
            .json(&serde_json::json!({ "ids": ids }));
        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| e.to_string())?;
        if !resp.status().is_success() {
            return Err(format!("Activity service returned {}", resp.status()));
        }
        Ok(())
    }
}

/// Merge both normalized feeds: malformed items are skipped, feature
/// announcements get the read overlay, the result is newest-first.
fn assemble_notifications(
    features: &[FeatureAnnouncementRawNotification],
    onchain: &[OnChainRawNotification],
    read_ids: &[String],
) -> Vec<Notification> {
    let mut merged = Vec::with_capacity(features.len() + onchain.len());

    for raw in features {
        match process_feature_announcement(raw) {
            Ok(mut n) => {
                n.is_read = is_feature_announcement_read(&n.id, read_ids);
                merged.push(n);
            }
            Err(e) => {
                log::warn!("[NotificationSync] Skipping malformed announcement: {}", e);
            }
        }
    }

    for raw in onchain {
        match process_onchain_notification(raw) {
            Ok(n) => merged.push(n),
            Err(e) => {
                log::warn!(
                    "[NotificationSync] Skipping malformed on-chain notification: {}",
                    e
                );
            }
        }
    }

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}
