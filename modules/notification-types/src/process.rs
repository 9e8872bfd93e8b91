//! Normalization of raw notification payloads.
//!
//! Each processor converts one raw shape into the uniform `Notification`.
//! A malformed timestamp fails only the offending item; callers skip it and
//! keep the rest of the batch.

use chrono::{DateTime, Utc};

use crate::{
    FeatureAnnouncementRawNotification, Notification, NotificationKind, OnChainRawNotification,
    RawNotification,
};

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}", raw, e))
}

/// Normalize a feature announcement. The id comes from the payload body and
/// the read flag is always false here; the caller overlays read state from
/// its locally persisted read-ids list.
pub fn process_feature_announcement(
    raw: &FeatureAnnouncementRawNotification,
) -> Result<Notification, String> {
    let created_at = parse_timestamp(&raw.created_at)?;

    Ok(Notification {
        id: raw.data.id.clone(),
        kind: NotificationKind::FeaturesAnnouncement,
        created_at,
        is_read: false,
        data: serde_json::to_value(&raw.data).map_err(|e| e.to_string())?,
    })
}

/// Normalize an on-chain notification. All raw fields are carried through in
/// `data`; the read flag is the inverse of the service's `unread` boolean.
pub fn process_onchain_notification(
    raw: &OnChainRawNotification,
) -> Result<Notification, String> {
    let created_at = parse_timestamp(&raw.created_at)?;

    Ok(Notification {
        id: raw.id.clone(),
        kind: raw.kind,
        created_at,
        is_read: !raw.unread,
        data: serde_json::to_value(raw).map_err(|e| e.to_string())?,
    })
}

/// Normalize either raw shape.
pub fn process_notification(raw: &RawNotification) -> Result<Notification, String> {
    match raw {
        RawNotification::FeatureAnnouncement(n) => process_feature_announcement(n),
        RawNotification::OnChain(n) => process_onchain_notification(n),
    }
}

/// Whether a feature announcement id appears in the caller-maintained list of
/// previously read announcement ids.
pub fn is_feature_announcement_read(id: &str, read_ids: &[String]) -> bool {
    read_ids.iter().any(|read| read == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureAnnouncementData;
    use serde_json::json;

    fn mock_feature_announcement() -> FeatureAnnouncementRawNotification {
        FeatureAnnouncementRawNotification {
            created_at: "2024-02-26T10:35:03.268Z".to_string(),
            data: FeatureAnnouncementData {
                id: "dont-miss-out-on-airdrops".to_string(),
                title: "Don't miss out on airdrops".to_string(),
                description: Some("Check your airdrop eligibility.".to_string()),
                link_url: None,
            },
        }
    }

    fn mock_onchain_notification(unread: bool) -> OnChainRawNotification {
        OnChainRawNotification {
            id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(),
            trigger_id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_string(),
            kind: NotificationKind::EthSent,
            chain_id: 1,
            block_number: 17_485_840,
            block_timestamp: Some("2022-03-01T00:00:00Z".to_string()),
            tx_hash: Some(
                "0x881d40237659c251811cec9c364ef91dc08d300c000000000000000000000000".to_string(),
            ),
            unread,
            created_at: "2022-03-01T00:00:00Z".to_string(),
            data: json!({
                "kind": "eth_sent",
                "from": "0x881d40237659c251811cec9c364ef91dc08d300c",
                "to": "0x881d40237659c251811cec9c364ef91dc08d300d",
                "amount": { "usd": "670.64", "eth": "0.005" },
            }),
        }
    }

    #[test]
    fn feature_announcement_is_never_read_and_keeps_id() {
        let raw = mock_feature_announcement();
        let n = process_feature_announcement(&raw).unwrap();

        assert!(!n.is_read);
        assert_eq!(n.id, raw.data.id);
        assert_eq!(n.kind, NotificationKind::FeaturesAnnouncement);
        assert_eq!(n.created_at.to_rfc3339(), "2024-02-26T10:35:03.268+00:00");
    }

    #[test]
    fn onchain_read_flag_inverts_unread() {
        for unread in [true, false] {
            let raw = mock_onchain_notification(unread);
            let n = process_onchain_notification(&raw).unwrap();
            assert_eq!(n.is_read, !unread);
        }
    }

    #[test]
    fn onchain_notification_carries_raw_fields_in_data() {
        let raw = mock_onchain_notification(true);
        let n = process_onchain_notification(&raw).unwrap();

        assert_eq!(n.id, raw.id);
        assert_eq!(n.kind, NotificationKind::EthSent);
        assert_eq!(n.data["trigger_id"], raw.trigger_id);
        assert_eq!(n.data["chain_id"], 1);
        assert_eq!(n.data["data"]["amount"]["eth"], "0.005");
    }

    #[test]
    fn malformed_timestamp_fails_the_item() {
        let mut raw = mock_feature_announcement();
        raw.created_at = "not-a-date".to_string();
        assert!(process_feature_announcement(&raw).is_err());

        let mut raw = mock_onchain_notification(true);
        raw.created_at = String::new();
        assert!(process_onchain_notification(&raw).is_err());
    }

    #[test]
    fn process_notification_dispatches_over_the_union() {
        let feature = RawNotification::FeatureAnnouncement(mock_feature_announcement());
        let onchain = RawNotification::OnChain(mock_onchain_notification(true));

        assert_eq!(
            process_notification(&feature).unwrap().kind,
            NotificationKind::FeaturesAnnouncement
        );
        assert_eq!(
            process_notification(&onchain).unwrap().kind,
            NotificationKind::EthSent
        );
    }

    #[test]
    fn untagged_union_deserializes_both_shapes() {
        let onchain_json = serde_json::to_string(&mock_onchain_notification(true)).unwrap();
        let feature_json = serde_json::to_string(&mock_feature_announcement()).unwrap();

        assert!(matches!(
            serde_json::from_str::<RawNotification>(&onchain_json).unwrap(),
            RawNotification::OnChain(_)
        ));
        assert!(matches!(
            serde_json::from_str::<RawNotification>(&feature_json).unwrap(),
            RawNotification::FeatureAnnouncement(_)
        ));
    }

    #[test]
    fn read_ids_membership() {
        let read_ids = vec!["a".to_string(), "b".to_string()];
        assert!(is_feature_announcement_read("a", &read_ids));
        assert!(!is_feature_announcement_read("c", &read_ids));
        assert!(!is_feature_announcement_read("a", &[]));
    }
}
