//! Wire form of a notification, as pushed to subscribers of the event stream.

use crate::model::{Notification, NotificationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable JSON payload:
///
/// ```json
/// {
///   "kind": "listing-claimed",
///   "listingId": "listing_7",
///   "claimId": "claim_3",
///   "actorId": "ana",
///   "recipientId": "donor",
///   "createdAt": "2024-05-01T12:00:00Z"
/// }
/// ```
///
/// `claimId` is `null` for events that are not about a claim (expiry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    pub kind: NotificationKind,
    pub listing_id: String,
    pub claim_id: Option<String>,
    pub actor_id: String,
    pub recipient_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for EventEnvelope {
    fn from(notification: &Notification) -> Self {
        let payload = &notification.payload;
        Self {
            kind: notification.kind,
            listing_id: payload.listing_id.to_string(),
            claim_id: payload.claim_id.map(|id| id.to_string()),
            actor_id: payload.actor_id.to_string(),
            recipient_id: notification.recipient.to_string(),
            created_at: notification.created_at,
        }
    }
}

impl EventEnvelope {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClaimId, ListingId, NotificationId, NotificationPayload, UserId};
    use chrono::TimeZone;
    use serde_json::json;

    fn notification(claim_id: Option<ClaimId>) -> Notification {
        Notification {
            id: NotificationId(9),
            recipient: UserId::from("donor"),
            kind: NotificationKind::ListingClaimed,
            payload: NotificationPayload {
                listing_id: ListingId(7),
                claim_id,
                actor_id: UserId::from("ana"),
            },
            delivered: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_wire_shape_is_stable() {
        let envelope = EventEnvelope::from(&notification(Some(ClaimId(3))));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "listing-claimed",
                "listingId": "listing_7",
                "claimId": "claim_3",
                "actorId": "ana",
                "recipientId": "donor",
                "createdAt": "2024-05-01T12:00:00Z",
            })
        );
    }

    #[test]
    fn test_missing_claim_serialises_as_null_and_parses_back() {
        let envelope = EventEnvelope::from(&notification(None));
        let text = envelope.to_json().unwrap();
        assert!(text.contains("\"claimId\":null"));

        let parsed: EventEnvelope = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, envelope);
    }
}
