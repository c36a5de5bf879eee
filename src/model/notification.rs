/// A durable record telling one user that a listing or claim changed.
///
/// # Actor Framework
/// Managed by a [`ResourceActor`](actor_framework::ResourceActor); see
/// [`impl ActorEntity for Notification`](#impl-ActorEntity-for-Notification).
use crate::model::{ClaimId, ListingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Notifications.
///
/// Ids are handed out in creation order, so a `NotificationId` doubles as the
/// catch-up cursor: "everything after the last one I saw".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(pub u32);

impl From<u32> for NotificationId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "notification_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    ListingClaimed,
    ClaimAccepted,
    ClaimRejected,
    ClaimCancelled,
    ListingCompleted,
    ListingExpired,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::ListingClaimed => "listing-claimed",
            NotificationKind::ClaimAccepted => "claim-accepted",
            NotificationKind::ClaimRejected => "claim-rejected",
            NotificationKind::ClaimCancelled => "claim-cancelled",
            NotificationKind::ListingCompleted => "listing-completed",
            NotificationKind::ListingExpired => "listing-expired",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who did what to which listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub listing_id: ListingId,
    pub claim_id: Option<ClaimId>,
    pub actor_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
    /// Informational only: a live push reached a channel at least once.
    pub delivered: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for appending a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient: UserId,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
}

impl NewNotification {
    pub fn new(
        recipient: UserId,
        kind: NotificationKind,
        listing_id: ListingId,
        claim_id: Option<ClaimId>,
        actor_id: UserId,
    ) -> Self {
        Self {
            recipient,
            kind,
            payload: NotificationPayload {
                listing_id,
                claim_id,
                actor_id,
            },
        }
    }
}

/// A recipient's log, optionally restarted after a cursor.
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    pub recipient: UserId,
    pub after: Option<NotificationId>,
    pub undelivered_only: bool,
}

impl NotificationFilter {
    pub fn for_recipient(recipient: UserId) -> Self {
        Self {
            recipient,
            after: None,
            undelivered_only: false,
        }
    }

    pub fn after(mut self, cursor: Option<NotificationId>) -> Self {
        self.after = cursor;
        self
    }

    pub fn undelivered(mut self) -> Self {
        self.undelivered_only = true;
        self
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        notification.recipient == self.recipient
            && self.after.map_or(true, |cursor| notification.id > cursor)
            && (!self.undelivered_only || !notification.delivered)
    }
}
