use crate::model::{ClaimId, ListingId, NotificationId, NotificationKind, UserId};
use crate::notification_actor::NotificationError;

/// What happened after a transition: who should hear about it and why.
#[derive(Debug, Clone)]
pub struct FanoutEvent {
    pub listing_id: ListingId,
    pub claim_id: Option<ClaimId>,
    /// Who caused the transition.
    pub actor: UserId,
    /// One entry per recipient.
    pub audience: Vec<(UserId, NotificationKind)>,
}

impl FanoutEvent {
    pub fn new(listing_id: ListingId, claim_id: Option<ClaimId>, actor: UserId) -> Self {
        Self {
            listing_id,
            claim_id,
            actor,
            audience: Vec::new(),
        }
    }

    pub fn notify(mut self, recipient: UserId, kind: NotificationKind) -> Self {
        self.audience.push((recipient, kind));
        self
    }
}

/// Outcome of one fanout.
///
/// Push results never make a fanout fail. A failed durable write does: no further
/// records are written, and the error is kept in `storage_error` so callers can
/// report it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FanoutReport {
    /// Records written, in audience order.
    pub recorded: Vec<NotificationId>,
    /// How many of those reached a live channel.
    pub pushed: usize,
    pub storage_error: Option<NotificationError>,
}

impl FanoutReport {
    pub fn is_complete(&self) -> bool {
        self.storage_error.is_none()
    }
}
