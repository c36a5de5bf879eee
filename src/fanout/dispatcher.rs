//! # Event Fanout
//!
//! Turns an accepted transition into notifications, in a fixed order:
//!
//! 1. write one durable record per recipient,
//! 2. push each record to the recipient's live channel, if any,
//! 3. publish the wire envelope on the broadcast stream.
//!
//! Every record is written before any push is attempted, so a user who is offline,
//! or whose push is lost, still finds the notification when catching up. If a write
//! fails, the remaining recipients are skipped but those already recorded are still
//! pushed and broadcast.

use super::envelope::EventEnvelope;
use super::report::{FanoutEvent, FanoutReport};
use crate::clients::NotificationClient;
use crate::model::{NewNotification, Notification, NotificationId};
use crate::presence::PresenceRouter;
use actor_framework::ActorClient;
use chrono::Utc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct EventFanout {
    notifications: NotificationClient,
    presence: PresenceRouter,
    events: broadcast::Sender<EventEnvelope>,
    push_timeout: Duration,
}

impl EventFanout {
    pub fn new(
        notifications: NotificationClient,
        presence: PresenceRouter,
        event_capacity: usize,
        push_timeout: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            notifications,
            presence,
            events,
            push_timeout,
        }
    }

    /// Live stream of every envelope published from now on.
    ///
    /// A receiver that falls more than the configured capacity behind skips the
    /// oldest envelopes; the durable log still has them.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    /// Records, pushes and broadcasts `event` for its whole audience.
    ///
    /// A failed record stops further records; whatever was written before it is
    /// still pushed and broadcast.
    #[instrument(skip(self, event), fields(listing = %event.listing_id, recipients = event.audience.len()))]
    pub async fn dispatch(&self, event: FanoutEvent) -> FanoutReport {
        let mut report = FanoutReport::default();

        let mut written = Vec::with_capacity(event.audience.len());
        for (recipient, kind) in event.audience {
            let entry = NewNotification::new(
                recipient,
                kind,
                event.listing_id,
                event.claim_id,
                event.actor.clone(),
            );
            match self.notifications.record(entry.clone()).await {
                Ok(id) => {
                    report.recorded.push(id);
                    written.push((id, entry));
                }
                Err(e) => {
                    warn!(error = %e, recorded = written.len(), "Notification record failed, fanout stopped");
                    report.storage_error = Some(e);
                    break;
                }
            }
        }

        for (id, entry) in written {
            let notification = self.load(id, entry).await;
            if self.push(&notification).await {
                report.pushed += 1;
            }
            // Nobody listening is fine.
            let _ = self.events.send(EventEnvelope::from(&notification));
        }

        debug!(pushed = report.pushed, "Fanout done");
        report
    }

    /// The stored record, or a copy rebuilt from what was written if it cannot
    /// be read back.
    async fn load(&self, id: NotificationId, entry: NewNotification) -> Notification {
        match self.notifications.get(id).await {
            Ok(Some(stored)) => return stored,
            Ok(None) => debug!(%id, "Recorded notification missing on read"),
            Err(e) => debug!(%id, error = %e, "Could not load recorded notification"),
        }
        Notification {
            id,
            recipient: entry.recipient,
            kind: entry.kind,
            payload: entry.payload,
            delivered: false,
            created_at: Utc::now(),
        }
    }

    async fn push(&self, notification: &Notification) -> bool {
        let push = self
            .presence
            .push(notification.recipient.clone(), notification.clone());
        let delivered = tokio::time::timeout(self.push_timeout, push)
            .await
            .unwrap_or(false);
        if !delivered {
            debug!(id = %notification.id, recipient = %notification.recipient, "Push not delivered");
            return false;
        }
        if let Err(e) = self.notifications.mark_delivered(notification.id).await {
            debug!(id = %notification.id, error = %e, "Could not mark delivered");
        }
        true
    }
}
