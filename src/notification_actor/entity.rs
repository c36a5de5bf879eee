//! Entity trait implementation for the Notification domain type.
//!
//! Records are append-only: creation stamps them undelivered, the only mutation is
//! [`NotificationAction::MarkDelivered`], and nothing deletes them.

use super::actions::NotificationAction;
use super::error::NotificationError;
use crate::model::{NewNotification, Notification, NotificationFilter, NotificationId};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Notification {
    type Id = NotificationId;
    type Create = NewNotification;
    type Update = Infallible;
    type Action = NotificationAction;
    /// Whether this call flipped the flag.
    type ActionResult = bool;
    type Filter = NotificationFilter;
    type Context = ();
    type Error = NotificationError;

    fn from_create_params(
        id: NotificationId,
        params: NewNotification,
    ) -> Result<Self, NotificationError> {
        if params.recipient.as_str().is_empty() {
            return Err(NotificationError::Validation(
                "recipient must not be empty".into(),
            ));
        }
        Ok(Notification {
            id,
            recipient: params.recipient,
            kind: params.kind,
            payload: params.payload,
            delivered: false,
            created_at: Utc::now(),
        })
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), NotificationError> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: NotificationAction,
        _ctx: &(),
    ) -> Result<bool, NotificationError> {
        match action {
            NotificationAction::MarkDelivered => {
                let changed = !self.delivered;
                self.delivered = true;
                Ok(changed)
            }
        }
    }

    fn matches(&self, filter: &NotificationFilter) -> bool {
        filter.matches(self)
    }
}
