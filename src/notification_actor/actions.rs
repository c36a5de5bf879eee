//! Custom actions for the Notification actor.

#[derive(Debug, Clone)]
pub enum NotificationAction {
    /// Flags the record as pushed live. Idempotent.
    MarkDelivered,
}
