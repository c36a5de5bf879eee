//! Error types for the Notification actor.

use actor_framework::FrameworkError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("Notification validation error: {0}")]
    Validation(String),

    /// The durable log could not be written or read.
    #[error("Notification store unavailable: {0}")]
    StorageUnavailable(String),
}

impl From<FrameworkError> for NotificationError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<NotificationError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => NotificationError::NotFound(id),
            Err(other) => NotificationError::StorageUnavailable(other.to_string()),
        }
    }
}
