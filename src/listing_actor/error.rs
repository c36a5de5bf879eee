//! Error types for the Listing actor.

use crate::model::{ListingStatus, UserId};
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during listing operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ListingError {
    /// The requested listing was not found.
    #[error("Listing not found: {0}")]
    NotFound(String),

    /// The listing was not in the expected state when the update landed.
    /// Another operation got there first.
    #[error("Listing {id} is {actual}, expected {expected}")]
    Conflict {
        id: String,
        expected: ListingStatus,
        actual: ListingStatus,
    },

    /// An edit was based on an outdated version of the listing.
    #[error("Listing {id} is at version {actual}, edit was based on {expected}")]
    StaleVersion { id: String, expected: u64, actual: u64 },

    /// The requested status change is not in the transition table.
    #[error("Invalid listing transition: {from} -> {to}")]
    InvalidTransition {
        from: ListingStatus,
        to: ListingStatus,
    },

    /// Only the owner may perform this operation.
    #[error("User {user} does not own listing {id}")]
    NotOwner { id: String, user: UserId },

    /// The listing data provided is invalid.
    #[error("Listing validation error: {0}")]
    Validation(String),

    /// The listing store could not be reached.
    #[error("Listing store unavailable: {0}")]
    StorageUnavailable(String),
}

impl ListingError {
    /// Lost a race with a concurrent operation; an expected outcome, not a fault.
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::Conflict { .. } | Self::StaleVersion { .. })
    }
}

impl From<FrameworkError> for ListingError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<ListingError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => ListingError::NotFound(id),
            Err(other) => ListingError::StorageUnavailable(other.to_string()),
        }
    }
}
