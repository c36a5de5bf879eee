//! Error types for the Claim actor.

use crate::model::ClaimStatus;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors raised by the claim store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClaimStoreError {
    #[error("Claim not found: {0}")]
    NotFound(String),

    /// Someone resolved the claim first.
    #[error("Claim {id} is already {status}")]
    AlreadyResolved { id: String, status: ClaimStatus },

    /// A compensation found the claim in a state it did not expect.
    #[error("Claim {id} is {actual}, expected {expected}")]
    Conflict {
        id: String,
        expected: ClaimStatus,
        actual: ClaimStatus,
    },

    #[error("Claim validation error: {0}")]
    Validation(String),

    #[error("Claim store unavailable: {0}")]
    StorageUnavailable(String),
}

impl ClaimStoreError {
    pub fn is_contention(&self) -> bool {
        matches!(self, Self::AlreadyResolved { .. } | Self::Conflict { .. })
    }
}

impl From<FrameworkError> for ClaimStoreError {
    fn from(e: FrameworkError) -> Self {
        match e.downcast_entity::<ClaimStoreError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => ClaimStoreError::NotFound(id),
            Err(other) => ClaimStoreError::StorageUnavailable(other.to_string()),
        }
    }
}
