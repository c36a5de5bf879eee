//! Errors returned by the claim protocol.

use crate::claim_actor::ClaimStoreError;
use crate::listing_actor::ListingError;
use crate::model::{ClaimId, ClaimStatus, ListingId, ListingStatus, UserId};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClaimError {
    /// Another claim (or a cancel/expiry) landed first.
    #[error("Listing {listing} is no longer available (now {status})")]
    AlreadyClaimed {
        listing: ListingId,
        status: ListingStatus,
    },

    #[error("Owner cannot claim their own listing {0}")]
    SelfClaimForbidden(ListingId),

    #[error("User {user} is not a party to claim {claim}")]
    NotParticipant { claim: ClaimId, user: UserId },

    /// The other party resolved the claim first.
    #[error("Claim {claim} is already {status}")]
    AlreadyResolved { claim: ClaimId, status: ClaimStatus },

    #[error(transparent)]
    Listing(#[from] ListingError),

    #[error(transparent)]
    Store(#[from] ClaimStoreError),
}

impl ClaimError {
    /// Lost a race; the caller did nothing wrong.
    pub fn is_contention(&self) -> bool {
        match self {
            Self::AlreadyClaimed { .. } | Self::AlreadyResolved { .. } => true,
            Self::Listing(e) => e.is_contention(),
            Self::Store(e) => e.is_contention(),
            Self::SelfClaimForbidden(_) | Self::NotParticipant { .. } => false,
        }
    }

    /// A store could not be reached; the outcome of the request is unknown.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Listing(ListingError::StorageUnavailable(_))
                | Self::Store(ClaimStoreError::StorageUnavailable(_))
        )
    }
}
