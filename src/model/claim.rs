/// A recipient's claim on a listing, with its own resolution lifecycle.
///
/// # Actor Framework
/// Managed by a [`ResourceActor`](actor_framework::ResourceActor); see
/// [`impl ActorEntity for Claim`](#impl-ActorEntity-for-Claim).
use crate::model::{ListingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClaimId(pub u32);

impl From<u32> for ClaimId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "claim_{}", self.0)
    }
}

/// Claims are accepted by the listing transition itself, so a stored claim starts
/// at `Accepted`. `Pending` and `Rejected` are part of the wire vocabulary only:
/// a losing claimant hears about rejection through a notification, not a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

impl ClaimStatus {
    /// Only an accepted claim can still be completed or cancelled.
    pub fn is_resolvable(self) -> bool {
        self == ClaimStatus::Accepted
    }
}

impl Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ClaimStatus::Pending => "pending",
            ClaimStatus::Accepted => "accepted",
            ClaimStatus::Rejected => "rejected",
            ClaimStatus::Completed => "completed",
            ClaimStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// How a participant resolves an accepted claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimOutcome {
    /// Food handed over; the listing becomes Completed.
    Completed,
    /// Claim withdrawn; the listing becomes Available again.
    Cancelled,
}

impl From<ClaimOutcome> for ClaimStatus {
    fn from(outcome: ClaimOutcome) -> Self {
        match outcome {
            ClaimOutcome::Completed => ClaimStatus::Completed,
            ClaimOutcome::Cancelled => ClaimStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    pub id: ClaimId,
    pub listing_id: ListingId,
    pub claimant: UserId,
    /// Listing owner at claim time.
    pub owner: UserId,
    pub status: ClaimStatus,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Claim {
    pub fn new(id: ClaimId, params: ClaimCreate) -> Self {
        Self {
            id,
            listing_id: params.listing_id,
            claimant: params.claimant,
            owner: params.owner,
            status: ClaimStatus::Accepted,
            created_at: Utc::now(),
            resolved_at: None,
        }
    }

    /// The participant who did not perform an action taken by `actor`.
    pub fn counterpart_of(&self, actor: &UserId) -> Option<&UserId> {
        if actor == &self.claimant {
            Some(&self.owner)
        } else if actor == &self.owner {
            Some(&self.claimant)
        } else {
            None
        }
    }
}

/// Payload for recording a claim that has already won its listing.
#[derive(Debug, Clone)]
pub struct ClaimCreate {
    pub listing_id: ListingId,
    pub claimant: UserId,
    pub owner: UserId,
}

#[derive(Debug, Clone)]
pub enum ClaimFilter {
    ForListing(ListingId),
    ByClaimant(UserId),
    /// Accepted claims on a listing; at most one exists at any time.
    ActiveForListing(ListingId),
}

impl ClaimFilter {
    pub fn matches(&self, claim: &Claim) -> bool {
        match self {
            ClaimFilter::ForListing(listing) => &claim.listing_id == listing,
            ClaimFilter::ByClaimant(user) => &claim.claimant == user,
            ClaimFilter::ActiveForListing(listing) => {
                &claim.listing_id == listing && claim.status == ClaimStatus::Accepted
            }
        }
    }
}
