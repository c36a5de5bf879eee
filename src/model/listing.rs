/// A donor-published food item that recipients can claim.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
///
/// See [`impl ActorEntity for FoodListing`](#impl-ActorEntity-for-FoodListing) for:
/// - Creation parameters ([`ListingCreate`])
/// - Update parameters ([`ListingUpdate`])
/// - Custom actions ([`ListingAction`](crate::listing_actor::ListingAction))
use crate::model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListingId(pub u32);

impl From<u32> for ListingId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listing_{}", self.0)
    }
}

/// Lifecycle state of a listing.
///
/// ```text
///              ┌──────────► Cancelled
///              │
/// Available ───┼──────────► Expired
///    ▲         │
///    │         ▼
///    └────── Claimed ─────► Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Available,
    Claimed,
    Completed,
    Expired,
    Cancelled,
}

impl ListingStatus {
    /// Whether `self → next` is in the allowed transition table.
    pub fn can_transition_to(self, next: ListingStatus) -> bool {
        use ListingStatus::*;
        matches!(
            (self, next),
            (Available, Claimed)
                | (Claimed, Completed)
                | (Claimed, Available)
                | (Available, Cancelled)
                | (Available, Expired)
        )
    }

    /// No transition leaves a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ListingStatus::Completed | ListingStatus::Expired | ListingStatus::Cancelled
        )
    }

    /// States in which the listing must name its claimant.
    pub fn holds_claimant(self) -> bool {
        matches!(self, ListingStatus::Claimed | ListingStatus::Completed)
    }
}

impl Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ListingStatus::Available => "available",
            ListingStatus::Claimed => "claimed",
            ListingStatus::Completed => "completed",
            ListingStatus::Expired => "expired",
            ListingStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Descriptive payload of a listing. The core stores it but never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDetails {
    pub title: String,
    pub description: String,
    pub quantity: u32,
    pub pickup_location: Option<String>,
    /// Pickup deadline; an Available listing past it is swept to Expired.
    pub expires_at: Option<DateTime<Utc>>,
}

impl ListingDetails {
    pub fn new(title: impl Into<String>, quantity: u32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            quantity,
            pickup_location: None,
            expires_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_pickup_location(mut self, location: impl Into<String>) -> Self {
        self.pickup_location = Some(location.into());
        self
    }

    pub fn expiring_at(mut self, deadline: DateTime<Utc>) -> Self {
        self.expires_at = Some(deadline);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FoodListing {
    pub id: ListingId,
    pub owner: UserId,
    pub details: ListingDetails,
    pub status: ListingStatus,
    /// Bumped by every accepted transition and every details edit.
    pub version: u64,
    /// Set iff `status` is Claimed or Completed.
    pub claimed_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FoodListing {
    /// Creates an Available listing at version 0.
    pub fn new(id: ListingId, owner: UserId, details: ListingDetails) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner,
            details,
            status: ListingStatus::Available,
            version: 0,
            claimed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The `claimed_by ⇔ Claimed|Completed` invariant.
    pub fn is_consistent(&self) -> bool {
        self.claimed_by.is_some() == self.status.holds_claimant()
    }

    /// Available with a deadline at or before `now`.
    pub fn is_due_for_expiry(&self, now: DateTime<Utc>) -> bool {
        self.status == ListingStatus::Available
            && self.details.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Payload for publishing a new listing.
#[derive(Debug, Clone)]
pub struct ListingCreate {
    pub owner: UserId,
    pub details: ListingDetails,
}

/// Partial edit of a listing's details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<u32>,
    pub pickup_location: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Payload for editing a listing.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    /// Must be the owner.
    pub editor: UserId,
    /// When set, the edit only applies if the listing is still at this version.
    pub expected_version: Option<u64>,
    pub changes: ListingChanges,
}

/// Selection criteria for browsing listings.
#[derive(Debug, Clone)]
pub enum ListingFilter {
    Available,
    OwnedBy(UserId),
    ClaimedBy(UserId),
    DueForExpiry(DateTime<Utc>),
}

impl ListingFilter {
    pub fn matches(&self, listing: &FoodListing) -> bool {
        match self {
            ListingFilter::Available => listing.status == ListingStatus::Available,
            ListingFilter::OwnedBy(owner) => &listing.owner == owner,
            ListingFilter::ClaimedBy(user) => listing.claimed_by.as_ref() == Some(user),
            ListingFilter::DueForExpiry(now) => listing.is_due_for_expiry(*now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ListingStatus::*;

    const ALL: [ListingStatus; 5] = [Available, Claimed, Completed, Expired, Cancelled];

    #[test]
    fn test_transition_table_is_exactly_the_allowed_pairs() {
        let allowed = [
            (Available, Claimed),
            (Claimed, Completed),
            (Claimed, Available),
            (Available, Cancelled),
            (Available, Expired),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_states_have_no_way_out() {
        for from in ALL.into_iter().filter(|s| s.is_terminal()) {
            assert!(ALL.iter().all(|to| !from.can_transition_to(*to)));
        }
    }

    #[test]
    fn test_due_for_expiry_only_when_available_and_past_deadline() {
        let deadline = Utc::now();
        let mut listing = FoodListing::new(
            ListingId(1),
            UserId::from("donor"),
            ListingDetails::new("bread", 3).expiring_at(deadline),
        );
        assert!(!listing.is_due_for_expiry(deadline - chrono::Duration::minutes(1)));
        assert!(listing.is_due_for_expiry(deadline));

        listing.status = Claimed;
        assert!(!listing.is_due_for_expiry(deadline + chrono::Duration::minutes(1)));
    }
}
