//! # Claim Coordinator
//!
//! Runs the claim protocol on top of the stores:
//!
//! ```text
//! submit_claim ──► listing Available→Claimed ──► record Claim ──► fanout
//!                        │ Conflict
//!                        └──► AlreadyClaimed (+ claim-rejected to the claimant)
//!
//! resolve_claim ──► claim Accepted→outcome ──► listing Claimed→Completed|Available ──► fanout
//!                                                   │ failure
//!                                                   └──► claim reopened, error returned
//! ```
//!
//! The coordinator holds no state and takes no locks. Who wins a listing is decided
//! by the listing store's transition; who resolves a claim, by the claim store's.

use super::error::ClaimError;
use super::receipt::{ClaimReceipt, ExpiryReceipt};
use crate::claim_actor::ClaimStoreError;
use crate::clients::{ClaimClient, ListingClient};
use crate::fanout::{EventFanout, FanoutEvent, FanoutReport};
use crate::listing_actor::ListingError;
use crate::model::{
    Claim, ClaimCreate, ClaimId, ClaimOutcome, ListingId, ListingStatus, NotificationKind, UserId,
};
use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

/// Identity recorded as the actor of transitions nobody asked for (expiry).
pub const SYSTEM_ACTOR: &str = "system";

#[derive(Clone)]
pub struct ClaimCoordinator {
    listings: ListingClient,
    claims: ClaimClient,
    fanout: EventFanout,
}

impl ClaimCoordinator {
    pub fn new(listings: ListingClient, claims: ClaimClient, fanout: EventFanout) -> Self {
        Self {
            listings,
            claims,
            fanout,
        }
    }

    pub fn fanout(&self) -> &EventFanout {
        &self.fanout
    }

    /// Claims `listing_id` for `claimant`.
    ///
    /// Of any number of concurrent calls on one Available listing exactly one
    /// succeeds; the rest get [`ClaimError::AlreadyClaimed`]. Repeating the call
    /// as the winner returns the same claim and notifies nobody.
    #[instrument(skip(self))]
    pub async fn submit_claim(
        &self,
        listing_id: ListingId,
        claimant: UserId,
    ) -> Result<ClaimReceipt, ClaimError> {
        // Owner is immutable; reading it up front decides nothing about status.
        let owner = self.listings.fetch(listing_id).await?.owner;
        if owner == claimant {
            return Err(ClaimError::SelfClaimForbidden(listing_id));
        }

        match self
            .listings
            .transition(
                listing_id,
                ListingStatus::Available,
                ListingStatus::Claimed,
                claimant.clone(),
            )
            .await
        {
            Ok(_) => {}
            Err(ListingError::Conflict { actual, .. }) => {
                if let Some(receipt) = self.held_by(listing_id, &claimant).await? {
                    debug!(%listing_id, %claimant, claim = %receipt.claim.id, "Claim retried by holder");
                    return Ok(receipt);
                }
                debug!(%listing_id, %claimant, status = %actual, "Claim lost the race");
                let rejected = FanoutEvent::new(listing_id, None, owner)
                    .notify(claimant, NotificationKind::ClaimRejected);
                let report = self.fanout.dispatch(rejected).await;
                if !report.is_complete() {
                    warn!(%listing_id, "Rejection notice not recorded");
                }
                return Err(ClaimError::AlreadyClaimed {
                    listing: listing_id,
                    status: actual,
                });
            }
            Err(e) => return Err(e.into()),
        }

        let params = ClaimCreate {
            listing_id,
            claimant: claimant.clone(),
            owner: owner.clone(),
        };
        let claim = match self.record_claim(params).await {
            Ok(claim) => claim,
            Err(e) => {
                warn!(%listing_id, error = %e, "Claim record failed, releasing listing");
                self.release(listing_id, &claimant).await;
                return Err(e.into());
            }
        };
        info!(%listing_id, claim = %claim.id, %claimant, "Claim accepted");

        let event = FanoutEvent::new(listing_id, Some(claim.id), claimant.clone())
            .notify(owner, NotificationKind::ListingClaimed)
            .notify(claimant, NotificationKind::ClaimAccepted);
        let fanout = self.fanout.dispatch(event).await;
        Ok(ClaimReceipt { claim, fanout })
    }

    /// A repeated claim from the current holder (e.g. a retry after a timeout)
    /// gets the existing claim back, with nothing fanned out.
    ///
    /// `Ok(None)` means `claimant` does not hold the listing, or does but is no
    /// longer in an accepted claim (completed, or its record not yet written).
    async fn held_by(
        &self,
        listing_id: ListingId,
        claimant: &UserId,
    ) -> Result<Option<ClaimReceipt>, ClaimError> {
        let listing = self.listings.fetch(listing_id).await?;
        if listing.claimed_by.as_ref() != Some(claimant) {
            return Ok(None);
        }
        let holder = match self.claims.active_for(listing_id).await? {
            Some(claim) if &claim.claimant == claimant => Some(claim),
            _ => None,
        };
        Ok(holder.map(|claim| ClaimReceipt {
            claim,
            fanout: FanoutReport::default(),
        }))
    }

    async fn record_claim(&self, params: ClaimCreate) -> Result<Claim, ClaimStoreError> {
        let id = self.claims.record(params).await?;
        self.claims.fetch(id).await
    }

    /// Undoes a claim transition whose Claim record could not be written.
    async fn release(&self, listing_id: ListingId, claimant: &UserId) {
        if let Err(e) = self
            .listings
            .transition(
                listing_id,
                ListingStatus::Claimed,
                ListingStatus::Available,
                claimant.clone(),
            )
            .await
        {
            warn!(%listing_id, error = %e, "Could not release listing");
        }
    }

    /// Completes or cancels an accepted claim on behalf of one of its parties.
    ///
    /// Completing moves the listing to Completed; cancelling makes it Available
    /// again, ready for a new claim. If both parties resolve at once, the second
    /// gets [`ClaimError::AlreadyResolved`].
    #[instrument(skip(self))]
    pub async fn resolve_claim(
        &self,
        claim_id: ClaimId,
        actor: UserId,
        outcome: ClaimOutcome,
    ) -> Result<ClaimReceipt, ClaimError> {
        let claim = self.claims.fetch(claim_id).await?;
        let Some(counterpart) = claim.counterpart_of(&actor).cloned() else {
            return Err(ClaimError::NotParticipant {
                claim: claim_id,
                user: actor,
            });
        };

        let resolved = match self.claims.resolve(claim_id, outcome).await {
            Ok(resolved) => resolved,
            Err(ClaimStoreError::AlreadyResolved { status, .. }) => {
                debug!(%claim_id, %status, "Claim already resolved");
                return Err(ClaimError::AlreadyResolved {
                    claim: claim_id,
                    status,
                });
            }
            Err(e) => return Err(e.into()),
        };

        let (next, kind) = match outcome {
            ClaimOutcome::Completed => (ListingStatus::Completed, NotificationKind::ListingCompleted),
            ClaimOutcome::Cancelled => (ListingStatus::Available, NotificationKind::ClaimCancelled),
        };
        if let Err(e) = self
            .listings
            .transition(claim.listing_id, ListingStatus::Claimed, next, actor.clone())
            .await
        {
            warn!(%claim_id, error = %e, "Listing transition failed, reopening claim");
            if let Err(undo) = self.claims.reopen(claim_id, resolved.status).await {
                warn!(%claim_id, error = %undo, "Could not reopen claim");
            }
            return Err(e.into());
        }
        info!(%claim_id, listing = %claim.listing_id, %actor, status = %resolved.status, "Claim resolved");

        let event = FanoutEvent::new(claim.listing_id, Some(claim_id), actor)
            .notify(counterpart, kind);
        let fanout = self.fanout.dispatch(event).await;
        Ok(ClaimReceipt {
            claim: resolved,
            fanout,
        })
    }

    /// Expires every Available listing whose pickup deadline is at or before `now`
    /// and tells each owner.
    #[instrument(skip(self))]
    pub async fn expire_due(&self, now: DateTime<Utc>) -> Result<Vec<ExpiryReceipt>, ClaimError> {
        let system = UserId::from(SYSTEM_ACTOR);
        let expired = self.listings.expire_due(now, system.clone()).await?;

        let mut receipts = Vec::with_capacity(expired.len());
        for listing in expired {
            let event = FanoutEvent::new(listing.id, None, system.clone())
                .notify(listing.owner.clone(), NotificationKind::ListingExpired);
            let fanout = self.fanout.dispatch(event).await;
            receipts.push(ExpiryReceipt { listing, fanout });
        }
        if !receipts.is_empty() {
            info!(count = receipts.len(), "Listings expired");
        }
        Ok(receipts)
    }

    pub async fn get_claim(&self, claim_id: ClaimId) -> Result<Claim, ClaimError> {
        Ok(self.claims.fetch(claim_id).await?)
    }

    /// Every claim ever made on a listing, oldest first.
    pub async fn claims_for_listing(&self, listing_id: ListingId) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.claims.for_listing(listing_id).await?)
    }

    pub async fn claims_by_claimant(&self, claimant: UserId) -> Result<Vec<Claim>, ClaimError> {
        Ok(self.claims.by_claimant(claimant).await?)
    }
}
