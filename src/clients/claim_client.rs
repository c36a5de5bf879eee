//! # Claim Client
use crate::claim_actor::{ClaimAction, ClaimStoreError};
use crate::model::{
    Claim, ClaimCreate, ClaimFilter, ClaimId, ClaimOutcome, ClaimStatus, ListingId, UserId,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};

/// Client for interacting with the Claim actor.
#[derive(Clone)]
pub struct ClaimClient {
    inner: ResourceClient<Claim>,
}

#[async_trait]
impl ActorClient<Claim> for ClaimClient {
    type Error = ClaimStoreError;

    fn inner(&self) -> &ResourceClient<Claim> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ClaimStoreError::from(e)
    }
}

impl ClaimClient {
    pub fn new(inner: ResourceClient<Claim>) -> Self {
        Self { inner }
    }

    /// Records an Accepted claim for a listing that has already been claimed.
    #[instrument(skip(self))]
    pub async fn record(&self, params: ClaimCreate) -> Result<ClaimId, ClaimStoreError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    pub async fn fetch(&self, id: ClaimId) -> Result<Claim, ClaimStoreError> {
        self.get(id)
            .await?
            .ok_or_else(|| ClaimStoreError::NotFound(id.to_string()))
    }

    /// Atomically moves an Accepted claim to `outcome`.
    #[instrument(skip(self))]
    pub async fn resolve(
        &self,
        id: ClaimId,
        outcome: ClaimOutcome,
    ) -> Result<Claim, ClaimStoreError> {
        debug!("Sending request");
        self.inner
            .perform_action(
                id,
                ClaimAction::Resolve {
                    outcome,
                    at: Utc::now(),
                },
            )
            .await
            .map_err(Self::map_error)
    }

    /// Puts a claim resolved to `from` back to Accepted.
    #[instrument(skip(self))]
    pub async fn reopen(&self, id: ClaimId, from: ClaimStatus) -> Result<Claim, ClaimStoreError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, ClaimAction::Reopen { from })
            .await
            .map_err(Self::map_error)
    }

    /// The Accepted claim on a listing, if any. At most one exists.
    pub async fn active_for(&self, listing: ListingId) -> Result<Option<Claim>, ClaimStoreError> {
        let mut active = self
            .query(ClaimFilter::ActiveForListing(listing), Some(1))
            .await?;
        Ok(active.pop())
    }

    pub async fn for_listing(&self, listing: ListingId) -> Result<Vec<Claim>, ClaimStoreError> {
        self.query(ClaimFilter::ForListing(listing), None).await
    }

    pub async fn by_claimant(&self, claimant: UserId) -> Result<Vec<Claim>, ClaimStoreError> {
        self.query(ClaimFilter::ByClaimant(claimant), None).await
    }
}
