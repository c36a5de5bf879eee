//! # Listing Client
//!
//! High-level API over the listing store. Every status change goes through
//! [`ListingClient::transition`]; the remaining methods are conveniences built on it
//! or plain reads.
use crate::listing_actor::{ListingAction, ListingError};
use crate::model::{
    FoodListing, ListingChanges, ListingCreate, ListingDetails, ListingFilter, ListingId,
    ListingStatus, ListingUpdate, UserId,
};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Client for interacting with the Listing actor.
#[derive(Clone)]
pub struct ListingClient {
    inner: ResourceClient<FoodListing>,
}

#[async_trait]
impl ActorClient<FoodListing> for ListingClient {
    type Error = ListingError;

    fn inner(&self) -> &ResourceClient<FoodListing> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ListingError::from(e)
    }
}

impl ListingClient {
    pub fn new(inner: ResourceClient<FoodListing>) -> Self {
        Self { inner }
    }

    /// Publishes a new Available listing owned by `owner`.
    #[instrument(skip(self, details), fields(title = %details.title))]
    pub async fn publish(
        &self,
        owner: UserId,
        details: ListingDetails,
    ) -> Result<ListingId, ListingError> {
        debug!("Sending request");
        self.inner
            .create(ListingCreate { owner, details })
            .await
            .map_err(Self::map_error)
    }

    /// Fetches a listing, treating absence as an error.
    pub async fn fetch(&self, id: ListingId) -> Result<FoodListing, ListingError> {
        self.get(id)
            .await?
            .ok_or_else(|| ListingError::NotFound(id.to_string()))
    }

    /// Atomic compare-and-set on the listing status.
    ///
    /// Returns the listing as it stands after the change. Fails with
    /// [`ListingError::Conflict`] if the status was not `expected` when the request
    /// reached the store, and with [`ListingError::InvalidTransition`] if
    /// `expected → next` is not allowed at all.
    #[instrument(skip(self))]
    pub async fn transition(
        &self,
        id: ListingId,
        expected: ListingStatus,
        next: ListingStatus,
        actor: UserId,
    ) -> Result<FoodListing, ListingError> {
        debug!("Sending request");
        self.inner
            .perform_action(
                id,
                ListingAction::Transition {
                    expected,
                    next,
                    actor,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    /// Edits the details of an Available listing. Owner only.
    ///
    /// Pass `expected_version` to make the edit conditional on nobody having
    /// changed the listing since it was read.
    #[instrument(skip(self, changes))]
    pub async fn update_details(
        &self,
        id: ListingId,
        editor: UserId,
        expected_version: Option<u64>,
        changes: ListingChanges,
    ) -> Result<FoodListing, ListingError> {
        debug!("Sending request");
        self.inner
            .update(
                id,
                ListingUpdate {
                    editor,
                    expected_version,
                    changes,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    /// All listings matching `filter`, oldest first.
    pub async fn browse(&self, filter: ListingFilter) -> Result<Vec<FoodListing>, ListingError> {
        self.query(filter, None).await
    }

    /// Withdraws an Available listing. Owner only.
    #[instrument(skip(self))]
    pub async fn cancel_listing(
        &self,
        id: ListingId,
        owner: UserId,
    ) -> Result<FoodListing, ListingError> {
        // The owner never changes, so checking it outside the transition is safe.
        let listing = self.fetch(id).await?;
        if listing.owner != owner {
            return Err(ListingError::NotOwner {
                id: id.to_string(),
                user: owner,
            });
        }
        self.transition(id, ListingStatus::Available, ListingStatus::Cancelled, owner)
            .await
    }

    /// Moves every Available listing whose deadline is at or before `now` to Expired.
    ///
    /// Listings claimed between the scan and their transition lose the race and
    /// are skipped. Returns the listings that were expired.
    #[instrument(skip(self))]
    pub async fn expire_due(
        &self,
        now: DateTime<Utc>,
        actor: UserId,
    ) -> Result<Vec<FoodListing>, ListingError> {
        let due = self.browse(ListingFilter::DueForExpiry(now)).await?;
        let mut expired = Vec::with_capacity(due.len());
        for listing in due {
            match self
                .transition(
                    listing.id,
                    ListingStatus::Available,
                    ListingStatus::Expired,
                    actor.clone(),
                )
                .await
            {
                Ok(after) => expired.push(after),
                Err(e) if e.is_contention() => {
                    debug!(listing = %listing.id, error = %e, "Skipped expiry");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(expired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::{create_mock_client, expect_action, expect_query};

    #[tokio::test]
    async fn test_transition_sends_compare_and_set_action() {
        let (client, mut receiver) = create_mock_client::<FoodListing>(10);
        let listings = ListingClient::new(client);

        let task = tokio::spawn(async move {
            listings
                .transition(
                    ListingId(4),
                    ListingStatus::Available,
                    ListingStatus::Claimed,
                    UserId::from("ana"),
                )
                .await
        });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, ListingId(4));
        let ListingAction::Transition {
            expected,
            next,
            actor,
        } = action;
        assert_eq!(expected, ListingStatus::Available);
        assert_eq!(next, ListingStatus::Claimed);
        assert_eq!(actor, UserId::from("ana"));

        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                ListingError::Conflict {
                    id: "listing_4".into(),
                    expected: ListingStatus::Available,
                    actual: ListingStatus::Claimed,
                },
            ))))
            .unwrap();

        let err = task.await.unwrap().unwrap_err();
        assert!(err.is_contention());
    }

    #[tokio::test]
    async fn test_closed_store_maps_to_storage_unavailable() {
        let (client, receiver) = create_mock_client::<FoodListing>(1);
        drop(receiver);
        let listings = ListingClient::new(client);

        let err = listings
            .publish(UserId::from("donor"), ListingDetails::new("Rice", 2))
            .await
            .unwrap_err();
        assert!(matches!(err, ListingError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn test_expiry_skips_listings_that_lost_the_race() {
        let (client, mut receiver) = create_mock_client::<FoodListing>(10);
        let listings = ListingClient::new(client);
        let now = Utc::now();

        let task = tokio::spawn(async move {
            listings.expire_due(now, UserId::from("system")).await
        });

        let owner = UserId::from("donor");
        let first = FoodListing::new(ListingId(1), owner.clone(), ListingDetails::new("Milk", 1));
        let second = FoodListing::new(ListingId(2), owner, ListingDetails::new("Eggs", 6));

        let (filter, _, responder) = expect_query(&mut receiver).await.unwrap();
        assert!(matches!(filter, ListingFilter::DueForExpiry(at) if at == now));
        responder.send(Ok(vec![first.clone(), second.clone()])).unwrap();

        let (_, _, responder) = expect_action(&mut receiver).await.unwrap();
        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                ListingError::Conflict {
                    id: first.id.to_string(),
                    expected: ListingStatus::Available,
                    actual: ListingStatus::Claimed,
                },
            ))))
            .unwrap();

        let (id, _, responder) = expect_action(&mut receiver).await.unwrap();
        assert_eq!(id, ListingId(2));
        let mut expired = second;
        expired.status = ListingStatus::Expired;
        responder.send(Ok(expired)).unwrap();

        let expired = task.await.unwrap().unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, ListingId(2));
    }
}
