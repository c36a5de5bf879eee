//! Entity trait implementation for the FoodListing domain type.
//!
//! This module holds the listing rules: validation on publish, owner-only edits
//! while Available, and the atomic status transition.

use super::actions::ListingAction;
use super::error::ListingError;
use crate::model::{
    FoodListing, ListingCreate, ListingDetails, ListingFilter, ListingId, ListingStatus,
    ListingUpdate,
};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

fn validate(details: &ListingDetails) -> Result<(), ListingError> {
    if details.title.trim().is_empty() {
        return Err(ListingError::Validation("title must not be empty".into()));
    }
    if details.quantity == 0 {
        return Err(ListingError::Validation("quantity must be at least 1".into()));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for FoodListing {
    type Id = ListingId;
    type Create = ListingCreate;
    type Update = ListingUpdate;
    type Action = ListingAction;
    type ActionResult = FoodListing;
    type Filter = ListingFilter;
    type Context = ();
    type Error = ListingError;

    /// Publishes an Available listing after validating its details.
    fn from_create_params(id: ListingId, params: ListingCreate) -> Result<Self, ListingError> {
        validate(&params.details)?;
        Ok(Self::new(id, params.owner, params.details))
    }

    /// Applies an owner's edit to an Available listing.
    ///
    /// Status is never touched here; only [`ListingAction::Transition`] moves it.
    async fn on_update(
        &mut self,
        update: ListingUpdate,
        _ctx: &Self::Context,
    ) -> Result<(), ListingError> {
        if update.editor != self.owner {
            return Err(ListingError::NotOwner {
                id: self.id.to_string(),
                user: update.editor,
            });
        }
        if self.status != ListingStatus::Available {
            return Err(ListingError::Conflict {
                id: self.id.to_string(),
                expected: ListingStatus::Available,
                actual: self.status,
            });
        }
        if let Some(expected) = update.expected_version {
            if expected != self.version {
                return Err(ListingError::StaleVersion {
                    id: self.id.to_string(),
                    expected,
                    actual: self.version,
                });
            }
        }

        let changes = update.changes;
        if let Some(title) = changes.title {
            self.details.title = title;
        }
        if let Some(description) = changes.description {
            self.details.description = description;
        }
        if let Some(quantity) = changes.quantity {
            self.details.quantity = quantity;
        }
        if let Some(location) = changes.pickup_location {
            self.details.pickup_location = Some(location);
        }
        if let Some(deadline) = changes.expires_at {
            self.details.expires_at = Some(deadline);
        }
        validate(&self.details)?;

        self.version += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: ListingAction,
        _ctx: &Self::Context,
    ) -> Result<FoodListing, ListingError> {
        match action {
            ListingAction::Transition {
                expected,
                next,
                actor,
            } => {
                // Table first: an impossible request is a caller mistake even if
                // the status happens to match.
                if !expected.can_transition_to(next) {
                    return Err(ListingError::InvalidTransition {
                        from: expected,
                        to: next,
                    });
                }
                if self.status != expected {
                    return Err(ListingError::Conflict {
                        id: self.id.to_string(),
                        expected,
                        actual: self.status,
                    });
                }

                self.claimed_by = match next {
                    ListingStatus::Claimed => Some(actor),
                    ListingStatus::Completed => self.claimed_by.take(),
                    ListingStatus::Available | ListingStatus::Expired | ListingStatus::Cancelled => {
                        None
                    }
                };
                self.status = next;
                self.version += 1;
                self.updated_at = Utc::now();
                Ok(self.clone())
            }
        }
    }

    fn matches(&self, filter: &ListingFilter) -> bool {
        filter.matches(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ListingChanges, UserId};

    fn listing() -> FoodListing {
        FoodListing::new(
            ListingId(1),
            UserId::from("donor"),
            ListingDetails::new("Sourdough loaves", 4),
        )
    }

    fn transition(expected: ListingStatus, next: ListingStatus, actor: &str) -> ListingAction {
        ListingAction::Transition {
            expected,
            next,
            actor: UserId::from(actor),
        }
    }

    #[tokio::test]
    async fn test_claim_sets_claimant_and_bumps_version() {
        let mut item = listing();
        let after = item
            .handle_action(
                transition(ListingStatus::Available, ListingStatus::Claimed, "alice"),
                &(),
            )
            .await
            .unwrap();
        assert_eq!(after.status, ListingStatus::Claimed);
        assert_eq!(after.claimed_by, Some(UserId::from("alice")));
        assert_eq!(after.version, 1);
        assert!(after.is_consistent());
    }

    #[tokio::test]
    async fn test_completion_keeps_claimant_and_release_clears_it() {
        let mut item = listing();
        item.handle_action(
            transition(ListingStatus::Available, ListingStatus::Claimed, "alice"),
            &(),
        )
        .await
        .unwrap();

        let mut released = item.clone();
        let reopened = released
            .handle_action(
                transition(ListingStatus::Claimed, ListingStatus::Available, "alice"),
                &(),
            )
            .await
            .unwrap();
        assert_eq!(reopened.claimed_by, None);
        assert!(reopened.is_consistent());

        let done = item
            .handle_action(
                transition(ListingStatus::Claimed, ListingStatus::Completed, "donor"),
                &(),
            )
            .await
            .unwrap();
        assert_eq!(done.claimed_by, Some(UserId::from("alice")));
        assert!(done.is_consistent());
    }

    #[tokio::test]
    async fn test_status_mismatch_is_a_conflict() {
        let mut item = listing();
        item.status = ListingStatus::Cancelled;
        let err = item
            .handle_action(
                transition(ListingStatus::Available, ListingStatus::Claimed, "alice"),
                &(),
            )
            .await
            .unwrap_err();
        assert!(err.is_contention());
        assert_eq!(
            err,
            ListingError::Conflict {
                id: "listing_1".into(),
                expected: ListingStatus::Available,
                actual: ListingStatus::Cancelled,
            }
        );
    }

    #[tokio::test]
    async fn test_pair_outside_table_is_invalid_even_when_status_matches() {
        let mut item = listing();
        item.status = ListingStatus::Completed;
        item.claimed_by = Some(UserId::from("alice"));
        let err = item
            .handle_action(
                transition(ListingStatus::Completed, ListingStatus::Claimed, "bob"),
                &(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ListingError::InvalidTransition {
                from: ListingStatus::Completed,
                to: ListingStatus::Claimed,
            }
        );
    }

    #[tokio::test]
    async fn test_edit_requires_owner_available_and_current_version() {
        let mut item = listing();
        let edit = |editor: &str, expected_version| ListingUpdate {
            editor: UserId::from(editor),
            expected_version,
            changes: ListingChanges {
                quantity: Some(2),
                ..Default::default()
            },
        };

        let err = item.on_update(edit("mallory", None), &()).await.unwrap_err();
        assert!(matches!(err, ListingError::NotOwner { .. }));

        let err = item.on_update(edit("donor", Some(7)), &()).await.unwrap_err();
        assert!(matches!(err, ListingError::StaleVersion { expected: 7, actual: 0, .. }));

        item.on_update(edit("donor", Some(0)), &()).await.unwrap();
        assert_eq!(item.details.quantity, 2);
        assert_eq!(item.version, 1);

        item.status = ListingStatus::Claimed;
        item.claimed_by = Some(UserId::from("alice"));
        let err = item.on_update(edit("donor", None), &()).await.unwrap_err();
        assert!(err.is_contention());
    }

    #[test]
    fn test_publish_rejects_empty_title_and_zero_quantity() {
        let owner = UserId::from("donor");
        let bad_title = ListingCreate {
            owner: owner.clone(),
            details: ListingDetails::new("  ", 1),
        };
        assert!(matches!(
            FoodListing::from_create_params(ListingId(1), bad_title),
            Err(ListingError::Validation(_))
        ));

        let zero = ListingCreate {
            owner,
            details: ListingDetails::new("Apples", 0),
        };
        assert!(matches!(
            FoodListing::from_create_params(ListingId(1), zero),
            Err(ListingError::Validation(_))
        ));
    }
}
