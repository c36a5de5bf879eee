//! Entity trait implementation for the Claim domain type.

use super::actions::ClaimAction;
use super::error::ClaimStoreError;
use crate::model::{Claim, ClaimCreate, ClaimFilter, ClaimId, ClaimStatus};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use std::convert::Infallible;

#[async_trait]
impl ActorEntity for Claim {
    type Id = ClaimId;
    type Create = ClaimCreate;
    /// Claims are never edited; status moves only through [`ClaimAction`].
    type Update = Infallible;
    type Action = ClaimAction;
    type ActionResult = Claim;
    type Filter = ClaimFilter;
    type Context = ();
    type Error = ClaimStoreError;

    fn from_create_params(id: ClaimId, params: ClaimCreate) -> Result<Self, ClaimStoreError> {
        if params.claimant == params.owner {
            return Err(ClaimStoreError::Validation(
                "claimant and owner must differ".into(),
            ));
        }
        Ok(Claim::new(id, params))
    }

    async fn on_update(&mut self, update: Infallible, _ctx: &()) -> Result<(), ClaimStoreError> {
        match update {}
    }

    async fn handle_action(
        &mut self,
        action: ClaimAction,
        _ctx: &(),
    ) -> Result<Claim, ClaimStoreError> {
        match action {
            ClaimAction::Resolve { outcome, at } => {
                if !self.status.is_resolvable() {
                    return Err(ClaimStoreError::AlreadyResolved {
                        id: self.id.to_string(),
                        status: self.status,
                    });
                }
                self.status = outcome.into();
                self.resolved_at = Some(at);
                Ok(self.clone())
            }
            ClaimAction::Reopen { from } => {
                if self.status != from {
                    return Err(ClaimStoreError::Conflict {
                        id: self.id.to_string(),
                        expected: from,
                        actual: self.status,
                    });
                }
                self.status = ClaimStatus::Accepted;
                self.resolved_at = None;
                Ok(self.clone())
            }
        }
    }

    fn matches(&self, filter: &ClaimFilter) -> bool {
        filter.matches(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClaimOutcome, ListingId, UserId};
    use chrono::Utc;

    fn claim() -> Claim {
        Claim::new(
            ClaimId(1),
            ClaimCreate {
                listing_id: ListingId(1),
                claimant: UserId::from("ana"),
                owner: UserId::from("donor"),
            },
        )
    }

    #[tokio::test]
    async fn test_second_resolution_is_rejected() {
        let mut claim = claim();
        let resolve = |outcome| ClaimAction::Resolve {
            outcome,
            at: Utc::now(),
        };

        let done = claim
            .handle_action(resolve(ClaimOutcome::Completed), &())
            .await
            .unwrap();
        assert_eq!(done.status, ClaimStatus::Completed);
        assert!(done.resolved_at.is_some());

        let err = claim
            .handle_action(resolve(ClaimOutcome::Cancelled), &())
            .await
            .unwrap_err();
        assert!(err.is_contention());
        assert_eq!(
            err,
            ClaimStoreError::AlreadyResolved {
                id: "claim_1".into(),
                status: ClaimStatus::Completed,
            }
        );
    }

    #[tokio::test]
    async fn test_reopen_only_from_the_resolved_status() {
        let mut claim = claim();
        claim.status = ClaimStatus::Cancelled;
        claim.resolved_at = Some(Utc::now());

        let err = claim
            .handle_action(
                ClaimAction::Reopen {
                    from: ClaimStatus::Completed,
                },
                &(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimStoreError::Conflict { .. }));

        let reopened = claim
            .handle_action(
                ClaimAction::Reopen {
                    from: ClaimStatus::Cancelled,
                },
                &(),
            )
            .await
            .unwrap();
        assert_eq!(reopened.status, ClaimStatus::Accepted);
        assert_eq!(reopened.resolved_at, None);
    }

    #[test]
    fn test_owner_cannot_be_recorded_as_claimant() {
        let params = ClaimCreate {
            listing_id: ListingId(1),
            claimant: UserId::from("donor"),
            owner: UserId::from("donor"),
        };
        assert!(matches!(
            Claim::from_create_params(ClaimId(1), params),
            Err(ClaimStoreError::Validation(_))
        ));
    }
}
