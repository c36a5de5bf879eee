use actor_framework::mock::MockClient;
use actor_framework::{ActorClient, FrameworkError};
use foodshare::clients::{ClaimClient, ListingClient, NotificationClient};
use foodshare::config::SystemConfig;
use foodshare::coordinator::{ClaimCoordinator, ClaimError};
use foodshare::fanout::EventFanout;
use foodshare::lifecycle::FoodShareSystem;
use foodshare::listing_actor::{self, ListingError};
use foodshare::model::{
    Claim, ClaimCreate, ClaimOutcome, ClaimStatus, FoodListing, ListingChanges, ListingDetails,
    ListingId, ListingStatus, Notification, NotificationKind, UserId,
};
use foodshare::notification_actor::{self, NotificationError};
use foodshare::presence::PresenceRouter;
use foodshare::claim_actor::{self, ClaimStoreError};
use std::time::Duration;

fn user(name: &str) -> UserId {
    UserId::from(name)
}

async fn publish(system: &FoodShareSystem, owner: &str) -> ListingId {
    system
        .listings
        .publish(user(owner), ListingDetails::new("Vegetable box", 1))
        .await
        .expect("publish")
}

async fn kinds_for(system: &FoodShareSystem, who: &str) -> Vec<NotificationKind> {
    system
        .catch_up(user(who), None)
        .await
        .expect("catch up")
        .into_iter()
        .map(|n| n.kind)
        .collect()
}

/// B and C race for L: one is accepted, the other is told it lost, and the owner
/// hears about exactly one claim.
#[tokio::test]
async fn test_concurrent_claims_have_exactly_one_winner() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;

    let claimants: Vec<String> = (0..8).map(|i| format!("recipient_{i}")).collect();
    let attempts: Vec<_> = claimants
        .iter()
        .map(|name| {
            let coordinator = system.coordinator.clone();
            let claimant = user(name);
            tokio::spawn(async move { coordinator.submit_claim(listing, claimant).await })
        })
        .collect();

    let mut winners = Vec::new();
    let mut losers = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(receipt) => winners.push(receipt),
            Err(e) => {
                assert!(e.is_contention(), "unexpected error: {e}");
                assert!(matches!(
                    e,
                    ClaimError::AlreadyClaimed {
                        status: ListingStatus::Claimed,
                        ..
                    }
                ));
                losers += 1;
            }
        }
    }
    assert_eq!(winners.len(), 1);
    assert_eq!(losers, claimants.len() - 1);

    let winner = &winners[0].claim;
    assert_eq!(winner.status, ClaimStatus::Accepted);

    let stored = system.listings.fetch(listing).await.unwrap();
    assert_eq!(stored.status, ListingStatus::Claimed);
    assert_eq!(stored.claimed_by.as_ref(), Some(&winner.claimant));
    assert_eq!(stored.version, 1);
    assert!(stored.is_consistent());

    assert_eq!(kinds_for(&system, "donor").await, vec![NotificationKind::ListingClaimed]);
    assert_eq!(
        kinds_for(&system, winner.claimant.as_str()).await,
        vec![NotificationKind::ClaimAccepted]
    );
    for name in claimants.iter().filter(|n| n.as_str() != winner.claimant.as_str()) {
        assert_eq!(kinds_for(&system, name).await, vec![NotificationKind::ClaimRejected]);
    }

    let claims = system.coordinator.claims_for_listing(listing).await.unwrap();
    assert_eq!(claims.len(), 1);
}

#[tokio::test]
async fn test_owner_cannot_claim_own_listing() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;

    let err = system
        .coordinator
        .submit_claim(listing, user("donor"))
        .await
        .unwrap_err();
    assert_eq!(err, ClaimError::SelfClaimForbidden(listing));
    assert!(!err.is_contention());

    let stored = system.listings.fetch(listing).await.unwrap();
    assert_eq!(stored.status, ListingStatus::Available);
    assert_eq!(stored.version, 0);
    assert!(kinds_for(&system, "donor").await.is_empty());
}

#[tokio::test]
async fn test_claim_on_missing_listing_is_not_found() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let err = system
        .coordinator
        .submit_claim(ListingId(99), user("ana"))
        .await
        .unwrap_err();
    assert_eq!(err, ClaimError::Listing(ListingError::NotFound("listing_99".into())));
}

#[tokio::test]
async fn test_cancelled_claim_makes_listing_claimable_again() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;

    let first = system.coordinator.submit_claim(listing, user("ben")).await.unwrap();
    let cancelled = system
        .coordinator
        .resolve_claim(first.claim.id, user("ben"), ClaimOutcome::Cancelled)
        .await
        .unwrap();
    assert_eq!(cancelled.claim.status, ClaimStatus::Cancelled);

    let reopened = system.listings.fetch(listing).await.unwrap();
    assert_eq!(reopened.status, ListingStatus::Available);
    assert_eq!(reopened.claimed_by, None);

    let second = system.coordinator.submit_claim(listing, user("cleo")).await.unwrap();
    assert_ne!(second.claim.id, first.claim.id);

    let claims = system.coordinator.claims_for_listing(listing).await.unwrap();
    let statuses: Vec<_> = claims.iter().map(|c| (c.claimant.clone(), c.status)).collect();
    assert_eq!(
        statuses,
        vec![
            (user("ben"), ClaimStatus::Cancelled),
            (user("cleo"), ClaimStatus::Accepted),
        ]
    );

    assert_eq!(
        kinds_for(&system, "donor").await,
        vec![
            NotificationKind::ListingClaimed,
            NotificationKind::ClaimCancelled,
            NotificationKind::ListingClaimed,
        ]
    );
}

#[tokio::test]
async fn test_simultaneous_resolutions_only_one_lands() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;
    let claim = system
        .coordinator
        .submit_claim(listing, user("ana"))
        .await
        .unwrap()
        .claim;

    let (complete, cancel) = tokio::join!(
        system
            .coordinator
            .resolve_claim(claim.id, user("donor"), ClaimOutcome::Completed),
        system
            .coordinator
            .resolve_claim(claim.id, user("ana"), ClaimOutcome::Cancelled),
    );

    let (landed, expected_listing) = match (complete, cancel) {
        (Ok(receipt), Err(e)) => {
            assert!(matches!(e, ClaimError::AlreadyResolved { status: ClaimStatus::Completed, .. }));
            (receipt, ListingStatus::Completed)
        }
        (Err(e), Ok(receipt)) => {
            assert!(matches!(e, ClaimError::AlreadyResolved { status: ClaimStatus::Cancelled, .. }));
            (receipt, ListingStatus::Available)
        }
        other => panic!("expected exactly one resolution, got {other:?}"),
    };
    assert!(!landed.is_degraded());

    let stored = system.listings.fetch(listing).await.unwrap();
    assert_eq!(stored.status, expected_listing);
    assert!(stored.is_consistent());
}

#[tokio::test]
async fn test_completed_listing_rejects_further_claims_and_transitions() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;
    let claim = system.coordinator.submit_claim(listing, user("ana")).await.unwrap().claim;
    system
        .coordinator
        .resolve_claim(claim.id, user("donor"), ClaimOutcome::Completed)
        .await
        .unwrap();

    let err = system.coordinator.submit_claim(listing, user("ben")).await.unwrap_err();
    assert_eq!(
        err,
        ClaimError::AlreadyClaimed {
            listing,
            status: ListingStatus::Completed,
        }
    );

    let err = system
        .listings
        .transition(listing, ListingStatus::Completed, ListingStatus::Claimed, user("ben"))
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::InvalidTransition { .. }));

    let stored = system.listings.fetch(listing).await.unwrap();
    assert_eq!(stored.status, ListingStatus::Completed);
    assert_eq!(stored.claimed_by, Some(user("ana")));
    assert_eq!(kinds_for(&system, "ana").await, vec![
        NotificationKind::ClaimAccepted,
        NotificationKind::ListingCompleted,
    ]);
}

#[tokio::test]
async fn test_outsider_cannot_resolve_claim() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;
    let claim = system.coordinator.submit_claim(listing, user("ana")).await.unwrap().claim;

    let err = system
        .coordinator
        .resolve_claim(claim.id, user("mallory"), ClaimOutcome::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, ClaimError::NotParticipant { .. }));

    let untouched = system.coordinator.get_claim(claim.id).await.unwrap();
    assert_eq!(untouched.status, ClaimStatus::Accepted);
}

#[tokio::test]
async fn test_owner_edits_and_cancels_only_while_available() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;
    let changes = || ListingChanges {
        quantity: Some(3),
        ..Default::default()
    };

    let edited = system
        .listings
        .update_details(listing, user("donor"), Some(0), changes())
        .await
        .unwrap();
    assert_eq!(edited.details.quantity, 3);
    assert_eq!(edited.version, 1);

    let err = system
        .listings
        .update_details(listing, user("donor"), Some(0), changes())
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::StaleVersion { expected: 0, actual: 1, .. }));

    let err = system.listings.cancel_listing(listing, user("ana")).await.unwrap_err();
    assert!(matches!(err, ListingError::NotOwner { .. }));

    system.coordinator.submit_claim(listing, user("ana")).await.unwrap();
    let err = system.listings.cancel_listing(listing, user("donor")).await.unwrap_err();
    assert!(err.is_contention());

    let other = publish(&system, "donor").await;
    let cancelled = system.listings.cancel_listing(other, user("donor")).await.unwrap();
    assert_eq!(cancelled.status, ListingStatus::Cancelled);
}

#[tokio::test]
async fn test_expiry_sweep_only_touches_available_listings_past_deadline() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let now = chrono::Utc::now();
    let past = now - chrono::Duration::hours(1);
    let future = now + chrono::Duration::hours(1);

    let stale = system
        .listings
        .publish(user("donor"), ListingDetails::new("Yoghurt", 4).expiring_at(past))
        .await
        .unwrap();
    let fresh = system
        .listings
        .publish(user("donor"), ListingDetails::new("Apples", 9).expiring_at(future))
        .await
        .unwrap();
    let taken = system
        .listings
        .publish(user("donor"), ListingDetails::new("Cheese", 1).expiring_at(past))
        .await
        .unwrap();
    system.coordinator.submit_claim(taken, user("ana")).await.unwrap();

    let receipts = system.coordinator.expire_due(now).await.unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].listing.id, stale);
    assert_eq!(receipts[0].listing.status, ListingStatus::Expired);
    assert_eq!(receipts[0].listing.claimed_by, None);

    assert_eq!(system.listings.fetch(fresh).await.unwrap().status, ListingStatus::Available);
    assert_eq!(system.listings.fetch(taken).await.unwrap().status, ListingStatus::Claimed);

    let log = system.catch_up(user("donor"), None).await.unwrap();
    let expired: Vec<&Notification> = log
        .iter()
        .filter(|n| n.kind == NotificationKind::ListingExpired)
        .collect();
    assert_eq!(expired.len(), 1);
    assert_eq!(expired[0].payload.listing_id, stale);
    assert_eq!(expired[0].payload.actor_id, user("system"));

    assert!(system.coordinator.expire_due(now).await.unwrap().is_empty());
}

/// The notification store is down: the claim still stands and the receipt says
/// the durable trail is missing.
#[tokio::test]
async fn test_notification_outage_yields_degraded_receipt() {
    let (listing_actor, listing_client) = listing_actor::new(8);
    let (claim_actor, claim_client) = claim_actor::new(8);
    let (presence_actor, presence) = PresenceRouter::new(8);
    tokio::spawn(listing_actor.run(()));
    tokio::spawn(claim_actor.run(()));
    tokio::spawn(presence_actor.run());

    let mut notifications = MockClient::<Notification>::new();
    notifications
        .expect_create()
        .return_err(FrameworkError::ActorClosed);

    let listings = ListingClient::new(listing_client);
    let coordinator = ClaimCoordinator::new(
        listings.clone(),
        ClaimClient::new(claim_client),
        EventFanout::new(
            NotificationClient::new(notifications.client()),
            presence,
            8,
            Duration::from_millis(100),
        ),
    );

    let listing = listings
        .publish(user("donor"), ListingDetails::new("Pasta", 2))
        .await
        .unwrap();
    let receipt = coordinator.submit_claim(listing, user("ana")).await.unwrap();

    assert!(receipt.is_degraded());
    assert!(matches!(
        receipt.fanout.storage_error,
        Some(NotificationError::StorageUnavailable(_))
    ));
    assert_eq!(receipt.fanout.pushed, 0);

    let stored = listings.get(listing).await.unwrap().unwrap();
    assert_eq!(stored.status, ListingStatus::Claimed);
    notifications.verify();
}

/// A winner whose reply was lost and who claims again gets the same claim back;
/// nobody is told anything twice.
#[tokio::test]
async fn test_winner_retrying_claim_gets_same_claim_without_notices() {
    let system = FoodShareSystem::new(SystemConfig::default());
    let listing = publish(&system, "donor").await;
    let first = system.coordinator.submit_claim(listing, user("ana")).await.unwrap();

    let retry = system.coordinator.submit_claim(listing, user("ana")).await.unwrap();
    assert_eq!(retry.claim.id, first.claim.id);
    assert_eq!(retry.claim.status, ClaimStatus::Accepted);
    assert!(retry.fanout.recorded.is_empty());
    assert!(!retry.is_degraded());

    assert_eq!(kinds_for(&system, "ana").await, vec![NotificationKind::ClaimAccepted]);
    assert_eq!(kinds_for(&system, "donor").await, vec![NotificationKind::ListingClaimed]);

    let stored = system.listings.fetch(listing).await.unwrap();
    assert_eq!(stored.claimed_by, Some(user("ana")));
    assert_eq!(stored.version, 1);
    assert_eq!(system.coordinator.claims_for_listing(listing).await.unwrap().len(), 1);

    // Someone else still loses.
    let err = system.coordinator.submit_claim(listing, user("ben")).await.unwrap_err();
    assert!(matches!(err, ClaimError::AlreadyClaimed { .. }));
}

fn live_fanout(presence: PresenceRouter) -> EventFanout {
    let (actor, client) = notification_actor::new(8);
    tokio::spawn(actor.run(()));
    EventFanout::new(
        NotificationClient::new(client),
        presence,
        8,
        Duration::from_millis(100),
    )
}

/// The claim store refuses the record after the listing moved to Claimed: the
/// listing is handed back so others can claim it.
#[tokio::test]
async fn test_claim_record_failure_releases_listing() {
    let (listing_actor, listing_client) = listing_actor::new(8);
    let (presence_actor, presence) = PresenceRouter::new(8);
    tokio::spawn(listing_actor.run(()));
    tokio::spawn(presence_actor.run());

    let mut claims = MockClient::<Claim>::new();
    claims.expect_create().return_err(FrameworkError::ActorClosed);

    let listings = ListingClient::new(listing_client);
    let coordinator = ClaimCoordinator::new(
        listings.clone(),
        ClaimClient::new(claims.client()),
        live_fanout(presence),
    );

    let listing = listings
        .publish(user("donor"), ListingDetails::new("Rice", 1))
        .await
        .unwrap();
    let err = coordinator.submit_claim(listing, user("ana")).await.unwrap_err();
    assert!(matches!(
        err,
        ClaimError::Store(ClaimStoreError::StorageUnavailable(_))
    ));
    assert!(err.is_unavailable());

    let stored = listings.fetch(listing).await.unwrap();
    assert_eq!(stored.status, ListingStatus::Available);
    assert_eq!(stored.claimed_by, None);
    assert!(stored.is_consistent());
    claims.verify();
}

/// The claim was resolved but the listing could not follow: the claim goes back
/// to Accepted so the two records still agree.
#[tokio::test]
async fn test_listing_failure_after_resolution_reopens_claim() {
    let (claim_actor, claim_client) = claim_actor::new(8);
    let (presence_actor, presence) = PresenceRouter::new(8);
    tokio::spawn(claim_actor.run(()));
    tokio::spawn(presence_actor.run());

    let mut listings = MockClient::<FoodListing>::new();
    listings.expect_action().return_err(FrameworkError::ActorClosed);

    let claims = ClaimClient::new(claim_client);
    let coordinator = ClaimCoordinator::new(
        ListingClient::new(listings.client()),
        claims.clone(),
        live_fanout(presence),
    );

    let claim_id = claims
        .record(ClaimCreate {
            listing_id: ListingId(1),
            claimant: user("ana"),
            owner: user("donor"),
        })
        .await
        .unwrap();

    let err = coordinator
        .resolve_claim(claim_id, user("donor"), ClaimOutcome::Completed)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClaimError::Listing(ListingError::StorageUnavailable(_))
    ));

    let claim = claims.fetch(claim_id).await.unwrap();
    assert_eq!(claim.status, ClaimStatus::Accepted);
    assert_eq!(claim.resolved_at, None);
    assert_eq!(
        claims.active_for(ListingId(1)).await.unwrap().map(|c| c.id),
        Some(claim_id)
    );
    listings.verify();
}

#[tokio::test]
async fn test_shutdown_stops_every_actor() {
    let system = FoodShareSystem::new(SystemConfig::default());
    publish(&system, "donor").await;
    system.shutdown().await.unwrap();
}
