//! Demo: a donor publishes a listing, two recipients race for it, the winner
//! completes the pickup and the donor catches up on everything that happened.

use foodshare::config::SystemConfig;
use foodshare::lifecycle::{setup_tracing, FoodShareSystem};
use foodshare::model::{ClaimOutcome, ListingDetails, UserId};
use foodshare::presence::ChannelHandle;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = SystemConfig::from_env();
    let system = FoodShareSystem::new(config.clone());
    let mut events = system.subscribe();

    let donor = UserId::from("donor");
    let ana = UserId::from("ana");
    let ben = UserId::from("ben");

    // Ana is connected; the donor and Ben are not.
    let (channel, mut ana_inbox) = ChannelHandle::open(config.channel_buffer);
    system.presence.join(ana.clone(), channel).await?;

    let listing = system
        .listings
        .publish(
            donor.clone(),
            ListingDetails::new("Day-old bread", 6).with_pickup_location("Bakery back door"),
        )
        .await?;
    info!(%listing, "Listing published");

    let span = tracing::info_span!("claim_race", %listing);
    let (first, second) = async {
        tokio::join!(
            system.coordinator.submit_claim(listing, ana.clone()),
            system.coordinator.submit_claim(listing, ben.clone()),
        )
    }
    .instrument(span)
    .await;

    let receipt = match (first, second) {
        (Ok(receipt), Err(lost)) | (Err(lost), Ok(receipt)) => {
            info!(error = %lost, "Losing claim");
            receipt
        }
        (Ok(_), Ok(_)) => return Err("both claims succeeded".into()),
        (Err(a), Err(b)) => return Err(format!("both claims failed: {a}; {b}").into()),
    };
    info!(claim = %receipt.claim.id, winner = %receipt.claim.claimant, pushed = receipt.fanout.pushed, "Race decided");

    let done = system
        .coordinator
        .resolve_claim(receipt.claim.id, donor.clone(), ClaimOutcome::Completed)
        .await?;
    info!(claim = %done.claim.id, status = %done.claim.status, "Pickup completed");

    while let Ok(notification) = ana_inbox.try_recv() {
        info!(id = %notification.id, kind = %notification.kind, "Ana live push");
    }
    while let Ok(envelope) = events.try_recv() {
        let json = envelope.to_json()?;
        info!(%json, "Event");
    }
    for notification in system.catch_up(donor, None).await? {
        info!(id = %notification.id, kind = %notification.kind, delivered = notification.delivered, "Donor catch-up");
    }

    drop(events);
    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
