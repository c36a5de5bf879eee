use crate::claim_actor;
use crate::clients::{ClaimClient, ListingClient, NotificationClient};
use crate::config::SystemConfig;
use crate::coordinator::ClaimCoordinator;
use crate::fanout::{EventEnvelope, EventFanout};
use crate::listing_actor;
use crate::model::{Notification, NotificationId, UserId};
use crate::notification_actor::{self, NotificationError};
use crate::presence::PresenceRouter;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}

/// The running food-sharing core: three stores, the presence router and the
/// coordinator wired on top of them.
///
/// # Example
///
/// ```rust
/// use foodshare::config::SystemConfig;
/// use foodshare::lifecycle::FoodShareSystem;
/// use foodshare::model::{ListingDetails, UserId};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = FoodShareSystem::new(SystemConfig::default());
///
///     let donor = UserId::from("donor");
///     let listing = system.listings.publish(donor.clone(), ListingDetails::new("Soup", 3)).await?;
///     let receipt = system.coordinator.submit_claim(listing, UserId::from("ana")).await?;
///     assert!(!receipt.is_degraded());
///
///     let inbox = system.catch_up(donor, None).await?;
///     assert_eq!(inbox.len(), 1);
///
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct FoodShareSystem {
    pub listings: ListingClient,
    pub notifications: NotificationClient,
    pub presence: PresenceRouter,
    pub coordinator: ClaimCoordinator,
    config: SystemConfig,
    handles: Vec<JoinHandle<()>>,
}

impl FoodShareSystem {
    /// Spawns every actor and wires the clients together. Must be called inside a
    /// Tokio runtime.
    pub fn new(config: SystemConfig) -> Self {
        // 1. Create actors
        let (listing_actor, listing_client) = listing_actor::new(config.actor_mailbox);
        let (claim_actor, claim_client) = claim_actor::new(config.actor_mailbox);
        let (notification_actor, notification_client) =
            notification_actor::new(config.actor_mailbox);
        let (presence_actor, presence) = PresenceRouter::new(config.presence_mailbox);

        // 2. Start them; none of the stores depends on another
        let handles = vec![
            tokio::spawn(listing_actor.run(())),
            tokio::spawn(claim_actor.run(())),
            tokio::spawn(notification_actor.run(())),
            tokio::spawn(presence_actor.run()),
        ];

        // 3. Wire the protocol layer
        let listings = ListingClient::new(listing_client);
        let notifications = NotificationClient::new(notification_client);
        let fanout = EventFanout::new(
            notifications.clone(),
            presence.clone(),
            config.event_capacity,
            config.push_timeout(),
        );
        let coordinator = ClaimCoordinator::new(
            listings.clone(),
            ClaimClient::new(claim_client),
            fanout,
        );

        info!(?config, "System started");
        Self {
            listings,
            notifications,
            presence,
            coordinator,
            config,
            handles,
        }
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.coordinator.fanout().subscribe()
    }

    /// Everything in `user`'s log after `since`, paged with the configured size.
    pub async fn catch_up(
        &self,
        user: UserId,
        since: Option<NotificationId>,
    ) -> Result<Vec<Notification>, NotificationError> {
        self.notifications
            .list_for(user, since, self.config.catch_up_page)
            .collect_all()
            .await
    }

    /// Drops every client and waits for each actor to drain its mailbox and stop.
    ///
    /// Clones of the clients or of the coordinator held elsewhere keep their
    /// actors alive; drop them first.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down system...");
        let Self {
            listings,
            notifications,
            presence,
            coordinator,
            handles,
            ..
        } = self;
        drop(coordinator);
        drop(listings);
        drop(notifications);
        drop(presence);

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Actor task failed");
                return Err(LifecycleError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
