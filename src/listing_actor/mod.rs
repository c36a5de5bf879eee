//! # Listing Actor
//!
//! The listing store: owns every [`FoodListing`] and the atomic status transition.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`FoodListing`]
//! - [`error`] - [`ListingError`]
//! - [`actions`] - [`ListingAction::Transition`], the compare-and-set primitive
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Why transitions are safe without locks
//!
//! The actor processes one request at a time. A `Transition` request compares the
//! listing's status with the caller's expected status and writes the new one inside
//! the same request, so two claimants racing for one listing are simply ordered by
//! the mailbox: the first request wins, the second sees `Conflict`.
//!
//! ## Usage
//!
//! ```rust
//! use foodshare::clients::ListingClient;
//! use foodshare::listing_actor;
//! use foodshare::model::{ListingDetails, ListingStatus, UserId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = listing_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!     let listings = ListingClient::new(generic_client);
//!
//!     let donor = UserId::from("donor");
//!     let id = listings.publish(donor, ListingDetails::new("Bagels", 12)).await?;
//!
//!     let claimed = listings
//!         .transition(id, ListingStatus::Available, ListingStatus::Claimed, UserId::from("ana"))
//!         .await?;
//!     assert_eq!(claimed.version, 1);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::FoodListing;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Listing actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<FoodListing>, ResourceClient<FoodListing>) {
    ResourceActor::new(buffer_size)
}
