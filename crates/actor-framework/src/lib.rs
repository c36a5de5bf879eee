//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent resource stores on Tokio. Each resource
//! type gets its own actor: a task that exclusively owns the entities of that type and
//! serves CRUD, action and query requests one at a time.
//!
//! ## Why actors for stores?
//!
//! - **Isolated state**: no shared memory, no locks around the entity map.
//! - **Atomic requests**: the actor finishes one request before reading the next, so a
//!   check-then-mutate inside a single action is a compare-and-set for every caller.
//! - **Cheap handles**: clients are cloneable senders that can be passed to any task.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain types and their rules
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and storage
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed communication
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Seat { id: u32, holder: Option<String> }
//!
//! #[derive(Debug)] struct SeatCreate;
//! #[derive(Debug)] struct SeatUpdate;
//! #[derive(Debug)] enum SeatAction { Take(String) }
//! #[derive(Debug, PartialEq, thiserror::Error)]
//! enum SeatError {
//!     #[error("seat already taken")]
//!     Taken,
//! }
//!
//! #[async_trait]
//! impl ActorEntity for Seat {
//!     type Id = u32;
//!     type Create = SeatCreate;
//!     type Update = SeatUpdate;
//!     type Action = SeatAction;
//!     type ActionResult = ();
//!     type Filter = ();
//!     type Context = ();
//!     type Error = SeatError;
//!
//!     fn from_create_params(id: u32, _: SeatCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, holder: None })
//!     }
//!
//!     async fn on_update(&mut self, _: SeatUpdate, _: &()) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//!
//!     // Check and write in one request: only one taker can ever win.
//!     async fn handle_action(&mut self, action: SeatAction, _: &()) -> Result<(), Self::Error> {
//!         match action {
//!             SeatAction::Take(who) if self.holder.is_none() => {
//!                 self.holder = Some(who);
//!                 Ok(())
//!             }
//!             SeatAction::Take(_) => Err(SeatError::Taken),
//!         }
//!     }
//!
//!     fn matches(&self, _: &()) -> bool { true }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Seat>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(SeatCreate).await.unwrap();
//!     client.perform_action(id, SeatAction::Take("ana".into())).await.unwrap();
//!
//!     let lost = client.perform_action(id, SeatAction::Take("ben".into())).await;
//!     let err: FrameworkError = lost.unwrap_err();
//!     assert_eq!(err.downcast_entity::<SeatError>().ok(), Some(SeatError::Taken));
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are passed to `run(context)`, not to `new()`. Actors can therefore be
//! created first and wired afterwards, which keeps construction free of ordering
//! constraints.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from queued expectations, and
//! [`mock::create_mock_client`] lets a test play the actor by hand.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod telemetry;

pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
