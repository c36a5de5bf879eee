//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every stored resource (listing, claim,
//! notification, …) implements to be managed by the generic `ResourceActor`. It fixes
//! the associated types for ids, DTOs, actions, query filters, context and errors, and
//! provides the hooks the actor loop calls (`on_create`, `on_update`, `handle_action`,
//! `matches`).
//!
//! # Atomicity
//! A `ResourceActor` runs every hook to completion before it reads the next request
//! from its mailbox. Anything an entity does inside a single `handle_action` call is
//! therefore indivisible as seen by every client: a check of the current state followed
//! by a mutation in the same action is a compare-and-set, never a read-then-write race.
//!
//! # Ordering
//! Ids are generated from a monotonic `u32` counter, and the actor keeps its entities
//! in an ordered map. With `Id: Ord` that makes store order equal creation order, which
//! is what [`ResourceClient::query`](crate::ResourceClient::query) returns.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// The trait is `#[async_trait]` so hooks may await other actors. The `Context`
/// associated type is injected into every hook by `run()`, which lets dependencies be
/// bound late (clients are passed to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation, and ordered so
    /// that queries come back in creation order.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations (e.g. a conditional status transition).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Selection criteria accepted by `Query` requests.
    type Filter: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message: callers match on a single
    /// type, at the cost of some variants being unreachable from some actions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after the entity is constructed and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    /// Whether this entity is selected by `filter`.
    fn matches(&self, filter: &Self::Filter) -> bool;
}
