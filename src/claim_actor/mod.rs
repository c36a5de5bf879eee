//! # Claim Actor
//!
//! Stores [`Claim`] records. A claim is created only after its listing has already
//! moved to Claimed, so this store never decides who wins a listing; it guards the
//! claim's own resolution with [`ClaimAction::Resolve`].

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Claim;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Claim actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Claim>, ResourceClient<Claim>) {
    ResourceActor::new(buffer_size)
}
