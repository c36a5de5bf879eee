//! # Notification Actor
//!
//! The durable, per-user notification log. It does not care whether the recipient
//! is connected; live delivery is layered on top by the fanout.

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::Notification;
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Notification actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Notification>, ResourceClient<Notification>) {
    ResourceActor::new(buffer_size)
}
