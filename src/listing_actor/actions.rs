//! Custom actions for the Listing actor.
//!
//! Status changes are never expressed as plain updates. They go through
//! [`ListingAction::Transition`], which carries the status the caller believes the
//! listing is in; the actor applies it only if that belief is still true.

use crate::model::{ListingStatus, UserId};

#[derive(Debug, Clone)]
pub enum ListingAction {
    /// Compare-and-set on the listing status.
    ///
    /// Succeeds only if the current status equals `expected` and
    /// `expected → next` is in the transition table. On success the status,
    /// `claimed_by` and `version` change together.
    Transition {
        expected: ListingStatus,
        next: ListingStatus,
        actor: UserId,
    },
}
