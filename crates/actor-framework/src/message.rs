//! # Generic Messages
//!
//! The request type carried from `ResourceClient` to `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # Resource-Oriented Architecture
/// Every actor speaks the same small vocabulary instead of ad-hoc messages:
///
/// - **Create**: appends a new resource built from [`ActorEntity::Create`].
/// - **Get**: fetches the current state of one resource by id.
/// - **Update**: mutates one resource with [`ActorEntity::Update`].
/// - **Action**: runs a resource-specific [`ActorEntity::Action`]. This is where
///   conditional updates live, since the check and the write happen in one request.
/// - **Query**: returns every resource selected by an [`ActorEntity::Filter`], in
///   creation order, optionally capped at `limit`.
///
/// Resources are never removed; lifecycle ends are expressed as status changes.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Query {
        filter: T::Filter,
        limit: Option<usize>,
        respond_to: Response<Vec<T>>,
    },
}
