//! # Framework Errors
//!
//! Errors produced by the actor plumbing itself, plus the boxed entity error that
//! carries an actor's own error type back to its client.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the actor behind the client is gone (mailbox or reply channel closed).
    ///
    /// Clients treat this as their store being unavailable.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ActorClosed | Self::ActorDropped)
    }

    /// Recover the typed entity error boxed inside [`FrameworkError::EntityError`].
    ///
    /// Returns `Err(self)` unchanged when this is not an entity error of type `E`,
    /// so callers can fall through to their own mapping.
    ///
    /// ```rust
    /// use actor_framework::FrameworkError;
    ///
    /// #[derive(Debug, PartialEq, thiserror::Error)]
    /// #[error("sold out")]
    /// struct SoldOut;
    ///
    /// let err = FrameworkError::EntityError(Box::new(SoldOut));
    /// assert_eq!(err.downcast_entity::<SoldOut>().ok(), Some(SoldOut));
    ///
    /// let closed = FrameworkError::ActorClosed;
    /// assert!(closed.downcast_entity::<SoldOut>().is_err());
    /// ```
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            Self::EntityError(inner) => match inner.downcast::<E>() {
                Ok(typed) => Ok(*typed),
                Err(other) => Err(Self::EntityError(other)),
            },
            other => Err(other),
        }
    }
}
