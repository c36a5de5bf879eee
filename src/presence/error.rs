use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PresenceError {
    /// The router task is gone.
    #[error("Presence router unavailable")]
    Unavailable,
}
