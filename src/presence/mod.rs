//! Live connection tracking and best-effort push.
//!
//! - [`channel`] - [`ChannelHandle`], the sending half of a user's connection
//! - [`router`] - [`PresenceRouter`] and the task that owns the presence table
//! - [`error`] - [`PresenceError`]

pub mod channel;
pub mod error;
pub mod router;

pub use channel::*;
pub use error::*;
pub use router::*;
