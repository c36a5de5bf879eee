//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod claim_client;
pub mod listing_client;
pub mod notification_client;

pub use claim_client::*;
pub use listing_client::*;
pub use notification_client::*;
