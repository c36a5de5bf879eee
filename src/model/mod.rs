//! Pure data structures (DTOs) and the entities managed by the resource actors.

pub mod claim;
pub mod listing;
pub mod notification;
pub mod user;

pub use claim::*;
pub use listing::*;
pub use notification::*;
pub use user::*;
