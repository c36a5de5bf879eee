//! The claim protocol: [`ClaimCoordinator`], its receipts and [`ClaimError`].

pub mod error;
pub mod receipt;
pub mod service;

pub use error::*;
pub use receipt::*;
pub use service::*;
