//! # System Lifecycle
//!
//! [`FoodShareSystem`] creates every actor, wires the clients into the
//! coordinator and the fanout, and shuts everything down again.
//!
//! ## Wiring
//!
//! ```text
//!                 ┌──────────────────┐
//!   submit/resolve│ ClaimCoordinator │
//!                 └──┬─────┬──────┬──┘
//!                    │     │      │
//!        ┌───────────▼┐ ┌──▼────┐ │  ┌─────────────┐
//!        │  listings  │ │claims │ └─►│ EventFanout │
//!        └────────────┘ └───────┘    └──┬───────┬──┘
//!                                       │       │
//!                          ┌────────────▼──┐ ┌──▼─────────────┐
//!                          │ notifications │ │ PresenceRouter │
//!                          └───────────────┘ └────────────────┘
//! ```
//!
//! The stores are independent (`Context = ()`), so the graph is acyclic and
//! dropping the clients is enough to stop every task.
//!
//! ## Logging
//!
//! Call [`setup_tracing`] once at startup; `RUST_LOG` picks the level.

pub mod system;

pub use actor_framework::telemetry::setup_tracing;
pub use system::*;
