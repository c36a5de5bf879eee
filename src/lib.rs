#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # FoodShare Core
//!
//! > **Listing claim coordination and notification delivery for surplus-food sharing.**
//!
//! Donors publish listings, recipients claim them, and both sides hear about every
//! change, whether they are connected at that moment or not.
//!
//! ## 🏗️ Design
//!
//! ### One winner per listing, without locks
//! Every store is a [`ResourceActor`](actor_framework::ResourceActor): a Tokio task
//! that owns its entities and handles one request at a time. A status change is a
//! single compare-and-set request ([`ListingAction::Transition`](listing_actor::ListingAction)),
//! so two claimants racing for a listing are ordered by the mailbox. The first one
//! wins, the second gets [`ClaimError::AlreadyClaimed`](coordinator::ClaimError).
//! Nobody waits and nobody retries.
//!
//! ### Durable first, live second
//! For every accepted transition the [`EventFanout`](fanout::EventFanout) writes one
//! notification per recipient to the durable log, and only then tries the
//! recipient's live channel through the [`PresenceRouter`](presence::PresenceRouter).
//! A lost push costs nothing: [`NotificationClient::list_for`](clients::NotificationClient::list_for)
//! returns the same records on reconnect.
//!
//! ### Typed errors end to end
//! Each store has its own `thiserror` enum. The framework boxes it on the way back
//! and the client downcasts it, so callers match on
//! [`ListingError::Conflict`](listing_actor::ListingError) rather than strings.
//! Contention errors answer `true` to `is_contention()` and are logged at debug.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - listings, claims, notifications and their ids and filters
//! - [`listing_actor`], [`claim_actor`], [`notification_actor`] - the stores
//! - [`clients`] - typed wrappers over the stores
//! - [`presence`] - who is connected, and best-effort push
//! - [`fanout`] - record, push, broadcast; the wire [`EventEnvelope`](fanout::EventEnvelope)
//! - [`coordinator`] - `submit_claim`, `resolve_claim`, expiry sweep
//! - [`config`] - [`SystemConfig`](config::SystemConfig), read from `FOODSHARE_*`
//! - [`lifecycle`] - [`FoodShareSystem`](lifecycle::FoodShareSystem) wiring and shutdown
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run       # demo: two recipients race for one listing
//! RUST_LOG=debug cargo run      # include payloads and lost races
//! cargo test
//! ```

pub mod claim_actor;
pub mod clients;
pub mod config;
pub mod coordinator;
pub mod fanout;
pub mod lifecycle;
pub mod listing_actor;
pub mod model;
pub mod notification_actor;
pub mod presence;
