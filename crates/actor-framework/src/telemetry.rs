//! # Observability
//!
//! Subscriber setup shared by every binary built on the framework.
//!
//! The actor loop already emits structured events for each request (`entity_type`,
//! `id`, payloads at debug), so the subscriber only needs filtering and a compact
//! layout. The log level comes from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run                     # lifecycle + successful operations
//! RUST_LOG=debug cargo run                    # payloads, queries, rejected actions
//! RUST_LOG=actor_framework=debug,info cargo run
//! ```

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global `tracing` subscriber.
///
/// Compact format, no module targets (the actor loop tags events with
/// `entity_type` instead). Calling it twice is harmless: the second install is
/// ignored.
pub fn setup_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}
