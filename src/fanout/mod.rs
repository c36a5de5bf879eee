//! Durable-then-live notification fanout and the wire envelope it publishes.

pub mod dispatcher;
pub mod envelope;
pub mod report;

pub use dispatcher::*;
pub use envelope::*;
pub use report::*;
