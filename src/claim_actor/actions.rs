//! Custom actions for the Claim actor.

use crate::model::{ClaimOutcome, ClaimStatus};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub enum ClaimAction {
    /// Moves an Accepted claim to the outcome's status in one step.
    /// Any other current status yields `AlreadyResolved`.
    Resolve {
        outcome: ClaimOutcome,
        at: DateTime<Utc>,
    },
    /// Undoes a `Resolve` whose listing transition did not go through.
    Reopen { from: ClaimStatus },
}
