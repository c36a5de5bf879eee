use crate::fanout::FanoutReport;
use crate::model::{Claim, FoodListing};

/// A claim operation that went through.
///
/// The state change is final even when the receipt is degraded; degraded only
/// means the notification trail could not be written in full.
#[derive(Debug, Clone)]
pub struct ClaimReceipt {
    pub claim: Claim,
    pub fanout: FanoutReport,
}

impl ClaimReceipt {
    pub fn is_degraded(&self) -> bool {
        !self.fanout.is_complete()
    }
}

/// A listing moved to Expired by a sweep, and the owner's notification outcome.
#[derive(Debug, Clone)]
pub struct ExpiryReceipt {
    pub listing: FoodListing,
    pub fanout: FanoutReport,
}
