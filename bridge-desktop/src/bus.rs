//! Reference-counted bus arbitration

use bridge_traits::bus::BusArbiter;
use parking_lot::Mutex;
use tracing::{trace, warn};

/// Tracks how many users currently hold a shared storage bus.
///
/// Several players can stream from the same card, so the bus stays claimed
/// until the last one releases it. A release without a matching acquire is
/// logged and ignored rather than underflowing the count.
pub struct SharedBusArbiter {
    name: &'static str,
    holders: Mutex<usize>,
}

impl SharedBusArbiter {
    /// Create an arbiter for the named bus with no holders.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            holders: Mutex::new(0),
        }
    }

    /// Number of outstanding acquisitions.
    pub fn holders(&self) -> usize {
        *self.holders.lock()
    }

    /// Returns `true` while at least one user holds the bus.
    pub fn is_in_use(&self) -> bool {
        self.holders() > 0
    }
}

impl BusArbiter for SharedBusArbiter {
    fn acquire(&self) {
        let mut holders = self.holders.lock();
        *holders += 1;
        trace!(bus = self.name, holders = *holders, "Bus acquired");
    }

    fn release(&self) {
        let mut holders = self.holders.lock();
        if *holders == 0 {
            warn!(bus = self.name, "Bus released without a matching acquire");
            return;
        }
        *holders -= 1;
        trace!(bus = self.name, holders = *holders, "Bus released");
    }
}
