//! Shared bus arbitration.
//!
//! Removable storage often sits on a bus (SPI, SDIO) shared with other
//! peripherals. The host owns the arbitration policy; the streaming core only
//! guarantees that every [`acquire`](BusArbiter::acquire) is matched by
//! exactly one [`release`](BusArbiter::release).

/// Acquire/release pairing around the lifetime of an open source.
///
/// `acquire` is only called from the control path. `release` can also come
/// from the tick callback when a stream ends, so it must not block. Reentrancy
/// is not required: the core never acquires twice without an intervening
/// release.
#[cfg_attr(test, mockall::automock)]
pub trait BusArbiter: Send + Sync {
    /// Claim the bus before a source is opened.
    fn acquire(&self);

    /// Give the bus back after a source is fully closed.
    fn release(&self);
}

/// Arbiter for storage that does not share a bus (e.g. a dedicated SDIO
/// controller). Both operations are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncontendedBus;

impl BusArbiter for UncontendedBus {
    fn acquire(&self) {}

    fn release(&self) {}
}
