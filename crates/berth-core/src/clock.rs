//! Wall-clock source for receipt timestamps.
//!
//! Receipts are stamped in local civil time because peak-hour pricing
//! depends on time of day. The allocator holds an `Arc<dyn Clock>` so
//! tests can substitute a manually-driven clock.

use chrono::NaiveDateTime;

/// Source of the current local date-time.
pub trait Clock: Send + Sync {
    /// The current local date-time.
    fn now(&self) -> NaiveDateTime;
}

/// [`Clock`] backed by the operating system's local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

// Compile-time assertion: SystemClock must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SystemClock>();
};
