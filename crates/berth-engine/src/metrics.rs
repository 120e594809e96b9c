//! Cumulative allocator counters.
//!
//! [`AllocatorMetrics`] is a plain snapshot; the live counters are
//! relaxed atomics inside the allocator, so reading them never contends
//! with allocation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cumulative allocator activity since construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AllocatorMetrics {
    /// Successful allocations (receipts issued).
    pub allocations: u64,
    /// Successful releases (receipts retired).
    pub releases: u64,
    /// Reservation attempts lost to a concurrent caller's compare-and-set.
    pub reservation_conflicts: u64,
    /// Allocations that found no capacity (empty result).
    pub capacity_misses: u64,
    /// Reserved spots handed back because the occupant was allocated concurrently.
    pub duplicate_rollbacks: u64,
}

/// Live counters backing [`AllocatorMetrics`].
#[derive(Default)]
pub(crate) struct MetricCounters {
    pub(crate) allocations: AtomicU64,
    pub(crate) releases: AtomicU64,
    pub(crate) reservation_conflicts: AtomicU64,
    pub(crate) capacity_misses: AtomicU64,
    pub(crate) duplicate_rollbacks: AtomicU64,
}

impl MetricCounters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> AllocatorMetrics {
        AllocatorMetrics {
            allocations: self.allocations.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            reservation_conflicts: self.reservation_conflicts.load(Ordering::Relaxed),
            capacity_misses: self.capacity_misses.load(Ordering::Relaxed),
            duplicate_rollbacks: self.duplicate_rollbacks.load(Ordering::Relaxed),
        }
    }
}
