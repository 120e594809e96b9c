//! Strongly-typed identifiers for spots, pools, receipts, and occupants.

use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Counter for unique [`SpotId`] allocation.
static SPOT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for unique [`ReceiptId`] allocation.
static RECEIPT_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Counter for unique [`PoolId`] allocation.
static POOL_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Identifies a single spot.
///
/// Allocated from a monotonic atomic counter via [`SpotId::next`], so
/// ids are unique within the process and ordered by creation. Selection
/// strategies rely on that ordering as a deterministic tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotId(pub u64);

impl SpotId {
    /// Allocate a fresh, unique spot ID. Thread-safe.
    pub fn next() -> Self {
        Self(SPOT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SpotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spot-{}", self.0)
    }
}

impl From<u64> for SpotId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a pool of spots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u32);

impl PoolId {
    /// Allocate a fresh, unique pool ID. Thread-safe.
    pub fn next() -> Self {
        Self(POOL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pool-{}", self.0)
    }
}

impl From<u32> for PoolId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a receipt issued by the allocator.
///
/// Never reused: a released receipt's ID is retired, so a stale ID can
/// only ever miss in the registry, never alias a newer allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiptId(pub u64);

impl ReceiptId {
    /// Allocate a fresh, unique receipt ID. Thread-safe.
    pub fn next() -> Self {
        Self(RECEIPT_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "receipt-{}", self.0)
    }
}

impl From<u64> for ReceiptId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Caller-supplied identity of an occupant (e.g. a licence plate).
///
/// Opaque to the allocator: only equality and hashing matter. At most
/// one active receipt may exist per identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupantId(String);

impl OccupantId {
    /// Wrap an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OccupantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OccupantId {
    fn from(v: &str) -> Self {
        Self(v.to_string())
    }
}

impl From<String> for OccupantId {
    fn from(v: String) -> Self {
        Self(v)
    }
}
