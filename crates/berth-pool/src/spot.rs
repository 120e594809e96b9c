//! A single allocatable [`Spot`].

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use berth_core::{CapacityClass, OccupantId, PoolId, SpotId};
use parking_lot::Mutex;

/// One allocatable unit with a fixed capacity class.
///
/// Owned by its [`SpotPool`](crate::SpotPool) and shared as `Arc<Spot>`
/// with receipts and selection candidates.
///
/// # Occupancy protocol
///
/// `occupied` is the reservation word. [`occupy`](Spot::occupy) flips it
/// `false -> true` with a compare-and-set, so of any number of racing
/// callers exactly one wins. Only the winner then writes the occupant
/// slot. [`vacate`](Spot::vacate) clears the slot before publishing
/// `false`, so a new reservation never sees the previous occupant.
pub struct Spot {
    id: SpotId,
    class: CapacityClass,
    pool: PoolId,
    occupied: AtomicBool,
    occupant: Mutex<Option<OccupantId>>,
}

// Compile-time assertion: Spot must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Spot>();
};

impl Spot {
    /// Create a free spot belonging to `pool`.
    pub fn new(class: CapacityClass, pool: PoolId) -> Self {
        Self {
            id: SpotId::next(),
            class,
            pool,
            occupied: AtomicBool::new(false),
            occupant: Mutex::new(None),
        }
    }

    /// This spot's unique ID.
    pub fn id(&self) -> SpotId {
        self.id
    }

    /// This spot's capacity class.
    pub fn class(&self) -> CapacityClass {
        self.class
    }

    /// The pool this spot belongs to.
    pub fn pool_id(&self) -> PoolId {
        self.pool
    }

    /// Whether the spot is currently reserved.
    pub fn is_occupied(&self) -> bool {
        self.occupied.load(Ordering::Acquire)
    }

    /// The current occupant, if any.
    ///
    /// May briefly read `None` for a spot whose reservation has just
    /// been won but not yet recorded.
    pub fn occupant(&self) -> Option<OccupantId> {
        self.occupant.lock().clone()
    }

    /// Whether this spot is free and its class can host `requested`.
    pub fn can_host(&self, requested: CapacityClass) -> bool {
        !self.is_occupied() && self.class.can_host(requested)
    }

    /// Atomically reserve this spot for `occupant`.
    ///
    /// Returns `false` without side effects if the spot was already
    /// occupied (another caller won the race).
    pub fn occupy(&self, occupant: &OccupantId) -> bool {
        if self
            .occupied
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        *self.occupant.lock() = Some(occupant.clone());
        true
    }

    /// Release this spot, returning the previous occupant.
    ///
    /// Returns `None` if the spot was already free.
    pub fn vacate(&self) -> Option<OccupantId> {
        let mut slot = self.occupant.lock();
        let previous = slot.take();
        if self
            .occupied
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        previous
    }
}

impl fmt::Debug for Spot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spot")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("pool", &self.pool)
            .field("occupied", &self.is_occupied())
            .finish()
    }
}
