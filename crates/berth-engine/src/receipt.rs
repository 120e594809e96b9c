//! [`Receipt`]: the record of one allocation.

use std::fmt;
use std::sync::{Arc, OnceLock};

use berth_core::{CapacityClass, OccupantId, ReceiptId};
use berth_pool::{Spot, SpotPool};
use chrono::{NaiveDateTime, TimeDelta};

/// Record of an allocation, issued by `Allocator::allocate`.
///
/// Immutable except for the exit timestamp, which is written exactly
/// once when the allocation is released. After that the receipt is
/// inert: it has left the allocator's registries but callers may keep
/// their `Arc<Receipt>` for auditing.
pub struct Receipt {
    id: ReceiptId,
    occupant: OccupantId,
    class: CapacityClass,
    pool: Arc<SpotPool>,
    spot: Arc<Spot>,
    entry: NaiveDateTime,
    exit: OnceLock<NaiveDateTime>,
}

// Compile-time assertion: Receipt must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Receipt>();
};

impl Receipt {
    pub(crate) fn new(
        occupant: OccupantId,
        class: CapacityClass,
        pool: Arc<SpotPool>,
        spot: Arc<Spot>,
        entry: NaiveDateTime,
    ) -> Self {
        Self {
            id: ReceiptId::next(),
            occupant,
            class,
            pool,
            spot,
            entry,
            exit: OnceLock::new(),
        }
    }

    /// Unique receipt ID.
    pub fn id(&self) -> ReceiptId {
        self.id
    }

    /// Identity of the occupant holding this receipt.
    pub fn occupant(&self) -> &OccupantId {
        &self.occupant
    }

    /// Capacity class the occupant requested (not the spot's class).
    pub fn requested_class(&self) -> CapacityClass {
        self.class
    }

    /// The reserved spot.
    pub fn spot(&self) -> &Arc<Spot> {
        &self.spot
    }

    /// The pool owning the reserved spot.
    pub fn pool(&self) -> &Arc<SpotPool> {
        &self.pool
    }

    /// When the allocation was made.
    pub fn entry(&self) -> NaiveDateTime {
        self.entry
    }

    /// When the allocation was released, if it has been.
    pub fn exit(&self) -> Option<NaiveDateTime> {
        self.exit.get().copied()
    }

    /// Whether the exit timestamp has been set.
    pub fn is_released(&self) -> bool {
        self.exit.get().is_some()
    }

    /// Time between entry and exit, once released.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.exit().map(|exit| exit - self.entry)
    }

    /// Record the exit timestamp. Returns `false` if it was already set.
    pub(crate) fn stamp_exit(&self, at: NaiveDateTime) -> bool {
        self.exit.set(at).is_ok()
    }
}

impl fmt::Debug for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receipt")
            .field("id", &self.id)
            .field("occupant", &self.occupant)
            .field("class", &self.class)
            .field("pool", &self.pool.id())
            .field("spot", &self.spot.id())
            .field("entry", &self.entry)
            .field("exit", &self.exit())
            .finish()
    }
}
