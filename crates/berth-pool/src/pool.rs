//! [`SpotPool`]: a set of spots plus a per-class availability index.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use berth_core::{CapacityClass, PoolId, SpotId};
use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::spot::Spot;

/// A named collection of spots with a fast-path availability index.
///
/// Spots are added during setup through `&mut self`; once the pool is
/// shared behind an `Arc` its membership is fixed. The index holds one
/// queue per *requested* class, listing spots believed free that can
/// serve that class. Each queue has its own lock, so lookups for
/// different classes do not contend.
pub struct SpotPool {
    id: PoolId,
    distance: u32,
    spots: IndexMap<SpotId, Arc<Spot>>,
    index: [Mutex<VecDeque<Arc<Spot>>>; CapacityClass::COUNT],
}

// Compile-time assertion: SpotPool must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SpotPool>();
};

impl SpotPool {
    /// Create an empty pool at the given distance from the entrance.
    ///
    /// `distance` orders pools for nearest-first selection; lower is nearer.
    pub fn new(distance: u32) -> Self {
        Self {
            id: PoolId::next(),
            distance,
            spots: IndexMap::new(),
            index: std::array::from_fn(|_| Mutex::new(VecDeque::new())),
        }
    }

    /// Create a pool pre-populated with `count` spots of each listed class.
    pub fn with_spots(distance: u32, layout: &[(CapacityClass, usize)]) -> Self {
        let mut pool = Self::new(distance);
        for &(class, count) in layout {
            for _ in 0..count {
                pool.add_spot(class);
            }
        }
        pool
    }

    /// This pool's unique ID.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// Distance from the entrance (lower is nearer).
    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Add a new free spot of `class` and index it under every class it serves.
    pub fn add_spot(&mut self, class: CapacityClass) -> Arc<Spot> {
        let spot = Arc::new(Spot::new(class, self.id));
        self.spots.insert(spot.id(), Arc::clone(&spot));
        for served in class.served_classes() {
            self.index[served.index()]
                .get_mut()
                .push_back(Arc::clone(&spot));
        }
        spot
    }

    /// Look up a spot by ID.
    pub fn spot(&self, id: SpotId) -> Option<&Arc<Spot>> {
        self.spots.get(&id)
    }

    /// Iterate over all spots in insertion order.
    pub fn spots(&self) -> impl Iterator<Item = &Arc<Spot>> {
        self.spots.values()
    }

    /// Find a free spot able to host `requested`, without reserving it.
    ///
    /// Fast path: walk the index queue for `requested`, discarding stale
    /// front entries (occupied or incompatible) until a valid one is
    /// found. The valid entry stays queued; [`on_occupied`](Self::on_occupied)
    /// removes it once a reservation succeeds.
    ///
    /// Fallback: if the queue drains, scan every spot and return the
    /// tightest fit (smallest class), first in insertion order on ties.
    pub fn find_available(&self, requested: CapacityClass) -> Option<Arc<Spot>> {
        {
            let mut queue = self.index[requested.index()].lock();
            while let Some(front) = queue.front() {
                if front.can_host(requested) {
                    return Some(Arc::clone(front));
                }
                queue.pop_front();
            }
        }

        tracing::trace!(
            pool = %self.id,
            requested = %requested,
            "availability index exhausted, scanning all spots"
        );
        self.spots
            .values()
            .filter(|spot| spot.can_host(requested))
            .min_by_key(|spot| spot.class())
            .cloned()
    }

    /// Remove `spot` from every index queue it could be listed in.
    pub fn on_occupied(&self, spot: &Spot) {
        let id = spot.id();
        for served in spot.class().served_classes() {
            self.index[served.index()].lock().retain(|s| s.id() != id);
        }
    }

    /// Re-list `spot` under every class it serves.
    ///
    /// Membership is checked first, so repeated occupy/free cycles never
    /// accumulate duplicate entries. Spots not owned by this pool are ignored.
    pub fn on_freed(&self, spot: &Spot) {
        let Some(owned) = self.spots.get(&spot.id()) else {
            return;
        };
        for served in spot.class().served_classes() {
            let mut queue = self.index[served.index()].lock();
            if !queue.iter().any(|s| s.id() == owned.id()) {
                queue.push_back(Arc::clone(owned));
            }
        }
    }

    /// Total number of spots.
    pub fn total_spots(&self) -> usize {
        self.spots.len()
    }

    /// Number of occupied spots.
    pub fn occupied_spots(&self) -> usize {
        self.spots.values().filter(|s| s.is_occupied()).count()
    }

    /// Number of free spots able to host `requested`.
    ///
    /// Uses the same compatibility rule as [`find_available`](Self::find_available).
    pub fn available_spots(&self, requested: CapacityClass) -> usize {
        self.spots
            .values()
            .filter(|s| s.can_host(requested))
            .count()
    }

    /// Free spots grouped by their own class, indexed by [`CapacityClass::index`].
    pub fn free_by_class(&self) -> [usize; CapacityClass::COUNT] {
        let mut counts = [0; CapacityClass::COUNT];
        for spot in self.spots.values().filter(|s| !s.is_occupied()) {
            counts[spot.class().index()] += 1;
        }
        counts
    }

    /// Current length of the index queue for `requested`, stale entries included.
    pub fn indexed_len(&self, requested: CapacityClass) -> usize {
        self.index[requested.index()].lock().len()
    }
}

impl fmt::Debug for SpotPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpotPool")
            .field("id", &self.id)
            .field("distance", &self.distance)
            .field("total_spots", &self.total_spots())
            .field("occupied_spots", &self.occupied_spots())
            .finish()
    }
}
