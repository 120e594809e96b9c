//! Reusable pool, occupant, and strategy fixtures.
//!
//! - [`pool`] — an `Arc<SpotPool>` from a compact layout.
//! - [`occupants`] — `n` distinct occupants of one class.
//! - [`PinnedSelection`] — always proposes one fixed spot, free or not.

use std::sync::Arc;

use berth_core::{CapacityClass, Occupant};
use berth_pool::{Spot, SpotPool};
use berth_strategy::{Candidate, SelectionStrategy};

/// Build a shared pool at `distance` with `count` spots per listed class.
pub fn pool(distance: u32, layout: &[(CapacityClass, usize)]) -> Arc<SpotPool> {
    Arc::new(SpotPool::with_spots(distance, layout))
}

/// `n` occupants of `class` named `{prefix}-0 .. {prefix}-{n-1}`.
pub fn occupants(prefix: &str, class: CapacityClass, n: usize) -> Vec<Occupant> {
    (0..n)
        .map(|i| Occupant::new(format!("{prefix}-{i}"), class))
        .collect()
}

/// Proposes the same spot on every call, even once it is occupied.
///
/// Useful for driving the allocator's reservation retry loop: with the
/// pinned spot already taken, every attempt loses the compare-and-set.
pub struct PinnedSelection {
    pub pool: Arc<SpotPool>,
    pub spot: Arc<Spot>,
}

impl PinnedSelection {
    pub fn new(pool: Arc<SpotPool>, spot: Arc<Spot>) -> Self {
        Self { pool, spot }
    }

    /// Pin the first spot (insertion order) of `pool`, or `None` if it is empty.
    pub fn first_of(pool: &Arc<SpotPool>) -> Option<Self> {
        let spot = pool.spots().next()?;
        Some(Self::new(Arc::clone(pool), Arc::clone(spot)))
    }
}

impl SelectionStrategy for PinnedSelection {
    fn name(&self) -> &str {
        "pinned"
    }

    fn select(&self, _pools: &[Arc<SpotPool>], _occupant: &Occupant) -> Option<Candidate> {
        Some(Candidate::new(
            Arc::clone(&self.pool),
            Arc::clone(&self.spot),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_core::OccupantId;

    #[test]
    fn occupants_are_distinct() {
        let v = occupants("car", CapacityClass::Medium, 3);
        assert_eq!(v.len(), 3);
        assert_eq!(v[2].id, OccupantId::from("car-2"));
        assert!(v.iter().all(|o| o.class == CapacityClass::Medium));
    }

    #[test]
    fn pinned_selection_ignores_occupancy() {
        let p = pool(0, &[(CapacityClass::Small, 2)]);
        let pinned = PinnedSelection::first_of(&p).unwrap();
        pinned.spot.occupy(&OccupantId::from("x"));
        let c = pinned.select(&[], &Occupant::small("y")).unwrap();
        assert_eq!(c.spot.id(), pinned.spot.id());
        assert!(c.spot.is_occupied());
    }
}
