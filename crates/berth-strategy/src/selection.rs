//! The [`SelectionStrategy`] trait and its three variants.

use std::fmt;
use std::sync::Arc;

use berth_core::Occupant;
use berth_pool::{Spot, SpotPool};

/// A proposed spot together with the pool that owns it.
///
/// Proposing is not reserving: the spot may be taken by a concurrent
/// caller before the allocator's compare-and-set runs.
#[derive(Clone)]
pub struct Candidate {
    /// Pool owning `spot`.
    pub pool: Arc<SpotPool>,
    /// The proposed spot.
    pub spot: Arc<Spot>,
}

impl Candidate {
    /// Pair a spot with its owning pool.
    pub fn new(pool: Arc<SpotPool>, spot: Arc<Spot>) -> Self {
        Self { pool, spot }
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("pool", &self.pool.id())
            .field("spot", &self.spot)
            .finish()
    }
}

/// Chooses which free spot an occupant should receive.
///
/// # Contract
///
/// - `select()` has no side effects: it neither reserves the spot nor
///   touches pool indices beyond the lazy stale-entry cleanup that
///   [`SpotPool::find_available`] performs.
/// - Every returned spot belongs to the returned pool and was free and
///   compatible with `occupant.class` at the moment it was inspected.
///
/// # Object safety
///
/// The allocator stores the active strategy as `Arc<dyn SelectionStrategy>`.
pub trait SelectionStrategy: Send + Sync + 'static {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Propose a spot for `occupant` from `pools`, or `None` if no pool has one.
    fn select(&self, pools: &[Arc<SpotPool>], occupant: &Occupant) -> Option<Candidate>;
}

/// Returns the first hit, scanning pools in the given order.
///
/// Cheapest strategy; makes no attempt to minimize wasted capacity.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstAvailable;

impl SelectionStrategy for FirstAvailable {
    fn name(&self) -> &str {
        "first_available"
    }

    fn select(&self, pools: &[Arc<SpotPool>], occupant: &Occupant) -> Option<Candidate> {
        pools.iter().find_map(|pool| {
            pool.find_available(occupant.class)
                .map(|spot| Candidate::new(Arc::clone(pool), spot))
        })
    }
}

/// Queries every pool and keeps the smallest-class candidate.
///
/// Comparison is strict, so the earliest pool wins among equal classes.
#[derive(Clone, Copy, Debug, Default)]
pub struct BestFit;

impl SelectionStrategy for BestFit {
    fn name(&self) -> &str {
        "best_fit"
    }

    fn select(&self, pools: &[Arc<SpotPool>], occupant: &Occupant) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for pool in pools {
            let Some(spot) = pool.find_available(occupant.class) else {
                continue;
            };
            let better = match &best {
                None => true,
                Some(current) => spot.class() < current.spot.class(),
            };
            if better {
                best = Some(Candidate::new(Arc::clone(pool), spot));
            }
        }
        best
    }
}

/// Prefers the pool nearest the entrance.
///
/// Candidates are ordered by `(pool distance, spot ID)`, so the result
/// is deterministic even when several pools share a distance.
#[derive(Clone, Copy, Debug, Default)]
pub struct NearestToEntrance;

impl SelectionStrategy for NearestToEntrance {
    fn name(&self) -> &str {
        "nearest_to_entrance"
    }

    fn select(&self, pools: &[Arc<SpotPool>], occupant: &Occupant) -> Option<Candidate> {
        let mut ordered: Vec<&Arc<SpotPool>> = pools.iter().collect();
        ordered.sort_by_key(|pool| pool.distance());
        ordered
            .into_iter()
            .filter_map(|pool| {
                pool.find_available(occupant.class)
                    .map(|spot| Candidate::new(Arc::clone(pool), spot))
            })
            .min_by_key(|c| (c.pool.distance(), c.spot.id()))
    }
}

/// Configuration-level name of a selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    /// [`FirstAvailable`].
    FirstAvailable,
    /// [`BestFit`].
    BestFit,
    /// [`NearestToEntrance`].
    NearestToEntrance,
}

impl SelectionKind {
    /// Instantiate the strategy this kind names.
    pub fn build(self) -> Arc<dyn SelectionStrategy> {
        match self {
            Self::FirstAvailable => Arc::new(FirstAvailable),
            Self::BestFit => Arc::new(BestFit),
            Self::NearestToEntrance => Arc::new(NearestToEntrance),
        }
    }
}
