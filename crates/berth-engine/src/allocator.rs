//! The [`Allocator`]: reservation, receipt registries, and release.
//!
//! # Locking
//!
//! | State | Guard | Held during |
//! |-------|-------|-------------|
//! | spot occupancy | per-spot CAS | `occupy` / `vacate` only |
//! | pool index | per-class mutex inside each pool | index maintenance |
//! | receipt registries | one `RwLock<Registry>` | duplicate checks (shared), insert/remove (exclusive) |
//! | pools, strategies | `RwLock` | cloning the `Arc`s out |
//!
//! Lock order is registry → pool index. Release touches the pool index
//! only after dropping the registry lock.

use std::fmt;
use std::sync::Arc;

use berth_core::{
    AllocError, Clock, Occupant, OccupantId, ReceiptId, ReceiptLookup, ReleaseError,
};
use berth_pool::SpotPool;
use berth_strategy::{Candidate, PricingStrategy, SelectionStrategy};
use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::config::{AllocatorConfig, ConfigError};
use crate::metrics::{AllocatorMetrics, MetricCounters};
use crate::receipt::Receipt;
use crate::stats::Statistics;

/// Default upper bound on select-and-reserve rounds per allocation.
pub const DEFAULT_MAX_RESERVATION_ATTEMPTS: u32 = 10;

/// The two receipt indices. Always mutated together under one write lock.
#[derive(Default)]
struct Registry {
    by_occupant: IndexMap<OccupantId, Arc<Receipt>>,
    by_id: IndexMap<ReceiptId, Arc<Receipt>>,
}

impl Registry {
    fn insert(&mut self, receipt: Arc<Receipt>) {
        self.by_id.insert(receipt.id(), Arc::clone(&receipt));
        self.by_occupant.insert(receipt.occupant().clone(), receipt);
    }

    fn remove_by_occupant(&mut self, occupant: &OccupantId) -> Option<Arc<Receipt>> {
        let receipt = self.by_occupant.swap_remove(occupant)?;
        self.by_id.swap_remove(&receipt.id());
        Some(receipt)
    }

    fn remove_by_id(&mut self, id: ReceiptId) -> Option<Arc<Receipt>> {
        let receipt = self.by_id.swap_remove(&id)?;
        self.by_occupant.swap_remove(receipt.occupant());
        Some(receipt)
    }
}

/// Allocates spots from a set of pools to concurrent occupants.
///
/// Constructed explicitly by the caller and shared by reference (or
/// `Arc`) with every consumer; there is no global instance.
///
/// # Protocol
///
/// `allocate` runs a bounded loop of select-then-reserve rounds with no
/// allocator-wide lock, so allocations for different occupants search
/// and reserve in parallel. Only the final registry insert is
/// serialized. Two concurrent allocations for the same occupant are
/// resolved there: the loser hands its reserved spot back and gets
/// [`AllocError::AlreadyAllocated`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use berth_core::{CapacityClass, Occupant, SystemClock};
/// use berth_engine::Allocator;
/// use berth_pool::SpotPool;
/// use berth_strategy::{BestFit, FlatRate};
///
/// let allocator = Allocator::new(Arc::new(SystemClock));
/// allocator.add_pool(SpotPool::with_spots(0, &[(CapacityClass::Medium, 2)]));
/// allocator.set_selection_strategy(Arc::new(BestFit));
/// allocator.set_pricing_strategy(Arc::new(FlatRate::default()));
///
/// let car = Occupant::medium("KA-01-1234");
/// let receipt = allocator.allocate(&car).unwrap().expect("capacity available");
/// assert_eq!(receipt.occupant(), &car.id);
///
/// let fee = allocator.release(&car.id).unwrap();
/// assert!(fee >= 5.0);
/// ```
pub struct Allocator {
    pools: RwLock<Vec<Arc<SpotPool>>>,
    selection: RwLock<Option<Arc<dyn SelectionStrategy>>>,
    pricing: RwLock<Option<Arc<dyn PricingStrategy>>>,
    registry: RwLock<Registry>,
    clock: Arc<dyn Clock>,
    max_attempts: u32,
    counters: MetricCounters,
}

// Compile-time assertion: Allocator must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Allocator>();
};

impl Allocator {
    /// An allocator with no pools, no strategies, and the default attempt bound.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_max_attempts(clock, DEFAULT_MAX_RESERVATION_ATTEMPTS)
    }

    /// Like [`new`](Self::new) with a custom reservation attempt bound.
    ///
    /// A bound of zero is raised to one.
    pub fn with_max_attempts(clock: Arc<dyn Clock>, max_attempts: u32) -> Self {
        Self {
            pools: RwLock::new(Vec::new()),
            selection: RwLock::new(None),
            pricing: RwLock::new(None),
            registry: RwLock::new(Registry::default()),
            clock,
            max_attempts: max_attempts.max(1),
            counters: MetricCounters::default(),
        }
    }

    /// Validate `config`, then build its pools and install its strategies.
    pub fn from_config(config: &AllocatorConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let allocator = Self::with_max_attempts(clock, config.max_reservation_attempts);
        for pool in &config.pools {
            allocator.add_pool(SpotPool::with_spots(pool.distance, &pool.spots));
        }
        if let Some(kind) = config.selection {
            allocator.set_selection_strategy(kind.build());
        }
        if let Some(pricing) = &config.pricing {
            allocator.set_pricing_strategy(pricing.build());
        }
        tracing::debug!(
            pools = config.pools.len(),
            spots = config.spot_count(),
            max_attempts = allocator.max_attempts,
            "allocator configured"
        );
        Ok(allocator)
    }

    // ── Configuration ──────────────────────────────────────────────

    /// Register a pool. Returns the shared handle the allocator keeps.
    pub fn add_pool(&self, pool: impl Into<Arc<SpotPool>>) -> Arc<SpotPool> {
        let pool = pool.into();
        self.pools.write().push(Arc::clone(&pool));
        pool
    }

    /// Replace the selection strategy for subsequent allocations.
    pub fn set_selection_strategy(&self, strategy: Arc<dyn SelectionStrategy>) {
        tracing::debug!(strategy = strategy.name(), "selection strategy set");
        *self.selection.write() = Some(strategy);
    }

    /// Replace the pricing strategy for subsequent releases.
    pub fn set_pricing_strategy(&self, strategy: Arc<dyn PricingStrategy>) {
        tracing::debug!(strategy = strategy.name(), "pricing strategy set");
        *self.pricing.write() = Some(strategy);
    }

    /// The active selection strategy, if set.
    pub fn selection_strategy(&self) -> Option<Arc<dyn SelectionStrategy>> {
        self.selection.read().clone()
    }

    /// The active pricing strategy, if set.
    pub fn pricing_strategy(&self) -> Option<Arc<dyn PricingStrategy>> {
        self.pricing.read().clone()
    }

    /// The reservation attempt bound.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Snapshot of the registered pools, in registration order.
    pub fn pools(&self) -> Vec<Arc<SpotPool>> {
        self.pools.read().clone()
    }

    // ── Allocation ─────────────────────────────────────────────────

    /// Reserve a spot for `occupant` and issue a receipt.
    ///
    /// Returns `Ok(None)` when no compatible spot could be reserved,
    /// either because none is free or because every attempt lost its
    /// race to a concurrent caller.
    ///
    /// # Errors
    ///
    /// - [`AllocError::AlreadyAllocated`] if the occupant holds an active
    ///   receipt, including one issued concurrently with this call.
    /// - [`AllocError::StrategyNotConfigured`] if no selection strategy is set.
    pub fn allocate(&self, occupant: &Occupant) -> Result<Option<Arc<Receipt>>, AllocError> {
        if self.registry.read().by_occupant.contains_key(&occupant.id) {
            return Err(AllocError::AlreadyAllocated {
                occupant: occupant.id.clone(),
            });
        }
        let selection = self
            .selection_strategy()
            .ok_or(AllocError::StrategyNotConfigured)?;

        let Some(Candidate { pool, spot }) = self.reserve(selection.as_ref(), occupant) else {
            MetricCounters::bump(&self.counters.capacity_misses);
            tracing::debug!(
                occupant = %occupant.id,
                class = %occupant.class,
                "no capacity available"
            );
            return Ok(None);
        };

        let mut registry = self.registry.write();
        if registry.by_occupant.contains_key(&occupant.id) {
            drop(registry);
            spot.vacate();
            pool.on_freed(&spot);
            MetricCounters::bump(&self.counters.duplicate_rollbacks);
            tracing::warn!(
                occupant = %occupant.id,
                spot = %spot.id(),
                "occupant allocated concurrently, rolled back reservation"
            );
            return Err(AllocError::AlreadyAllocated {
                occupant: occupant.id.clone(),
            });
        }

        pool.on_occupied(&spot);
        let receipt = Arc::new(Receipt::new(
            occupant.id.clone(),
            occupant.class,
            Arc::clone(&pool),
            Arc::clone(&spot),
            self.clock.now(),
        ));
        registry.insert(Arc::clone(&receipt));
        drop(registry);

        MetricCounters::bump(&self.counters.allocations);
        tracing::debug!(
            occupant = %occupant.id,
            receipt = %receipt.id(),
            pool = %pool.id(),
            spot = %spot.id(),
            spot_class = %spot.class(),
            "allocated"
        );
        Ok(Some(receipt))
    }

    /// Select-then-occupy, up to `max_attempts` rounds.
    ///
    /// Stops early when the strategy has no candidate at all.
    fn reserve(&self, selection: &dyn SelectionStrategy, occupant: &Occupant) -> Option<Candidate> {
        let pools = self.pools();
        for attempt in 1..=self.max_attempts {
            let candidate = selection.select(&pools, occupant)?;
            if candidate.spot.occupy(&occupant.id) {
                return Some(candidate);
            }
            MetricCounters::bump(&self.counters.reservation_conflicts);
            tracing::trace!(
                occupant = %occupant.id,
                spot = %candidate.spot.id(),
                attempt,
                "lost reservation race, retrying"
            );
        }
        None
    }

    // ── Release ────────────────────────────────────────────────────

    /// Release the allocation held by `occupant` and return its fee.
    ///
    /// # Errors
    ///
    /// - [`ReleaseError::ReceiptNotFound`] if the occupant holds no active receipt.
    /// - [`ReleaseError::StrategyNotConfigured`] if no pricing strategy is
    ///   set. The spot is freed regardless.
    /// - [`ReleaseError::Pricing`] if the clock ran backwards across the stay.
    pub fn release(&self, occupant: &OccupantId) -> Result<f64, ReleaseError> {
        let receipt = self
            .registry
            .write()
            .remove_by_occupant(occupant)
            .ok_or_else(|| ReleaseError::ReceiptNotFound {
                lookup: ReceiptLookup::Occupant(occupant.clone()),
            })?;
        self.settle(&receipt)
    }

    /// Release the allocation recorded by receipt `id` and return its fee.
    ///
    /// Errors as for [`release`](Self::release). A second release of the
    /// same ID reports `ReceiptNotFound`.
    pub fn release_by_receipt_id(&self, id: ReceiptId) -> Result<f64, ReleaseError> {
        let receipt = self
            .registry
            .write()
            .remove_by_id(id)
            .ok_or(ReleaseError::ReceiptNotFound {
                lookup: ReceiptLookup::Receipt(id),
            })?;
        self.settle(&receipt)
    }

    /// Stamp, free, re-index, and price a receipt already removed from the registry.
    fn settle(&self, receipt: &Receipt) -> Result<f64, ReleaseError> {
        let exit = self.clock.now();
        let stamped = receipt.stamp_exit(exit);
        debug_assert!(stamped, "receipt {} released twice", receipt.id());
        receipt.spot().vacate();
        receipt.pool().on_freed(receipt.spot());
        MetricCounters::bump(&self.counters.releases);

        let pricing = self
            .pricing_strategy()
            .ok_or(ReleaseError::StrategyNotConfigured)?;
        let fee = pricing.fee(receipt.entry(), exit)?;
        tracing::debug!(
            occupant = %receipt.occupant(),
            receipt = %receipt.id(),
            spot = %receipt.spot().id(),
            fee,
            "released"
        );
        Ok(fee)
    }

    // ── Queries ────────────────────────────────────────────────────

    /// The active receipt held by `occupant`, if any.
    pub fn find_receipt_by_occupant(&self, occupant: &OccupantId) -> Option<Arc<Receipt>> {
        self.registry.read().by_occupant.get(occupant).cloned()
    }

    /// The active receipt with ID `id`, if any.
    pub fn find_receipt_by_id(&self, id: ReceiptId) -> Option<Arc<Receipt>> {
        self.registry.read().by_id.get(&id).cloned()
    }

    /// Every active receipt, oldest first.
    pub fn active_receipts(&self) -> Vec<Arc<Receipt>> {
        let mut receipts: Vec<_> = self.registry.read().by_id.values().cloned().collect();
        receipts.sort_by_key(|r| r.id());
        receipts
    }

    /// Number of active receipts.
    pub fn active_receipt_count(&self) -> usize {
        self.registry.read().by_occupant.len()
    }

    /// Occupancy aggregates over all pools and the registry.
    pub fn statistics(&self) -> Statistics {
        let pools = self.pools();
        let total_spots = pools.iter().map(|p| p.total_spots()).sum();
        let occupied_spots = pools.iter().map(|p| p.occupied_spots()).sum();
        Statistics::new(
            pools.len(),
            total_spots,
            occupied_spots,
            self.active_receipt_count(),
        )
    }

    /// Cumulative activity counters since construction.
    pub fn metrics(&self) -> AllocatorMetrics {
        self.counters.snapshot()
    }
}

impl fmt::Debug for Allocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocator")
            .field("pools", &self.pools.read().len())
            .field(
                "selection",
                &self.selection.read().as_ref().map(|s| s.name().to_string()),
            )
            .field(
                "pricing",
                &self.pricing.read().as_ref().map(|p| p.name().to_string()),
            )
            .field("active_receipts", &self.active_receipt_count())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_core::CapacityClass;
    use berth_strategy::{
        BestFit, FirstAvailable, FlatRate, NearestToEntrance, PeakHours, PricingConfig,
        SelectionKind, Tiered,
    };
    use berth_test_utils::{at, ManualClock, PinnedSelection};

    use CapacityClass::{Large, Medium, Small};

    fn setup(layouts: &[(u32, &[(CapacityClass, usize)])]) -> (Allocator, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(10, 0));
        let allocator = Allocator::new(clock.clone());
        for (distance, layout) in layouts {
            allocator.add_pool(SpotPool::with_spots(*distance, layout));
        }
        allocator.set_selection_strategy(Arc::new(FirstAvailable));
        allocator.set_pricing_strategy(Arc::new(FlatRate::default()));
        (allocator, clock)
    }

    #[test]
    fn allocate_issues_receipt_and_registers_it() {
        let (a, _) = setup(&[(0, &[(Medium, 2)])]);
        let car = Occupant::medium("car-1");
        let r = a.allocate(&car).unwrap().unwrap();

        assert_eq!(r.occupant(), &car.id);
        assert_eq!(r.requested_class(), Medium);
        assert_eq!(r.entry(), at(10, 0));
        assert!(r.spot().is_occupied());
        assert_eq!(r.spot().occupant(), Some(car.id.clone()));
        assert_eq!(a.find_receipt_by_occupant(&car.id).unwrap().id(), r.id());
        assert_eq!(a.find_receipt_by_id(r.id()).unwrap().id(), r.id());
        assert_eq!(a.active_receipt_count(), 1);
    }

    #[test]
    fn allocate_twice_for_same_occupant_fails() {
        let (a, _) = setup(&[(0, &[(Medium, 2)])]);
        let car = Occupant::medium("car-1");
        a.allocate(&car).unwrap().unwrap();
        assert_eq!(
            a.allocate(&car).unwrap_err(),
            AllocError::AlreadyAllocated {
                occupant: car.id.clone()
            }
        );
        assert_eq!(a.statistics().occupied_spots, 1);
    }

    #[test]
    fn allocate_without_selection_strategy_fails() {
        let a = Allocator::new(Arc::new(ManualClock::at(10, 0)));
        a.add_pool(SpotPool::with_spots(0, &[(Small, 1)]));
        assert_eq!(
            a.allocate(&Occupant::small("bike")).unwrap_err(),
            AllocError::StrategyNotConfigured
        );
    }

    #[test]
    fn allocate_with_no_capacity_returns_none() {
        let (a, _) = setup(&[(0, &[(Small, 1), (Medium, 1)])]);
        assert!(a.allocate(&Occupant::large("truck")).unwrap().is_none());
        assert_eq!(a.metrics().capacity_misses, 1);
        assert_eq!(a.active_receipt_count(), 0);
    }

    #[test]
    fn allocate_until_full_then_none() {
        let (a, _) = setup(&[(0, &[(Small, 2)]), (1, &[(Small, 1)])]);
        for i in 0..3 {
            assert!(a.allocate(&Occupant::small(format!("b{i}"))).unwrap().is_some());
        }
        assert!(a.allocate(&Occupant::small("b3")).unwrap().is_none());
        let s = a.statistics();
        assert_eq!(s.total_pools, 2);
        assert_eq!(s.occupied_spots, 3);
        assert_eq!(s.available_spots, 0);
        assert_eq!(s.utilization_rate, 100.0);
    }

    #[test]
    fn release_returns_fee_and_frees_spot() {
        let (a, clock) = setup(&[(0, &[(Medium, 1)])]);
        let car = Occupant::medium("car-1");
        let r = a.allocate(&car).unwrap().unwrap();
        clock.advance_minutes(90);

        assert_eq!(a.release(&car.id).unwrap(), 20.0);
        assert!(!r.spot().is_occupied());
        assert_eq!(r.exit(), Some(at(11, 30)));
        assert!(a.find_receipt_by_occupant(&car.id).is_none());
        assert!(a.find_receipt_by_id(r.id()).is_none());
        assert_eq!(r.pool().indexed_len(Medium), 1);
    }

    #[test]
    fn release_by_receipt_id_twice_is_not_found() {
        let (a, _) = setup(&[(0, &[(Small, 1)])]);
        let r = a.allocate(&Occupant::small("bike")).unwrap().unwrap();
        assert!(a.release_by_receipt_id(r.id()).is_ok());
        assert_eq!(
            a.release_by_receipt_id(r.id()).unwrap_err(),
            ReleaseError::ReceiptNotFound {
                lookup: ReceiptLookup::Receipt(r.id())
            }
        );
    }

    #[test]
    fn release_unknown_occupant_is_not_found() {
        let (a, _) = setup(&[(0, &[(Small, 1)])]);
        let ghost = OccupantId::from("ghost");
        assert_eq!(
            a.release(&ghost).unwrap_err(),
            ReleaseError::ReceiptNotFound {
                lookup: ReceiptLookup::Occupant(ghost)
            }
        );
    }

    #[test]
    fn release_by_id_clears_occupant_registry_too() {
        let (a, _) = setup(&[(0, &[(Small, 1)])]);
        let bike = Occupant::small("bike");
        let r = a.allocate(&bike).unwrap().unwrap();
        a.release_by_receipt_id(r.id()).unwrap();
        assert!(a.find_receipt_by_occupant(&bike.id).is_none());
        // The occupant may allocate again.
        assert!(a.allocate(&bike).unwrap().is_some());
    }

    #[test]
    fn release_without_pricing_frees_spot_then_fails() {
        let clock = Arc::new(ManualClock::at(10, 0));
        let a = Allocator::new(clock);
        a.add_pool(SpotPool::with_spots(0, &[(Small, 1)]));
        a.set_selection_strategy(Arc::new(FirstAvailable));
        let bike = Occupant::small("bike");
        let r = a.allocate(&bike).unwrap().unwrap();

        assert_eq!(
            a.release(&bike.id).unwrap_err(),
            ReleaseError::StrategyNotConfigured
        );
        assert!(!r.spot().is_occupied());
        assert!(r.is_released());
        assert_eq!(a.active_receipt_count(), 0);
    }

    #[test]
    fn release_with_clock_running_backwards_is_invalid_interval() {
        let (a, clock) = setup(&[(0, &[(Small, 1)])]);
        let bike = Occupant::small("bike");
        a.allocate(&bike).unwrap().unwrap();
        clock.set(at(9, 0));
        assert!(matches!(
            a.release(&bike.id).unwrap_err(),
            ReleaseError::Pricing(berth_core::PricingError::InvalidInterval { .. })
        ));
    }

    #[test]
    fn released_spot_is_reused() {
        let (a, _) = setup(&[(0, &[(Large, 1)])]);
        let truck = Occupant::large("truck");
        let first = a.allocate(&truck).unwrap().unwrap();
        a.release(&truck.id).unwrap();

        let car = Occupant::medium("car");
        let second = a.allocate(&car).unwrap().unwrap();
        assert_eq!(first.spot().id(), second.spot().id());
    }

    #[test]
    fn strategy_swap_affects_later_allocations_only() {
        let (a, clock) = setup(&[(0, &[(Large, 1)]), (1, &[(Small, 1)])]);
        let first = a.allocate(&Occupant::small("b1")).unwrap().unwrap();
        assert_eq!(first.spot().class(), Large);

        a.release(first.occupant()).unwrap();
        a.set_selection_strategy(Arc::new(BestFit));
        let second = a.allocate(&Occupant::small("b2")).unwrap().unwrap();
        assert_eq!(second.spot().class(), Small);

        clock.advance_minutes(150);
        a.set_pricing_strategy(Arc::new(Tiered::default()));
        assert_eq!(a.release(second.occupant()).unwrap(), 40.0);
    }

    #[test]
    fn nearest_to_entrance_allocates_in_nearest_pool() {
        let (a, _) = setup(&[(7, &[(Medium, 1)]), (2, &[(Medium, 1)])]);
        a.set_selection_strategy(Arc::new(NearestToEntrance));
        let r = a.allocate(&Occupant::medium("car")).unwrap().unwrap();
        assert_eq!(r.pool().distance(), 2);
    }

    #[test]
    fn peak_pricing_through_allocator() {
        let (a, clock) = setup(&[(0, &[(Medium, 1)])]);
        a.set_pricing_strategy(Arc::new(PeakHours::default()));
        clock.set(at(9, 30));
        let car = Occupant::medium("car");
        a.allocate(&car).unwrap().unwrap();
        clock.set(at(10, 30));
        assert_eq!(a.release(&car.id).unwrap(), 30.0);
    }

    #[test]
    fn lost_races_are_bounded_and_report_no_capacity() {
        let clock = Arc::new(ManualClock::at(10, 0));
        let a = Allocator::with_max_attempts(clock, 4);
        let pool = a.add_pool(SpotPool::with_spots(0, &[(Medium, 1)]));
        let pinned = PinnedSelection::first_of(&pool).unwrap();
        pinned.spot.occupy(&OccupantId::from("squatter"));
        a.set_selection_strategy(Arc::new(pinned));

        assert!(a.allocate(&Occupant::medium("car")).unwrap().is_none());
        let m = a.metrics();
        assert_eq!(m.reservation_conflicts, 4);
        assert_eq!(m.capacity_misses, 1);
        assert_eq!(m.allocations, 0);
    }

    #[test]
    fn zero_attempts_is_raised_to_one() {
        let a = Allocator::with_max_attempts(Arc::new(ManualClock::at(0, 0)), 0);
        assert_eq!(a.max_attempts(), 1);
    }

    #[test]
    fn from_config_builds_pools_and_strategies() {
        let config = AllocatorConfig {
            pools: vec![
                crate::PoolConfig::new(0, &[(Small, 2), (Medium, 3)]),
                crate::PoolConfig::new(1, &[(Large, 1)]),
            ],
            selection: Some(SelectionKind::NearestToEntrance),
            pricing: Some(PricingConfig::Tiered(Tiered::default())),
            max_reservation_attempts: 3,
        };
        let a = Allocator::from_config(&config, Arc::new(ManualClock::at(8, 0))).unwrap();
        assert_eq!(a.max_attempts(), 3);
        assert_eq!(a.statistics().total_pools, 2);
        assert_eq!(a.statistics().total_spots, 6);
        assert_eq!(a.selection_strategy().unwrap().name(), "nearest_to_entrance");
        assert_eq!(a.pricing_strategy().unwrap().name(), "tiered");
    }

    #[test]
    fn from_config_rejects_invalid() {
        let config = AllocatorConfig {
            max_reservation_attempts: 0,
            ..AllocatorConfig::default()
        };
        assert_eq!(
            Allocator::from_config(&config, Arc::new(ManualClock::at(8, 0))).unwrap_err(),
            ConfigError::ZeroReservationAttempts
        );
    }

    #[test]
    fn statistics_sum_matches_total() {
        let (a, _) = setup(&[(0, &[(Small, 2), (Medium, 2)]), (1, &[(Large, 2)])]);
        a.allocate(&Occupant::large("t1")).unwrap().unwrap();
        a.allocate(&Occupant::small("b1")).unwrap().unwrap();
        let s = a.statistics();
        assert_eq!(s.occupied_spots + s.available_spots, s.total_spots);
        assert_eq!(s.active_receipts, 2);
        assert_eq!(s.occupied_spots, 2);
    }

    #[test]
    fn active_receipts_oldest_first() {
        let (a, _) = setup(&[(0, &[(Small, 3)])]);
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| a.allocate(&Occupant::small(*n)).unwrap().unwrap().id())
            .collect();
        a.release(&OccupantId::from("a")).unwrap();
        let live: Vec<_> = a.active_receipts().iter().map(|r| r.id()).collect();
        assert_eq!(live, ids[1..].to_vec());
    }

    #[test]
    fn metrics_count_allocations_and_releases() {
        let (a, _) = setup(&[(0, &[(Small, 2)])]);
        let bike = Occupant::small("bike");
        a.allocate(&bike).unwrap().unwrap();
        a.release(&bike.id).unwrap();
        let m = a.metrics();
        assert_eq!(m.allocations, 1);
        assert_eq!(m.releases, 1);
        assert_eq!(m.reservation_conflicts, 0);
    }

    // ── proptest ───────────────────────────────────────────────

    mod proptests {
        use super::*;
        use std::collections::HashSet;

        use proptest::prelude::*;
        use proptest::test_runner::TestCaseError;

        const OCCUPANTS: usize = 8;

        #[derive(Clone, Debug)]
        enum Op {
            Allocate(usize, CapacityClass),
            Release(usize),
            ReleaseById(usize),
            Advance(i64),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..OCCUPANTS, 0..CapacityClass::COUNT)
                    .prop_map(|(o, c)| Op::Allocate(o, CapacityClass::ALL[c])),
                (0..OCCUPANTS).prop_map(Op::Release),
                (0usize..64).prop_map(Op::ReleaseById),
                (0i64..240).prop_map(Op::Advance),
            ]
        }

        fn occupant_id(o: usize) -> OccupantId {
            OccupantId::from(format!("o{o}"))
        }

        /// Both registries hold the same receipts, and spot state agrees.
        fn assert_consistent(a: &Allocator, live: &HashSet<OccupantId>) -> Result<(), TestCaseError> {
            let registry = a.registry.read();
            prop_assert_eq!(registry.by_occupant.len(), registry.by_id.len());
            prop_assert_eq!(registry.by_occupant.len(), live.len());
            for (occupant, receipt) in &registry.by_occupant {
                prop_assert_eq!(receipt.occupant(), occupant);
                prop_assert!(live.contains(occupant));
                let paired = registry.by_id.get(&receipt.id());
                prop_assert!(paired.is_some_and(|r| Arc::ptr_eq(r, receipt)));
                prop_assert!(receipt.spot().is_occupied());
                prop_assert!(!receipt.is_released());
            }
            drop(registry);

            let s = a.statistics();
            prop_assert_eq!(s.occupied_spots + s.available_spots, s.total_spots);
            prop_assert_eq!(s.occupied_spots, s.active_receipts);
            Ok(())
        }

        proptest! {
            #[test]
            fn registries_stay_paired(ops in prop::collection::vec(arb_op(), 1..80)) {
                let (a, clock) = setup(&[(0, &[(Small, 2), (Medium, 2)]), (1, &[(Large, 1)])]);
                a.set_selection_strategy(Arc::new(BestFit));
                let mut live = HashSet::new();

                for op in ops {
                    match op {
                        Op::Allocate(o, class) => {
                            let occupant = Occupant::new(occupant_id(o), class);
                            let result = a.allocate(&occupant);
                            if live.contains(&occupant.id) {
                                prop_assert!(
                                    matches!(result, Err(AllocError::AlreadyAllocated { .. })),
                                    "duplicate allocate returned {:?}", result
                                );
                            } else {
                                match result {
                                    Ok(Some(r)) => {
                                        prop_assert!(r.spot().class().can_host(class));
                                        live.insert(occupant.id.clone());
                                    }
                                    Ok(None) => {
                                        prop_assert!(a.pools().iter().all(|p| p.available_spots(class) == 0));
                                    }
                                    Err(e) => prop_assert!(false, "unexpected {:?}", e),
                                }
                            }
                        }
                        Op::Release(o) => {
                            let id = occupant_id(o);
                            let result = a.release(&id);
                            if live.remove(&id) {
                                prop_assert!(result.is_ok(), "release returned {:?}", result);
                            } else {
                                prop_assert!(
                                    matches!(result, Err(ReleaseError::ReceiptNotFound { .. })),
                                    "release returned {:?}", result
                                );
                            }
                        }
                        Op::ReleaseById(i) => {
                            let receipts = a.active_receipts();
                            if let Some(r) = receipts.get(i % receipts.len().max(1)) {
                                prop_assert!(a.release_by_receipt_id(r.id()).is_ok());
                                prop_assert!(live.remove(r.occupant()));
                                prop_assert!(r.is_released());
                                prop_assert!(matches!(
                                    a.release_by_receipt_id(r.id()),
                                    Err(ReleaseError::ReceiptNotFound { .. })
                                ), "second release by id should be ReceiptNotFound");
                            }
                        }
                        Op::Advance(minutes) => clock.advance_minutes(minutes),
                    }
                    assert_consistent(&a, &live)?;
                }
            }
        }
    }
}
