//! Read-only occupancy aggregates.

/// Point-in-time aggregate over all pools and the receipt registry.
///
/// Fields are gathered without a global lock, so under concurrent
/// traffic they describe nearby rather than identical instants.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statistics {
    /// Number of registered pools.
    pub total_pools: usize,
    /// Number of spots across all pools.
    pub total_spots: usize,
    /// Number of occupied spots.
    pub occupied_spots: usize,
    /// `total_spots - occupied_spots`.
    pub available_spots: usize,
    /// Number of live receipts.
    pub active_receipts: usize,
    /// `occupied_spots / total_spots * 100`, or `0.0` with no spots.
    pub utilization_rate: f64,
}

impl Statistics {
    pub(crate) fn new(
        total_pools: usize,
        total_spots: usize,
        occupied_spots: usize,
        active_receipts: usize,
    ) -> Self {
        let utilization_rate = if total_spots > 0 {
            occupied_spots as f64 / total_spots as f64 * 100.0
        } else {
            0.0
        };
        Self {
            total_pools,
            total_spots,
            occupied_spots,
            available_spots: total_spots.saturating_sub(occupied_spots),
            active_receipts,
            utilization_rate,
        }
    }
}
