//! Berth: concurrent allocation of capacity-classed spots across pools.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Berth sub-crates. For most users, adding `berth` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use berth::prelude::*;
//!
//! let allocator = Allocator::new(Arc::new(SystemClock));
//! allocator.add_pool(SpotPool::with_spots(
//!     0,
//!     &[(CapacityClass::Small, 2), (CapacityClass::Medium, 4)],
//! ));
//! allocator.add_pool(SpotPool::with_spots(1, &[(CapacityClass::Large, 1)]));
//! allocator.set_selection_strategy(Arc::new(NearestToEntrance));
//! allocator.set_pricing_strategy(Arc::new(Tiered::default()));
//!
//! let truck = Occupant::large("TRK-42");
//! let receipt = allocator.allocate(&truck).unwrap().expect("a large spot is free");
//! assert_eq!(receipt.pool().distance(), 1);
//!
//! let stats = allocator.statistics();
//! assert_eq!(stats.occupied_spots, 1);
//!
//! // Released immediately: the minimum charge applies.
//! let fee = allocator.release(&truck.id).unwrap();
//! assert_eq!(fee, 5.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `berth-core` | IDs, capacity classes, occupants, errors, clocks |
//! | [`pool`] | `berth-pool` | Spots and indexed spot pools |
//! | [`strategy`] | `berth-strategy` | Selection and pricing strategies |
//! | [`engine`] | `berth-engine` | The allocator, receipts, config, statistics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and errors (`berth-core`).
///
/// Contains [`types::CapacityClass`] and its compatibility rule, the
/// [`types::Clock`] seam, and every error the allocator reports.
pub use berth_core as types;

/// Spots and spot pools (`berth-pool`).
///
/// [`pool::Spot`] carries the occupancy compare-and-set;
/// [`pool::SpotPool`] keeps per-class availability indices.
pub use berth_pool as pool;

/// Selection and pricing strategies (`berth-strategy`).
///
/// The [`strategy::SelectionStrategy`] and [`strategy::PricingStrategy`]
/// traits are the extension points for custom policies.
pub use berth_strategy as strategy;

/// The allocator (`berth-engine`).
///
/// [`engine::Allocator`] is the single mutating entry point.
pub use berth_engine as engine;

/// Common imports for typical Berth usage.
///
/// ```rust
/// use berth::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use berth_core::{
        CapacityClass, Clock, Occupant, OccupantId, PoolId, ReceiptId, SpotId, SystemClock,
    };

    // Errors
    pub use berth_core::{AllocError, PricingError, ReleaseError};

    // Pools
    pub use berth_pool::{Spot, SpotPool};

    // Strategies
    pub use berth_strategy::{
        BestFit, FirstAvailable, FlatRate, NearestToEntrance, PeakHours, PricingConfig,
        PricingStrategy, SelectionKind, SelectionStrategy, Tiered,
    };

    // Engine
    pub use berth_engine::{Allocator, AllocatorConfig, PoolConfig, Receipt, Statistics};
}
