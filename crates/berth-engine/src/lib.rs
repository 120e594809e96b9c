//! Concurrent allocator orchestrating Berth pools, strategies, and receipts.
//!
//! The [`Allocator`] is the only mutating entry point. It asks the active
//! [`SelectionStrategy`](berth_strategy::SelectionStrategy) for a
//! candidate, reserves it with a per-spot compare-and-set, and records a
//! [`Receipt`] in a pair of registries guarded by one critical section.
//! Release reverses the process and prices the stay with the active
//! [`PricingStrategy`](berth_strategy::PricingStrategy).
//!
//! ```text
//! allocate(occupant)
//!   ├── fast duplicate check      (registry, shared lock)
//!   ├── select + occupy  × ≤N     (no allocator lock; per-spot CAS)
//!   └── re-check + insert         (registry, exclusive lock)
//! release(occupant | receipt id)
//!   ├── remove from both maps     (registry, exclusive lock)
//!   └── stamp exit, vacate, re-index, price   (no allocator lock)
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod metrics;
pub mod receipt;
pub mod stats;

pub use allocator::{Allocator, DEFAULT_MAX_RESERVATION_ATTEMPTS};
pub use config::{AllocatorConfig, ConfigError, PoolConfig};
pub use metrics::AllocatorMetrics;
pub use receipt::Receipt;
pub use stats::Statistics;
