//! Benchmark profiles and workload generators for the Berth allocator.
//!
//! - [`reference_config`]: 4 pools, 1 000 spots, best-fit selection, tiered pricing
//! - [`stress_config`]: 16 pools, 4 000 spots, for contention runs
//! - [`occupant_workload`]: deterministic occupant mix via seed

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use berth_core::{CapacityClass, Occupant};
use berth_engine::{AllocatorConfig, PoolConfig};
use berth_strategy::{PricingConfig, SelectionKind, Tiered};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Per-pool layout shared by both profiles: 250 spots, mostly medium.
const POOL_LAYOUT: [(CapacityClass, usize); 3] = [
    (CapacityClass::Small, 50),
    (CapacityClass::Medium, 175),
    (CapacityClass::Large, 25),
];

fn profile(pools: u32) -> AllocatorConfig {
    AllocatorConfig {
        pools: (0..pools)
            .map(|distance| PoolConfig::new(distance, &POOL_LAYOUT))
            .collect(),
        selection: Some(SelectionKind::BestFit),
        pricing: Some(PricingConfig::Tiered(Tiered::default())),
        ..AllocatorConfig::default()
    }
}

/// Reference profile: 4 pools of 250 spots (1 000 total).
pub fn reference_config() -> AllocatorConfig {
    profile(4)
}

/// Stress profile: 16 pools of 250 spots (4 000 total).
pub fn stress_config() -> AllocatorConfig {
    profile(16)
}

/// Generate `n` distinct occupants with a class mix of roughly
/// 20% small, 70% medium, 10% large.
///
/// The same `seed` always yields the same sequence.
pub fn occupant_workload(n: usize, seed: u64) -> Vec<Occupant> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let class = match rng.gen_range(0..10u8) {
                0 | 1 => CapacityClass::Small,
                2..=8 => CapacityClass::Medium,
                _ => CapacityClass::Large,
            };
            Occupant::new(format!("occ-{seed}-{i}"), class)
        })
        .collect()
}
