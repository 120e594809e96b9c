//! Allocator configuration, validation, and error types.
//!
//! [`AllocatorConfig`] is the builder-input for
//! [`Allocator::from_config`](crate::Allocator::from_config).
//! [`validate()`](AllocatorConfig::validate) checks every structural
//! invariant up front so construction itself cannot fail halfway.

use std::error::Error;
use std::fmt;

use berth_core::CapacityClass;
use berth_strategy::{PricingConfig, SelectionKind};

use crate::allocator::DEFAULT_MAX_RESERVATION_ATTEMPTS;

// ── PoolConfig ─────────────────────────────────────────────────────

/// Layout of one pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Distance from the entrance (lower is nearer).
    pub distance: u32,
    /// `(class, count)` pairs; spots are created in this order.
    pub spots: Vec<(CapacityClass, usize)>,
}

impl PoolConfig {
    /// A pool at `distance` with the given layout.
    pub fn new(distance: u32, spots: &[(CapacityClass, usize)]) -> Self {
        Self {
            distance,
            spots: spots.to_vec(),
        }
    }

    /// Total spots this layout creates.
    pub fn spot_count(&self) -> usize {
        self.spots.iter().map(|&(_, n)| n).sum()
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`AllocatorConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_reservation_attempts` is zero; no reservation could ever be tried.
    ZeroReservationAttempts,
    /// The pricing configuration is invalid.
    InvalidPricing {
        /// Description of the validation failure.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroReservationAttempts => {
                write!(f, "max_reservation_attempts must be at least 1")
            }
            Self::InvalidPricing { reason } => write!(f, "invalid pricing: {reason}"),
        }
    }
}

impl Error for ConfigError {}

// ── AllocatorConfig ────────────────────────────────────────────────

/// Complete configuration for constructing an allocator.
#[derive(Clone, Debug, PartialEq)]
pub struct AllocatorConfig {
    /// Pools, registered in this order.
    pub pools: Vec<PoolConfig>,
    /// Initial selection strategy. `None` leaves it unset.
    pub selection: Option<SelectionKind>,
    /// Initial pricing strategy. `None` leaves it unset.
    pub pricing: Option<PricingConfig>,
    /// Upper bound on select-and-reserve rounds per allocation. Default: 10.
    pub max_reservation_attempts: u32,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            pools: Vec::new(),
            selection: None,
            pricing: None,
            max_reservation_attempts: DEFAULT_MAX_RESERVATION_ATTEMPTS,
        }
    }
}

impl AllocatorConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_reservation_attempts == 0 {
            return Err(ConfigError::ZeroReservationAttempts);
        }
        if let Some(pricing) = &self.pricing {
            pricing
                .validate()
                .map_err(|reason| ConfigError::InvalidPricing { reason })?;
        }
        Ok(())
    }

    /// Total spots across every configured pool.
    pub fn spot_count(&self) -> usize {
        self.pools.iter().map(PoolConfig::spot_count).sum()
    }
}
