//! Error types for the Berth slot allocator.
//!
//! Organized by operation: allocation, release, and pricing. Running out
//! of capacity is not an error; `allocate` reports it as an empty result.

use std::error::Error;
use std::fmt;

use chrono::NaiveDateTime;

use crate::id::{OccupantId, ReceiptId};

/// Errors from `Allocator::allocate`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The occupant already holds an active receipt.
    AlreadyAllocated {
        /// The duplicate occupant identity.
        occupant: OccupantId,
    },
    /// No selection strategy has been installed.
    StrategyNotConfigured,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAllocated { occupant } => {
                write!(f, "occupant '{occupant}' already holds an active receipt")
            }
            Self::StrategyNotConfigured => write!(f, "selection strategy not configured"),
        }
    }
}

impl Error for AllocError {}

/// The key a release was attempted with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiptLookup {
    /// Release by occupant identity.
    Occupant(OccupantId),
    /// Release by receipt ID.
    Receipt(ReceiptId),
}

impl fmt::Display for ReceiptLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Occupant(id) => write!(f, "occupant '{id}'"),
            Self::Receipt(id) => write!(f, "{id}"),
        }
    }
}

/// Errors from `Allocator::release` and `Allocator::release_by_receipt_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseError {
    /// No active receipt matches the lookup key.
    ReceiptNotFound {
        /// The key that missed.
        lookup: ReceiptLookup,
    },
    /// No pricing strategy has been installed.
    ///
    /// The spot has already been freed when this is returned.
    StrategyNotConfigured,
    /// The pricing strategy rejected the receipt's interval.
    Pricing(PricingError),
}

impl fmt::Display for ReleaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReceiptNotFound { lookup } => write!(f, "no active receipt for {lookup}"),
            Self::StrategyNotConfigured => write!(f, "pricing strategy not configured"),
            Self::Pricing(e) => write!(f, "pricing failed: {e}"),
        }
    }
}

impl Error for ReleaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pricing(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PricingError> for ReleaseError {
    fn from(e: PricingError) -> Self {
        Self::Pricing(e)
    }
}

/// Errors from a pricing strategy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PricingError {
    /// The exit timestamp precedes the entry timestamp.
    InvalidInterval {
        /// Entry timestamp.
        entry: NaiveDateTime,
        /// Exit timestamp, earlier than `entry`.
        exit: NaiveDateTime,
    },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInterval { entry, exit } => {
                write!(f, "exit {exit} precedes entry {entry}")
            }
        }
    }
}

impl Error for PricingError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn display_messages() {
        let e = AllocError::AlreadyAllocated {
            occupant: OccupantId::from("ABC"),
        };
        assert_eq!(e.to_string(), "occupant 'ABC' already holds an active receipt");

        let e = ReleaseError::ReceiptNotFound {
            lookup: ReceiptLookup::Receipt(ReceiptId(4)),
        };
        assert_eq!(e.to_string(), "no active receipt for receipt-4");

        let e = PricingError::InvalidInterval {
            entry: ts(10, 0),
            exit: ts(9, 0),
        };
        assert!(e.to_string().contains("precedes"));
    }

    #[test]
    fn pricing_error_is_release_error_source() {
        let inner = PricingError::InvalidInterval {
            entry: ts(10, 0),
            exit: ts(9, 0),
        };
        let outer: ReleaseError = inner.clone().into();
        assert_eq!(outer, ReleaseError::Pricing(inner));
        assert!(outer.source().is_some());
        assert!(ReleaseError::StrategyNotConfigured.source().is_none());
    }
}
