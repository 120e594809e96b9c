//! Pluggable spot selection and pricing strategies.
//!
//! Both strategy families are pure: a [`SelectionStrategy`] proposes a
//! candidate spot without reserving it, and a [`PricingStrategy`] turns
//! an entry/exit interval into a fee. The allocator stores the active
//! variant of each behind a swappable `Arc<dyn ...>`.
//!
//! | Selection | Picks |
//! |-----------|-------|
//! | [`FirstAvailable`] | first pool (in given order) with any fit |
//! | [`BestFit`] | smallest-class candidate across all pools |
//! | [`NearestToEntrance`] | candidate in the nearest pool, lowest spot ID on ties |
//!
//! | Pricing | Charges |
//! |---------|---------|
//! | [`FlatRate`] | one rate per started hour |
//! | [`Tiered`] | first hour, next two hours, then premium |
//! | [`PeakHours`] | peak or normal rate per clock-hour segment |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pricing;
pub mod selection;

pub use pricing::{FlatRate, PeakHours, PeakWindow, PricingConfig, PricingStrategy, Tiered};
pub use selection::{
    BestFit, Candidate, FirstAvailable, NearestToEntrance, SelectionKind, SelectionStrategy,
};
