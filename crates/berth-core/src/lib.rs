//! Core types and traits for the Berth slot allocator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other Berth crate: identifiers,
//! capacity classes, occupants, error types, and the [`Clock`] seam.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod capacity;
pub mod clock;
pub mod error;
pub mod id;
pub mod occupant;

pub use capacity::CapacityClass;
pub use clock::{Clock, SystemClock};
pub use error::{AllocError, PricingError, ReceiptLookup, ReleaseError};
pub use id::{OccupantId, PoolId, ReceiptId, SpotId};
pub use occupant::Occupant;
