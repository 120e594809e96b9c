//! Spots and availability-indexed spot pools for the Berth allocator.
//!
//! A [`Spot`] is one allocatable unit whose occupancy flag is flipped by
//! compare-and-set, so reserving one spot never blocks work on another.
//! A [`SpotPool`] owns a set of spots plus a per-class availability
//! index:
//!
//! ```text
//! SpotPool
//! ├── spots: IndexMap<SpotId, Arc<Spot>>   (source of truth, insertion order)
//! └── index: [Mutex<VecDeque<Arc<Spot>>>; 3] (hint per requested class)
//! ```
//!
//! The index is a cache. It may hold entries that are already occupied;
//! lookups discard those lazily and fall back to a full scan of
//! `spots`, so staleness can never hide a free spot.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod pool;
pub mod spot;

pub use pool::SpotPool;
pub use spot::Spot;
