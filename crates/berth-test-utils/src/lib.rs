//! Test utilities and mock types for Berth development.
//!
//! Provides a manually-driven [`ManualClock`], timestamp helpers, pool
//! and occupant fixtures, and [`PinnedSelection`], a selection strategy
//! that always proposes the same spot.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use berth_core::Clock;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use parking_lot::Mutex;

pub use fixtures::{occupants, pool, PinnedSelection};

/// A fixed calendar day used by every timestamp helper.
pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date")
}

/// `hour:minute` on [`test_day`].
pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
    test_day()
        .and_hms_opt(hour, minute, 0)
        .expect("valid time of day")
}

/// [`Clock`] that only moves when told to.
///
/// Shared between the allocator under test and the test body via `Arc`.
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(start: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Start at `hour:minute` on [`test_day`].
    pub fn at(hour: u32, minute: u32) -> Self {
        Self::new(at(hour, minute))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: TimeDelta) {
        *self.now.lock() += by;
    }

    pub fn advance_minutes(&self, minutes: i64) {
        self.advance(TimeDelta::minutes(minutes));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }
}
