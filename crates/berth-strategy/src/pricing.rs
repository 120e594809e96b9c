//! The [`PricingStrategy`] trait and its three variants.
//!
//! All variants bill whole minutes (sub-minute remainders are dropped)
//! and reject intervals whose exit precedes entry with
//! [`PricingError::InvalidInterval`].

use std::sync::Arc;

use berth_core::PricingError;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// Computes the fee for a stay from its entry and exit timestamps.
pub trait PricingStrategy: Send + Sync + 'static {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Fee for a stay from `entry` to `exit`. Never negative.
    fn fee(&self, entry: NaiveDateTime, exit: NaiveDateTime) -> Result<f64, PricingError>;
}

/// Whole minutes between `entry` and `exit`, or `InvalidInterval`.
fn elapsed_minutes(entry: NaiveDateTime, exit: NaiveDateTime) -> Result<i64, PricingError> {
    if exit < entry {
        return Err(PricingError::InvalidInterval { entry, exit });
    }
    Ok((exit - entry).num_minutes())
}

/// Minutes rounded up to whole hours.
fn billed_hours(minutes: i64) -> i64 {
    (minutes + 59) / 60
}

fn check_rate(name: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() || value < 0.0 {
        return Err(format!("{name} must be finite and >= 0, got {value}"));
    }
    Ok(())
}

// ── FlatRate ───────────────────────────────────────────────────────

/// One rate per started hour, with a floor.
///
/// A zero-length stay still bills one hour.
#[derive(Clone, Debug, PartialEq)]
pub struct FlatRate {
    /// Charge per billed hour. Default: 10.
    pub rate_per_hour: f64,
    /// Lower bound on any fee. Default: 5.
    pub minimum_charge: f64,
}

impl Default for FlatRate {
    fn default() -> Self {
        Self {
            rate_per_hour: 10.0,
            minimum_charge: 5.0,
        }
    }
}

impl FlatRate {
    /// Check that both rates are finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        check_rate("rate_per_hour", self.rate_per_hour)?;
        check_rate("minimum_charge", self.minimum_charge)
    }
}

impl PricingStrategy for FlatRate {
    fn name(&self) -> &str {
        "flat_rate"
    }

    fn fee(&self, entry: NaiveDateTime, exit: NaiveDateTime) -> Result<f64, PricingError> {
        let minutes = elapsed_minutes(entry, exit)?;
        let hours = if minutes == 0 { 1 } else { billed_hours(minutes) };
        Ok((self.rate_per_hour * hours as f64).max(self.minimum_charge))
    }
}

// ── Tiered ─────────────────────────────────────────────────────────

/// Progressive pricing: first hour, hours two and three, then premium.
///
/// A zero-length stay bills the minimum charge directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Tiered {
    /// Charge for the first billed hour. Default: 10.
    pub first_hour_rate: f64,
    /// Charge for each of billed hours two and three. Default: 15.
    pub next_hours_rate: f64,
    /// Charge for every billed hour after the third. Default: 20.
    pub premium_rate: f64,
    /// Lower bound on any fee. Default: 5.
    pub minimum_charge: f64,
}

impl Default for Tiered {
    fn default() -> Self {
        Self {
            first_hour_rate: 10.0,
            next_hours_rate: 15.0,
            premium_rate: 20.0,
            minimum_charge: 5.0,
        }
    }
}

impl Tiered {
    /// Check that every rate is finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        check_rate("first_hour_rate", self.first_hour_rate)?;
        check_rate("next_hours_rate", self.next_hours_rate)?;
        check_rate("premium_rate", self.premium_rate)?;
        check_rate("minimum_charge", self.minimum_charge)
    }
}

impl PricingStrategy for Tiered {
    fn name(&self) -> &str {
        "tiered"
    }

    fn fee(&self, entry: NaiveDateTime, exit: NaiveDateTime) -> Result<f64, PricingError> {
        let minutes = elapsed_minutes(entry, exit)?;
        if minutes == 0 {
            return Ok(self.minimum_charge);
        }
        let hours = billed_hours(minutes);
        let fee = if hours <= 1 {
            self.first_hour_rate
        } else if hours <= 3 {
            self.first_hour_rate + (hours - 1) as f64 * self.next_hours_rate
        } else {
            self.first_hour_rate
                + 2.0 * self.next_hours_rate
                + (hours - 3) as f64 * self.premium_rate
        };
        Ok(fee.max(self.minimum_charge))
    }
}

// ── PeakHours ──────────────────────────────────────────────────────

/// A daily time-of-day window, inclusive of `start` and exclusive of `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeakWindow {
    /// First instant inside the window.
    pub start: NaiveTime,
    /// First instant after the window.
    pub end: NaiveTime,
}

impl PeakWindow {
    /// Build a window from whole hours, e.g. `PeakWindow::hours(8, 10)`.
    ///
    /// Returns `None` if either hour is outside `0..24`.
    pub fn hours(start: u32, end: u32) -> Option<Self> {
        Some(Self {
            start: NaiveTime::from_hms_opt(start, 0, 0)?,
            end: NaiveTime::from_hms_opt(end, 0, 0)?,
        })
    }

    /// Whether `time` falls inside `[start, end)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time < self.end
    }
}

const fn clock_hour(hour: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(t) => t,
        None => panic!("hour out of range"),
    }
}

const MORNING_PEAK: PeakWindow = PeakWindow {
    start: clock_hour(8),
    end: clock_hour(10),
};

const EVENING_PEAK: PeakWindow = PeakWindow {
    start: clock_hour(17),
    end: clock_hour(19),
};

/// Time-of-day pricing over clock-hour segments.
///
/// The stay is cut at every wall-clock hour mark. Each segment is
/// classified by the clock time at which it starts, and its minutes are
/// rounded up to whole hours at the peak or normal rate. A stay from
/// 09:30 to 10:30 with a 08:00–10:00 peak is therefore billed as one
/// peak hour plus one normal hour.
#[derive(Clone, Debug, PartialEq)]
pub struct PeakHours {
    /// Rate per billed hour outside peak windows. Default: 10.
    pub normal_rate: f64,
    /// Rate per billed hour inside a peak window. Default: 20.
    pub peak_rate: f64,
    /// Lower bound on any fee. Default: 5.
    pub minimum_charge: f64,
    /// Morning peak. Default: 08:00–10:00.
    pub morning: PeakWindow,
    /// Evening peak. Default: 17:00–19:00.
    pub evening: PeakWindow,
}

impl Default for PeakHours {
    fn default() -> Self {
        Self {
            normal_rate: 10.0,
            peak_rate: 20.0,
            minimum_charge: 5.0,
            morning: MORNING_PEAK,
            evening: EVENING_PEAK,
        }
    }
}

impl PeakHours {
    /// Check rates and that each window is non-empty.
    pub fn validate(&self) -> Result<(), String> {
        check_rate("normal_rate", self.normal_rate)?;
        check_rate("peak_rate", self.peak_rate)?;
        check_rate("minimum_charge", self.minimum_charge)?;
        for (name, window) in [("morning", self.morning), ("evening", self.evening)] {
            if window.start >= window.end {
                return Err(format!(
                    "{name} peak window must start before it ends, got {}-{}",
                    window.start, window.end,
                ));
            }
        }
        Ok(())
    }

    /// Whether a segment starting at `time` is billed at the peak rate.
    pub fn is_peak(&self, time: NaiveTime) -> bool {
        self.morning.contains(time) || self.evening.contains(time)
    }
}

/// The wall-clock hour mark strictly after `t`, or `None` past the
/// representable calendar.
fn next_hour_mark(t: NaiveDateTime) -> Option<NaiveDateTime> {
    let into_hour = TimeDelta::seconds(i64::from(t.minute() * 60 + t.second()))
        + TimeDelta::nanoseconds(i64::from(t.nanosecond()));
    (t - into_hour).checked_add_signed(TimeDelta::hours(1))
}

impl PricingStrategy for PeakHours {
    fn name(&self) -> &str {
        "peak_hours"
    }

    fn fee(&self, entry: NaiveDateTime, exit: NaiveDateTime) -> Result<f64, PricingError> {
        let minutes = elapsed_minutes(entry, exit)?;
        if minutes == 0 {
            return Ok(self.minimum_charge);
        }

        let mut total = 0.0;
        let mut cursor = entry;
        while cursor < exit {
            let rate = if self.is_peak(cursor.time()) {
                self.peak_rate
            } else {
                self.normal_rate
            };
            let segment_end = next_hour_mark(cursor).map_or(exit, |mark| mark.min(exit));
            let segment_minutes = (segment_end - cursor).num_minutes();
            total += rate * billed_hours(segment_minutes) as f64;
            cursor = segment_end;
        }
        Ok(total.max(self.minimum_charge))
    }
}

// ── PricingConfig ──────────────────────────────────────────────────

/// A configured pricing strategy, for builder-style allocator setup.
#[derive(Clone, Debug, PartialEq)]
pub enum PricingConfig {
    /// [`FlatRate`] pricing.
    FlatRate(FlatRate),
    /// [`Tiered`] pricing.
    Tiered(Tiered),
    /// [`PeakHours`] pricing.
    PeakHours(PeakHours),
}

impl PricingConfig {
    /// Validate the wrapped strategy's parameters.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::FlatRate(p) => p.validate(),
            Self::Tiered(p) => p.validate(),
            Self::PeakHours(p) => p.validate(),
        }
    }

    /// Instantiate the configured strategy.
    pub fn build(&self) -> Arc<dyn PricingStrategy> {
        match self {
            Self::FlatRate(p) => Arc::new(p.clone()),
            Self::Tiered(p) => Arc::new(p.clone()),
            Self::PeakHours(p) => Arc::new(p.clone()),
        }
    }
}
