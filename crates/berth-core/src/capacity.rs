//! Capacity classes and the spot/occupant compatibility rule.

use smallvec::SmallVec;
use std::fmt;

/// Size tier of a spot, and the tier an occupant requires.
///
/// Ordered `Small < Medium < Large`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapacityClass {
    /// Smallest tier (bikes).
    Small,
    /// Middle tier (cars).
    Medium,
    /// Largest tier (trucks).
    Large,
}

impl CapacityClass {
    /// Every class in ascending order.
    pub const ALL: [CapacityClass; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Number of distinct classes.
    pub const COUNT: usize = 3;

    /// Dense index in `0..COUNT`, for per-class arrays.
    pub fn index(self) -> usize {
        match self {
            Self::Small => 0,
            Self::Medium => 1,
            Self::Large => 2,
        }
    }

    /// Whether a spot of class `self` can host an occupant requesting `requested`.
    ///
    /// Small and Medium requests round up to any larger spot. A Large
    /// request has nothing above it to round up from, so it only fits an
    /// exactly-Large spot. This is deliberately not a uniform `>=`.
    pub fn can_host(self, requested: CapacityClass) -> bool {
        match requested {
            Self::Small | Self::Medium => self >= requested,
            Self::Large => self == Self::Large,
        }
    }

    /// All requested classes a spot of class `self` can serve, ascending.
    pub fn served_classes(self) -> SmallVec<[CapacityClass; 3]> {
        Self::ALL
            .into_iter()
            .filter(|&requested| self.can_host(requested))
            .collect()
    }
}

impl fmt::Display for CapacityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        f.write_str(name)
    }
}
