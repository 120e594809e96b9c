//! The [`Occupant`] requesting a spot.

use crate::capacity::CapacityClass;
use crate::id::OccupantId;

/// An entity requesting a spot: an identity plus the class it needs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Occupant {
    /// Identity used to key the active-receipt registry.
    pub id: OccupantId,
    /// Capacity class this occupant requires.
    pub class: CapacityClass,
}

impl Occupant {
    /// Create an occupant with the given identity and class.
    pub fn new(id: impl Into<OccupantId>, class: CapacityClass) -> Self {
        Self {
            id: id.into(),
            class,
        }
    }

    /// A [`CapacityClass::Small`] occupant (e.g. a bike).
    pub fn small(id: impl Into<OccupantId>) -> Self {
        Self::new(id, CapacityClass::Small)
    }

    /// A [`CapacityClass::Medium`] occupant (e.g. a car).
    pub fn medium(id: impl Into<OccupantId>) -> Self {
        Self::new(id, CapacityClass::Medium)
    }

    /// A [`CapacityClass::Large`] occupant (e.g. a truck).
    pub fn large(id: impl Into<OccupantId>) -> Self {
        Self::new(id, CapacityClass::Large)
    }
}
