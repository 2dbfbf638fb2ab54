//! Distance estimation from a detection's apparent area

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;

use super::AimCtrlError;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Power law fitted to measured (area, distance) pairs for the game piece.
pub const TARGET_DISTANCE_MODEL: DistanceModel = DistanceModel {
    coefficient: 9.847,
    exponent: -0.6214,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A fitted power law `range_m = coefficient * area^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceModel {
    pub coefficient: f64,
    pub exponent: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DistanceModel {
    /// Estimate the range to a target covering `area` of the field of view.
    ///
    /// Units: meters
    pub fn distance_to(&self, area: f64) -> Result<f64, AimCtrlError> {
        if !area.is_finite() || area <= 0.0 {
            return Err(AimCtrlError::InvalidObservation(area));
        }

        Ok(self.coefficient * area.powf(self.exponent))
    }

    /// The apparent area a target at `range_m` would have, the inverse of
    /// [`DistanceModel::distance_to`].
    ///
    /// Returns `None` for non-positive or non-finite ranges.
    pub fn area_at(&self, range_m: f64) -> Option<f64> {
        if !range_m.is_finite() || range_m <= 0.0 {
            return None;
        }

        Some((range_m / self.coefficient).powf(1.0 / self.exponent))
    }
}

impl Default for DistanceModel {
    fn default() -> Self {
        TARGET_DISTANCE_MODEL
    }
}
