//! # Camera Equipment Communications Module

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The single best detection reported by the targeting camera's pipeline on one poll.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct TargetObservation {
    /// UTC timestamp at which the pipeline result was produced
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// True if the pipeline found a target in this frame. If false the other fields carry no
    /// meaning.
    pub has_target: bool,

    /// Fraction of the camera's field of view covered by the target.
    ///
    /// Units: none, expected in (0, 1]
    pub area: f64,

    /// Horizontal angle from the camera boresight to the target, positive to the left.
    ///
    /// Units: radians
    pub bearing_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TargetObservation {
    /// An observation of a frame with no target in it.
    pub fn no_target() -> Self {
        Self {
            timestamp: Utc::now(),
            has_target: false,
            area: 0.0,
            bearing_rad: 0.0,
        }
    }

    /// An observation of a target with the bearing given in radians.
    pub fn target(area: f64, bearing_rad: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            has_target: true,
            area,
            bearing_rad,
        }
    }

    /// An observation of a target with the bearing given as a yaw in degrees, as reported by
    /// most camera pipelines.
    pub fn from_yaw_deg(area: f64, yaw_deg: f64) -> Self {
        Self::target(area, yaw_deg.to_radians())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_yaw_deg() {
        let obs = TargetObservation::from_yaw_deg(0.5, 90.0);
        assert!(obs.has_target);
        assert!((obs.bearing_rad - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!(!TargetObservation::no_target().has_target);
    }

    #[test]
    fn test_json_round_trip_keeps_timestamp_ms() {
        let obs = TargetObservation::target(0.25, 0.1);
        let json = serde_json::to_string(&obs).unwrap();
        let back: TargetObservation = serde_json::from_str(&json).unwrap();

        assert_eq!(back.area, obs.area);
        assert_eq!(back.bearing_rad, obs.bearing_rad);
        assert_eq!(back.timestamp.timestamp_millis(), obs.timestamp.timestamp_millis());
    }
}
