//! # Camera Client
//!
//! Interface to the targeting camera's detection pipeline, and the fixed mounting of the cameras
//! on the robot.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::cam::TargetObservation;

use crate::geom::{inches_to_m, Angle, RigidTransform};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of target detections.
///
/// `poll` returns the most recent single best detection, or `None` if the pipeline has produced
/// nothing. It must not block.
pub trait ObservationSource {
    fn poll(&mut self) -> Option<TargetObservation>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A camera and where it sits on the robot.
#[derive(Debug, Clone, Copy)]
pub struct CamMount {
    pub name: &'static str,

    /// Transform from the robot's reference point to the camera.
    ///
    /// Frame: robot body
    pub location: RigidTransform,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CamMount {
    /// Build a mount from the camera's position and attitude in the robot body frame.
    pub fn new(
        name: &'static str,
        x_m: f64,
        y_m: f64,
        z_m: f64,
        roll: Angle,
        pitch: Angle,
        yaw: Angle,
    ) -> Self {
        Self {
            name,
            location: RigidTransform::from_xyz_rpy(x_m, y_m, z_m, roll, pitch, yaw),
        }
    }

    /// The forward targeting camera.
    pub fn targeting_cam_1() -> Self {
        Self::new(
            "Targeting1",
            inches_to_m(-1.0),  // X: front/back
            inches_to_m(-1.0),  // Y: left/right
            inches_to_m(12.5),  // Z: up/down
            Angle::from_deg(0.0),
            Angle::from_deg(0.0),
            Angle::from_deg(0.0),
        )
    }
}
