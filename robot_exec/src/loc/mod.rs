//! # Localisation module
//!
//! Pose types for the robot in the field frame, and the interface to whatever maintains the
//! robot's pose (odometry, in practice).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::fmt::{self, Display};

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::geom::{Angle, RigidTransform};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A planar pose in the field frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose2 {
    /// Units: meters
    pub x_m: f64,

    /// Units: meters
    pub y_m: f64,

    /// Angle to the positive field X axis.
    pub heading: Angle,
}

/// The full pose (position and attitude in the field frame) of the robot.
///
/// More specifically this represents the robot body frame in the field frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the field frame
    pub position_m: Vector3<f64>,

    /// The attitude of the robot in the field frame.
    pub attitude_q: UnitQuaternion<f64>,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Source of the robot's current field pose.
///
/// Implementors must return a snapshot without blocking. `None` means no pose is available this
/// cycle.
pub trait PoseProvider {
    fn current_pose(&self) -> Option<Pose2>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose2 {
    pub fn new(x_m: f64, y_m: f64, heading: Angle) -> Self {
        Self { x_m, y_m, heading }
    }

    /// Distance between the positions of two poses, ignoring heading.
    pub fn dist_m(&self, other: &Pose2) -> f64 {
        (other.x_m - self.x_m).hypot(other.y_m - self.y_m)
    }
}

impl Pose {
    /// Lift a planar pose into 3D, with zero height, roll and pitch.
    pub fn from_pose2(pose: &Pose2) -> Self {
        Self {
            position_m: Vector3::new(pose.x_m, pose.y_m, 0.0),
            attitude_q: UnitQuaternion::from_euler_angles(0.0, 0.0, pose.heading.rad()),
        }
    }

    fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            position_m: iso.translation.vector,
            attitude_q: iso.rotation,
        }
    }

    fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.position_m), self.attitude_q)
    }

    /// Return the heading (angle to the positive field X axis) of the robot.
    pub fn get_heading(&self) -> Angle {
        Angle::from_rad(self.attitude_q.euler_angles().2)
    }

    /// Project onto the field plane, dropping height, roll and pitch.
    pub fn to_pose2(&self) -> Pose2 {
        Pose2 {
            x_m: self.position_m[0],
            y_m: self.position_m[1],
            heading: self.get_heading(),
        }
    }

    /// Apply `transform` in this pose's frame.
    pub fn transform_by(&self, transform: &RigidTransform) -> Pose {
        Pose::from_isometry(&(self.to_isometry() * *transform.isometry()))
    }
}

impl Display for Pose2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pose2(x: {:.4} m, y: {:.4} m, heading: {})", self.x_m, self.y_m, self.heading)
    }
}

impl Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, p, y) = self.attitude_q.euler_angles();
        write!(
            f,
            "Pose(x: {:.4} m, y: {:.4} m, z: {:.4} m, \
            roll: {:.4} rad, pitch: {:.4} rad, yaw: {:.4} rad)",
            self.position_m[0],
            self.position_m[1],
            self.position_m[2],
            r,
            p,
            y
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_projection_drops_z_roll_pitch() {
        let pose = Pose {
            position_m: Vector3::new(1.0, 2.0, 3.0),
            attitude_q: UnitQuaternion::from_euler_angles(0.2, -0.1, 0.7),
        };
        let p2 = pose.to_pose2();

        assert_eq!(p2.x_m, 1.0);
        assert_eq!(p2.y_m, 2.0);
        assert!((p2.heading.rad() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_lift_then_project() {
        let p2 = Pose2::new(-4.0, 0.5, Angle::from_rad(-2.5));
        let back = Pose::from_pose2(&p2).to_pose2();

        assert!((back.x_m - p2.x_m).abs() < 1e-12);
        assert!((back.y_m - p2.y_m).abs() < 1e-12);
        assert!((back.heading.rad() - p2.heading.rad()).abs() < 1e-9);
    }

    #[test]
    fn test_transform_by() {
        let robot = Pose::from_pose2(&Pose2::new(1.0, 2.0, Angle::from_deg(90.0)));
        let fwd = RigidTransform::from_xyz_rpy(
            2.0,
            0.0,
            0.0,
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
        );

        let moved = robot.transform_by(&fwd).to_pose2();
        assert!((moved.x_m - 1.0).abs() < 1e-9);
        assert!((moved.y_m - 4.0).abs() < 1e-9);
        assert!((moved.heading.deg() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let pose = Pose::from_pose2(&Pose2::new(1.0, -2.0, Angle::ZERO));

        let s = format!("{}", pose);

        // The continuation must not leak whitespace into the output
        assert!(s.starts_with("Pose(x: 1.0000 m, y: -2.0000 m, z: 0.0000 m, roll: "));
        assert!(s.contains(" rad, pitch: ") && s.ends_with(" rad)"));
    }
}
