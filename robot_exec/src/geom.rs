//! # Geometry primitives
//!
//! Angles and rigid transforms shared by the localisation and aim control modules.
//!
//! All angles in the library are carried as [`Angle`], which always stores radians. Degrees only
//! exist at the point an angle is built from, or displayed as, a degree value.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::{self, Display};
use std::ops::{Mul, Sub};

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of meters in an inch.
pub const METERS_PER_INCH: f64 = 0.0254;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A plane angle.
///
/// Units: radians (canonical storage)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Angle {
    rad: f64,
}

/// A rigid transform in 3D space: a translation followed by a rotation.
///
/// Composing `a * b` applies `b` in the frame of `a`, so that the translation of the result is
/// `t_a + R_a * t_b` and the rotation `R_a * R_b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    iso: Isometry3<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Angle {
    pub const ZERO: Angle = Angle { rad: 0.0 };

    pub fn from_rad(rad: f64) -> Self {
        Self { rad }
    }

    pub fn from_deg(deg: f64) -> Self {
        Self { rad: deg.to_radians() }
    }

    pub fn rad(&self) -> f64 {
        self.rad
    }

    pub fn deg(&self) -> f64 {
        self.rad.to_degrees()
    }

    pub fn cos(&self) -> f64 {
        self.rad.cos()
    }

    pub fn sin(&self) -> f64 {
        self.rad.sin()
    }

    /// The same angle wrapped into [-pi, pi).
    pub fn wrapped(&self) -> Self {
        Self { rad: util::maths::wrap_to_pi(self.rad) }
    }

    pub fn is_finite(&self) -> bool {
        self.rad.is_finite()
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle { rad: self.rad - rhs.rad }
    }
}

impl Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} rad", self.rad)
    }
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self { iso: Isometry3::identity() }
    }

    /// Build a transform from a translation and roll, pitch, yaw angles.
    ///
    /// The rotation is `Rz(yaw) * Ry(pitch) * Rx(roll)`.
    pub fn new(translation_m: Vector3<f64>, roll: Angle, pitch: Angle, yaw: Angle) -> Self {
        Self {
            iso: Isometry3::from_parts(
                Translation3::from(translation_m),
                UnitQuaternion::from_euler_angles(roll.rad(), pitch.rad(), yaw.rad()),
            ),
        }
    }

    pub fn from_xyz_rpy(
        x_m: f64,
        y_m: f64,
        z_m: f64,
        roll: Angle,
        pitch: Angle,
        yaw: Angle,
    ) -> Self {
        Self::new(Vector3::new(x_m, y_m, z_m), roll, pitch, yaw)
    }

    /// Compose `self` then `other`, applying `other` in the frame of `self`.
    pub fn compose(&self, other: &RigidTransform) -> RigidTransform {
        RigidTransform { iso: self.iso * other.iso }
    }

    pub fn translation_m(&self) -> Vector3<f64> {
        self.iso.translation.vector
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.iso.rotation
    }

    /// Get the (roll, pitch, yaw) of the transform's rotation.
    pub fn rpy(&self) -> (Angle, Angle, Angle) {
        let (r, p, y) = self.iso.rotation.euler_angles();
        (Angle::from_rad(r), Angle::from_rad(p), Angle::from_rad(y))
    }

    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }
}

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> RigidTransform {
        self.compose(&rhs)
    }
}

impl Display for RigidTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.translation_m();
        let (r, p, y) = self.rpy();
        write!(
            f,
            "T(x: {:.4} m, y: {:.4} m, z: {:.4} m, roll: {}, pitch: {}, yaw: {})",
            t[0], t[1], t[2], r, p, y
        )
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

pub fn inches_to_m(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}
