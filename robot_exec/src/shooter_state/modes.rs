//! Shooter presets

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::ShooterStateError;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Soft limit on the elevator height of a preset.
///
/// Units: inches from the ground
pub const MAX_HEIGHT_IN: f64 = 48.0;

/// Soft limit on the arm angle of a preset.
///
/// Units: degrees from the arm's angle offset
pub const MAX_ANGLE_DEG: f64 = 180.0;

pub const DEFAULT_MODE_NAME: &str = "DEFAULT";
pub const INTAKE_MODE_NAME: &str = "INTAKE";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A named set of shooter setpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShooterMode {
    pub name: String,

    /// Flywheel speed demand.
    ///
    /// Units: fraction of max speed, negative to intake
    pub speed: f64,

    /// Units: inches from the ground
    pub height_in: f64,

    /// Units: degrees from the arm's angle offset
    pub angle_deg: f64,

    /// True if this preset picks game pieces up rather than shooting them.
    pub is_intake: bool,
}

/// The table of presets known to the robot.
#[derive(Debug, Clone)]
pub struct ShooterModes {
    pub default: ShooterMode,
    pub intake: ShooterMode,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ShooterMode {
    /// Create a new preset, checking the height and angle are within limits.
    pub fn new(
        name: &str,
        speed: f64,
        height_in: f64,
        angle_deg: f64,
        is_intake: bool,
    ) -> Result<Self, ShooterStateError> {
        let invalid = |reason: String| ShooterStateError::InvalidPresetConfiguration {
            name: name.to_string(),
            reason,
        };

        if !(height_in.is_finite() && angle_deg.is_finite() && speed.is_finite()) {
            return Err(invalid(String::from("values must be finite")));
        }
        if height_in < 0.0 || angle_deg < 0.0 {
            return Err(invalid(format!(
                "negative height ({} in) or angle ({} deg)",
                height_in, angle_deg
            )));
        }
        if height_in > MAX_HEIGHT_IN || angle_deg > MAX_ANGLE_DEG {
            return Err(invalid(format!(
                "height ({} in) or angle ({} deg) exceeds soft limits ({} in, {} deg)",
                height_in, angle_deg, MAX_HEIGHT_IN, MAX_ANGLE_DEG
            )));
        }

        Ok(Self {
            name: name.to_string(),
            speed,
            height_in,
            angle_deg,
            is_intake,
        })
    }
}

impl ShooterModes {
    /// Build the preset table.
    ///
    /// Fails if any preset is out of limits, which should stop the robot from starting.
    pub fn build() -> Result<Self, ShooterStateError> {
        Ok(Self {
            default: ShooterMode::new(DEFAULT_MODE_NAME, 0.0, 0.0, 0.0, false)?,
            intake: ShooterMode::new(INTAKE_MODE_NAME, -0.35, 0.0, 0.0, true)?,
        })
    }

    /// Find a preset by its name.
    pub fn by_name(&self, name: &str) -> Result<&ShooterMode, ShooterStateError> {
        [&self.default, &self.intake]
            .iter()
            .find(|m| m.name == name)
            .copied()
            .ok_or_else(|| ShooterStateError::UnknownMode(name.to_string()))
    }
}
