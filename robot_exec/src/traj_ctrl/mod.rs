//! # Trajectory control interface
//!
//! The trajectory executor is the drive-side collaborator which turns a waypoint list into a
//! runnable activity. This crate only specifies the interface, path following itself belongs to
//! the executor.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::loc::Pose2;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Minimum number of waypoints making up a valid path.
pub const MIN_NUM_WAYPOINTS: usize = 2;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A cancelable unit of work produced by a [`TrajExecutor`].
///
/// The owner calls `start` once, `update` once per control cycle, and `stop` when the activity is
/// ended, with `interrupted` set if it was cancelled rather than completed.
pub trait Activity {
    fn start(&mut self);

    fn update(&mut self);

    fn stop(&mut self, interrupted: bool);
}

/// Builds path following activities from waypoint lists.
pub trait TrajExecutor {
    /// Build a new activity following `waypoints` in order.
    ///
    /// If `reduced_speed` is set the activity must drive in the executor's reduced speed mode.
    fn build_activity(
        &mut self,
        waypoints: &[Pose2],
        reduced_speed: bool,
    ) -> Result<Box<dyn Activity>, TrajExecError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors reported by a trajectory executor when building an activity.
#[derive(Debug, thiserror::Error)]
pub enum TrajExecError {
    #[error("The trajectory executor is not available")]
    NotAvailable,

    #[error("Found {0} waypoints, expected at least {}", MIN_NUM_WAYPOINTS)]
    TooFewWaypoints(usize),

    #[error("Waypoint {0} is not finite")]
    NonFiniteWaypoint(usize),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Check that a waypoint list can be followed.
pub fn check_waypoints(waypoints: &[Pose2]) -> Result<(), TrajExecError> {
    if waypoints.len() < MIN_NUM_WAYPOINTS {
        return Err(TrajExecError::TooFewWaypoints(waypoints.len()));
    }

    for (i, w) in waypoints.iter().enumerate() {
        if !(w.x_m.is_finite() && w.y_m.is_finite() && w.heading.is_finite()) {
            return Err(TrajExecError::NonFiniteWaypoint(i));
        }
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Angle;

    #[test]
    fn test_check_waypoints() {
        let a = Pose2::new(0.0, 0.0, Angle::ZERO);
        let b = Pose2::new(1.0, 0.0, Angle::ZERO);
        let bad = Pose2::new(std::f64::NAN, 0.0, Angle::ZERO);

        assert!(check_waypoints(&[a, b]).is_ok());
        assert!(matches!(check_waypoints(&[a]), Err(TrajExecError::TooFewWaypoints(1))));
        assert!(matches!(check_waypoints(&[a, bad]), Err(TrajExecError::NonFiniteWaypoint(1))));
    }
}
