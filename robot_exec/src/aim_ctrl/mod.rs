//! # Aim control module
//!
//! Turns targeting camera detections into a field-relative goal and delegates driving to that
//! goal to the trajectory executor.
//!
//! The controller has two states within one activation:
//!
//! - `Idle` - no delegate, the camera is polled each cycle.
//! - `Tracking` - a delegate trajectory has been started for the first valid detection. The
//!   camera is no longer polled and each cycle is forwarded to the delegate.
//!
//! The transition is one-way, only a new activation (`AimCtrl::start`) returns to `Idle`. The
//! controller never finishes by itself, the activation lasts until its owner stops it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod distance;
mod frames;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use distance::*;
pub use frames::*;
pub use state::*;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Possible errors that can occur during AimCtrl processing.
///
/// None of these are fatal, the detection for the cycle is dropped and the camera is polled again
/// on the next cycle.
#[derive(Debug, thiserror::Error)]
pub enum AimCtrlError {
    #[error("Observation has an invalid apparent area ({0}), expected a finite value above 0")]
    InvalidObservation(f64),

    #[error("Collaborator unavailable: {0}")]
    MissingCollaborator(String),
}
