//! # Aim control telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Activation commands for the aim controller.
///
/// The aim controller never finishes by itself, so an activation lasts from `Start` until `Stop`,
/// which is how a held trigger binding is delivered.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AimCmd {
    /// Begin a new activation, discarding any previous lock.
    Start,

    /// Cancel the current activation, interrupting any delegated trajectory.
    Stop,
}
