//! # Shooter telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Operator commands acting on the shooter mode state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShooterCmd {
    /// Swap the current and queued modes.
    SwitchModes,

    /// Queue the preset with the given name, replacing the queued mode.
    QueueMode(String),

    /// Force the current mode back to the default preset.
    DefaultOverride,

    /// Toggle the manual axis override.
    ToggleAxis,

    /// Mark the shooter as shooting.
    StartShooting,

    /// Mark the shooter as no longer shooting.
    StopShooting,

    SetLoaded(bool),

    SetElevatorLowered(bool),

    SetArmResting(bool),
}
