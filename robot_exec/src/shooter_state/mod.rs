//! # Shooter state module
//!
//! Tracks which operating preset the shooter is in, along with the preset queued to swap in next
//! and a handful of flags describing the mechanism.
//!
//! The operator controls the modes through telecommands:
//!
//! - `SwitchModes` swaps the current and queued presets.
//! - `QueueMode` replaces the queued preset.
//! - `DefaultOverride` forces the current preset back to `DEFAULT`.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod modes;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use modes::*;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur in the shooter state.
#[derive(Debug, thiserror::Error)]
pub enum ShooterStateError {
    #[error("Preset {name} is invalid: {reason}")]
    InvalidPresetConfiguration { name: String, reason: String },

    #[error("No preset named {0}")]
    UnknownMode(String),
}
