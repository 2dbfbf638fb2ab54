//! Shooter mode state machine

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{info, trace};
use serde::Serialize;

use super::{ShooterMode, ShooterModes, ShooterStateError};
use crate::tm::TmSink;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// If set, stopping a shot while in an intake preset drops back to `DEFAULT`.
pub const ASSIST_ENABLED: bool = false;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Current and queued shooter presets plus the mechanism flags.
#[derive(Debug, Clone)]
pub struct ShooterState {
    modes: ShooterModes,

    current: ShooterMode,
    queued: ShooterMode,

    assist_enabled: bool,

    loaded: bool,
    elevator_lowered: bool,
    arm_resting: bool,
    shooting: bool,
    manual_axis_override: bool,
}

/// Read only snapshot of the [`ShooterState`] for telemetry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShooterTm {
    pub manual_axis_override: bool,
    pub current_mode: String,
    pub queued_mode: String,
    pub loaded: bool,
    pub elevator_lowered: bool,
    pub arm_resting: bool,
    pub shooting: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ShooterState {
    /// Create the state with both slots on `DEFAULT`, the elevator lowered and the arm resting.
    pub fn new(modes: ShooterModes) -> Self {
        Self {
            current: modes.default.clone(),
            queued: modes.default.clone(),
            modes,
            assist_enabled: ASSIST_ENABLED,
            loaded: false,
            elevator_lowered: true,
            arm_resting: true,
            shooting: false,
            manual_axis_override: false,
        }
    }

    /// Override the assist behaviour of [`ShooterState::stop_shooting`].
    pub fn with_assist(mut self, enabled: bool) -> Self {
        self.assist_enabled = enabled;
        self
    }

    /// Swap the current and queued presets.
    pub fn switch_modes(&mut self) {
        std::mem::swap(&mut self.current, &mut self.queued);
        info!(
            "Shooter mode switched to {} (queued {})",
            self.current.name, self.queued.name
        );
    }

    pub fn set_queued_mode(&mut self, mode: ShooterMode) {
        self.queued = mode;
    }

    /// Queue the preset with the given name.
    pub fn queue_mode(&mut self, name: &str) -> Result<(), ShooterStateError> {
        let mode = self.modes.by_name(name)?.clone();
        self.set_queued_mode(mode);
        Ok(())
    }

    /// Force the current preset back to `DEFAULT`, leaving the queue alone.
    pub fn default_override(&mut self) {
        self.current = self.modes.default.clone();
        info!("Shooter mode overridden to {}", self.current.name);
    }

    /// Push `mode` in as the current preset, moving the old current preset into the queue.
    pub(crate) fn instant_switch(&mut self, mode: ShooterMode) {
        self.queued = std::mem::replace(&mut self.current, mode);
        info!(
            "Shooter mode instant switch to {} (queued {})",
            self.current.name, self.queued.name
        );
    }

    pub fn start_shooting(&mut self) {
        self.shooting = true;
    }

    pub fn stop_shooting(&mut self) {
        self.shooting = false;

        if self.assist_enabled && self.current.is_intake {
            let default = self.modes.default.clone();
            self.instant_switch(default);
        }
    }

    pub fn toggle_axis(&mut self) {
        self.manual_axis_override = !self.manual_axis_override;
    }

    pub fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    pub fn set_elevator_lowered(&mut self, lowered: bool) {
        self.elevator_lowered = lowered;
    }

    pub fn set_arm_resting(&mut self, resting: bool) {
        self.arm_resting = resting;
    }

    pub fn current_mode(&self) -> &ShooterMode {
        &self.current
    }

    pub fn queued_mode(&self) -> &ShooterMode {
        &self.queued
    }

    pub fn modes(&self) -> &ShooterModes {
        &self.modes
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_elevator_lowered(&self) -> bool {
        self.elevator_lowered
    }

    pub fn is_arm_resting(&self) -> bool {
        self.arm_resting
    }

    pub fn is_shooting(&self) -> bool {
        self.shooting
    }

    pub fn is_manual_axis_override(&self) -> bool {
        self.manual_axis_override
    }

    /// Flywheel speed demanded by the current preset.
    pub fn shooter_speed(&self) -> f64 {
        self.current.speed
    }

    pub fn tm(&self) -> ShooterTm {
        ShooterTm {
            manual_axis_override: self.manual_axis_override,
            current_mode: self.current.name.clone(),
            queued_mode: self.queued.name.clone(),
            loaded: self.loaded,
            elevator_lowered: self.elevator_lowered,
            arm_resting: self.arm_resting,
            shooting: self.shooting,
        }
    }

    /// Publish the current snapshot to `sink`.
    pub fn publish(&self, sink: &mut dyn TmSink) {
        let tm = self.tm();
        trace!("Shooter TM: {:?}", tm);

        sink.put_bool("Manual Arm Mode Enabled", tm.manual_axis_override);
        sink.put_str("Current Mode", tm.current_mode);
        sink.put_str("Queued Mode", tm.queued_mode);
        sink.put_bool("Loaded", tm.loaded);
        sink.put_bool("Elevator Lowered", tm.elevator_lowered);
        sink.put_bool("Resting", tm.arm_resting);
        sink.put_bool("Arm Shooting", tm.shooting);
    }
}
