//! # Data Store

use log::{info, warn};

use crate::{
    aim_ctrl::{AimCtrl, StatusReport},
    shooter_state::ShooterState,
    tm::TmStore,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
///
/// Owns every piece of controller state, which is passed explicitly through the cycle.
#[derive(Debug)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    // Aim control
    /// True while the aim command is held
    pub aim_active: bool,

    pub aim_ctrl: AimCtrl,

    /// Report from this cycle's aim processing, default if aim control didn't run
    pub aim_status_rpt: StatusReport,

    // Shooter
    pub shooter: ShooterState,

    // Telemetry
    pub tm: TmStore,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    pub fn new(aim_ctrl: AimCtrl, shooter: ShooterState) -> Self {
        Self {
            num_cycles: 0,
            aim_active: false,
            aim_ctrl,
            aim_status_rpt: StatusReport::default(),
            shooter,
            tm: TmStore::new(),
            num_consec_cycle_overruns: 0,
        }
    }

    /// Activate aim control, starting a fresh session.
    ///
    /// Does nothing if aim control is already active.
    pub fn start_aim(&mut self) {
        if self.aim_active {
            warn!("Aim start requested while aim control is already active, ignoring");
            return;
        }

        self.aim_ctrl.start();
        self.aim_active = true;
    }

    /// Deactivate aim control.
    pub fn stop_aim(&mut self, interrupted: bool) {
        if !self.aim_active {
            return;
        }

        self.aim_ctrl.stop(interrupted);
        self.aim_active = false;
        info!("Aim control deactivated after {} cycles", self.num_cycles);
    }

    /// Perform actions required at the start of a cycle.
    pub fn cycle_start(&mut self) {
        self.aim_status_rpt = StatusReport::default();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{cam_client::CamMount, shooter_state::ShooterModes};

    fn data_store() -> DataStore {
        DataStore::new(
            AimCtrl::new(&CamMount::targeting_cam_1()),
            ShooterState::new(ShooterModes::build().unwrap()),
        )
    }

    #[test]
    fn test_aim_start_stop() {
        let mut ds = data_store();

        // Stopping while inactive does nothing
        ds.stop_aim(true);
        assert!(!ds.aim_active);

        ds.start_aim();
        ds.start_aim();
        assert!(ds.aim_active);

        ds.stop_aim(false);
        assert!(!ds.aim_active);
    }

    #[test]
    fn test_cycle_start_clears_status() {
        let mut ds = data_store();

        ds.aim_status_rpt = StatusReport {
            target_visible: true,
            tracking: true,
            activity_requested: true,
        };
        ds.cycle_start();
        assert_eq!(ds.aim_status_rpt, StatusReport::default());
    }
}
