//! # Telecommand processor module
//!
//! The telecommand processor handles various TCs coming from any source.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, warn};

// Internal
use comms_if::tc::{aim::AimCmd, shooter::ShooterCmd, Tc};
use robot_lib::data_store::DataStore;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand.
///
/// Mutates the datastore to send commands to different modules.
pub(crate) fn exec(ds: &mut DataStore, tc: &Tc) {
    debug!("Recieved {:?} command", tc);

    // Handle different Tcs
    match tc {
        Tc::Aim(AimCmd::Start) => ds.start_aim(),
        // Releasing the trigger cancels the aim rather than completing it
        Tc::Aim(AimCmd::Stop) => ds.stop_aim(true),
        Tc::Shooter(cmd) => exec_shooter(ds, cmd),
    }
}

fn exec_shooter(ds: &mut DataStore, cmd: &ShooterCmd) {
    let shooter = &mut ds.shooter;

    match cmd {
        ShooterCmd::SwitchModes => shooter.switch_modes(),
        ShooterCmd::QueueMode(name) => {
            if let Err(e) = shooter.queue_mode(name) {
                warn!("Cannot queue shooter mode: {}", e);
            }
        }
        ShooterCmd::DefaultOverride => shooter.default_override(),
        ShooterCmd::ToggleAxis => shooter.toggle_axis(),
        ShooterCmd::StartShooting => shooter.start_shooting(),
        ShooterCmd::StopShooting => shooter.stop_shooting(),
        ShooterCmd::SetLoaded(l) => shooter.set_loaded(*l),
        ShooterCmd::SetElevatorLowered(l) => shooter.set_elevator_lowered(*l),
        ShooterCmd::SetArmResting(r) => shooter.set_arm_resting(*r),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use robot_lib::{
        aim_ctrl::AimCtrl,
        cam_client::CamMount,
        shooter_state::{ShooterModes, ShooterState},
    };

    fn ds() -> DataStore {
        DataStore::new(
            AimCtrl::new(&CamMount::targeting_cam_1()),
            ShooterState::new(ShooterModes::build().unwrap()),
        )
    }

    #[test]
    fn test_aim_start_stop() {
        let mut ds = ds();

        exec(&mut ds, &Tc::from_json("{\"Aim\":\"Start\"}").unwrap());
        assert!(ds.aim_active);
        assert!(!ds.aim_ctrl.is_tracking());

        exec(&mut ds, &Tc::Aim(AimCmd::Stop));
        assert!(!ds.aim_active);
    }

    #[test]
    fn test_shooter_cmds() {
        let mut ds = ds();

        exec(&mut ds, &Tc::from_json("{\"Shooter\":{\"QueueMode\":\"INTAKE\"}}").unwrap());
        exec(&mut ds, &Tc::Shooter(ShooterCmd::SwitchModes));
        assert_eq!(ds.shooter.current_mode().name, "INTAKE");
        assert_eq!(ds.shooter.queued_mode().name, "DEFAULT");

        // Unknown modes leave the queue alone
        exec(&mut ds, &Tc::Shooter(ShooterCmd::QueueMode(String::from("LOB"))));
        assert_eq!(ds.shooter.queued_mode().name, "DEFAULT");

        exec(&mut ds, &Tc::Shooter(ShooterCmd::DefaultOverride));
        assert_eq!(ds.shooter.current_mode().name, "DEFAULT");

        exec(&mut ds, &Tc::Shooter(ShooterCmd::SetElevatorLowered(false)));
        exec(&mut ds, &Tc::Shooter(ShooterCmd::SetLoaded(true)));
        exec(&mut ds, &Tc::Shooter(ShooterCmd::SetArmResting(false)));
        exec(&mut ds, &Tc::Shooter(ShooterCmd::ToggleAxis));
        exec(&mut ds, &Tc::Shooter(ShooterCmd::StartShooting));

        let tm = ds.shooter.tm();
        assert!(!tm.elevator_lowered && tm.loaded && !tm.arm_resting);
        assert!(tm.manual_axis_override && tm.shooting);

        exec(&mut ds, &Tc::Shooter(ShooterCmd::StopShooting));
        assert!(!ds.shooter.is_shooting());
    }
}
