//! Main robot-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Telecommand processing and handling
//!         - Aim control processing, if the aim command is held
//!         - Shooter telemetry
//!         - Cycle management
//!     - Save the final telemetry into the session

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use robot_lib::{
    aim_ctrl::AimCtrl,
    cam_client::{CamMount, ObservationSource},
    data_store::DataStore,
    loc::PoseProvider,
    params::RobotExecParams,
    shooter_state::{ShooterModes, ShooterState},
    traj_ctrl::TrajExecutor,
};
#[cfg(feature = "sim")]
use robot_lib::sim_client::{SimCam, SimDrive, SimParams, SimWorld};

mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info, trace, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The drive side of the aim controller, a pose source that also executes trajectories.
trait Drive: PoseProvider + TrajExecutor {}

impl<T: PoseProvider + TrajExecutor> Drive for T {}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("robot_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger, the sim stand-ins log every cycle at trace
    logger_init(
        LevelFilter::Trace,
        &[("robot_lib::sim_client", LevelFilter::Debug)],
        &session,
    )
    .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Robot Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: RobotExecParams = util::params::load("robot_exec.toml")
        .wrap_err("Could not load exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    if args.len() != 2 {
        return Err(eyre!(
            "Expected one argument (the path to the TC script), found {}",
            args.len() - 1
        ));
    }

    info!("Loading script from \"{}\"", &args[1]);

    let si = ScriptInterpreter::new(&args[1]).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        si.get_duration(),
        si.get_num_tcs()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let modes = ShooterModes::build().wrap_err("Invalid shooter preset")?;

    let mut ds = DataStore::new(
        AimCtrl::new(&CamMount::targeting_cam_1()),
        ShooterState::new(modes),
    );

    info!("Module initialisation complete\n");

    // ---- INITIALISE COLLABORATORS ----

    let (mut cam, mut drive) = init_collaborators(&exec_params)?;

    // ---- MAIN LOOP ----

    run(&mut ds, si, &exec_params, cam.as_mut(), drive.as_mut())?;

    // ---- SHUTDOWN ----

    ds.stop_aim(true);

    let tm_path = session
        .save_json("tm.json", &ds.tm)
        .wrap_err("Failed to save the final telemetry")?;
    info!("Final telemetry saved to {:?}", tm_path);

    info!("End of execution");

    Ok(())
}

/// Build the simulated camera and drive sharing one field.
#[cfg(feature = "sim")]
fn init_collaborators(
    exec_params: &RobotExecParams,
) -> Result<(Box<dyn ObservationSource>, Box<dyn Drive>), Report> {
    let sim_params: SimParams =
        util::params::load("sim.toml").wrap_err("Could not load sim params")?;

    let world = SimWorld::new(&sim_params);
    let cam = SimCam::new(world.clone(), CamMount::targeting_cam_1(), &sim_params);
    let drive = SimDrive::new(world, &sim_params, exec_params.cycle_period_s);
    info!("Simulated camera and drive initialised");

    Ok((Box::new(cam), Box::new(drive)))
}

#[cfg(not(feature = "sim"))]
fn init_collaborators(
    _exec_params: &RobotExecParams,
) -> Result<(Box<dyn ObservationSource>, Box<dyn Drive>), Report> {
    Err(eyre!("No camera or drive available, robot_exec must be built with the sim feature"))
}

/// Run the main loop until the script ends or the cycle limit is reached.
fn run(
    ds: &mut DataStore,
    mut si: ScriptInterpreter,
    params: &RobotExecParams,
    cam: &mut dyn ObservationSource,
    drive: &mut dyn Drive,
) -> Result<(), Report> {
    let cycle_period = Duration::from_secs_f64(params.cycle_period_s);

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start();

        // ---- TELECOMMAND PROCESSING ----

        // Script time advances by one period per cycle so runs are repeatable
        let script_time_s = ds.num_cycles as f64 * params.cycle_period_s;

        match si.get_pending_tcs(script_time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    tc_processor::exec(ds, tc);
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break;
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        if ds.aim_active {
            match ds.aim_ctrl.tick(&mut *cam, &mut *drive, &ds.shooter, &mut ds.tm) {
                Ok(r) => ds.aim_status_rpt = r,
                // Aim errors just drop the cycle's detection, so warn and try again next cycle
                Err(e) => warn!("Error during AimCtrl processing: {}", e),
            }

            trace!("AimCtrl status: {:?}", ds.aim_status_rpt);
        }

        // ---- TELEMETRY ----

        ds.shooter.publish(&mut ds.tm);

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match cycle_period.checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                ds.num_consec_cycle_overruns += 1;
                warn!(
                    "Cycle overran by {:.06} s ({} consecutive overruns)",
                    cycle_dur.as_secs_f64() - cycle_period.as_secs_f64(),
                    ds.num_consec_cycle_overruns
                );
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;

        if let Some(max) = params.max_num_cycles {
            if ds.num_cycles >= max as u128 {
                info!("Reached the maximum of {} cycles, stopping", max);
                break;
            }
        }
    }

    Ok(())
}
