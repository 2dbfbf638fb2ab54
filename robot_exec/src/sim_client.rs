//! # Simulation Client
//!
//! Stand-in collaborators for running the exec without hardware. The SimClient currently
//! provides:
//!
//! - [`SimDrive`] - a kinematic drive which reports its pose and follows waypoint lists at a
//!   fixed speed, halved in reduced speed mode.
//! - [`SimCam`] - a targeting camera which sees a single fixed target in the field whenever it's
//!   within the camera's field of view.
//!
//! Both share one [`SimWorld`]. Nothing here models dynamics, the drive moves exactly as
//! commanded.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, rc::Rc};

use comms_if::eqpt::cam::TargetObservation;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use util::maths::clamp;

use crate::{
    aim_ctrl::DistanceModel,
    cam_client::{CamMount, ObservationSource},
    geom::Angle,
    loc::{Pose, Pose2, PoseProvider},
    traj_ctrl::{check_waypoints, Activity, TrajExecError, TrajExecutor},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the simulated collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    /// Starting pose of the robot, `[x, y, heading]`.
    ///
    /// Units: meters, meters, radians
    pub start_pose: [f64; 3],

    /// Position of the target in the field.
    ///
    /// Units: meters
    pub target_position_m: [f64; 2],

    /// Units: meters/second
    pub drive_speed_ms: f64,

    /// Factor applied to the drive speed in reduced speed mode.
    pub reduced_speed_factor: f64,

    /// Half of the horizontal field of view of the camera.
    ///
    /// Units: radians
    pub cam_half_fov_rad: f64,

    /// Range beyond which the camera no longer sees the target.
    ///
    /// Units: meters
    pub cam_max_range_m: f64,
}

/// Shared state of the simulated field.
#[derive(Debug, Clone)]
pub struct SimWorld {
    pub robot_pose: Pose2,
    pub target_position_m: [f64; 2],
}

/// Kinematic drive stand-in.
pub struct SimDrive {
    world: Rc<RefCell<SimWorld>>,
    params: SimParams,
    cycle_period_s: f64,
}

/// Activity following a waypoint list on a [`SimDrive`].
pub struct SimPathActivity {
    world: Rc<RefCell<SimWorld>>,
    waypoints: Vec<Pose2>,
    speed_ms: f64,
    cycle_period_s: f64,
    target_idx: usize,
    running: bool,
}

/// Targeting camera stand-in.
pub struct SimCam {
    world: Rc<RefCell<SimWorld>>,
    mount: CamMount,
    distance_model: DistanceModel,
    half_fov_rad: f64,
    max_range_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimWorld {
    pub fn new(params: &SimParams) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            robot_pose: Pose2::new(
                params.start_pose[0],
                params.start_pose[1],
                Angle::from_rad(params.start_pose[2]),
            ),
            target_position_m: params.target_position_m,
        }))
    }
}

impl SimDrive {
    pub fn new(world: Rc<RefCell<SimWorld>>, params: &SimParams, cycle_period_s: f64) -> Self {
        Self {
            world,
            params: params.clone(),
            cycle_period_s,
        }
    }
}

impl PoseProvider for SimDrive {
    fn current_pose(&self) -> Option<Pose2> {
        Some(self.world.borrow().robot_pose)
    }
}

impl TrajExecutor for SimDrive {
    fn build_activity(
        &mut self,
        waypoints: &[Pose2],
        reduced_speed: bool,
    ) -> Result<Box<dyn Activity>, TrajExecError> {
        check_waypoints(waypoints)?;

        let speed_ms = if reduced_speed {
            self.params.drive_speed_ms * self.params.reduced_speed_factor
        } else {
            self.params.drive_speed_ms
        };

        debug!(
            "SimDrive building path with {} waypoints at {:.2} m/s",
            waypoints.len(),
            speed_ms
        );

        Ok(Box::new(SimPathActivity {
            world: self.world.clone(),
            waypoints: waypoints.to_vec(),
            speed_ms,
            cycle_period_s: self.cycle_period_s,
            target_idx: 1,
            running: false,
        }))
    }
}

impl SimPathActivity {
    /// True once the last waypoint has been reached.
    pub fn is_complete(&self) -> bool {
        self.target_idx >= self.waypoints.len()
    }
}

impl Activity for SimPathActivity {
    fn start(&mut self) {
        self.running = true;

        // Turn on the spot to the path heading
        let mut world = self.world.borrow_mut();
        world.robot_pose.heading = self.waypoints[0].heading;
    }

    fn update(&mut self) {
        if !self.running || self.is_complete() {
            return;
        }

        let mut world = self.world.borrow_mut();
        let mut step_m = self.speed_ms * self.cycle_period_s;

        // Move along the path, passing through as many waypoints as the step covers
        while step_m > 0.0 && !self.is_complete() {
            let target = self.waypoints[self.target_idx];
            let dist_m = world.robot_pose.dist_m(&target);

            if dist_m <= step_m {
                world.robot_pose = target;
                step_m -= dist_m;
                self.target_idx += 1;

                if self.is_complete() {
                    info!("SimDrive reached end of path at {}", world.robot_pose);
                }
            } else {
                let frac = step_m / dist_m;
                world.robot_pose.x_m += (target.x_m - world.robot_pose.x_m) * frac;
                world.robot_pose.y_m += (target.y_m - world.robot_pose.y_m) * frac;
                world.robot_pose.heading = target.heading;
                step_m = 0.0;
            }
        }

        trace!("SimDrive pose: {}", world.robot_pose);
    }

    fn stop(&mut self, interrupted: bool) {
        self.running = false;
        debug!(
            "SimDrive path stopped (interrupted: {}, complete: {})",
            interrupted,
            self.is_complete()
        );
    }
}

impl SimCam {
    pub fn new(world: Rc<RefCell<SimWorld>>, mount: CamMount, params: &SimParams) -> Self {
        Self {
            world,
            mount,
            distance_model: DistanceModel::default(),
            half_fov_rad: params.cam_half_fov_rad,
            max_range_m: params.cam_max_range_m,
        }
    }
}

impl ObservationSource for SimCam {
    fn poll(&mut self) -> Option<TargetObservation> {
        let world = self.world.borrow();

        let cam_pose = Pose::from_pose2(&world.robot_pose)
            .transform_by(&self.mount.location)
            .to_pose2();

        let dx = world.target_position_m[0] - cam_pose.x_m;
        let dy = world.target_position_m[1] - cam_pose.y_m;
        let range_m = dx.hypot(dy);
        let bearing_rad = (Angle::from_rad(dy.atan2(dx)) - cam_pose.heading).wrapped().rad();

        if range_m > self.max_range_m || bearing_rad.abs() > self.half_fov_rad {
            return Some(TargetObservation::no_target());
        }

        // The target fills the whole frame when closer than the model's full-frame range
        let area = match self.distance_model.area_at(range_m) {
            Some(a) => clamp(a, 0.0, 1.0),
            None => 1.0,
        };

        Some(TargetObservation::target(area, bearing_rad))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn params() -> SimParams {
        SimParams {
            start_pose: [0.0, 0.0, 0.0],
            target_position_m: [16.0, 3.0],
            drive_speed_ms: 2.0,
            reduced_speed_factor: 0.5,
            cam_half_fov_rad: 0.5,
            cam_max_range_m: 30.0,
        }
    }

    fn centred_cam() -> CamMount {
        CamMount::new("sim", 0.0, 0.0, 0.0, Angle::ZERO, Angle::ZERO, Angle::ZERO)
    }

    #[test]
    fn test_cam_sees_target_in_fov() {
        let p = params();
        let world = SimWorld::new(&p);
        let mut cam = SimCam::new(world.clone(), centred_cam(), &p);

        let obs = cam.poll().unwrap();
        assert!(obs.has_target);
        assert!((obs.bearing_rad - 3f64.atan2(16.0)).abs() < 1e-9);

        // The reported area maps back to the true range
        let range_m = DistanceModel::default().distance_to(obs.area).unwrap();
        assert!((range_m - 16f64.hypot(3.0)).abs() < 1e-6);

        // Facing away the target is out of view
        world.borrow_mut().robot_pose.heading = Angle::from_deg(180.0);
        assert!(!cam.poll().unwrap().has_target);
    }

    #[test]
    fn test_drive_follows_path() {
        let p = params();
        let world = SimWorld::new(&p);
        let mut drive = SimDrive::new(world.clone(), &p, 0.5);

        let heading = Angle::from_deg(90.0);
        let waypoints = [Pose2::new(0.0, 0.0, heading), Pose2::new(0.0, 2.0, heading)];

        let mut act = drive.build_activity(&waypoints, false).unwrap();
        act.start();
        act.update();

        let pose = drive.current_pose().unwrap();
        assert!((pose.y_m - 1.0).abs() < 1e-9);
        assert!((pose.heading.deg() - 90.0).abs() < 1e-9);

        for _ in 0..5 {
            act.update();
        }
        let pose = drive.current_pose().unwrap();
        assert!((pose.y_m - 2.0).abs() < 1e-9);
        assert!(pose.x_m.abs() < 1e-9);
    }

    #[test]
    fn test_drive_reduced_speed_and_stop() {
        let p = params();
        let world = SimWorld::new(&p);
        let mut drive = SimDrive::new(world, &p, 1.0);

        let waypoints = [Pose2::new(0.0, 0.0, Angle::ZERO), Pose2::new(10.0, 0.0, Angle::ZERO)];

        let mut act = drive.build_activity(&waypoints, true).unwrap();
        act.start();
        act.update();
        assert!((drive.current_pose().unwrap().x_m - 1.0).abs() < 1e-9);

        act.stop(true);
        act.update();
        assert!((drive.current_pose().unwrap().x_m - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_drive_rejects_bad_path() {
        let p = params();
        let mut drive = SimDrive::new(SimWorld::new(&p), &p, 0.02);

        assert!(matches!(
            drive.build_activity(&[Pose2::default()], false),
            Err(TrajExecError::TooFewWaypoints(1))
        ));
    }
}
