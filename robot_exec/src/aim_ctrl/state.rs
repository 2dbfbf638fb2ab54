//! Aim controller state machine

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use log::{debug, info, trace};
use serde::Serialize;

use super::{
    compose_goal_pose, derive_heading, target_offset_from_obs, AimCtrlError, DistanceModel,
    MountOffset,
};
use crate::{
    cam_client::{CamMount, ObservationSource},
    geom::Angle,
    loc::{Pose, Pose2, PoseProvider},
    shooter_state::ShooterState,
    tm::TmSink,
    traj_ctrl::{Activity, TrajExecutor},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

pub const TM_TARGET_DETECTED: &str = "CameraTargetDetected";
pub const TM_RANGE: &str = "BallDistance";
pub const TM_CAM_TO_TARGET: &str = "AimCamToTargetTransform";
pub const TM_TARGET_REL_ROBOT: &str = "AimTargetRelRobotPose";
pub const TM_GOAL_POSE: &str = "AimNavRelPose";
pub const TM_GOAL_POSE_2D: &str = "AimNav2dPose";
pub const TM_HEADING: &str = "AimHeadingRad";
pub const TM_TRACKING: &str = "AimTracking";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Aim controller
///
/// Holds the per-activation [`AimSession`] along with the calibration used to turn detections
/// into goals.
pub struct AimCtrl {
    mount: MountOffset,

    distance_model: DistanceModel,

    session: AimSession,
}

/// Summary of a single aim cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// True if the camera reported a target this cycle. Always false while tracking since the
    /// camera isn't polled.
    pub target_visible: bool,

    /// True if the session holds a delegate at the end of the cycle.
    pub tracking: bool,

    /// True if a new activity was requested from the executor this cycle.
    pub activity_requested: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// State of one activation of the controller.
pub enum AimSession {
    /// No delegate yet, the camera is polled every cycle.
    Idle,

    /// Locked on, the delegate receives every cycle until the activation stops.
    Tracking(Box<dyn Activity>),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AimCtrl {
    /// Create a new controller for the camera on the given mount, with no stand-off.
    pub fn new(cam: &CamMount) -> Self {
        Self::with_mount_offset(MountOffset::from_mount(cam))
    }

    pub fn with_mount_offset(mount: MountOffset) -> Self {
        Self {
            mount,
            distance_model: DistanceModel::default(),
            session: AimSession::Idle,
        }
    }

    /// Begin a new activation, dropping any delegate from the last one.
    pub fn start(&mut self) {
        if let AimSession::Tracking(_) = self.session {
            debug!("Dropping delegate from previous aim activation");
        }

        self.session = AimSession::Idle;
        info!("AimCtrl activated");
    }

    /// Run one control cycle.
    ///
    /// While idle this polls `cam` once and, on a valid detection, builds and starts a delegate
    /// activity driving to the target. Once tracking the delegate is updated and nothing else is
    /// evaluated.
    ///
    /// An `Err` means the cycle's detection was dropped. The controller stays idle and will try
    /// again on the next cycle.
    pub fn tick<C, D>(
        &mut self,
        cam: &mut C,
        drive: &mut D,
        shooter: &ShooterState,
        tm: &mut dyn TmSink,
    ) -> Result<StatusReport, AimCtrlError>
    where
        C: ObservationSource + ?Sized,
        D: PoseProvider + TrajExecutor + ?Sized,
    {
        let mut report = StatusReport::default();

        if let AimSession::Tracking(ref mut delegate) = self.session {
            delegate.update();

            report.tracking = true;
            tm.put_bool(TM_TRACKING, true);
            return Ok(report);
        }

        tm.put_bool(TM_TRACKING, false);

        let obs = match cam.poll() {
            Some(o) if o.has_target => o,
            _ => {
                trace!("No target");
                tm.put_bool(TM_TARGET_DETECTED, false);
                return Ok(report);
            }
        };

        // Without a pose or a usable range the detection counts as no observation
        let robot_pose2 = match drive.current_pose() {
            Some(p) => p,
            None => {
                tm.put_bool(TM_TARGET_DETECTED, false);
                return Err(AimCtrlError::MissingCollaborator(String::from(
                    "pose provider has no pose",
                )));
            }
        };

        let range_m = match self.distance_model.distance_to(obs.area) {
            Ok(r) => r,
            Err(e) => {
                tm.put_bool(TM_TARGET_DETECTED, false);
                return Err(e);
            }
        };

        report.target_visible = true;
        tm.put_bool(TM_TARGET_DETECTED, true);
        tm.put_num(TM_RANGE, range_m);

        let robot_pose = Pose::from_pose2(&robot_pose2);

        let obs_offset = target_offset_from_obs(range_m, Angle::from_rad(obs.bearing_rad));
        let goal = compose_goal_pose(&robot_pose, &self.mount, &obs_offset);
        let goal2 = goal.to_pose2();
        let heading = derive_heading(&goal);

        tm.put_str(TM_CAM_TO_TARGET, format!("{}", obs_offset));
        tm.put_str(
            TM_TARGET_REL_ROBOT,
            format!("{}", obs_offset.compose(self.mount.transform())),
        );
        tm.put_str(TM_GOAL_POSE, format!("{}", goal));
        tm.put_str(TM_GOAL_POSE_2D, format!("{}", goal2));
        tm.put_num(TM_HEADING, heading.rad());

        let waypoints = [
            Pose2::new(robot_pose2.x_m, robot_pose2.y_m, heading),
            Pose2::new(goal2.x_m, goal2.y_m, heading),
        ];
        let reduced_speed = !shooter.is_elevator_lowered();

        report.activity_requested = true;
        let mut delegate = drive
            .build_activity(&waypoints, reduced_speed)
            .map_err(|e| AimCtrlError::MissingCollaborator(format!("{}", e)))?;

        delegate.start();
        self.session = AimSession::Tracking(delegate);

        info!(
            "Locked on to target at {:.3} m, driving to {} (reduced speed: {})",
            range_m, waypoints[1], reduced_speed
        );

        report.tracking = true;
        tm.put_bool(TM_TRACKING, true);

        Ok(report)
    }

    /// End the activation, forwarding the stop to the delegate if there is one.
    ///
    /// The session is left as is, the next [`AimCtrl::start`] clears it.
    pub fn stop(&mut self, interrupted: bool) {
        if let AimSession::Tracking(ref mut delegate) = self.session {
            delegate.stop(interrupted);
        }

        info!("AimCtrl stopped (interrupted: {})", interrupted);
    }

    /// Whether the controller has finished. It never finishes by itself, the owner must stop it.
    pub fn is_finished(&self) -> bool {
        false
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.session, AimSession::Tracking(_))
    }
}

impl fmt::Debug for AimSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AimSession::Idle => write!(f, "Idle"),
            AimSession::Tracking(_) => write!(f, "Tracking"),
        }
    }
}

impl fmt::Debug for AimCtrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AimCtrl")
            .field("mount", &self.mount)
            .field("distance_model", &self.distance_model)
            .field("session", &self.session)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        shooter_state::ShooterModes,
        tm::TmStore,
        traj_ctrl::TrajExecError,
    };
    use comms_if::eqpt::cam::TargetObservation;
    use std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        rc::Rc,
    };

    /// Observation source yielding a fixed sequence, then nothing.
    struct ScriptedSource {
        obs: VecDeque<Option<TargetObservation>>,
        num_polls: Rc<Cell<usize>>,
    }

    impl ScriptedSource {
        fn new(obs: Vec<Option<TargetObservation>>) -> Self {
            Self {
                obs: obs.into(),
                num_polls: Rc::new(Cell::new(0)),
            }
        }
    }

    impl ObservationSource for ScriptedSource {
        fn poll(&mut self) -> Option<TargetObservation> {
            self.num_polls.set(self.num_polls.get() + 1);
            self.obs.pop_front().flatten()
        }
    }

    #[derive(Default)]
    struct ActivityCounters {
        starts: Cell<usize>,
        updates: Cell<usize>,
        stops: Cell<usize>,
        last_interrupted: Cell<Option<bool>>,
    }

    struct RecordingActivity {
        counters: Rc<ActivityCounters>,
    }

    impl Activity for RecordingActivity {
        fn start(&mut self) {
            self.counters.starts.set(self.counters.starts.get() + 1);
        }

        fn update(&mut self) {
            self.counters.updates.set(self.counters.updates.get() + 1);
        }

        fn stop(&mut self, interrupted: bool) {
            self.counters.stops.set(self.counters.stops.get() + 1);
            self.counters.last_interrupted.set(Some(interrupted));
        }
    }

    /// Drive double with a settable pose that records every activity request.
    struct RecordingDrive {
        pose: Option<Pose2>,
        fail_builds: bool,
        requests: Rc<RefCell<Vec<(Vec<Pose2>, bool)>>>,
        counters: Rc<ActivityCounters>,
    }

    impl RecordingDrive {
        fn at(pose: Pose2) -> Self {
            Self {
                pose: Some(pose),
                fail_builds: false,
                requests: Rc::new(RefCell::new(Vec::new())),
                counters: Rc::new(ActivityCounters::default()),
            }
        }
    }

    impl PoseProvider for RecordingDrive {
        fn current_pose(&self) -> Option<Pose2> {
            self.pose
        }
    }

    impl TrajExecutor for RecordingDrive {
        fn build_activity(
            &mut self,
            waypoints: &[Pose2],
            reduced_speed: bool,
        ) -> Result<Box<dyn Activity>, TrajExecError> {
            self.requests
                .borrow_mut()
                .push((waypoints.to_vec(), reduced_speed));

            if self.fail_builds {
                return Err(TrajExecError::NotAvailable);
            }

            Ok(Box::new(RecordingActivity {
                counters: self.counters.clone(),
            }))
        }
    }

    fn shooter() -> ShooterState {
        ShooterState::new(ShooterModes::build().unwrap())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_locks_on_to_first_detection() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![
            Some(TargetObservation::target(0.3, 0.2)),
            Some(TargetObservation::target(0.6, -0.4)),
        ]);
        let mut drive = RecordingDrive::at(Pose2::new(0.0, 0.0, Angle::ZERO));
        let shooter = shooter();
        let mut tm = TmStore::new();

        ctrl.start();
        let r1 = ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
        let r2 = ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();

        assert!(r1.activity_requested && r1.tracking);
        assert!(!r2.activity_requested && r2.tracking);
        assert_eq!(drive.requests.borrow().len(), 1);

        // The second detection is never even looked at
        assert_eq!(cam.num_polls.get(), 1);
        assert_eq!(drive.counters.starts.get(), 1);
        assert_eq!(drive.counters.updates.get(), 1);
        assert!(ctrl.is_tracking());
    }

    #[test]
    fn test_scenario_three_misses_then_hit() {
        let cam_mount = CamMount::targeting_cam_1();
        let mut ctrl = AimCtrl::new(&cam_mount);
        let mut cam = ScriptedSource::new(vec![
            Some(TargetObservation::no_target()),
            Some(TargetObservation::no_target()),
            Some(TargetObservation::no_target()),
            Some(TargetObservation::target(0.25, 0.1)),
        ]);
        let mut drive = RecordingDrive::at(Pose2::new(1.0, 2.0, Angle::ZERO));
        let shooter = shooter();
        let mut tm = TmStore::new();

        ctrl.start();
        for i in 1..=3 {
            ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
            assert_eq!(tm.get_bool(TM_TARGET_DETECTED), Some(false), "tick {}", i);
            assert_eq!(tm.get_bool(TM_TRACKING), Some(false), "tick {}", i);
            assert!(drive.requests.borrow().is_empty());
        }
        for key in [TM_CAM_TO_TARGET, TM_TARGET_REL_ROBOT, TM_GOAL_POSE, TM_GOAL_POSE_2D].iter() {
            assert_eq!(tm.get_str(key), None, "{}", key);
        }

        ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
        assert_eq!(tm.get_bool(TM_TARGET_DETECTED), Some(true));
        assert_eq!(tm.get_bool(TM_TRACKING), Some(true));
        assert!(tm.get_str(TM_CAM_TO_TARGET).unwrap().starts_with("T("));
        assert!(tm.get_str(TM_TARGET_REL_ROBOT).unwrap().starts_with("T("));
        assert!(tm.get_str(TM_GOAL_POSE).unwrap().starts_with("Pose("));
        assert!(tm.get_str(TM_GOAL_POSE_2D).unwrap().starts_with("Pose2("));

        for _ in 0..5 {
            ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
            assert_eq!(tm.get_bool(TM_TARGET_DETECTED), Some(true));
        }

        let requests = drive.requests.borrow();
        assert_eq!(requests.len(), 1);
        let (waypoints, reduced) = &requests[0];
        assert_eq!(waypoints.len(), 2);
        assert!(!reduced);

        // Expected goal worked out by hand: the robot frame is the field frame at (1, 2), the
        // observation offset turns by the bearing, and the mount is applied in the turned frame.
        let r = 9.847 * 0.25f64.powf(-0.6214);
        let b = 0.1f64;
        let m = cam_mount.location.translation_m();
        let goal_x = 1.0 + r * b.cos() + m[0] * b.cos() - m[1] * b.sin();
        let goal_y = 2.0 + r * b.sin() + m[0] * b.sin() + m[1] * b.cos();

        assert!(close(tm.get_num(TM_RANGE).unwrap(), r));

        assert!(close(waypoints[0].x_m, 1.0));
        assert!(close(waypoints[0].y_m, 2.0));
        assert!(close(waypoints[0].heading.rad(), b));

        assert!(close(waypoints[1].x_m, goal_x));
        assert!(close(waypoints[1].y_m, goal_y));
        assert!(close(waypoints[1].heading.rad(), b));
        assert!(close(tm.get_num(TM_HEADING).unwrap(), b));
    }

    #[test]
    fn test_never_finishes() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![None, Some(TargetObservation::target(0.5, 0.0))]);
        let mut drive = RecordingDrive::at(Pose2::default());
        let shooter = shooter();
        let mut tm = TmStore::new();

        ctrl.start();
        for _ in 0..1000 {
            ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
            assert!(!ctrl.is_finished());
        }

        assert_eq!(drive.counters.updates.get(), 998);
    }

    #[test]
    fn test_missing_pose_retries() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![
            Some(TargetObservation::target(0.5, 0.0)),
            Some(TargetObservation::target(0.5, 0.0)),
        ]);
        let mut drive = RecordingDrive::at(Pose2::default());
        drive.pose = None;
        let shooter = shooter();
        let mut tm = TmStore::new();

        ctrl.start();
        assert!(matches!(
            ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm),
            Err(AimCtrlError::MissingCollaborator(_))
        ));
        assert!(!ctrl.is_tracking());
        assert!(drive.requests.borrow().is_empty());

        // Nothing about the detection is published
        assert_eq!(tm.get_bool(TM_TARGET_DETECTED), Some(false));
        assert_eq!(tm.get_bool(TM_TRACKING), Some(false));
        assert_eq!(tm.get_num(TM_RANGE), None);

        drive.pose = Some(Pose2::new(0.5, 0.5, Angle::ZERO));
        let report = ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
        assert!(report.tracking);
        assert_eq!(drive.requests.borrow().len(), 1);
    }

    #[test]
    fn test_executor_error_retries() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![
            Some(TargetObservation::target(0.5, 0.0)),
            Some(TargetObservation::target(0.5, 0.0)),
        ]);
        let mut drive = RecordingDrive::at(Pose2::default());
        drive.fail_builds = true;
        let shooter = shooter();
        let mut tm = TmStore::new();

        ctrl.start();
        assert!(matches!(
            ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm),
            Err(AimCtrlError::MissingCollaborator(_))
        ));
        assert!(!ctrl.is_tracking());
        assert_eq!(drive.counters.starts.get(), 0);

        drive.fail_builds = false;
        ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
        assert!(ctrl.is_tracking());
        assert_eq!(drive.requests.borrow().len(), 2);
        assert_eq!(drive.counters.starts.get(), 1);
    }

    #[test]
    fn test_invalid_area_dropped() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![Some(TargetObservation::target(0.0, 0.0))]);
        let mut drive = RecordingDrive::at(Pose2::default());
        let shooter = shooter();
        let mut tm = TmStore::new();

        ctrl.start();
        assert!(matches!(
            ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm),
            Err(AimCtrlError::InvalidObservation(_))
        ));
        assert!(!ctrl.is_tracking());
        assert_eq!(tm.get_bool(TM_TARGET_DETECTED), Some(false));
        assert_eq!(tm.get_num(TM_RANGE), None);
        assert!(drive.requests.borrow().is_empty());
    }

    #[test]
    fn test_stop_forwards_to_delegate() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![Some(TargetObservation::target(0.5, 0.0))]);
        let mut drive = RecordingDrive::at(Pose2::default());
        let shooter = shooter();
        let mut tm = TmStore::new();

        // Stopping while idle has nothing to forward
        ctrl.start();
        ctrl.stop(true);
        assert_eq!(drive.counters.stops.get(), 0);

        ctrl.start();
        ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
        ctrl.stop(true);
        assert_eq!(drive.counters.stops.get(), 1);
        assert_eq!(drive.counters.last_interrupted.get(), Some(true));

        // A new activation goes back to idle and polls again
        ctrl.start();
        assert!(!ctrl.is_tracking());
        ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();
        assert_eq!(cam.num_polls.get(), 2);
    }

    #[test]
    fn test_reduced_speed_when_elevator_raised() {
        let mut ctrl = AimCtrl::new(&CamMount::targeting_cam_1());
        let mut cam = ScriptedSource::new(vec![Some(TargetObservation::target(0.5, 0.0))]);
        let mut drive = RecordingDrive::at(Pose2::default());
        let mut shooter = shooter();
        shooter.set_elevator_lowered(false);
        let mut tm = TmStore::new();

        ctrl.start();
        ctrl.tick(&mut cam, &mut drive, &shooter, &mut tm).unwrap();

        assert!(drive.requests.borrow()[0].1);
    }
}
