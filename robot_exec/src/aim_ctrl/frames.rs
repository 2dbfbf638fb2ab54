//! Frame composition for the aim goal
//!
//! The goal pose is built by applying, to the robot's field pose, the target offset measured by
//! the camera and then the fixed camera mount offset:
//!
//! ```text
//! goal = robot ∘ observation ∘ mount
//! ```

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;

use crate::{
    cam_client::CamMount,
    geom::{Angle, RigidTransform},
    loc::Pose,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The effective offset applied after the observation: the camera mount location combined with
/// a stand-off transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MountOffset {
    transform: RigidTransform,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MountOffset {
    /// Combine the camera location with `standoff`, applied in the camera's frame.
    pub fn new(mount: &CamMount, standoff: RigidTransform) -> Self {
        Self {
            transform: mount.location.compose(&standoff),
        }
    }

    /// Mount offset with no stand-off.
    pub fn from_mount(mount: &CamMount) -> Self {
        Self::new(mount, RigidTransform::identity())
    }

    pub fn transform(&self) -> &RigidTransform {
        &self.transform
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Offset to a target at `range_m` along `bearing`, modelling the target as lying in the sensor's
/// horizontal plane.
pub fn target_offset_from_obs(range_m: f64, bearing: Angle) -> RigidTransform {
    RigidTransform::new(
        Vector3::new(range_m * bearing.cos(), range_m * bearing.sin(), 0.0),
        Angle::ZERO,
        Angle::ZERO,
        bearing,
    )
}

/// Compose the field-relative goal pose, `robot ∘ obs_offset ∘ mount`.
pub fn compose_goal_pose(robot: &Pose, mount: &MountOffset, obs_offset: &RigidTransform) -> Pose {
    robot.transform_by(&obs_offset.compose(mount.transform()))
}

/// Heading the robot should hold while driving to `goal`.
pub fn derive_heading(goal: &Pose) -> Angle {
    goal.get_heading()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::loc::Pose2;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_target_offset() {
        let t = target_offset_from_obs(2.0, Angle::from_deg(90.0));
        let v = t.translation_m();

        assert!(close(v[0], 0.0));
        assert!(close(v[1], 2.0));
        assert!(close(v[2], 0.0));
        assert!(close(t.rpy().2.deg(), 90.0));
    }

    #[test]
    fn test_mount_offset_standoff() {
        let cam = CamMount::new(
            "test",
            0.5,
            0.0,
            0.2,
            Angle::ZERO,
            Angle::ZERO,
            Angle::from_deg(90.0),
        );
        let standoff = RigidTransform::from_xyz_rpy(
            -0.3,
            0.0,
            0.0,
            Angle::ZERO,
            Angle::ZERO,
            Angle::ZERO,
        );
        let offset = MountOffset::new(&cam, standoff);

        // Stand-off is applied in the camera frame, so backing up 0.3 m lands along -Y
        let v = offset.transform().translation_m();
        assert!(close(v[0], 0.5));
        assert!(close(v[1], -0.3));
        assert!(close(v[2], 0.2));

        assert_eq!(MountOffset::from_mount(&cam).transform(), &cam.location);
    }

    #[test]
    fn test_compose_goal_order() {
        // Robot at (1, 2) facing +Y, target dead ahead at 3 m, camera 0.5 m forward of the
        // reference point.
        let robot = Pose::from_pose2(&Pose2::new(1.0, 2.0, Angle::from_deg(90.0)));
        let cam = CamMount::new("test", 0.5, 0.0, 0.0, Angle::ZERO, Angle::ZERO, Angle::ZERO);
        let mount = MountOffset::from_mount(&cam);
        let obs = target_offset_from_obs(3.0, Angle::ZERO);

        let goal = compose_goal_pose(&robot, &mount, &obs).to_pose2();
        assert!(close(goal.x_m, 1.0));
        assert!(close(goal.y_m, 5.5));
        assert!(close(goal.heading.deg(), 90.0));
    }

    #[test]
    fn test_compose_goal_with_bearing() {
        let robot = Pose::from_pose2(&Pose2::new(0.0, 0.0, Angle::ZERO));
        let cam = CamMount::new("test", 1.0, 0.0, 0.0, Angle::ZERO, Angle::ZERO, Angle::ZERO);
        let mount = MountOffset::from_mount(&cam);
        let bearing = Angle::from_deg(90.0);
        let obs = target_offset_from_obs(2.0, bearing);

        // The mount offset is applied after turning to the bearing
        let goal = compose_goal_pose(&robot, &mount, &obs);
        let g2 = goal.to_pose2();
        assert!(close(g2.x_m, 0.0));
        assert!(close(g2.y_m, 3.0));
        assert!(close(derive_heading(&goal).rad(), bearing.rad()));
    }
}
