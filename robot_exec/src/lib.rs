//! # Robot library.
//!
//! This library allows other crates in the workspace to access items defined inside the robot
//! crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Aim control - locks on to a camera detection and drives to it
pub mod aim_ctrl;

/// Camera client - the targeting camera interface and camera mounting
pub mod cam_client;

/// Exec-wide data store
pub mod data_store;

/// Angles and rigid transforms
pub mod geom;

/// Localisation module - pose types and the pose provider interface
pub mod loc;

/// Parameters for the exec
pub mod params;

/// Shooter state - preset modes and the mechanism flags
pub mod shooter_state;

/// Simulation client - kinematic stand-ins for the drive and camera
#[cfg(feature = "sim")]
pub mod sim_client;

/// Telemetry sinks
pub mod tm;

/// Trajectory control interface - the executor which follows waypoint lists
pub mod traj_ctrl;
