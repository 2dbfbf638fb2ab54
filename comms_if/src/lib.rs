//! # Communications interface crate.
//!
//! Provides the interface types shared between the robot software crates.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand definitions, the operator inputs to the exec
pub mod tc;

/// Data definitions for equipment (like the targeting camera)
pub mod eqpt;
