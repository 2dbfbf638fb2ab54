//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with equipment such as the targeting
//! camera.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod cam;
