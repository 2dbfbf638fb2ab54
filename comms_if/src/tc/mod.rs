//! # Telecommand module
//!
//! This module provides the telecommands accepted by the exec. Each telecommand stands in for one
//! of the operator's input bindings.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod aim;
pub mod shooter;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Serialize, Deserialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A telecommand, i.e. an instruction sent to the robot by the operator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Tc {
    /// Command for the aim controller.
    Aim(aim::AimCmd),

    /// Command for the shooter mode state.
    Shooter(shooter::ShooterCmd),
}

/// Possible parsing errors.
#[derive(Debug, Error)]
pub enum TcParseError {
    #[error("TC contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Tc {

    /// Parse a new TC from a JSON packet
    pub fn from_json(json_str: &str) -> Result<Self, TcParseError> {
        serde_json::from_str(json_str).map_err(TcParseError::InvalidJson)
    }

    /// Serialise this TC into a JSON packet
    pub fn to_json(&self) -> Result<String, TcParseError> {
        serde_json::to_string(self).map_err(TcParseError::InvalidJson)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use aim::AimCmd;
    use shooter::ShooterCmd;

    #[test]
    fn test_from_json() {
        assert_eq!(
            Tc::from_json("{\"Aim\": \"Start\"}").unwrap(),
            Tc::Aim(AimCmd::Start)
        );
        assert_eq!(
            Tc::from_json("{\"Shooter\": {\"QueueMode\": \"INTAKE\"}}").unwrap(),
            Tc::Shooter(ShooterCmd::QueueMode(String::from("INTAKE")))
        );
        assert_eq!(
            Tc::from_json("{\"Shooter\": {\"SetLoaded\": true}}").unwrap(),
            Tc::Shooter(ShooterCmd::SetLoaded(true))
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Tc::from_json("{\"Shooter\": \"Explode\"}"),
            Err(TcParseError::InvalidJson(_))
        ));
        assert!(matches!(Tc::from_json("not json"), Err(TcParseError::InvalidJson(_))));
    }

    #[test]
    fn test_to_json() {
        let tc = Tc::Shooter(ShooterCmd::DefaultOverride);
        assert_eq!(tc.to_json().unwrap(), "{\"Shooter\":\"DefaultOverride\"}");
    }
}
