//! # Robot script interpreter module
//!
//! This module provides an interpreter for timed telecommand scripts, standing in for the
//! operator's controller bindings when the exec is run without a driver station.
//!
//! A script is a sequence of `<time_s>: <tc json>;` statements, for example:
//!
//! ```text
//! 0.5: {"Shooter": "SwitchModes"};
//! 1.0: {"Aim": "Start"};
//! 6.0: {"Aim": "Stop"};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

// Internal
use comms_if::tc::{Tc, TcParseError};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Pattern for one script statement, capturing the time and the TC payload.
const STATEMENT_PATTERN: &str = r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command which is scripted to occur at a specific time.
#[derive(Debug)]
pub struct Command {
    /// The time the command is supposed to execute at
    exec_time_s: f64,

    /// The Telecommand to run
    tc: Tc
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_tcs` to acquire a list of telecommands that need executing.
#[derive(Debug)]
pub struct ScriptInterpreter {
    _script_path: PathBuf,
    cmds: VecDeque<Command>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid TC at {0} s: {1}")]
    InvalidTc(f64, TcParseError),

    #[error("Script commands are not in time order ({0} s follows {1} s)")]
    OutOfOrder(f64, f64),

    #[error("Could not build the script statement pattern: {0}")]
    InvalidPattern(regex::Error)
}

#[derive(Debug)]
pub enum PendingTcs {
    None,
    Some(Vec<Tc>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        // Get the path in a buffer
        let path = PathBuf::from(script_path.as_ref());

        // Check that the script file exists.
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        // Load the script into a string
        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        Ok(ScriptInterpreter {
            _script_path: path,
            cmds: parse_script(&script)?
        })
    }

    /// Create a new interpreter from the script source itself.
    pub fn from_source(script: &str) -> Result<Self, ScriptError> {
        Ok(ScriptInterpreter {
            _script_path: PathBuf::new(),
            cmds: parse_script(script)?
        })
    }

    /// Return a vector of TCs due before `current_time_s`.
    pub fn get_pending_tcs(&mut self, current_time_s: f64) -> PendingTcs {

        // If the queue is empty the script is over and we return the end of
        // script variant
        if self.cmds.is_empty() {
            return PendingTcs::EndOfScript
        }

        let mut tc_vec: Vec<Tc> = vec![];

        // Pop commands while the head is due
        while let Some(cmd) = self.cmds.front() {
            if cmd.exec_time_s >= current_time_s {
                break;
            }
            if let Some(cmd) = self.cmds.pop_front() {
                tc_vec.push(cmd.tc);
            }
        }

        if tc_vec.is_empty() {
            PendingTcs::None
        }
        else {
            PendingTcs::Some(tc_vec)
        }
    }

    /// Get the number of TCs remaining in the script
    pub fn get_num_tcs(&self) -> usize {
        self.cmds.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.cmds.back() {
            Some(c) => c.exec_time_s,
            None => 0f64
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Build the multi-line regex matching `<time_s>: <tc>;` statements.
fn statement_regex(pattern: &str) -> Result<Regex, ScriptError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(ScriptError::InvalidPattern)
}

fn parse_script(script: &str) -> Result<VecDeque<Command>, ScriptError> {
    // Empty queue of commands
    let mut tc_queue: VecDeque<Command> = VecDeque::new();

    let re = statement_regex(STATEMENT_PATTERN)?;

    for cap in re.captures_iter(script) {
        let (time_str, tc_str) = match (cap.get(1), cap.get(3)) {
            (Some(t), Some(c)) => (t.as_str(), c.as_str()),
            _ => continue
        };

        let exec_time_s: f64 = time_str
            .parse()
            .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

        // Parse the TC from the payload. The scripts contain JSON only.
        let tc = Tc::from_json(tc_str)
            .map_err(|e| ScriptError::InvalidTc(exec_time_s, e))?;

        if let Some(prev) = tc_queue.back() {
            if exec_time_s < prev.exec_time_s {
                return Err(ScriptError::OutOfOrder(exec_time_s, prev.exec_time_s));
            }
        }

        tc_queue.push_back(Command {
            exec_time_s,
            tc
        });
    }

    if tc_queue.is_empty() {
        return Err(ScriptError::ScriptEmpty)
    }

    Ok(tc_queue)
}
