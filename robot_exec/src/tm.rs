//! # Telemetry
//!
//! Named key-value telemetry published by the modules each cycle, and the [`TmStore`] sink which
//! keeps the latest value for each key.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Anything that accepts named telemetry values.
pub trait TmSink {
    fn put(&mut self, key: &str, value: TmValue);

    fn put_bool(&mut self, key: &str, value: bool) {
        self.put(key, TmValue::Bool(value))
    }

    fn put_num(&mut self, key: &str, value: f64) {
        self.put(key, TmValue::Num(value))
    }

    fn put_str(&mut self, key: &str, value: String) {
        self.put(key, TmValue::Str(value))
    }
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A single telemetry value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TmValue {
    Bool(bool),
    Num(f64),
    Str(String),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Telemetry sink holding the most recent value published under each key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TmStore {
    values: BTreeMap<String, TmValue>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&TmValue> {
        self.values.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(TmValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_num(&self, key: &str) -> Option<f64> {
        match self.values.get(key) {
            Some(TmValue::Num(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(TmValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TmSink for TmStore {
    fn put(&mut self, key: &str, value: TmValue) {
        trace!("TM {} = {:?}", key, value);
        self.values.insert(key.to_string(), value);
    }
}
