// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated benchmark parameters.
//!
//! An invalid probability or scenario length is a fatal configuration error,
//! so both types check their invariants at creation time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;

/// Error-injection probability.
/// Must be finite and within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Probability(f64);

impl Probability {
    /// Create a new Probability with validation.
    pub fn new(value: f64) -> Result<Self, HardValidationError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(HardValidationError::InvalidFieldValue {
                field: "probability",
                value: value.to_string(),
                reason: "Probability must be a finite number within [0, 1]".to_string(),
            });
        }
        // Adding +0.0 folds -0.0 into 0.0.
        Ok(Self(value + 0.0))
    }

    /// Get the inner value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<f64> for Probability {
    type Error = HardValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for f64 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

/// Length of the precomputed error-scenario sequence.
/// Must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ScenarioLength(usize);

impl ScenarioLength {
    /// Create a new ScenarioLength with validation.
    pub fn new(length: usize) -> Result<Self, HardValidationError> {
        if length == 0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "scenario_length",
                value: "0".to_string(),
                reason: "Scenario length must be greater than 0".to_string(),
            });
        }
        Ok(Self(length))
    }

    /// Get the inner value.
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ScenarioLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for ScenarioLength {
    type Error = HardValidationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScenarioLength> for usize {
    fn from(length: ScenarioLength) -> Self {
        length.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probability_bounds() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(Probability::new(0.1).is_ok());
        assert!(Probability::new(-0.01).is_err());
        assert!(Probability::new(1.01).is_err());
        assert!(Probability::new(f64::NAN).is_err());
        assert!(Probability::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_negative_zero_normalized() {
        let p = Probability::new(-0.0).unwrap();
        assert!(p.value().is_sign_positive());
        assert_eq!(p.to_string(), "0");
    }

    #[test]
    fn test_scenario_length_rejects_zero() {
        assert!(ScenarioLength::new(0).is_err());
        assert_eq!(ScenarioLength::new(1).unwrap().value(), 1);
    }

    #[test]
    fn test_probability_serde_validates() {
        let ok: Result<Probability, _> = serde_json::from_str("0.3");
        assert_eq!(ok.unwrap().value(), 0.3);

        let bad: Result<Probability, _> = serde_json::from_str("2.0");
        assert!(bad.is_err());
    }
}
