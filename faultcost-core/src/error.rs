// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for faultcost.
//!
//! These are the errors of the harness itself. The simulated business
//! failures measured by the benchmarks live in [`crate::failure`] and never
//! surface here.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the benchmark harness.
#[derive(Debug, Error)]
pub enum FaultError {
    // =========================================================================
    // Configuration Errors - Fail-Fast Before Any Benchmark Runs
    // =========================================================================
    #[error("Hard validation error: {0}")]
    HardValidation(#[from] HardValidationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Hard validation errors abort the run before any measurement starts.
#[derive(Debug, Error, PartialEq)]
pub enum HardValidationError {
    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Unknown benchmark variant: {name}")]
    UnknownVariant { name: String },

    #[error("Duplicate entry in {field}: {value}")]
    DuplicateEntry { field: &'static str, value: String },

    #[error("Schema validation failed: {message}")]
    SchemaValidation { message: String },
}

/// Result type alias using FaultError.
pub type FaultResult<T> = Result<T, FaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hard_validation_error_display() {
        let err = HardValidationError::InvalidFieldValue {
            field: "probability",
            value: "1.5".to_string(),
            reason: "must be within [0, 1]".to_string(),
        };
        assert!(err.to_string().contains("probability"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_error_chain() {
        let validation_err = HardValidationError::UnknownVariant {
            name: "goto".to_string(),
        };
        let fault_err: FaultError = validation_err.into();
        assert!(matches!(fault_err, FaultError::HardValidation(_)));
    }
}
