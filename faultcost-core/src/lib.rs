// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! faultcost Core Library
//!
//! The measured side of the faultcost benchmarks: a deterministic
//! error-injection oracle, simulated business failures, unwinding-based
//! raise/catch, and the six error-signaling variants driven by them.
//! Run configuration is parsed and validated here as well.

pub mod config;
pub mod error;
pub mod failure;
pub mod oracle;
pub mod raise;
pub mod types;
pub mod variants;

// Re-export commonly used types
pub use config::{BenchConfig, ConfigLoader, ConfigOverrides};
pub use error::{FaultError, FaultResult, HardValidationError};
pub use failure::{BusinessFailure, Failure, SharedFailure, FAILURE_MESSAGE};
pub use oracle::ErrorOracle;
pub use raise::{catch_raised, Caught, RaisedError};
pub use types::{Probability, ScenarioLength};
pub use variants::{BenchState, TrialOutcome, Variant, DRAW_BOUND, FAILURE_SENTINEL};
