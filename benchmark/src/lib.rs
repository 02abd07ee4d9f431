// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! faultcost Benchmarking Framework
//!
//! Measures the throughput cost of error-signaling strategies implemented
//! in `faultcost-core`, across a sweep of injected error probabilities.
//!
//! # Variants
//!
//! - **Baseline**: business logic without a failure path
//! - **Unwinding**: failures raised with or without a captured backtrace,
//!   fresh or singleton
//! - **Tagged result**: failures returned in a `Result`, fresh or singleton
//!
//! # Data Output
//!
//! Every run writes a human-readable table to `results.txt` and a
//! timestamped JSON report to the output directory.

pub mod driver;
pub mod fork;
pub mod harness;
pub mod metrics;
pub mod reporter;
pub mod trial;

pub use driver::{Driver, DriverError};
pub use fork::ForkRunner;
pub use harness::BenchmarkHarness;
pub use metrics::{BenchmarkReport, BenchmarkResult, SystemInfo, ThroughputMetrics};
pub use reporter::{JsonReporter, ReporterError, TextReporter};
pub use trial::{TrialSamples, TrialSpec};
