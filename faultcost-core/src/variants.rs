// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! The benchmarked error-signaling variants.
//!
//! Every variant runs the same business logic (two bounded random draws,
//! summed) and differs only in how a failure injected by the oracle reaches
//! the caller:
//!
//! | Variant                          | Mechanism     | Stack trace | Failure value |
//! |----------------------------------|---------------|-------------|---------------|
//! | `baseline`                       | none          | -           | -             |
//! | `unsuppressed_exception`         | unwinding     | captured    | fresh         |
//! | `suppressed_exception`           | unwinding     | disabled    | fresh         |
//! | `suppressed_exception_singleton` | unwinding     | disabled    | singleton     |
//! | `functional_result`              | tagged result | -           | fresh         |
//! | `functional_result_singleton`    | tagged result | -           | singleton     |
//!
//! Failures are always handled inside the variant call, which then returns
//! [`FAILURE_SENTINEL`]. The mechanism changes the cost, never the outcome.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::HardValidationError;
use crate::failure::{BusinessFailure, Failure};
use crate::oracle::ErrorOracle;
use crate::raise::{catch_raised, raise, raise_singleton, RaisedError};
use crate::types::{Probability, ScenarioLength};

/// Value returned by a variant when the trial failed.
pub const FAILURE_SENTINEL: i32 = -1;

/// Exclusive upper bound of each business-logic draw.
pub const DRAW_BOUND: i32 = 100;

/// Per-thread benchmark state: the oracle plus the business-logic RNG.
#[derive(Debug, Clone)]
pub struct BenchState {
    oracle: ErrorOracle,
    logic: StdRng,
}

impl BenchState {
    /// Wrap an oracle; business-logic draws are seeded with `logic_seed`.
    pub fn new(oracle: ErrorOracle, logic_seed: u64) -> Self {
        Self {
            oracle,
            logic: StdRng::seed_from_u64(logic_seed),
        }
    }

    /// Build oracle and state from one seed.
    pub fn with_params(seed: u64, length: ScenarioLength, probability: Probability) -> Self {
        Self::new(ErrorOracle::new(seed, length, probability), seed)
    }

    /// Validate raw parameters, then build the state.
    pub fn initialize(
        seed: u64,
        length: usize,
        probability: f64,
    ) -> Result<Self, HardValidationError> {
        Ok(Self::new(
            ErrorOracle::initialize(seed, length, probability)?,
            seed,
        ))
    }

    pub fn oracle(&self) -> &ErrorOracle {
        &self.oracle
    }

    #[inline]
    fn business_logic(&mut self) -> i32 {
        let a = self.logic.gen_range(0..DRAW_BOUND);
        let b = self.logic.gen_range(0..DRAW_BOUND);
        a + b
    }
}

// =============================================================================
// Business logic signaling failure in each style
// =============================================================================

#[inline(never)]
fn compute_raising_captured(state: &mut BenchState) -> i32 {
    if state.oracle.next() {
        raise(RaisedError::captured());
    }
    state.business_logic()
}

#[inline(never)]
fn compute_raising_suppressed(state: &mut BenchState) -> i32 {
    if state.oracle.next() {
        raise(RaisedError::suppressed());
    }
    state.business_logic()
}

#[inline(never)]
fn compute_raising_singleton(state: &mut BenchState) -> i32 {
    if state.oracle.next() {
        raise_singleton();
    }
    state.business_logic()
}

#[inline(never)]
fn compute_result(state: &mut BenchState) -> Result<i32, Failure> {
    if state.oracle.next() {
        return Err(Cow::Owned(BusinessFailure::new()));
    }
    Ok(state.business_logic())
}

#[inline(never)]
fn compute_result_singleton(state: &mut BenchState) -> Result<i32, Failure> {
    if state.oracle.next() {
        return Err(Cow::Borrowed(BusinessFailure::singleton()));
    }
    Ok(state.business_logic())
}

// =============================================================================
// Variants
// =============================================================================

/// Throughput ceiling: business logic with no failure path.
pub fn baseline(state: &mut BenchState) -> i32 {
    state.business_logic()
}

/// Unwinding with a freshly built, stack-capturing error.
pub fn unsuppressed_exception(state: &mut BenchState) -> i32 {
    catch_raised(|| compute_raising_captured(state)).unwrap_or(FAILURE_SENTINEL)
}

/// Unwinding with a freshly built, stackless error.
pub fn suppressed_exception(state: &mut BenchState) -> i32 {
    catch_raised(|| compute_raising_suppressed(state)).unwrap_or(FAILURE_SENTINEL)
}

/// Unwinding with the shared stackless error.
pub fn suppressed_exception_singleton(state: &mut BenchState) -> i32 {
    catch_raised(|| compute_raising_singleton(state)).unwrap_or(FAILURE_SENTINEL)
}

/// Tagged result carrying a freshly built failure.
pub fn functional_result(state: &mut BenchState) -> i32 {
    match compute_result(state) {
        Ok(value) => value,
        Err(_) => FAILURE_SENTINEL,
    }
}

/// Tagged result carrying the shared failure.
pub fn functional_result_singleton(state: &mut BenchState) -> i32 {
    match compute_result_singleton(state) {
        Ok(value) => value,
        Err(_) => FAILURE_SENTINEL,
    }
}

/// How a variant signals failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    None,
    Unwind,
    TaggedResult,
}

/// Lifecycle of the failure value a variant produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureLifecycle {
    None,
    Fresh,
    Singleton,
}

/// Outcome of one trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialOutcome {
    Success(i32),
    Failure,
}

/// One of the benchmarked variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Variant {
    Baseline,
    UnsuppressedException,
    SuppressedException,
    SuppressedExceptionSingleton,
    FunctionalResult,
    FunctionalResultSingleton,
}

impl Variant {
    /// All variants in report order.
    pub const ALL: [Variant; 6] = [
        Variant::Baseline,
        Variant::UnsuppressedException,
        Variant::SuppressedException,
        Variant::SuppressedExceptionSingleton,
        Variant::FunctionalResult,
        Variant::FunctionalResultSingleton,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::UnsuppressedException => "unsuppressed_exception",
            Variant::SuppressedException => "suppressed_exception",
            Variant::SuppressedExceptionSingleton => "suppressed_exception_singleton",
            Variant::FunctionalResult => "functional_result",
            Variant::FunctionalResultSingleton => "functional_result_singleton",
        }
    }

    pub fn mechanism(self) -> Mechanism {
        match self {
            Variant::Baseline => Mechanism::None,
            Variant::UnsuppressedException
            | Variant::SuppressedException
            | Variant::SuppressedExceptionSingleton => Mechanism::Unwind,
            Variant::FunctionalResult | Variant::FunctionalResultSingleton => {
                Mechanism::TaggedResult
            }
        }
    }

    pub fn failure_lifecycle(self) -> FailureLifecycle {
        match self {
            Variant::Baseline => FailureLifecycle::None,
            Variant::UnsuppressedException
            | Variant::SuppressedException
            | Variant::FunctionalResult => FailureLifecycle::Fresh,
            Variant::SuppressedExceptionSingleton | Variant::FunctionalResultSingleton => {
                FailureLifecycle::Singleton
            }
        }
    }

    /// Whether a failure captures the call stack.
    pub fn captures_stack(self) -> bool {
        self == Variant::UnsuppressedException
    }

    /// Run one trial, returning the sum or [`FAILURE_SENTINEL`].
    #[inline]
    pub fn invoke(self, state: &mut BenchState) -> i32 {
        match self {
            Variant::Baseline => baseline(state),
            Variant::UnsuppressedException => unsuppressed_exception(state),
            Variant::SuppressedException => suppressed_exception(state),
            Variant::SuppressedExceptionSingleton => suppressed_exception_singleton(state),
            Variant::FunctionalResult => functional_result(state),
            Variant::FunctionalResultSingleton => functional_result_singleton(state),
        }
    }

    /// Run one trial and classify it.
    pub fn run_trial(self, state: &mut BenchState) -> TrialOutcome {
        match self.invoke(state) {
            FAILURE_SENTINEL => TrialOutcome::Failure,
            value => TrialOutcome::Success(value),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = HardValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|variant| variant.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HardValidationError::UnknownVariant {
                name: s.to_string(),
            })
    }
}

impl TryFrom<String> for Variant {
    type Error = HardValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Variant> for String {
    fn from(variant: Variant) -> Self {
        variant.name().to_string()
    }
}
