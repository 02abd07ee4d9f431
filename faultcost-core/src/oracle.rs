// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Deterministic error-injection oracle.
//!
//! The pass/fail decisions for a trial are drawn once from a seeded RNG and
//! then replayed cyclically, so the measured path pays for a slice index and
//! nothing else. Same seed, length and probability always yield the same
//! sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::HardValidationError;
use crate::types::{Probability, ScenarioLength};

/// Precomputed error scenario plus a wrapping cursor.
///
/// Owned by exactly one benchmark state; not meant to be shared across
/// threads while being queried.
#[derive(Debug, Clone)]
pub struct ErrorOracle {
    scenario: Box<[bool]>,
    cursor: usize,
    probability: Probability,
}

impl ErrorOracle {
    /// Build the scenario sequence from already validated parameters.
    pub fn new(seed: u64, length: ScenarioLength, probability: Probability) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let scenario: Box<[bool]> = (0..length.value())
            .map(|_| rng.gen_bool(probability.value()))
            .collect();

        let oracle = Self {
            scenario,
            cursor: 0,
            probability,
        };

        tracing::debug!(
            seed,
            length = length.value(),
            probability = probability.value(),
            failures = oracle.failure_count(),
            "Error scenario initialized"
        );

        oracle
    }

    /// Validate raw parameters and build the scenario sequence.
    ///
    /// A zero length or a probability outside `[0, 1]` is a configuration
    /// error and must be reported before any benchmark runs.
    pub fn initialize(
        seed: u64,
        length: usize,
        probability: f64,
    ) -> Result<Self, HardValidationError> {
        let length = ScenarioLength::new(length)?;
        let probability = Probability::new(probability)?;
        Ok(Self::new(seed, length, probability))
    }

    /// Return the decision at the cursor and advance it, wrapping at the end.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        let fail = self.scenario[self.cursor];
        self.cursor += 1;
        if self.cursor == self.scenario.len() {
            self.cursor = 0;
        }
        fail
    }

    /// Rewind the cursor to the start of the sequence.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sequence length.
    pub fn len(&self) -> usize {
        self.scenario.len()
    }

    /// Always false; a scenario holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.scenario.is_empty()
    }

    /// Read-only view of the precomputed sequence.
    pub fn scenario(&self) -> &[bool] {
        &self.scenario
    }

    /// Configured failure probability.
    pub fn probability(&self) -> Probability {
        self.probability
    }

    /// Number of injected failures per cycle.
    pub fn failure_count(&self) -> usize {
        self.scenario.iter().filter(|&&fail| fail).count()
    }

    /// Fraction of failures in one cycle.
    pub fn observed_probability(&self) -> f64 {
        self.failure_count() as f64 / self.scenario.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_rejected() {
        assert!(ErrorOracle::initialize(1, 0, 0.1).is_err());
        assert!(ErrorOracle::initialize(1, 10, -0.5).is_err());
        assert!(ErrorOracle::initialize(1, 10, 1.5).is_err());
    }

    #[test]
    fn test_extreme_probabilities() {
        let mut never = ErrorOracle::initialize(7, 1000, 0.0).unwrap();
        assert_eq!(never.failure_count(), 0);
        assert!((0..2000).all(|_| !never.next()));

        let mut always = ErrorOracle::initialize(7, 1000, 1.0).unwrap();
        assert_eq!(always.failure_count(), 1000);
        assert!((0..2000).all(|_| always.next()));
    }

    #[test]
    fn test_cursor_advances_and_wraps() {
        let mut oracle = ErrorOracle::initialize(42, 3, 0.5).unwrap();
        assert_eq!(oracle.cursor(), 0);
        oracle.next();
        oracle.next();
        assert_eq!(oracle.cursor(), 2);
        oracle.next();
        assert_eq!(oracle.cursor(), 0);
    }

    #[test]
    fn test_single_entry_scenario() {
        let mut oracle = ErrorOracle::initialize(9, 1, 1.0).unwrap();
        for _ in 0..5 {
            assert!(oracle.next());
            assert_eq!(oracle.cursor(), 0);
        }
    }

    #[test]
    fn test_reset() {
        let mut oracle = ErrorOracle::initialize(42, 16, 0.5).unwrap();
        let first = oracle.scenario()[0];
        for _ in 0..5 {
            oracle.next();
        }
        oracle.reset();
        assert_eq!(oracle.cursor(), 0);
        assert_eq!(oracle.next(), first);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = ErrorOracle::initialize(1, 4096, 0.5).unwrap();
        let b = ErrorOracle::initialize(2, 4096, 0.5).unwrap();
        assert_ne!(a.scenario(), b.scenario());
    }
}
