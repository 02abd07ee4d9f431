// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! One measured trial: a variant at a single error probability.
//!
//! A [`TrialSpec`] is self-contained and serializable so it can be handed to
//! a forked worker process unchanged.

use std::time::Duration;

use faultcost_core::{BenchConfig, BenchState, Probability, ScenarioLength, Variant};
use serde::{Deserialize, Serialize};

use crate::harness::BenchmarkHarness;

/// Everything needed to run one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub variant: Variant,
    pub probability: Probability,
    pub seed: u64,
    pub scenario_length: ScenarioLength,
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    pub iteration_time_ms: u64,
}

impl TrialSpec {
    pub fn from_config(config: &BenchConfig, variant: Variant, probability: Probability) -> Self {
        Self {
            variant,
            probability,
            seed: config.seed,
            scenario_length: config.scenario_length,
            warmup_iterations: config.warmup_iterations,
            measurement_iterations: config.measurement_iterations,
            iteration_time_ms: config.iteration_time_ms,
        }
    }

    /// Run the trial in this process.
    pub fn execute(&self) -> TrialSamples {
        let mut state = BenchState::with_params(self.seed, self.scenario_length, self.probability);
        let observed_probability = state.oracle().observed_probability();
        let variant = self.variant;

        tracing::debug!(
            variant = %variant,
            probability = self.probability.value(),
            "Trial started"
        );

        let harness = BenchmarkHarness::new()
            .warmup(self.warmup_iterations)
            .iterations(self.measurement_iterations)
            .iteration_time(Duration::from_millis(self.iteration_time_ms));

        let samples = harness.run_throughput(|| variant.invoke(&mut state));

        TrialSamples {
            variant,
            probability: self.probability,
            observed_probability,
            total_operations: samples.iter().map(|s| s.operations).sum(),
            ops_per_sec: samples.iter().map(|s| s.ops_per_sec()).collect(),
        }
    }
}

/// Raw output of one trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSamples {
    pub variant: Variant,
    pub probability: Probability,
    pub observed_probability: f64,
    /// Operations over all measurement iterations
    pub total_operations: u64,
    /// One entry per measurement iteration
    pub ops_per_sec: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_spec(variant: Variant) -> TrialSpec {
        let config = BenchConfig::default();
        let mut spec = TrialSpec::from_config(&config, variant, Probability::new(0.1).unwrap());
        spec.scenario_length = ScenarioLength::new(10_000).unwrap();
        spec.warmup_iterations = 0;
        spec.measurement_iterations = 2;
        spec.iteration_time_ms = 5;
        spec
    }

    #[test]
    fn test_execute_produces_one_sample_per_iteration() {
        for variant in Variant::ALL {
            let samples = quick_spec(variant).execute();
            assert_eq!(samples.variant, variant);
            assert_eq!(samples.ops_per_sec.len(), 2);
            assert!(samples.total_operations > 0);
            assert!(samples.ops_per_sec.iter().all(|&ops| ops > 0.0));
        }
    }

    #[test]
    fn test_observed_probability_reported() {
        let samples = quick_spec(Variant::FunctionalResult).execute();
        assert!((samples.observed_probability - 0.1).abs() < 0.02);
    }

    #[test]
    fn test_spec_serde_roundtrip() {
        let spec = quick_spec(Variant::SuppressedExceptionSingleton);
        let json = serde_json::to_string(&spec).unwrap();
        let back: TrialSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_spec_rejects_invalid_probability() {
        let json = serde_json::to_string(&quick_spec(Variant::Baseline))
            .unwrap()
            .replace("\"probability\":0.1", "\"probability\":7.0");
        assert!(serde_json::from_str::<TrialSpec>(&json).is_err());
    }
}
