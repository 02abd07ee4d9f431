// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sweep driver: every configured variant at every configured probability.

use std::path::PathBuf;

use faultcost_core::{BenchConfig, Probability, Variant};
use thiserror::Error;

use crate::fork::ForkRunner;
use crate::metrics::{BenchmarkReport, BenchmarkResult};
use crate::trial::TrialSpec;

/// Errors raised while driving trials.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Failed to spawn worker {executable:?}: {source}")]
    Spawn {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker for {variant} exited unsuccessfully: {status}")]
    WorkerFailed { variant: String, status: String },

    #[error("Worker produced no output")]
    EmptyWorkerOutput,

    #[error("Malformed worker message: {0}")]
    Protocol(#[from] serde_json::Error),
}

/// Runs the configured sweep and collects a report.
pub struct Driver {
    config: BenchConfig,
    fork_runner: Option<ForkRunner>,
}

impl Driver {
    /// Driver forking the current executable when `config.forks > 0`.
    pub fn new(config: BenchConfig) -> Result<Self, DriverError> {
        let fork_runner = if config.forks > 0 {
            Some(ForkRunner::current()?)
        } else {
            None
        };
        Ok(Self {
            config,
            fork_runner,
        })
    }

    /// Driver forking a specific executable.
    pub fn with_fork_runner(config: BenchConfig, fork_runner: ForkRunner) -> Self {
        Self {
            config,
            fork_runner: Some(fork_runner),
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Number of (variant, probability) trials in the sweep.
    pub fn trial_count(&self) -> usize {
        self.config.probabilities.len() * self.config.variants.len()
    }

    /// Run the whole sweep.
    pub fn run(&self) -> Result<BenchmarkReport, DriverError> {
        let mut report = BenchmarkReport::new(self.config.clone());
        let total = self.trial_count();
        let mut done = 0;

        for &probability in &self.config.probabilities {
            for &variant in &self.config.variants {
                done += 1;
                tracing::info!(
                    variant = %variant,
                    probability = probability.value(),
                    "Running trial {}/{}",
                    done,
                    total
                );

                let result = self.run_trial(variant, probability)?;
                tracing::info!(
                    variant = %variant,
                    probability = probability.value(),
                    mean_ops_per_sec = result.throughput.mean_ops_per_sec,
                    "Trial finished"
                );
                report.add_result(result);
            }
        }

        Ok(report)
    }

    fn run_trial(
        &self,
        variant: Variant,
        probability: Probability,
    ) -> Result<BenchmarkResult, DriverError> {
        let spec = TrialSpec::from_config(&self.config, variant, probability);

        let (samples, observed_probability, forks) = match &self.fork_runner {
            Some(runner) if self.config.forks > 0 => {
                let mut samples = Vec::new();
                let mut observed = spec.probability.value();
                for fork in 0..self.config.forks {
                    let trial = runner.run(&spec).inspect_err(|e| {
                        tracing::warn!(
                            variant = %variant,
                            fork,
                            error = %e,
                            "Forked worker failed"
                        );
                    })?;
                    observed = trial.observed_probability;
                    samples.extend(trial.ops_per_sec);
                }
                (samples, observed, self.config.forks)
            }
            _ => {
                let trial = spec.execute();
                (trial.ops_per_sec, trial.observed_probability, 0)
            }
        };

        Ok(BenchmarkResult::new(
            variant,
            probability.value(),
            observed_probability,
            samples,
            forks,
        )
        .with_variant_metadata()
        .with_metadata("seed", self.config.seed)
        .with_metadata("scenario_length", self.config.scenario_length.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultcost_core::{ConfigLoader, ConfigOverrides};

    fn in_process_config() -> BenchConfig {
        ConfigLoader::load_string(
            r#"
scenario_length: 1000
probabilities: [0.0, 0.5]
variants: [baseline, suppressed_exception]
forks: 0
warmup_iterations: 0
measurement_iterations: 2
iteration_time_ms: 5
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_in_process_sweep() {
        let driver = Driver::new(in_process_config()).unwrap();
        assert_eq!(driver.trial_count(), 4);

        let report = driver.run().unwrap();
        assert_eq!(report.results.len(), 4);
        for result in &report.results {
            assert_eq!(result.forks, 0);
            assert_eq!(result.samples.len(), 2);
            assert!(result.throughput.mean_ops_per_sec > 0.0);
            assert!(result.metadata.contains_key("mechanism"));
        }
    }

    #[test]
    fn test_zero_probability_observed_exactly() {
        let report = Driver::new(in_process_config()).unwrap().run().unwrap();
        let at_zero = report
            .results
            .iter()
            .find(|r| r.probability == 0.0)
            .unwrap();
        assert_eq!(at_zero.observed_probability, 0.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_forked_worker_failure_aborts_sweep() {
        let config = in_process_config()
            .apply(ConfigOverrides {
                forks: Some(1),
                ..Default::default()
            })
            .unwrap();
        let driver = Driver::with_fork_runner(config, ForkRunner::new("false"));
        assert!(matches!(
            driver.run(),
            Err(DriverError::WorkerFailed { .. })
        ));
    }
}
