// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML run configuration with strict validation.
//!
//! Every field is optional and falls back to the documented default. Any
//! invalid value results in a HardValidationError before a single benchmark
//! iteration runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FaultError, FaultResult, HardValidationError};
use crate::types::{Probability, ScenarioLength};
use crate::variants::Variant;

/// Maximum number of forked workers per trial.
pub const MAX_FORKS: u32 = 32;
/// Maximum duration of one measurement iteration.
pub const MAX_ITERATION_TIME_MS: u64 = 60_000;

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default = "default_scenario_length")]
    scenario_length: usize,
    #[serde(default = "default_probabilities")]
    probabilities: Vec<f64>,
    #[serde(default)]
    variants: Option<Vec<String>>,
    #[serde(default = "default_forks")]
    forks: u32,
    #[serde(default = "default_warmup_iterations")]
    warmup_iterations: u32,
    #[serde(default = "default_measurement_iterations")]
    measurement_iterations: u32,
    #[serde(default = "default_iteration_time_ms")]
    iteration_time_ms: u64,
    #[serde(default = "default_output_dir")]
    output_dir: String,
}

fn default_seed() -> u64 {
    1_234_567_890
}

fn default_scenario_length() -> usize {
    100_000
}

fn default_probabilities() -> Vec<f64> {
    vec![0.01, 0.1, 0.3]
}

fn default_forks() -> u32 {
    1
}

fn default_warmup_iterations() -> u32 {
    5
}

fn default_measurement_iterations() -> u32 {
    5
}

fn default_iteration_time_ms() -> u64 {
    1_000
}

fn default_output_dir() -> String {
    "results".to_string()
}

/// Validated run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    pub seed: u64,
    pub scenario_length: ScenarioLength,
    pub probabilities: Vec<Probability>,
    pub variants: Vec<Variant>,
    /// 0 runs every trial in-process.
    pub forks: u32,
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    pub iteration_time_ms: u64,
    pub output_dir: PathBuf,
}

impl BenchConfig {
    pub fn iteration_time(&self) -> Duration {
        Duration::from_millis(self.iteration_time_ms)
    }

    /// Short run for smoke testing: no forks, 1 warm-up and 2 measurement
    /// iterations of 100ms.
    pub fn quick(mut self) -> Self {
        self.forks = 0;
        self.warmup_iterations = 1;
        self.measurement_iterations = 2;
        self.iteration_time_ms = 100;
        self
    }
}

/// Command-line overrides, validated like the YAML fields they replace.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub forks: Option<u32>,
    pub probabilities: Vec<f64>,
    pub variants: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

impl BenchConfig {
    /// Apply overrides; empty lists keep the configured sweep/variants.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Result<Self, HardValidationError> {
        if let Some(forks) = overrides.forks {
            if forks > MAX_FORKS {
                return Err(HardValidationError::InvalidFieldValue {
                    field: "forks",
                    value: forks.to_string(),
                    reason: format!("Must be between 0 and {}", MAX_FORKS),
                });
            }
            self.forks = forks;
        }
        if !overrides.probabilities.is_empty() {
            self.probabilities = ConfigLoader::validate_probabilities(&overrides.probabilities)?;
        }
        if !overrides.variants.is_empty() {
            self.variants = ConfigLoader::validate_variants(Some(overrides.variants))?;
        }
        if let Some(output_dir) = overrides.output_dir {
            self.output_dir = output_dir;
        }
        Ok(self)
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        ConfigLoader::load_string("{}").expect("default configuration is valid")
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> FaultResult<BenchConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(FaultError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| FaultError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> FaultResult<BenchConfig> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| FaultError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Ok(Self::validate(raw)?)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> Result<BenchConfig, HardValidationError> {
        let scenario_length = ScenarioLength::new(raw.scenario_length)?;
        let probabilities = Self::validate_probabilities(&raw.probabilities)?;
        let variants = Self::validate_variants(raw.variants)?;

        if raw.forks > MAX_FORKS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "forks",
                value: raw.forks.to_string(),
                reason: format!("Must be between 0 and {}", MAX_FORKS),
            });
        }

        if raw.measurement_iterations == 0 {
            return Err(HardValidationError::InvalidFieldValue {
                field: "measurement_iterations",
                value: "0".to_string(),
                reason: "At least one measurement iteration is required".to_string(),
            });
        }

        if raw.iteration_time_ms == 0 || raw.iteration_time_ms > MAX_ITERATION_TIME_MS {
            return Err(HardValidationError::InvalidFieldValue {
                field: "iteration_time_ms",
                value: raw.iteration_time_ms.to_string(),
                reason: format!("Must be between 1 and {}ms", MAX_ITERATION_TIME_MS),
            });
        }

        if raw.output_dir.trim().is_empty() {
            return Err(HardValidationError::InvalidFieldValue {
                field: "output_dir",
                value: raw.output_dir,
                reason: "Output directory cannot be empty".to_string(),
            });
        }

        Ok(BenchConfig {
            seed: raw.seed,
            scenario_length,
            probabilities,
            variants,
            forks: raw.forks,
            warmup_iterations: raw.warmup_iterations,
            measurement_iterations: raw.measurement_iterations,
            iteration_time_ms: raw.iteration_time_ms,
            output_dir: PathBuf::from(raw.output_dir),
        })
    }

    /// Validate a probability sweep: non-empty, each in `[0, 1]`, no repeats.
    pub fn validate_probabilities(raw: &[f64]) -> Result<Vec<Probability>, HardValidationError> {
        if raw.is_empty() {
            return Err(HardValidationError::SchemaValidation {
                message: "At least one probability must be configured".to_string(),
            });
        }

        let mut seen = HashSet::new();
        let mut probabilities = Vec::with_capacity(raw.len());
        for &value in raw {
            let probability = Probability::new(value)?;
            if !seen.insert(probability.value().to_bits()) {
                return Err(HardValidationError::DuplicateEntry {
                    field: "probabilities",
                    value: probability.to_string(),
                });
            }
            probabilities.push(probability);
        }
        Ok(probabilities)
    }

    /// Validate variant names; `None` selects every variant.
    pub fn validate_variants(
        raw: Option<Vec<String>>,
    ) -> Result<Vec<Variant>, HardValidationError> {
        let Some(names) = raw else {
            return Ok(Variant::ALL.to_vec());
        };

        if names.is_empty() {
            return Err(HardValidationError::SchemaValidation {
                message: "Variant list cannot be empty".to_string(),
            });
        }

        let mut variants = Vec::with_capacity(names.len());
        for name in names {
            let variant: Variant = name.parse()?;
            if variants.contains(&variant) {
                return Err(HardValidationError::DuplicateEntry {
                    field: "variants",
                    value: name,
                });
            }
            variants.push(variant);
        }
        Ok(variants)
    }
}
