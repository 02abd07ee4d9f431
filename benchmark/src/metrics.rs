// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Standardized metrics types for benchmark results.
//!
//! This module defines the data structures used to capture and serialize
//! throughput measurements of each variant at each error probability.

use chrono::{DateTime, Utc};
use faultcost_core::{BenchConfig, Variant};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use sysinfo::System;
use uuid::Uuid;

/// Two-sided z value for a 99.9% confidence interval.
const Z_999: f64 = 3.291;

/// Throughput statistics over measurement iterations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThroughputMetrics {
    /// Mean operations per second
    pub mean_ops_per_sec: f64,
    /// Slowest iteration
    pub min_ops_per_sec: f64,
    /// Fastest iteration
    pub max_ops_per_sec: f64,
    /// Sample standard deviation
    pub std_dev: f64,
    /// Half-width of the 99.9% confidence interval around the mean
    pub error_999: f64,
    /// Number of measurement iterations
    pub samples: usize,
}

impl ThroughputMetrics {
    /// Calculate metrics from per-iteration ops/s samples.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self {
                mean_ops_per_sec: 0.0,
                min_ops_per_sec: 0.0,
                max_ops_per_sec: 0.0,
                std_dev: 0.0,
                error_999: 0.0,
                samples: 0,
            };
        }

        let len = samples.len();
        let mean = samples.iter().sum::<f64>() / len as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let (std_dev, error_999) = if len > 1 {
            let variance = samples
                .iter()
                .map(|&x| {
                    let diff = x - mean;
                    diff * diff
                })
                .sum::<f64>()
                / (len - 1) as f64;
            let std_dev = variance.sqrt();
            (std_dev, Z_999 * std_dev / (len as f64).sqrt())
        } else {
            (0.0, 0.0)
        };

        Self {
            mean_ops_per_sec: mean,
            min_ops_per_sec: min,
            max_ops_per_sec: max,
            std_dev,
            error_999,
            samples: len,
        }
    }

    /// Format throughput in human-readable form.
    pub fn format_ops_per_sec(ops: f64) -> String {
        if ops < 1_000.0 {
            format!("{:.2} ops/s", ops)
        } else if ops < 1_000_000.0 {
            format!("{:.2} Kops/s", ops / 1_000.0)
        } else if ops < 1_000_000_000.0 {
            format!("{:.2} Mops/s", ops / 1_000_000.0)
        } else {
            format!("{:.2} Gops/s", ops / 1_000_000_000.0)
        }
    }
}

/// System information captured at benchmark time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// OS version
    pub os_version: String,
    /// Kernel version (Linux)
    pub kernel_version: Option<String>,
    /// CPU model name
    pub cpu_model: String,
    /// Number of CPU cores
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    /// Hostname
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

/// Throughput of one variant at one error probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub variant: Variant,
    /// Configured error probability
    pub probability: f64,
    /// Failure fraction actually present in the replayed scenario
    pub observed_probability: f64,
    pub throughput: ThroughputMetrics,
    /// Raw per-iteration ops/s, across all forks
    pub samples: Vec<f64>,
    /// Forked workers the samples came from (0 = in-process)
    pub forks: u32,
    /// Additional metadata specific to this result
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl BenchmarkResult {
    /// Create a result from raw ops/s samples.
    pub fn new(
        variant: Variant,
        probability: f64,
        observed_probability: f64,
        samples: Vec<f64>,
        forks: u32,
    ) -> Self {
        Self {
            variant,
            probability,
            observed_probability,
            throughput: ThroughputMetrics::from_samples(&samples),
            samples,
            forks,
            metadata: HashMap::new(),
        }
    }

    /// Add metadata to the result. Values that fail to serialize are skipped.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(value) = serde_json::to_value(value) {
            self.metadata.insert(key.into(), value);
        }
        self
    }

    /// Attach the variant's mechanism descriptors.
    pub fn with_variant_metadata(self) -> Self {
        let variant = self.variant;
        self.with_metadata("mechanism", variant.mechanism())
            .with_metadata("failure_value", variant.failure_lifecycle())
            .with_metadata("stack_trace", variant.captures_stack())
    }
}

/// Complete benchmark suite report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Framework version
    pub version: String,
    /// Unique id of this run
    pub run_id: Uuid,
    /// Timestamp when benchmarks were run
    pub timestamp: DateTime<Utc>,
    /// System information
    pub system_info: SystemInfo,
    /// Configuration the run used
    pub config: BenchConfig,
    /// Individual benchmark results
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    /// Create a new, empty report for a run.
    pub fn new(config: BenchConfig) -> Self {
        Self {
            benchmark_suite: "faultcost-benchmarks".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            config,
            results: Vec::new(),
        }
    }

    /// Add a result to the report.
    pub fn add_result(&mut self, result: BenchmarkResult) {
        self.results.push(result);
    }

    /// Results sorted by probability, then variant order.
    pub fn sorted_results(&self) -> Vec<&BenchmarkResult> {
        let mut results: Vec<_> = self.results.iter().collect();
        results.sort_by(|a, b| {
            a.probability
                .total_cmp(&b.probability)
                .then(a.variant.cmp(&b.variant))
        });
        results
    }

    /// Mean throughput of `variant` relative to baseline at the same
    /// probability, if both were measured.
    pub fn relative_to_baseline(&self, variant: Variant, probability: f64) -> Option<f64> {
        let mean = |v: Variant| {
            self.results
                .iter()
                .find(|r| r.variant == v && r.probability == probability)
                .map(|r| r.throughput.mean_ops_per_sec)
        };
        let baseline = mean(Variant::Baseline)?;
        if baseline == 0.0 {
            return None;
        }
        Some(mean(variant)? / baseline)
    }
}
