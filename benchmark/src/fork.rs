// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Forked trial execution.
//!
//! Each fork is a fresh process running the hidden `worker` subcommand of
//! the driver binary, so code layout, allocator state and lazily built
//! singletons from one trial cannot leak into the next. The worker writes a
//! single JSON line to stdout; its logs go to stderr.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::driver::DriverError;
use crate::trial::{TrialSamples, TrialSpec};

/// Subcommand name the worker is started with.
pub const WORKER_SUBCOMMAND: &str = "worker";

/// Spawns worker processes for trials.
#[derive(Debug, Clone)]
pub struct ForkRunner {
    executable: PathBuf,
}

impl ForkRunner {
    /// Runner re-invoking `executable`.
    pub fn new(executable: impl AsRef<Path>) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }

    /// Runner re-invoking the current executable.
    pub fn current() -> Result<Self, DriverError> {
        let executable = std::env::current_exe().map_err(|source| DriverError::Spawn {
            executable: PathBuf::from("<current executable>"),
            source,
        })?;
        Ok(Self::new(executable))
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run one trial in a fresh worker process.
    pub fn run(&self, spec: &TrialSpec) -> Result<TrialSamples, DriverError> {
        let trial = serde_json::to_string(spec)?;

        let output = Command::new(&self.executable)
            .arg(WORKER_SUBCOMMAND)
            .arg("--trial")
            .arg(trial)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| DriverError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DriverError::WorkerFailed {
                variant: spec.variant.to_string(),
                status: output.status.to_string(),
            });
        }

        parse_worker_output(&output.stdout)
    }
}

/// Parse the last non-empty stdout line of a worker.
pub fn parse_worker_output(stdout: &[u8]) -> Result<TrialSamples, DriverError> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or(DriverError::EmptyWorkerOutput)?;
    Ok(serde_json::from_str(line)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use faultcost_core::{BenchConfig, Probability, Variant};

    fn spec() -> TrialSpec {
        TrialSpec::from_config(
            &BenchConfig::default(),
            Variant::Baseline,
            Probability::new(0.1).unwrap(),
        )
    }

    #[test]
    fn test_parse_worker_output_takes_last_line() {
        let samples = TrialSamples {
            variant: Variant::FunctionalResult,
            probability: Probability::new(0.3).unwrap(),
            observed_probability: 0.3,
            total_operations: 10,
            ops_per_sec: vec![1.0, 2.0],
        };
        let stdout = format!("noise\n{}\n\n", serde_json::to_string(&samples).unwrap());

        let parsed = parse_worker_output(stdout.as_bytes()).unwrap();
        assert_eq!(parsed, samples);
    }

    #[test]
    fn test_parse_worker_output_empty() {
        assert!(matches!(
            parse_worker_output(b"\n  \n"),
            Err(DriverError::EmptyWorkerOutput)
        ));
    }

    #[test]
    fn test_parse_worker_output_garbage() {
        assert!(matches!(
            parse_worker_output(b"not json"),
            Err(DriverError::Protocol(_))
        ));
    }

    #[test]
    fn test_missing_executable() {
        let runner = ForkRunner::new("/nonexistent/faultcost-worker");
        assert!(matches!(runner.run(&spec()), Err(DriverError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_worker() {
        // `false` ignores its arguments and exits 1.
        let runner = ForkRunner::new("false");
        assert!(matches!(
            runner.run(&spec()),
            Err(DriverError::WorkerFailed { .. })
        ));
    }
}
