// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! End-to-end tests of the `run_benchmarks` binary.

use std::process::Command;

use faultcost_benchmark::reporter::TEXT_REPORT_FILE;
use faultcost_benchmark::{ForkRunner, JsonReporter, TrialSamples, TrialSpec};
use faultcost_core::{BenchConfig, Probability, ScenarioLength, Variant};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_run_benchmarks");

#[test]
fn test_list_prints_every_variant() {
    let output = Command::new(BIN).arg("list").output().expect("Failed to run binary");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for variant in Variant::ALL {
        assert!(stdout.contains(variant.name()), "missing {}", variant);
    }
}

#[test]
fn test_worker_emits_trial_samples() {
    let mut spec = TrialSpec::from_config(
        &BenchConfig::default(),
        Variant::FunctionalResultSingleton,
        Probability::new(0.3).unwrap(),
    );
    spec.scenario_length = ScenarioLength::new(1000).unwrap();
    spec.warmup_iterations = 0;
    spec.measurement_iterations = 2;
    spec.iteration_time_ms = 5;

    let samples: TrialSamples = ForkRunner::new(BIN).run(&spec).expect("Worker failed");
    assert_eq!(samples.variant, Variant::FunctionalResultSingleton);
    assert_eq!(samples.ops_per_sec.len(), 2);
}

#[test]
fn test_quick_forked_run_writes_reports() {
    let temp_dir = TempDir::new().unwrap();
    let output = Command::new(BIN)
        .args(["run", "--quick", "--forks", "1"])
        .args(["--probability", "0.1"])
        .args(["--variant", "baseline", "--variant", "suppressed_exception_singleton"])
        .arg("--output")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to run binary");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let table = std::fs::read_to_string(temp_dir.path().join(TEXT_REPORT_FILE)).unwrap();
    assert!(table.contains("baseline"));
    assert!(table.contains("suppressed_exception_singleton"));
    assert!(table.contains("ops/s"));

    let reports = JsonReporter::new(temp_dir.path()).unwrap().list_reports().unwrap();
    assert_eq!(reports.len(), 1);
    let report = JsonReporter::load(&reports[0]).unwrap();
    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.forks == 1));
}

#[test]
fn test_invalid_probability_fails_before_running() {
    let temp_dir = TempDir::new().unwrap();
    let output = Command::new(BIN)
        .args(["run", "--quick", "--probability", "1.5"])
        .arg("--output")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    assert!(!temp_dir.path().join(TEXT_REPORT_FILE).exists());
}
