// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Report generation for benchmark results.
//!
//! [`TextReporter`] writes the human-readable throughput table to a fixed
//! file name in the output directory. [`JsonReporter`] keeps every run as a
//! timestamped JSON file for later comparison.

use crate::metrics::BenchmarkReport;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the text table inside the output directory.
pub const TEXT_REPORT_FILE: &str = "results.txt";

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Report I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Human-readable throughput table.
pub struct TextReporter {
    /// Output directory for the table
    output_dir: PathBuf,
}

impl TextReporter {
    /// Create a text reporter, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Where the table is written.
    pub fn path(&self) -> PathBuf {
        self.output_dir.join(TEXT_REPORT_FILE)
    }

    /// Render the table.
    pub fn render(report: &BenchmarkReport) -> String {
        let results = report.sorted_results();
        let name_width = results
            .iter()
            .map(|r| r.variant.name().len())
            .chain(std::iter::once("Benchmark".len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:<name_width$}  {:>11}  {:>5}  {:>3}  {:>16}    {:>14}  {}",
            "Benchmark", "(errorProb)", "Mode", "Cnt", "Score", "Error", "Units",
        );
        for result in results {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:>11}  {:>5}  {:>3}  {:>16.3} ± {:>14.3}  ops/s",
                result.variant.name(),
                result.probability,
                "thrpt",
                result.throughput.samples,
                result.throughput.mean_ops_per_sec,
                result.throughput.error_999,
            );
        }
        out
    }

    /// Write the table, replacing the previous run's.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let path = self.path();
        fs::write(&path, Self::render(report))?;
        Ok(path)
    }
}

/// JSON reporter for benchmark results.
pub struct JsonReporter {
    /// Output directory for benchmark data
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a new JSON reporter with the specified output directory.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Save a benchmark report to a JSON file.
    ///
    /// Returns the path to the created file.
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%SZ");
        let run = report.run_id.simple().to_string();
        let filename = format!("faultcost_{}_{}.json", timestamp, &run[..8]);
        let filepath = self.output_dir.join(&filename);

        let file = File::create(&filepath)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, report)?;

        Ok(filepath)
    }

    /// List all existing benchmark files in the output directory.
    pub fn list_reports(&self) -> Result<Vec<PathBuf>, ReporterError> {
        let mut reports = Vec::new();
        for entry in fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                reports.push(path);
            }
        }
        reports.sort();
        Ok(reports)
    }

    /// Load an existing benchmark report from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::BenchmarkResult;
    use faultcost_core::{BenchConfig, Variant};
    use tempfile::TempDir;

    fn sample_report() -> BenchmarkReport {
        let mut report = BenchmarkReport::new(BenchConfig::default());
        report.add_result(BenchmarkResult::new(
            Variant::UnsuppressedException,
            0.1,
            0.1,
            vec![1_000.0, 1_200.0],
            1,
        ));
        report.add_result(BenchmarkResult::new(
            Variant::Baseline,
            0.1,
            0.1,
            vec![9_000.0, 9_400.0],
            1,
        ));
        report
    }

    #[test]
    fn test_render_table() {
        let table = TextReporter::render(&sample_report());
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Benchmark"));
        assert!(lines[0].contains("(errorProb)"));
        assert!(lines[1].starts_with("baseline"));
        assert!(lines[1].contains("9200.000"));
        assert!(lines[2].starts_with("unsuppressed_exception"));
        assert!(lines[2].ends_with("ops/s"));
    }

    #[test]
    fn test_text_report_fixed_location() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = TextReporter::new(temp_dir.path().join("out")).unwrap();

        let path = reporter.save(&sample_report()).unwrap();
        assert_eq!(path, temp_dir.path().join("out").join(TEXT_REPORT_FILE));

        // A second run overwrites the same file.
        let again = reporter.save(&sample_report()).unwrap();
        assert_eq!(path, again);
        assert!(fs::read_to_string(&path).unwrap().contains("baseline"));
    }

    #[test]
    fn test_reporter_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();

        let report = sample_report();
        let path = reporter.save(&report).unwrap();
        assert!(path.exists());

        let loaded = JsonReporter::load(&path).unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.results.len(), 2);
        assert_eq!(loaded.results[0].variant, Variant::UnsuppressedException);
        assert_eq!(loaded.config, report.config);
    }

    #[test]
    fn test_list_reports() {
        let temp_dir = TempDir::new().unwrap();
        let reporter = JsonReporter::new(temp_dir.path()).unwrap();

        // Distinct run ids keep the file names apart within one second.
        reporter.save(&sample_report()).unwrap();
        reporter.save(&sample_report()).unwrap();
        TextReporter::new(temp_dir.path())
            .unwrap()
            .save(&sample_report())
            .unwrap();

        let reports = reporter.list_reports().unwrap();
        assert_eq!(reports.len(), 2);
    }
}
