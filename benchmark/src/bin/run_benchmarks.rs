// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI tool to run the error-signaling sweep and generate reports.

use anyhow::Context;
use clap::{Parser, Subcommand};
use faultcost_benchmark::{Driver, JsonReporter, TextReporter, ThroughputMetrics, TrialSpec};
use faultcost_core::{BenchConfig, ConfigLoader, ConfigOverrides, Variant};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "run_benchmarks")]
#[command(author, version, about = "Measure the throughput cost of error-signaling strategies")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the benchmark sweep
    Run {
        /// YAML configuration file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for results.txt and JSON reports
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Forked workers per trial (0 runs in-process)
        #[arg(short, long)]
        forks: Option<u32>,

        /// Error probability to sweep (repeatable, replaces the configured sweep)
        #[arg(short, long = "probability")]
        probabilities: Vec<f64>,

        /// Variant to run (repeatable, all if not specified)
        #[arg(long = "variant")]
        variants: Vec<String>,

        /// Run in quick mode (short iterations, no forks unless --forks is given)
        #[arg(long)]
        quick: bool,
    },

    /// List benchmark variants
    List,

    /// Run a single trial and print its samples as JSON (used by forks)
    #[command(hide = true)]
    Worker {
        #[arg(long)]
        trial: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for reports and worker output.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            config,
            output,
            forks,
            probabilities,
            variants,
            quick,
        } => {
            let config = match config {
                Some(path) => ConfigLoader::load_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => BenchConfig::default(),
            };
            let config = if quick { config.quick() } else { config };
            let config = config.apply(ConfigOverrides {
                forks,
                probabilities,
                variants,
                output_dir: output,
            })?;
            run(config)
        }
        Commands::List => {
            for variant in Variant::ALL {
                println!(
                    "{:<32} mechanism={:?} failure_value={:?} stack_trace={}",
                    variant.name(),
                    variant.mechanism(),
                    variant.failure_lifecycle(),
                    variant.captures_stack()
                );
            }
            Ok(())
        }
        Commands::Worker { trial } => {
            let spec: TrialSpec = serde_json::from_str(&trial).context("parsing trial spec")?;
            let samples = spec.execute();
            println!("{}", serde_json::to_string(&samples)?);
            Ok(())
        }
    }
}

fn run(config: BenchConfig) -> anyhow::Result<()> {
    println!("faultcost Benchmark Suite");
    println!("=========================");
    println!("Output directory: {:?}", config.output_dir);
    println!(
        "Probabilities: {:?}",
        config
            .probabilities
            .iter()
            .map(|p| p.value())
            .collect::<Vec<_>>()
    );
    println!(
        "Forks: {}, warm-up: {}x{}ms, measurement: {}x{}ms",
        config.forks,
        config.warmup_iterations,
        config.iteration_time_ms,
        config.measurement_iterations,
        config.iteration_time_ms
    );
    println!();

    let text_reporter = TextReporter::new(&config.output_dir)?;
    let json_reporter = JsonReporter::new(&config.output_dir)?;

    let driver = Driver::new(config)?;
    let report = driver.run()?;

    let table_path = text_reporter.save(&report)?;
    let json_path = json_reporter.save(&report)?;

    println!();
    print!("{}", TextReporter::render(&report));
    println!();

    // Relative cost against baseline, when baseline was part of the run.
    for result in report.sorted_results() {
        if result.variant == Variant::Baseline {
            continue;
        }
        if let Some(ratio) = report.relative_to_baseline(result.variant, result.probability) {
            println!(
                "{} @ {}: {} ({:.1}% of baseline)",
                result.variant,
                result.probability,
                ThroughputMetrics::format_ops_per_sec(result.throughput.mean_ops_per_sec),
                ratio * 100.0
            );
        }
    }

    println!();
    println!("Results table saved to: {:?}", table_path);
    println!("Benchmark report saved to: {:?}", json_path);

    Ok(())
}
