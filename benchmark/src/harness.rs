// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Throughput harness.
//!
//! Each warm-up and measurement iteration spins the operation for a fixed
//! wall-clock budget. The clock is read once per batch, not per call, so
//! nanosecond-scale operations are not dominated by timer overhead.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Operations executed between two clock reads.
const BATCH_SIZE: u64 = 1024;

/// Operations and elapsed time of one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationSample {
    pub operations: u64,
    pub elapsed: Duration,
}

impl IterationSample {
    /// Throughput of the iteration.
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.operations as f64 / secs
    }
}

/// A benchmark harness for measuring operation throughput.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    /// Number of discarded warm-up iterations
    warmup_iterations: u32,
    /// Number of measured iterations
    measurement_iterations: u32,
    /// Wall-clock budget of each iteration
    iteration_time: Duration,
}

impl BenchmarkHarness {
    /// Create a new benchmark harness with default settings.
    pub fn new() -> Self {
        Self {
            warmup_iterations: 5,
            measurement_iterations: 5,
            iteration_time: Duration::from_secs(1),
        }
    }

    /// Set the number of warm-up iterations.
    pub fn warmup(mut self, iterations: u32) -> Self {
        self.warmup_iterations = iterations;
        self
    }

    /// Set the number of measurement iterations.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.measurement_iterations = iterations;
        self
    }

    /// Set the duration of each iteration.
    pub fn iteration_time(mut self, duration: Duration) -> Self {
        self.iteration_time = duration;
        self
    }

    /// Run warm-up, then return one sample per measurement iteration.
    ///
    /// The operation's return value goes through `black_box` so the work
    /// cannot be optimized away.
    pub fn run_throughput<F, T>(&self, mut operation: F) -> Vec<IterationSample>
    where
        F: FnMut() -> T,
    {
        for _ in 0..self.warmup_iterations {
            self.run_iteration(&mut operation);
        }

        (0..self.measurement_iterations)
            .map(|_| self.run_iteration(&mut operation))
            .collect()
    }

    fn run_iteration<F, T>(&self, operation: &mut F) -> IterationSample
    where
        F: FnMut() -> T,
    {
        let start = Instant::now();
        let mut operations = 0u64;

        loop {
            for _ in 0..BATCH_SIZE {
                black_box(operation());
            }
            operations += BATCH_SIZE;

            let elapsed = start.elapsed();
            if elapsed >= self.iteration_time {
                return IterationSample {
                    operations,
                    elapsed,
                };
            }
        }
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}
