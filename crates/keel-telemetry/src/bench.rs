// Copyright 2025 the keel authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A micro-benchmark harness with per-iteration timing statistics,
//! cooperative cancellation, and optional process memory tracking.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use keel_core::math::Summary;
use keel_core::Stopwatch;
use serde::{Deserialize, Serialize};

use crate::monitor::ProcessMonitor;

/// A shared flag that requests a running benchmark to stop.
///
/// Clones observe the same underlying flag, so one end can be handed to the
/// benchmark and another kept to trigger the cancellation.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configures and runs a micro-benchmark over a closure.
///
/// The workload runs `warmup` untimed rounds followed by `iterations` timed
/// ones, and the per-iteration wall-clock samples are condensed into a
/// [`Summary`]. Cancellation is checked between iterations, so a long
/// workload stops at the next iteration boundary rather than mid-call.
///
/// # Examples
///
/// ```
/// use keel_telemetry::Benchmark;
///
/// let report = Benchmark::new("sum")
///     .with_warmup(2)
///     .with_iterations(16)
///     .run(|| {
///         let total: u64 = (0..512).sum();
///         assert!(total > 0);
///     });
///
/// assert_eq!(report.iterations, 16);
/// assert!(!report.cancelled);
/// ```
#[derive(Debug, Clone)]
pub struct Benchmark {
    name: String,
    warmup: usize,
    iterations: usize,
    track_memory: bool,
}

impl Benchmark {
    /// Creates a benchmark with no warmup and 100 timed iterations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            warmup: 0,
            iterations: 100,
            track_memory: false,
        }
    }

    /// Sets the number of untimed warmup rounds run before measuring.
    pub fn with_warmup(mut self, rounds: usize) -> Self {
        self.warmup = rounds;
        self
    }

    /// Sets the number of timed iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Enables sampling of the process's resident memory before and after
    /// the run. The report's delta stays `None` on platforms where the
    /// process cannot be inspected.
    pub fn with_memory_tracking(mut self, enabled: bool) -> Self {
        self.track_memory = enabled;
        self
    }

    /// Runs the workload to completion and reports the timings.
    pub fn run<F>(&self, mut f: F) -> BenchmarkReport
    where
        F: FnMut(),
    {
        let (report, _) = self.run_loop(None, || {
            f();
            Ok(())
        });
        report
    }

    /// Runs the workload, stopping early once `cancel` is set.
    ///
    /// The flag is checked before every round, including warmup, so a flag
    /// cancelled up front yields a report with zero iterations.
    pub fn run_cancellable<F>(&self, cancel: &CancelFlag, mut f: F) -> BenchmarkReport
    where
        F: FnMut(),
    {
        let (report, _) = self.run_loop(Some(cancel), || {
            f();
            Ok(())
        });
        report
    }

    /// Runs a fallible workload, aborting the benchmark on the first error.
    ///
    /// The returned error names the benchmark and the round that failed.
    pub fn run_fallible<F>(&self, f: F) -> anyhow::Result<BenchmarkReport>
    where
        F: FnMut() -> anyhow::Result<()>,
    {
        let (report, failure) = self.run_loop(None, f);
        match failure {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }

    /// Runs the benchmark on a background thread.
    ///
    /// The returned handle can cancel the run and joins into the final
    /// report.
    pub fn spawn<F>(self, f: F) -> BenchmarkHandle
    where
        F: FnMut() + Send + 'static,
    {
        let cancel = CancelFlag::new();
        let worker_flag = cancel.clone();
        let handle = thread::spawn(move || self.run_cancellable(&worker_flag, f));
        BenchmarkHandle { cancel, handle }
    }

    fn run_loop<F>(
        &self,
        cancel: Option<&CancelFlag>,
        mut body: F,
    ) -> (BenchmarkReport, Option<anyhow::Error>)
    where
        F: FnMut() -> anyhow::Result<()>,
    {
        let is_cancelled = || cancel.map(CancelFlag::is_cancelled).unwrap_or(false);

        let mut monitor = if self.track_memory {
            ProcessMonitor::new()
        } else {
            None
        };
        let memory_before = monitor.as_mut().and_then(ProcessMonitor::memory_bytes);

        let mut samples_ms = Vec::with_capacity(self.iterations);
        let mut cancelled = false;
        let mut failure = None;

        for round in 0..self.warmup {
            if is_cancelled() {
                cancelled = true;
                break;
            }
            if let Err(error) = body() {
                failure = Some(error.context(format!(
                    "benchmark '{}' failed in warmup round {round}",
                    self.name
                )));
                break;
            }
        }

        // Warmup stays outside the total so the report only covers what the
        // samples cover.
        let total = Stopwatch::new();
        if !cancelled && failure.is_none() {
            for round in 0..self.iterations {
                if is_cancelled() {
                    cancelled = true;
                    break;
                }
                let lap = Stopwatch::new();
                match body() {
                    Ok(()) => samples_ms.push(lap.elapsed_secs_f64() * 1000.0),
                    Err(error) => {
                        failure = Some(error.context(format!(
                            "benchmark '{}' failed in iteration {round}",
                            self.name
                        )));
                        break;
                    }
                }
            }
        }
        let total_ms = total.elapsed_secs_f64() * 1000.0;

        let memory_after = monitor.as_mut().and_then(ProcessMonitor::memory_bytes);
        let memory_delta_bytes = match (memory_before, memory_after) {
            (Some(before), Some(after)) => Some(after as i64 - before as i64),
            _ => None,
        };

        let report = BenchmarkReport {
            name: self.name.clone(),
            iterations: samples_ms.len(),
            cancelled,
            total_ms,
            time: Summary::from_samples(&samples_ms),
            memory_delta_bytes,
        };
        (report, failure)
    }
}

/// A handle to a benchmark running on a background thread.
#[derive(Debug)]
pub struct BenchmarkHandle {
    cancel: CancelFlag,
    handle: thread::JoinHandle<BenchmarkReport>,
}

impl BenchmarkHandle {
    /// Requests the benchmark to stop at the next iteration boundary.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns a clone of the run's cancellation flag.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Returns `true` once the benchmark thread has finished.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the benchmark to finish and returns its report.
    ///
    /// Returns `Err` only if the workload panicked.
    pub fn join(self) -> thread::Result<BenchmarkReport> {
        self.handle.join()
    }
}

/// The outcome of a benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// The benchmark name the run was configured with.
    pub name: String,
    /// The number of timed iterations that completed.
    pub iterations: usize,
    /// Whether the run stopped early due to cancellation.
    pub cancelled: bool,
    /// Wall-clock time of the timed phase in milliseconds, warmup excluded.
    pub total_ms: f64,
    /// Per-iteration timing statistics in milliseconds, or `None` when no
    /// iteration completed.
    pub time: Option<Summary>,
    /// Change in resident memory across the run in bytes. `None` unless
    /// memory tracking was enabled and the process could be inspected.
    pub memory_delta_bytes: Option<i64>,
}

impl BenchmarkReport {
    /// Logs the report at info level in its display form.
    pub fn log_summary(&self) {
        log::info!("{self}");
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[bench {}] {} iterations in {:.3} ms",
            self.name, self.iterations, self.total_ms
        )?;
        if let Some(time) = self.time {
            write!(
                f,
                " (mean {:.3} ms, median {:.3} ms, min {:.3} ms, max {:.3} ms)",
                time.mean, time.median, time.min, time.max
            )?;
        }
        if let Some(delta) = self.memory_delta_bytes {
            write!(f, ", memory delta {delta:+} bytes")?;
        }
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}
