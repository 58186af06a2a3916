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

//! RAII scope timing.
//!
//! A [`ScopedTimer`] logs how long a scope took when it is dropped, so the
//! measurement survives early returns and panics alike.

use keel_core::Stopwatch;
use std::time::Duration;

/// Times a scope and logs the result on drop.
///
/// # Examples
///
/// ```
/// use keel_telemetry::ScopedTimer;
///
/// {
///     let _timer = ScopedTimer::new("load_level");
///     // ... work ...
/// } // logs: [load_level] took 0.103 ms
/// ```
pub struct ScopedTimer {
    label: String,
    stopwatch: Stopwatch,
    threshold: Option<Duration>,
    level: log::Level,
    finished: bool,
}

impl ScopedTimer {
    /// Creates a timer that starts now and logs at debug level on drop.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            stopwatch: Stopwatch::new(),
            threshold: None,
            level: log::Level::Debug,
            finished: false,
        }
    }

    /// Only log if the scope took at least `threshold`.
    ///
    /// Useful on hot paths where only outliers are interesting.
    pub fn with_threshold(mut self, threshold: Duration) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Changes the log level used for the report.
    pub fn log_at(mut self, level: log::Level) -> Self {
        self.level = level;
        self
    }

    /// Returns the time elapsed so far without stopping the timer.
    pub fn elapsed(&self) -> Duration {
        self.stopwatch.elapsed()
    }

    /// Stops the timer, logs the report now, and returns the elapsed time.
    /// The drop handler will not log a second time.
    pub fn finish(mut self) -> Duration {
        let elapsed = self.stopwatch.elapsed();
        self.report(elapsed);
        elapsed
    }

    fn report(&mut self, elapsed: Duration) {
        self.finished = true;
        if let Some(threshold) = self.threshold {
            if elapsed < threshold {
                return;
            }
        }
        log::log!(
            self.level,
            "[{}] took {:.3} ms",
            self.label,
            elapsed.as_secs_f64() * 1000.0
        );
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if !self.finished {
            let elapsed = self.stopwatch.elapsed();
            self.report(elapsed);
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging;
    use std::thread;

    #[test]
    fn test_finish_returns_elapsed() {
        logging::init_for_tests();
        let timer = ScopedTimer::new("finish_returns_elapsed");
        thread::sleep(Duration::from_millis(20));
        let elapsed = timer.finish();
        assert!(elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_drop_logs_without_finish() {
        logging::init_for_tests();
        {
            let _timer = ScopedTimer::new("drop_path").log_at(log::Level::Trace);
            thread::sleep(Duration::from_millis(1));
        }
        // Nothing to assert beyond "did not panic"; output goes to the log
    }

    #[test]
    fn test_threshold_suppresses_fast_scopes() {
        logging::init_for_tests();
        let timer =
            ScopedTimer::new("quiet_when_fast").with_threshold(Duration::from_secs(3600));
        let elapsed = timer.finish();
        // The report is suppressed but the measurement is still returned
        assert!(elapsed < Duration::from_secs(3600));
    }

    #[test]
    fn test_elapsed_does_not_stop_the_timer() {
        let timer = ScopedTimer::new("peek");
        let first = timer.elapsed();
        thread::sleep(Duration::from_millis(5));
        let second = timer.elapsed();
        assert!(second > first);
        timer.finish();
    }
}
