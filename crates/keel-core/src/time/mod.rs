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

//! Wall-clock time measurement.

use std::time::{Duration, Instant};

/// A monotonic stopwatch that starts running the moment it is created.
///
/// The struct is `Copy`: copies share the original start time, which makes it
/// cheap to stash a stopwatch in a report or pass one through a call chain.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Creates a stopwatch started at the current instant.
    #[inline]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Returns the time elapsed since the start (or the last restart).
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Returns the elapsed time in whole milliseconds.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns the elapsed time in whole microseconds.
    #[inline]
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }

    /// Returns the elapsed time in seconds as an `f64`.
    #[inline]
    pub fn elapsed_secs_f64(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }

    /// Resets the start time to now and returns the lap time that passed
    /// since the previous start.
    #[inline]
    pub fn restart(&mut self) -> Duration {
        let lap = self.elapsed();
        self.started = Instant::now();
        lap
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn stopwatch_starts_near_zero() {
        let watch = Stopwatch::new();
        assert!(watch.elapsed() < Duration::from_millis(50));
        assert!(watch.elapsed_ms() < 50);
        assert!(watch.elapsed_secs_f64() < 0.05);
    }

    #[test]
    fn stopwatch_tracks_sleep() {
        let watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(50));

        let elapsed = watch.elapsed();
        assert!(
            elapsed >= Duration::from_millis(50),
            "Elapsed ({elapsed:?}) should cover the sleep"
        );
        // Generous ceiling for slow CI machines
        assert!(
            elapsed < Duration::from_millis(500),
            "Elapsed ({elapsed:?}) should stay near the sleep"
        );
        assert!(watch.elapsed_ms() >= 50);
        assert!(watch.elapsed_us() >= 50_000);
        assert!(watch.elapsed_secs_f64() >= 0.05);
    }

    #[test]
    fn stopwatch_restart_returns_lap() {
        let mut watch = Stopwatch::new();
        thread::sleep(Duration::from_millis(30));

        let lap = watch.restart();
        assert!(lap >= Duration::from_millis(30));
        // The clock starts over after the restart
        assert!(watch.elapsed() < Duration::from_millis(30));
    }

    #[test]
    fn stopwatch_copies_share_start_time() {
        let original = Stopwatch::new();
        thread::sleep(Duration::from_millis(10));
        let copy = original;

        let difference = original
            .elapsed_us()
            .abs_diff(copy.elapsed_us());
        assert!(
            difference < 1000,
            "Copies should report nearly identical elapsed time (diff: {difference} us)"
        );
    }

    #[test]
    fn stopwatch_implements_default() {
        let watch = Stopwatch::default();
        assert!(watch.elapsed() < Duration::from_secs(1));
    }
}
