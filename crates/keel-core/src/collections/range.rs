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

//! A stepped floating-point range iterator.

/// An iterator over evenly spaced `f32` values.
///
/// Values are computed as `start + i * step` rather than by repeated
/// addition, so rounding error does not accumulate across long ranges. The
/// end bound is exclusive and negative steps iterate downwards.
///
/// # Examples
///
/// ```
/// use keel_core::collections::float_range;
///
/// let values: Vec<f32> = float_range(0.0, 1.0, 0.25).collect();
/// assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75]);
///
/// let down: Vec<f32> = float_range(3.0, 0.0, -1.0).collect();
/// assert_eq!(down, vec![3.0, 2.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatRange {
    start: f32,
    step: f32,
    index: usize,
    count: usize,
}

impl FloatRange {
    /// Creates a range from `start` towards `end` (exclusive) in increments
    /// of `step`.
    ///
    /// A zero or non-finite step, non-finite bounds, or a step pointing away
    /// from `end` all produce an empty range rather than an endless one.
    pub fn new(start: f32, end: f32, step: f32) -> Self {
        Self {
            start,
            step,
            index: 0,
            count: Self::count_steps(start, end, step),
        }
    }

    fn count_steps(start: f32, end: f32, step: f32) -> usize {
        if !start.is_finite() || !end.is_finite() || !step.is_finite() || step == 0.0 {
            return 0;
        }
        let raw = ((end as f64 - start as f64) / step as f64).ceil();
        if raw <= 0.0 {
            return 0;
        }
        let mut count = raw as usize;

        // The closed form can land one off at representation boundaries
        // (e.g. 0.3 / 0.1 in f32), so nudge until the count matches the
        // exclusive-end rule exactly.
        let in_range = |i: usize| {
            let value = start + i as f32 * step;
            if step > 0.0 {
                value < end
            } else {
                value > end
            }
        };
        for _ in 0..2 {
            if count > 0 && !in_range(count - 1) {
                count -= 1;
            } else {
                break;
            }
        }
        for _ in 0..2 {
            if in_range(count) {
                count += 1;
            } else {
                break;
            }
        }
        count
    }
}

impl Iterator for FloatRange {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.count {
            return None;
        }
        let value = self.start + self.index as f32 * self.step;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FloatRange {}

impl std::iter::FusedIterator for FloatRange {}

/// Shorthand for [`FloatRange::new`].
pub fn float_range(start: f32, end: f32, step: f32) -> FloatRange {
    FloatRange::new(start, end, step)
}
