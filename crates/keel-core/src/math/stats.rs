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

//! Descriptive statistics over sample slices.
//!
//! All functions skip `NaN` samples and return `None` when no usable samples
//! remain, so callers never have to pre-clean measurement data. Variance and
//! standard deviation use the unbiased sample form (`n - 1` denominator).

use serde::{Deserialize, Serialize};

/// Collects the non-`NaN` samples into a sorted scratch vector.
fn sorted_samples(samples: &[f64]) -> Vec<f64> {
    let mut values: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    values.sort_unstable_by(f64::total_cmp);
    values
}

fn median_of_sorted(sorted: &[f64]) -> f64 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) * 0.5
    } else {
        sorted[mid]
    }
}

fn percentile_of_sorted(sorted: &[f64], percentile: f64) -> f64 {
    let p = percentile.clamp(0.0, 100.0);
    let rank = (p / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
    }
}

/// Computes the arithmetic mean of the samples.
///
/// # Examples
///
/// ```
/// use keel_core::math::stats;
///
/// assert_eq!(stats::mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(stats::mean(&[]), None);
/// ```
pub fn mean(samples: &[f64]) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in samples.iter().filter(|v| !v.is_nan()) {
        sum += value;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Computes the median of the samples.
///
/// For an even number of samples the median is the mean of the two middle
/// values.
///
/// # Examples
///
/// ```
/// use keel_core::math::stats;
///
/// assert_eq!(stats::median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(stats::median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(samples: &[f64]) -> Option<f64> {
    let sorted = sorted_samples(samples);
    if sorted.is_empty() {
        None
    } else {
        Some(median_of_sorted(&sorted))
    }
}

/// Computes the unbiased sample variance (`n - 1` denominator).
///
/// A single sample has no spread, so it yields `Some(0.0)` rather than a
/// division by zero.
pub fn variance(samples: &[f64]) -> Option<f64> {
    let values: Vec<f64> = samples.iter().copied().filter(|v| !v.is_nan()).collect();
    match values.len() {
        0 => None,
        1 => Some(0.0),
        n => {
            let mean = values.iter().sum::<f64>() / n as f64;
            let sum_sq = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
            Some(sum_sq / (n - 1) as f64)
        }
    }
}

/// Computes the sample standard deviation (square root of [`variance`]).
pub fn std_dev(samples: &[f64]) -> Option<f64> {
    variance(samples).map(f64::sqrt)
}

/// Computes a percentile using linear interpolation between closest ranks.
///
/// `percentile` is clamped to `[0, 100]`, so `0.0` yields the minimum and
/// `100.0` the maximum.
///
/// # Examples
///
/// ```
/// use keel_core::math::stats;
///
/// let samples = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(stats::percentile(&samples, 50.0), Some(2.5));
/// assert_eq!(stats::percentile(&samples, 100.0), Some(4.0));
/// ```
pub fn percentile(samples: &[f64], percentile: f64) -> Option<f64> {
    let sorted = sorted_samples(samples);
    if sorted.is_empty() {
        None
    } else {
        Some(percentile_of_sorted(&sorted, percentile))
    }
}

/// Returns the smallest and largest sample as `(min, max)`.
pub fn min_max(samples: &[f64]) -> Option<(f64, f64)> {
    samples
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}

/// A one-shot statistical summary of a sample set.
///
/// Produced by [`Summary::from_samples`] and embedded in benchmark reports,
/// where it serializes as a flat JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// The number of samples the summary was computed from (`NaN`s excluded).
    pub count: usize,
    /// The smallest sample.
    pub min: f64,
    /// The largest sample.
    pub max: f64,
    /// The arithmetic mean.
    pub mean: f64,
    /// The median.
    pub median: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
}

impl Summary {
    /// Summarizes a sample set in a single pass over the sorted data.
    ///
    /// Returns `None` when the slice is empty or contains only `NaN`s.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let sorted = sorted_samples(samples);
        let count = sorted.len();
        if count == 0 {
            return None;
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std_dev = if count == 1 {
            0.0
        } else {
            let sum_sq = sorted.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>();
            (sum_sq / (count - 1) as f64).sqrt()
        };

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median: median_of_sorted(&sorted),
            std_dev,
        })
    }
}
