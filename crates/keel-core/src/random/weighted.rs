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

//! Weighted random sampling over index ranges.
//!
//! Weights are unsigned integers: an entry with weight 8 is picked twice as
//! often as one with weight 4, and a zero weight removes an entry from the
//! draw entirely. The functions here work on plain weight slices and return
//! indices; [`crate::collections::SliceRandomExt`] layers the element-returning
//! API on top.

use rand::Rng;
use std::fmt;

/// Errors produced by the weighted sampling functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightedError {
    /// Every weight was zero (or the weight slice was empty), so no draw
    /// can be made.
    ZeroTotalWeight,
    /// A unique sample asked for more elements than have positive weight.
    NotEnoughCandidates {
        /// How many unique elements the caller asked for.
        requested: usize,
        /// How many elements actually have a positive weight.
        available: usize,
    },
}

impl fmt::Display for WeightedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightedError::ZeroTotalWeight => {
                write!(f, "Total weight is zero, nothing can be sampled.")
            }
            WeightedError::NotEnoughCandidates {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Requested {requested} unique samples but only {available} candidates have positive weight."
                )
            }
        }
    }
}

impl std::error::Error for WeightedError {}

/// Draws a single index, with probability proportional to its weight.
///
/// # Examples
///
/// ```
/// use keel_core::random::weighted::sample_index;
///
/// let mut rng = rand::thread_rng();
/// // The zero-weight entries can never win the draw.
/// let index = sample_index(&mut rng, &[0, 0, 7, 0]).unwrap();
/// assert_eq!(index, 2);
/// ```
pub fn sample_index<R: Rng + ?Sized>(rng: &mut R, weights: &[u64]) -> Result<usize, WeightedError> {
    let total: u64 = weights.iter().sum();
    if total == 0 {
        return Err(WeightedError::ZeroTotalWeight);
    }

    let roll = rng.gen_range(0..total);
    let mut accumulated = 0u64;
    for (index, &weight) in weights.iter().enumerate() {
        accumulated += weight;
        if roll < accumulated {
            return Ok(index);
        }
    }
    // Unreachable: roll < total and the accumulation reaches total.
    Ok(weights.len() - 1)
}

/// Draws `amount` indices with replacement, each with probability
/// proportional to its weight. The same index can appear multiple times.
///
/// Returns [`WeightedError::ZeroTotalWeight`] when no entry has a positive
/// weight, even for `amount == 0`: a draw from nothing is a caller bug that
/// should not pass silently.
pub fn sample_indices<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[u64],
    amount: usize,
) -> Result<Vec<usize>, WeightedError> {
    let mut cumulative = Vec::with_capacity(weights.len());
    let mut total = 0u64;
    for &weight in weights {
        total += weight;
        cumulative.push(total);
    }
    if total == 0 {
        return Err(WeightedError::ZeroTotalWeight);
    }

    let mut picks = Vec::with_capacity(amount);
    for _ in 0..amount {
        let roll = rng.gen_range(0..total);
        // First entry whose cumulative weight exceeds the roll. Zero-weight
        // entries can never be selected since they add nothing to the sum.
        picks.push(cumulative.partition_point(|&bound| bound <= roll));
    }
    Ok(picks)
}

/// Draws `amount` distinct indices, each with probability proportional to
/// its weight among the entries not yet taken.
///
/// Selection happens without replacement: after each draw the winner is
/// removed from the candidate set and the remaining weights are re-normalized
/// implicitly by shrinking the total.
pub fn sample_indices_unique<R: Rng + ?Sized>(
    rng: &mut R,
    weights: &[u64],
    amount: usize,
) -> Result<Vec<usize>, WeightedError> {
    let mut candidates: Vec<(usize, u64)> = weights
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, weight)| weight > 0)
        .collect();
    let mut total: u64 = candidates.iter().map(|&(_, weight)| weight).sum();

    if total == 0 {
        return Err(WeightedError::ZeroTotalWeight);
    }
    if candidates.len() < amount {
        return Err(WeightedError::NotEnoughCandidates {
            requested: amount,
            available: candidates.len(),
        });
    }

    let mut picks = Vec::with_capacity(amount);
    for _ in 0..amount {
        let roll = rng.gen_range(0..total);
        let mut accumulated = 0u64;
        let mut chosen_slot = candidates.len() - 1;
        for (slot, &(_, weight)) in candidates.iter().enumerate() {
            accumulated += weight;
            if roll < accumulated {
                chosen_slot = slot;
                break;
            }
        }
        let (index, weight) = candidates.swap_remove(chosen_slot);
        total -= weight;
        picks.push(index);
    }
    Ok(picks)
}
