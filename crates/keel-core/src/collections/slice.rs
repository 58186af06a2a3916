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

//! Extension traits that add weighted selection, statistics, and parallel
//! search to plain slices.

use crate::math::stats;
use crate::random::weighted::{self, WeightedError};
use rand::Rng;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

/// Slices shorter than this are searched sequentially; threads cost more
/// than they save on small inputs.
const PARALLEL_SEARCH_THRESHOLD: usize = 4096;

/// How often a search worker re-checks whether an earlier chunk already won.
const EARLY_EXIT_STRIDE: usize = 1024;

// --- SliceRandomExt ---

/// Weighted random selection over slice elements.
///
/// The weight of each element is supplied by a selector closure, so the same
/// slice can be drawn from under different weighting schemes without copies.
pub trait SliceRandomExt {
    /// The element type of the slice.
    type Item;

    /// Picks one element, with probability proportional to its weight.
    fn choose_weighted<R, F>(&self, rng: &mut R, weight: F) -> Result<&Self::Item, WeightedError>
    where
        R: Rng + ?Sized,
        F: FnMut(&Self::Item) -> u64;

    /// Picks `amount` elements with replacement. The same element can be
    /// returned several times.
    fn choose_weighted_multiple<R, F>(
        &self,
        rng: &mut R,
        weight: F,
        amount: usize,
    ) -> Result<Vec<&Self::Item>, WeightedError>
    where
        R: Rng + ?Sized,
        F: FnMut(&Self::Item) -> u64;

    /// Picks `amount` distinct elements without replacement.
    ///
    /// Fails with [`WeightedError::NotEnoughCandidates`] when fewer than
    /// `amount` elements carry a positive weight.
    fn choose_weighted_unique<R, F>(
        &self,
        rng: &mut R,
        weight: F,
        amount: usize,
    ) -> Result<Vec<&Self::Item>, WeightedError>
    where
        R: Rng + ?Sized,
        F: FnMut(&Self::Item) -> u64;
}

impl<T> SliceRandomExt for [T] {
    type Item = T;

    fn choose_weighted<R, F>(&self, rng: &mut R, mut weight: F) -> Result<&T, WeightedError>
    where
        R: Rng + ?Sized,
        F: FnMut(&T) -> u64,
    {
        let weights: Vec<u64> = self.iter().map(&mut weight).collect();
        let index = weighted::sample_index(rng, &weights)?;
        Ok(&self[index])
    }

    fn choose_weighted_multiple<R, F>(
        &self,
        rng: &mut R,
        mut weight: F,
        amount: usize,
    ) -> Result<Vec<&T>, WeightedError>
    where
        R: Rng + ?Sized,
        F: FnMut(&T) -> u64,
    {
        let weights: Vec<u64> = self.iter().map(&mut weight).collect();
        let picks = weighted::sample_indices(rng, &weights, amount)?;
        Ok(picks.into_iter().map(|index| &self[index]).collect())
    }

    fn choose_weighted_unique<R, F>(
        &self,
        rng: &mut R,
        mut weight: F,
        amount: usize,
    ) -> Result<Vec<&T>, WeightedError>
    where
        R: Rng + ?Sized,
        F: FnMut(&T) -> u64,
    {
        let weights: Vec<u64> = self.iter().map(&mut weight).collect();
        let picks = weighted::sample_indices_unique(rng, &weights, amount)?;
        Ok(picks.into_iter().map(|index| &self[index]).collect())
    }
}

// --- SliceStatsExt ---

/// Descriptive statistics over numeric slices.
///
/// Implemented for every element type that converts losslessly into `f64`,
/// which covers `f32`, `f64`, and integers up to 32 bits.
pub trait SliceStatsExt {
    /// The arithmetic mean, or `None` for an empty slice.
    fn mean(&self) -> Option<f64>;

    /// The median, or `None` for an empty slice.
    fn median(&self) -> Option<f64>;
}

impl<T: Copy + Into<f64>> SliceStatsExt for [T] {
    fn mean(&self) -> Option<f64> {
        let values: Vec<f64> = self.iter().map(|&v| v.into()).collect();
        stats::mean(&values)
    }

    fn median(&self) -> Option<f64> {
        let values: Vec<f64> = self.iter().map(|&v| v.into()).collect();
        stats::median(&values)
    }
}

// --- SliceSearchExt ---

/// Multi-threaded predicate search.
pub trait SliceSearchExt {
    /// The element type of the slice.
    type Item;

    /// Finds the index of the first element matching `predicate`.
    ///
    /// Large slices are split across threads, one chunk per core. Workers
    /// race on a shared atomic that tracks the best hit so far, so chunks
    /// past a known hit stop early. Regardless of which worker wins, the
    /// returned index is always the lowest match in the slice, identical to
    /// what a sequential scan would find.
    fn find_index_parallel<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&Self::Item) -> bool + Sync,
        Self::Item: Sync;
}

impl<T> SliceSearchExt for [T] {
    type Item = T;

    fn find_index_parallel<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&T) -> bool + Sync,
        T: Sync,
    {
        if self.len() < PARALLEL_SEARCH_THRESHOLD {
            return self.iter().position(predicate);
        }

        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let chunk_size = self.len().div_ceil(workers);
        let best = AtomicUsize::new(usize::MAX);

        thread::scope(|scope| {
            for (chunk_index, chunk) in self.chunks(chunk_size).enumerate() {
                let chunk_start = chunk_index * chunk_size;
                let best = &best;
                let predicate = &predicate;

                scope.spawn(move || {
                    for (offset, item) in chunk.iter().enumerate() {
                        // A hit in an earlier chunk makes the rest of this
                        // chunk irrelevant.
                        if offset % EARLY_EXIT_STRIDE == 0
                            && best.load(Ordering::Relaxed) < chunk_start
                        {
                            return;
                        }
                        if predicate(item) {
                            // Each worker reports its first local hit; the
                            // minimum across workers is the global first.
                            best.fetch_min(chunk_start + offset, Ordering::Relaxed);
                            return;
                        }
                    }
                });
            }
        });

        match best.load(Ordering::Relaxed) {
            usize::MAX => None,
            index => Some(index),
        }
    }
}
