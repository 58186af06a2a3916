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

//! Randomized selection utilities.
//!
//! The sampling functions are generic over [`rand::Rng`], so callers pick the
//! generator: `thread_rng()` in gameplay code, a seeded `StdRng` wherever
//! reproducibility matters.

pub mod weighted;

pub use weighted::{sample_index, sample_indices, sample_indices_unique, WeightedError};
