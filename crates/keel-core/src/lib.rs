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

//! # Keel Core
//!
//! Foundational gameplay utilities: math and geometry, weighted random
//! sampling, collection and string extensions, object pooling, and
//! name-based field access.

#![warn(missing_docs)]

pub mod access;
pub mod camera;
pub mod collections;
pub mod fs;
pub mod math;
pub mod pool;
pub mod random;
pub mod text;
pub mod time;

pub use camera::Camera;
pub use time::Stopwatch;
