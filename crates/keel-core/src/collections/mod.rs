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

//! Collection helpers: slice extension traits, an observable map, and a
//! stepped float range.

pub mod observable;
pub mod range;
pub mod slice;

pub use observable::{MapEvent, ObservableMap};
pub use range::{float_range, FloatRange};
pub use slice::{SliceRandomExt, SliceSearchExt, SliceStatsExt};
