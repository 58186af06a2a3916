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

//! Logger setup built on `env_logger`.
//!
//! All initializers are idempotent: the first call installs the logger and
//! later calls are ignored, so libraries and tests can call them without
//! coordinating who goes first. `RUST_LOG` always wins over the defaults
//! passed here.

use env_logger::Env;

/// Initializes logging with an `info` default level.
pub fn init() {
    init_with_filter("info");
}

/// Initializes logging with the given default filter, e.g. `"debug"` or
/// `"warn,keel_core=trace"`.
pub fn init_with_filter(filter: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(filter)).try_init();
}

/// Initializes logging for test binaries.
///
/// Routes output through the test harness so it is captured per test, with
/// a `debug` default level.
pub fn init_for_tests() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("debug"))
        .is_test(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_for_tests();
        init_for_tests();
        init();
        init_with_filter("trace");
        log::debug!("logging initialized for tests");
    }
}
