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

//! Provides foundational mathematics primitives for gameplay code.
//!
//! This module contains vectors, a column-major 4x4 matrix, colors, bounding
//! volumes, frustum culling, and a set of scalar helpers (interpolation,
//! wrapping, snapping) that gameplay systems reach for constantly.
//!
//! All angular functions in this module operate in **radians** by default,
//! unless explicitly specified otherwise (e.g., `degrees_to_radians`).

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f32 = 1e-5;

// Re-export standard mathematical constants for convenience.
pub use std::f32::consts::{
    E, FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6, FRAC_PI_8, LN_10, LN_2, LOG10_E, LOG2_E, PI,
    SQRT_2, TAU,
};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f32 = PI / 180.0;
/// The factor to convert radians to degrees (180.0 / PI).
pub const RAD_TO_DEG: f32 = 180.0 / PI;

// --- Declare Sub-Modules ---

pub mod color;
pub mod frustum;
pub mod geometry;
pub mod matrix;
pub mod stats;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::color::Rgba;
pub use self::frustum::Frustum;
pub use self::geometry::{Aabb, Plane, Sphere};
pub use self::matrix::Mat4;
pub use self::stats::Summary;
pub use self::vector::{Vec2, Vec3, Vec4};

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use keel_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * DEG_TO_RAD
}

/// Converts an angle from radians to degrees.
///
/// # Examples
///
/// ```
/// use keel_core::math::{radians_to_degrees, PI};
/// assert_eq!(radians_to_degrees(PI), 180.0);
/// ```
#[inline]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * RAD_TO_DEG
}

/// Clamps a value to a specified minimum and maximum range.
///
/// # Examples
///
/// ```
/// use keel_core::math::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
/// assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
/// ```
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min_val: T, max_val: T) -> T {
    if value < min_val {
        min_val
    } else if value > max_val {
        max_val
    } else {
        value
    }
}

/// Clamps a floating-point value to the `[0.0, 1.0]` range.
///
/// # Examples
///
/// ```
/// use keel_core::math::saturate;
/// assert_eq!(saturate(1.5), 1.0);
/// assert_eq!(saturate(-0.5), 0.0);
/// ```
#[inline]
pub fn saturate(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Performs an approximate equality comparison between two floats with a custom tolerance.
///
/// # Examples
///
/// ```
/// use keel_core::math::approx_eq_eps;
/// assert!(approx_eq_eps(0.001, 0.002, 1e-2));
/// assert!(!approx_eq_eps(0.001, 0.002, 1e-4));
/// ```
#[inline]
pub fn approx_eq_eps(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Performs an approximate equality comparison using the module's default [`EPSILON`].
///
/// # Examples
///
/// ```
/// use keel_core::math::{approx_eq, EPSILON};
/// assert!(approx_eq(1.0, 1.0 + EPSILON / 2.0));
/// assert!(!approx_eq(1.0, 1.0 + EPSILON * 2.0));
/// ```
#[inline]
pub fn approx_eq(a: f32, b: f32) -> bool {
    approx_eq_eps(a, b, EPSILON)
}

/// Linearly interpolates between `a` and `b` with `t` clamped to `[0.0, 1.0]`.
///
/// # Examples
///
/// ```
/// use keel_core::math::lerp;
/// assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
/// assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
/// ```
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * saturate(t)
}

/// Linearly interpolates between `a` and `b` without clamping `t`.
///
/// # Examples
///
/// ```
/// use keel_core::math::lerp_unclamped;
/// assert_eq!(lerp_unclamped(0.0, 10.0, 1.5), 15.0);
/// ```
#[inline]
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Computes where `value` sits between `a` and `b`, clamped to `[0.0, 1.0]`.
///
/// Returns `0.0` when `a` and `b` are approximately equal.
///
/// # Examples
///
/// ```
/// use keel_core::math::inverse_lerp;
/// assert_eq!(inverse_lerp(0.0, 10.0, 2.5), 0.25);
/// assert_eq!(inverse_lerp(0.0, 10.0, 20.0), 1.0);
/// ```
#[inline]
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if approx_eq(a, b) {
        0.0
    } else {
        saturate((value - a) / (b - a))
    }
}

/// Remaps `value` from the `[from_min, from_max]` range into `[to_min, to_max]`.
///
/// The result is clamped to the target range.
///
/// # Examples
///
/// ```
/// use keel_core::math::remap;
/// assert_eq!(remap(5.0, 0.0, 10.0, 0.0, 100.0), 50.0);
/// assert_eq!(remap(-5.0, 0.0, 10.0, 0.0, 100.0), 0.0);
/// ```
#[inline]
pub fn remap(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    lerp_unclamped(to_min, to_max, inverse_lerp(from_min, from_max, value))
}

/// Moves `current` towards `target` by at most `max_delta`, without overshooting.
///
/// A negative `max_delta` moves away from the target.
///
/// # Examples
///
/// ```
/// use keel_core::math::move_towards;
/// assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
/// assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
/// ```
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Hermite-smoothed interpolation of `x` between the edges, returning `[0.0, 1.0]`.
///
/// Equal edges degenerate to a step at `edge0`.
///
/// # Examples
///
/// ```
/// use keel_core::math::smooth_step;
/// assert_eq!(smooth_step(0.0, 1.0, 0.0), 0.0);
/// assert_eq!(smooth_step(0.0, 1.0, 0.5), 0.5);
/// assert_eq!(smooth_step(0.0, 1.0, 1.0), 1.0);
/// ```
#[inline]
pub fn smooth_step(edge0: f32, edge1: f32, x: f32) -> f32 {
    if approx_eq(edge0, edge1) {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = saturate((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

/// Loops `t` so it never exceeds `length` and never goes below zero.
///
/// Returns `0.0` for a non-positive `length`.
///
/// # Examples
///
/// ```
/// use keel_core::math::repeat;
/// assert_eq!(repeat(5.5, 2.0), 1.5);
/// assert_eq!(repeat(-0.5, 2.0), 1.5);
/// ```
#[inline]
pub fn repeat(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    clamp(t - (t / length).floor() * length, 0.0, length)
}

/// Ping-pongs `t` between `0.0` and `length`.
///
/// # Examples
///
/// ```
/// use keel_core::math::ping_pong;
/// assert_eq!(ping_pong(1.5, 1.0), 0.5);
/// assert_eq!(ping_pong(2.25, 1.0), 0.25);
/// ```
#[inline]
pub fn ping_pong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    length - (repeat(t, length * 2.0) - length).abs()
}

/// Normalizes an angle in radians to the `[-PI, PI)` range.
///
/// # Examples
///
/// ```
/// use keel_core::math::{wrap_angle, PI};
/// assert!((wrap_angle(3.0 * PI) - (-PI)).abs() < 1e-6);
/// assert_eq!(wrap_angle(0.0), 0.0);
/// ```
#[inline]
pub fn wrap_angle(radians: f32) -> f32 {
    (radians + PI).rem_euclid(TAU) - PI
}

/// Snaps `value` to the nearest multiple of `step`.
///
/// A zero `step` returns the value unchanged.
///
/// # Examples
///
/// ```
/// use keel_core::math::snap;
/// assert_eq!(snap(7.3, 2.5), 7.5);
/// assert_eq!(snap(-1.2, 0.5), -1.0);
/// ```
#[inline]
pub fn snap(value: f32, step: f32) -> f32 {
    if step == 0.0 {
        value
    } else {
        (value / step).round() * step
    }
}
