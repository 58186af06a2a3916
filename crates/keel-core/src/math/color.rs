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

//! Defines the `Rgba` color type and its blending operations.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// An RGBA color with `f32` components.
///
/// Components are stored exactly as given: hex strings and byte tuples round-trip
/// without any gamma conversion. Values outside `[0.0, 1.0]` are permitted so the
/// type can carry HDR intermediates; only the byte/hex conversions clamp.
///
/// `#[repr(C)]` ensures a consistent memory layout, which is important when passing
/// color data to graphics APIs.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Rgba {
    /// The red component.
    pub r: f32,
    /// The green component.
    pub g: f32,
    /// The blue component.
    pub b: f32,
    /// The alpha (opacity) component.
    pub a: f32,
}

/// The error returned when parsing a hex color string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorParseError {
    /// The string is not 6 or 8 hex digits long (after the optional `#`).
    BadLength(usize),
    /// The string contains a non-hexadecimal character.
    BadDigit,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::BadLength(len) => {
                write!(f, "expected 6 or 8 hex digits, got {len}")
            }
            ColorParseError::BadDigit => write!(f, "invalid hexadecimal digit"),
        }
    }
}

impl std::error::Error for ColorParseError {}

impl Rgba {
    // --- Common Color Constants ---

    /// Opaque red (`[1.0, 0.0, 0.0, 1.0]`).
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green (`[0.0, 1.0, 0.0, 1.0]`).
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue (`[0.0, 0.0, 1.0, 1.0]`).
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Opaque yellow (`[1.0, 1.0, 0.0, 1.0]`).
    pub const YELLOW: Self = Self::rgb(1.0, 1.0, 0.0);
    /// Opaque cyan (`[0.0, 1.0, 1.0, 1.0]`).
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    /// Opaque magenta (`[1.0, 0.0, 1.0, 1.0]`).
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `Rgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `Rgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

// --- Conversions ---
impl Rgba {
    /// Creates an `Rgba` from 8-bit channel values.
    #[inline]
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self {
            r: bytes[0] as f32 / 255.0,
            g: bytes[1] as f32 / 255.0,
            b: bytes[2] as f32 / 255.0,
            a: bytes[3] as f32 / 255.0,
        }
    }

    /// Converts the color to 8-bit channel values, clamping each component.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 4] {
        let quantize = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// Parses a hex color string (`#RRGGBB` or `#RRGGBBAA`, `#` optional).
    ///
    /// Channel bytes are normalized to `[0.0, 1.0]` verbatim.
    ///
    /// # Example
    /// ```
    /// use keel_core::math::color::Rgba;
    /// let color = Rgba::from_hex("#6495ED").unwrap();
    /// assert_eq!(color.to_hex(), "#6495EDFF");
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return Err(ColorParseError::BadDigit);
        }
        if hex.len() != 6 && hex.len() != 8 {
            return Err(ColorParseError::BadLength(hex.len()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map(|byte| byte as f32 / 255.0)
                .map_err(|_| ColorParseError::BadDigit)
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
            a: if hex.len() == 8 { channel(6..8)? } else { 1.0 },
        })
    }

    /// Formats the color as an uppercase `#RRGGBBAA` hex string, clamping each component.
    #[inline]
    pub fn to_hex(&self) -> String {
        let bytes = self.to_bytes();
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            bytes[0], bytes[1], bytes[2], bytes[3]
        )
    }
}

// --- Blending and Manipulation ---
impl Rgba {
    /// Returns a new color with the same RGB components but a different alpha.
    #[inline]
    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }

    /// Linearly interpolates between two colors.
    /// The factor `t` is clamped to `[0.0, 1.0]`.
    #[inline]
    pub fn lerp(start: Self, end: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            r: start.r + (end.r - start.r) * t,
            g: start.g + (end.g - start.g) * t,
            b: start.b + (end.b - start.b) * t,
            a: start.a + (end.a - start.a) * t,
        }
    }

    /// Composites this color over `background` using source-over alpha blending.
    ///
    /// Both colors use straight (non-premultiplied) alpha. A fully transparent
    /// result is `Rgba::TRANSPARENT`.
    pub fn over(&self, background: Self) -> Self {
        let src_a = self.a.clamp(0.0, 1.0);
        let dst_a = background.a.clamp(0.0, 1.0);
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }
        let blend = |src: f32, dst: f32| (src * src_a + dst * dst_a * (1.0 - src_a)) / out_a;
        Self {
            r: blend(self.r, background.r),
            g: blend(self.g, background.g),
            b: blend(self.b, background.b),
            a: out_a,
        }
    }

    /// Adds the RGB channels of two colors without clamping, keeping the larger alpha.
    #[inline]
    pub fn additive(&self, other: Self) -> Self {
        Self {
            r: self.r + other.r,
            g: self.g + other.g,
            b: self.b + other.b,
            a: self.a.max(other.a),
        }
    }

    /// Screen-blends the RGB channels of two colors, keeping the larger alpha.
    ///
    /// Screen is the inverse of multiply: the result is always at least as
    /// bright as either input.
    #[inline]
    pub fn screen(&self, other: Self) -> Self {
        let screen = |a: f32, b: f32| 1.0 - (1.0 - a) * (1.0 - b);
        Self {
            r: screen(self.r, other.r),
            g: screen(self.g, other.g),
            b: screen(self.b, other.b),
            a: self.a.max(other.a),
        }
    }

    /// Returns the color with its RGB channels multiplied by alpha.
    #[inline]
    pub fn premultiplied(&self) -> Self {
        Self {
            r: self.r * self.a,
            g: self.g * self.a,
            b: self.b * self.a,
            a: self.a,
        }
    }

    /// Computes the relative luminance using Rec. 709 weights.
    #[inline]
    pub fn luminance(&self) -> f32 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Returns the grayscale version of the color, preserving alpha.
    #[inline]
    pub fn to_grayscale(&self) -> Self {
        let l = self.luminance();
        Self {
            r: l,
            g: l,
            b: l,
            a: self.a,
        }
    }

    /// Returns the color with inverted RGB channels, preserving alpha.
    /// Assumes components in `[0.0, 1.0]`.
    #[inline]
    pub fn inverted(&self) -> Self {
        Self {
            r: 1.0 - self.r,
            g: 1.0 - self.g,
            b: 1.0 - self.b,
            a: self.a,
        }
    }
}

// --- Operator Overloads ---

impl Default for Rgba {
    /// Returns opaque white by default.
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

impl Add for Rgba {
    type Output = Self;
    /// Adds two colors component-wise.
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r + rhs.r,
            g: self.g + rhs.g,
            b: self.b + rhs.b,
            a: self.a + rhs.a,
        }
    }
}

impl Sub for Rgba {
    type Output = Self;
    /// Subtracts two colors component-wise.
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r - rhs.r,
            g: self.g - rhs.g,
            b: self.b - rhs.b,
            a: self.a - rhs.a,
        }
    }
}

impl Mul<f32> for Rgba {
    type Output = Self;
    /// Multiplies all components by a scalar.
    #[inline]
    fn mul(self, scalar: f32) -> Self::Output {
        Self {
            r: self.r * scalar,
            g: self.g * scalar,
            b: self.b * scalar,
            a: self.a * scalar,
        }
    }
}

impl Mul<Rgba> for f32 {
    type Output = Rgba;
    /// Multiplies a scalar by a color.
    #[inline]
    fn mul(self, color: Rgba) -> Self::Output {
        color * self
    }
}

impl Mul for Rgba {
    type Output = Self;
    /// Multiplies two colors component-wise (modulation).
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            r: self.r * rhs.r,
            g: self.g * rhs.g,
            b: self.b * rhs.b,
            a: self.a * rhs.a,
        }
    }
}

impl Div<f32> for Rgba {
    type Output = Self;
    /// Divides all components by a scalar.
    #[inline]
    fn div(self, scalar: f32) -> Self::Output {
        let inv_scalar = 1.0 / scalar;
        self * inv_scalar
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    fn color_approx_eq(a: Rgba, b: Rgba) -> bool {
        approx_eq(a.r, b.r) && approx_eq(a.g, b.g) && approx_eq(a.b, b.b) && approx_eq(a.a, b.a)
    }

    #[test]
    fn test_hex_round_trip() {
        let color = Rgba::from_hex("#FF5733FF").unwrap();
        assert!(approx_eq(color.r, 1.0));
        assert!(approx_eq(color.g, 0x57 as f32 / 255.0));
        assert!(approx_eq(color.b, 0x33 as f32 / 255.0));
        assert!(approx_eq(color.a, 1.0));
        assert_eq!(color.to_hex(), "#FF5733FF");

        // Without alpha digits and without the hash
        let short = Rgba::from_hex("6495ED").unwrap();
        assert!(approx_eq(short.a, 1.0));
        assert_eq!(short.to_hex(), "#6495EDFF");
    }

    #[test]
    fn test_hex_rejects_malformed_input() {
        assert_eq!(Rgba::from_hex("#FF57"), Err(ColorParseError::BadLength(4)));
        assert_eq!(Rgba::from_hex("#GG5733"), Err(ColorParseError::BadDigit));
        assert_eq!(Rgba::from_hex(""), Err(ColorParseError::BadLength(0)));
    }

    #[test]
    fn test_byte_round_trip() {
        let color = Rgba::from_bytes([255, 128, 0, 64]);
        assert_eq!(color.to_bytes(), [255, 128, 0, 64]);
        // Out-of-range components clamp instead of wrapping
        assert_eq!(Rgba::new(2.0, -1.0, 0.5, 1.0).to_bytes(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_lerp() {
        let mid = Rgba::lerp(Rgba::RED, Rgba::BLUE, 0.5);
        assert!(color_approx_eq(mid, Rgba::new(0.5, 0.0, 0.5, 1.0)));
        assert!(color_approx_eq(Rgba::lerp(Rgba::RED, Rgba::BLUE, 2.0), Rgba::BLUE));
    }

    #[test]
    fn test_over_opaque_source_wins() {
        let src = Rgba::RED;
        let dst = Rgba::BLUE;
        assert!(color_approx_eq(src.over(dst), src));
    }

    #[test]
    fn test_over_transparent_source_passes_through() {
        let src = Rgba::TRANSPARENT;
        let dst = Rgba::new(0.2, 0.4, 0.6, 0.8);
        assert!(color_approx_eq(src.over(dst), dst));
        assert_eq!(Rgba::TRANSPARENT.over(Rgba::TRANSPARENT), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_over_blends_half_transparent() {
        let src = Rgba::new(1.0, 0.0, 0.0, 0.5);
        let dst = Rgba::BLUE;
        let out = src.over(dst);
        assert!(color_approx_eq(out, Rgba::new(0.5, 0.0, 0.5, 1.0)));
    }

    #[test]
    fn test_additive_and_screen() {
        let a = Rgba::new(0.5, 0.5, 0.5, 0.5);
        let b = Rgba::new(0.5, 0.25, 0.0, 1.0);
        let sum = a.additive(b);
        assert!(color_approx_eq(sum, Rgba::new(1.0, 0.75, 0.5, 1.0)));

        let screened = a.screen(a);
        assert!(approx_eq(screened.r, 0.75));
        // Screen never darkens
        assert!(screened.r >= a.r);
        assert!(color_approx_eq(Rgba::BLACK.screen(b), Rgba::new(0.5, 0.25, 0.0, 1.0)));
    }

    #[test]
    fn test_premultiplied() {
        let c = Rgba::new(1.0, 0.5, 0.25, 0.5);
        assert!(color_approx_eq(
            c.premultiplied(),
            Rgba::new(0.5, 0.25, 0.125, 0.5)
        ));
    }

    #[test]
    fn test_luminance_and_grayscale() {
        assert!(approx_eq(Rgba::WHITE.luminance(), 1.0));
        assert!(approx_eq(Rgba::BLACK.luminance(), 0.0));
        assert!(approx_eq(Rgba::RED.luminance(), 0.2126));

        let gray = Rgba::GREEN.to_grayscale();
        assert!(approx_eq(gray.r, 0.7152));
        assert!(approx_eq(gray.r, gray.g));
        assert!(approx_eq(gray.g, gray.b));
        assert!(approx_eq(gray.a, 1.0));
    }

    #[test]
    fn test_inverted() {
        assert!(color_approx_eq(Rgba::WHITE.inverted(), Rgba::BLACK));
        let c = Rgba::new(0.25, 0.5, 1.0, 0.7);
        assert!(color_approx_eq(c.inverted(), Rgba::new(0.75, 0.5, 0.0, 0.7)));
    }

    #[test]
    fn test_operators() {
        let c1 = Rgba::new(0.2, 0.3, 0.4, 0.5);
        let c2 = Rgba::new(0.1, 0.1, 0.1, 0.1);
        assert!(color_approx_eq(c1 + c2, Rgba::new(0.3, 0.4, 0.5, 0.6)));
        assert!(color_approx_eq(c1 - c2, Rgba::new(0.1, 0.2, 0.3, 0.4)));
        assert!(color_approx_eq(c1 * 2.0, Rgba::new(0.4, 0.6, 0.8, 1.0)));
        assert!(color_approx_eq(2.0 * c1, c1 * 2.0));
        assert!(color_approx_eq(c1 * c2, Rgba::new(0.02, 0.03, 0.04, 0.05)));
        assert!(color_approx_eq((c1 * 2.0) / 2.0, c1));
    }

    #[test]
    fn test_default_is_white() {
        assert_eq!(Rgba::default(), Rgba::WHITE);
    }
}
