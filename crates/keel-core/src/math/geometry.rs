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

//! Provides geometric primitive shapes for spatial calculations.
//!
//! This module contains the structures used by collision queries, visibility
//! culling, and other spatial reasoning in gameplay code.

use super::{Vec3, Vec4, EPSILON};

/// Represents an Axis-Aligned Bounding Box (AABB).
///
/// An AABB is a rectangular prism aligned with the coordinate axes, defined by its
/// minimum and maximum corner points. It is a simple but highly efficient volume
/// for broad-phase collision detection and visibility culling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Aabb {
    /// The corner of the box with the smallest coordinates on all axes.
    pub min: Vec3,
    /// The corner of the box with the largest coordinates on all axes.
    pub max: Vec3,
}

impl Aabb {
    /// An invalid `Aabb` where `min` components are positive infinity and `max` are negative infinity.
    ///
    /// This is useful as a neutral starting point for merging operations. Merging any
    /// valid `Aabb` with `INVALID` will result in that valid `Aabb`.
    pub const INVALID: Self = Self {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    /// Creates a new `Aabb` from two corner points.
    ///
    /// This constructor automatically ensures that the `min` field holds the
    /// component-wise minimum and `max` holds the component-wise maximum,
    /// regardless of the order the points are passed in.
    #[inline]
    pub fn from_min_max(min_pt: Vec3, max_pt: Vec3) -> Self {
        Self {
            min: Vec3::new(
                min_pt.x.min(max_pt.x),
                min_pt.y.min(max_pt.y),
                min_pt.z.min(max_pt.z),
            ),
            max: Vec3::new(
                min_pt.x.max(max_pt.x),
                min_pt.y.max(max_pt.y),
                min_pt.z.max(max_pt.z),
            ),
        }
    }

    /// Creates a new `Aabb` from a center point and its half-extents.
    ///
    /// The half-extents represent the distance from the center to the faces of
    /// the box and are made non-negative.
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let safe_half_extents = half_extents.abs();
        Self {
            min: center - safe_half_extents,
            max: center + safe_half_extents,
        }
    }

    /// Creates a degenerate `Aabb` containing a single point (min and max are the same).
    #[inline]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Creates an `Aabb` that tightly encloses a given set of points.
    ///
    /// # Returns
    ///
    /// Returns `Some(Aabb)` if the input slice is not empty, otherwise `None`.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut aabb = Self::from_point(*first);
        for point in rest {
            aabb = aabb.merged_with_point(*point);
        }
        Some(aabb)
    }

    /// Calculates the center point of the `Aabb`.
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Calculates the half-extents (half the size on each axis) of the `Aabb`.
    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Calculates the full size (width, height, depth) of the `Aabb`.
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Checks if the `Aabb` is valid (i.e., `min` <= `max` on all axes).
    /// Degenerate boxes where `min == max` are considered valid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Checks if a point is contained within or on the boundary of the `Aabb`.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Checks if this `Aabb` intersects with another `Aabb`.
    ///
    /// Two `Aabb`s intersect if they overlap on all three axes. Boxes that only
    /// touch at the boundary are considered to be intersecting.
    #[inline]
    pub fn intersects_aabb(&self, other: &Aabb) -> bool {
        (self.min.x <= other.max.x && self.max.x >= other.min.x)
            && (self.min.y <= other.max.y && self.max.y >= other.min.y)
            && (self.min.z <= other.max.z && self.max.z >= other.min.z)
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and another one.
    #[inline]
    pub fn merge(&self, other: &Aabb) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }

    /// Creates a new `Aabb` that encompasses both this `Aabb` and an additional point.
    #[inline]
    pub fn merged_with_point(&self, point: Vec3) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(point.x),
                self.min.y.min(point.y),
                self.min.z.min(point.z),
            ),
            max: Vec3::new(
                self.max.x.max(point.x),
                self.max.y.max(point.y),
                self.max.z.max(point.z),
            ),
        }
    }

    /// Returns the point inside the box that is closest to `point`.
    /// A point already inside the box is returned unchanged.
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(self.min.x, self.max.x),
            point.y.clamp(self.min.y, self.max.y),
            point.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Returns the eight corner points of the box.
    ///
    /// The order is all min-z corners first, counter-clockwise from `min`,
    /// then the matching max-z corners.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
        ]
    }
}

impl Default for Aabb {
    /// Returns the default `Aabb`, which is `Aabb::INVALID`.
    #[inline]
    fn default() -> Self {
        Self::INVALID
    }
}

// --- Sphere ---

/// A sphere described by its center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Sphere {
    /// The center of the sphere in world space.
    pub center: Vec3,
    /// The radius of the sphere.
    pub radius: f32,
}

impl Sphere {
    /// Creates a new `Sphere`.
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Checks if a point lies within or on the surface of the sphere.
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }

    /// Checks if this sphere intersects another sphere.
    #[inline]
    pub fn intersects_sphere(&self, other: &Sphere) -> bool {
        let combined = self.radius + other.radius;
        self.center.distance_squared(other.center) <= combined * combined
    }

    /// Checks if this sphere intersects an `Aabb`.
    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let closest = aabb.closest_point(self.center);
        self.center.distance_squared(closest) <= self.radius * self.radius
    }
}

// --- Plane ---

/// An infinite plane in the form `normal . p + d = 0`.
///
/// Points with a positive signed distance lie on the side the normal points to.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Plane {
    /// The plane normal. Distances are metric only when this is unit length.
    pub normal: Vec3,
    /// The signed distance offset of the plane from the origin.
    pub d: f32,
}

impl Plane {
    /// Creates a new `Plane` from a normal and an offset.
    #[inline]
    pub const fn new(normal: Vec3, d: f32) -> Self {
        Self { normal, d }
    }

    /// Creates a plane passing through `point` with the given `normal`.
    #[inline]
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            d: -normal.dot(point),
        }
    }

    /// Reinterprets raw plane coefficients `(a, b, c, d)` as a plane.
    #[inline]
    pub fn from_vec4(coefficients: Vec4) -> Self {
        Self {
            normal: coefficients.truncate(),
            d: coefficients.w,
        }
    }

    /// Returns the plane scaled so its normal has unit length.
    /// A plane with a near-zero normal is returned unchanged.
    #[inline]
    pub fn normalized(&self) -> Self {
        let len = self.normal.length();
        if len > EPSILON {
            Self {
                normal: self.normal / len,
                d: self.d / len,
            }
        } else {
            *self
        }
    }

    /// Computes the signed distance from a point to the plane.
    #[inline]
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.d
    }
}

/// Returns the point on the segment `[a, b]` that is closest to `point`.
/// A degenerate segment (`a == b`) yields `a`.
#[inline]
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= EPSILON * EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq;

    fn vec3_approx_eq(a: Vec3, b: Vec3) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
    }

    #[test]
    fn test_aabb_from_min_max_reorders() {
        let aabb = Aabb::from_min_max(Vec3::new(4.0, 5.0, 6.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_aabb_from_points() {
        assert!(Aabb::from_points(&[]).is_none());

        let points = [
            Vec3::new(1.0, 5.0, -1.0),
            Vec3::new(0.0, 2.0, 3.0),
            Vec3::new(4.0, 8.0, 0.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Vec3::new(0.0, 2.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 8.0, 3.0));
    }

    #[test]
    fn test_aabb_utils() {
        let aabb = Aabb::from_min_max(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(3.0, 2.0, 5.0));
        assert!(vec3_approx_eq(aabb.center(), Vec3::new(1.0, 1.0, 3.0)));
        assert!(vec3_approx_eq(aabb.size(), Vec3::new(4.0, 2.0, 4.0)));
        assert!(vec3_approx_eq(aabb.half_extents(), Vec3::new(2.0, 1.0, 2.0)));
        assert!(aabb.is_valid());
        assert!(!Aabb::INVALID.is_valid());
        assert!(Aabb::from_point(Vec3::ZERO).is_valid());
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        // Boundary counts as inside
        assert!(aabb.contains_point(Vec3::ZERO));
        assert!(aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point(Vec3::new(1.1, 0.5, 0.5)));
        assert!(!aabb.contains_point(Vec3::new(0.5, -0.1, 0.5)));
    }

    #[test]
    fn test_aabb_intersects_aabb() {
        let aabb = Aabb::from_min_max(Vec3::ZERO, Vec3::new(2.0, 2.0, 2.0));
        let overlapping = Aabb::from_min_max(Vec3::ONE, Vec3::new(3.0, 3.0, 3.0));
        assert!(aabb.intersects_aabb(&overlapping));

        // Touching at a face still intersects
        let touching = Aabb::from_min_max(Vec3::new(2.0, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));
        assert!(aabb.intersects_aabb(&touching));

        let separate = Aabb::from_min_max(Vec3::new(2.1, 0.0, 0.0), Vec3::new(3.0, 2.0, 2.0));
        assert!(!aabb.intersects_aabb(&separate));
    }

    #[test]
    fn test_aabb_merge_and_invalid_identity() {
        let aabb1 = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let aabb2 = Aabb::from_min_max(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5));
        let merged = aabb1.merge(&aabb2);
        assert_eq!(merged.min, Vec3::ZERO);
        assert_eq!(merged.max, Vec3::new(1.5, 1.5, 1.5));

        // INVALID is the merge identity
        assert_eq!(Aabb::INVALID.merge(&aabb1), aabb1);
        let point = Vec3::new(-1.0, 0.5, 2.0);
        assert_eq!(
            Aabb::INVALID.merged_with_point(point),
            Aabb::from_point(point)
        );
    }

    #[test]
    fn test_aabb_closest_point() {
        let aabb = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let inside = Vec3::new(0.3, 0.4, 0.5);
        assert_eq!(aabb.closest_point(inside), inside);
        assert_eq!(
            aabb.closest_point(Vec3::new(2.0, -1.0, 0.5)),
            Vec3::new(1.0, 0.0, 0.5)
        );
    }

    #[test]
    fn test_aabb_corners() {
        let aabb = Aabb::from_min_max(Vec3::ZERO, Vec3::ONE);
        let corners = aabb.corners();
        assert_eq!(corners.len(), 8);
        for corner in corners {
            assert!(aabb.contains_point(corner));
        }
        assert!(corners.contains(&Vec3::ZERO));
        assert!(corners.contains(&Vec3::ONE));
        // The corners reconstruct the box exactly
        assert_eq!(Aabb::from_points(&corners).unwrap(), aabb);
    }

    #[test]
    fn test_sphere_contains_point() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0);
        assert!(sphere.contains_point(Vec3::new(1.0, 0.0, 0.0)));
        assert!(sphere.contains_point(Vec3::new(3.0, 0.0, 0.0))); // On the surface
        assert!(!sphere.contains_point(Vec3::new(3.1, 0.0, 0.0)));
    }

    #[test]
    fn test_sphere_intersections() {
        let a = Sphere::new(Vec3::ZERO, 1.0);
        let b = Sphere::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let c = Sphere::new(Vec3::new(3.0, 0.0, 0.0), 0.5);
        assert!(a.intersects_sphere(&b));
        assert!(!a.intersects_sphere(&c));

        let aabb = Aabb::from_min_max(Vec3::new(2.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0));
        assert!(!a.intersects_aabb(&aabb));
        assert!(Sphere::new(Vec3::new(1.5, 0.0, 0.0), 0.6).intersects_aabb(&aabb));
    }

    #[test]
    fn test_plane_distance() {
        // The XZ ground plane, normal up
        let ground = Plane::from_point_normal(Vec3::ZERO, Vec3::Y);
        assert!(approx_eq(ground.distance_to(Vec3::new(5.0, 3.0, -2.0)), 3.0));
        assert!(approx_eq(ground.distance_to(Vec3::new(0.0, -4.0, 0.0)), -4.0));
        assert!(approx_eq(ground.distance_to(Vec3::ZERO), 0.0));
    }

    #[test]
    fn test_plane_normalized() {
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), 4.0);
        let normalized = plane.normalized();
        assert!(vec3_approx_eq(normalized.normal, Vec3::Y));
        assert!(approx_eq(normalized.d, 2.0));
        // Signed distances agree after normalization
        assert!(approx_eq(normalized.distance_to(Vec3::new(0.0, 1.0, 0.0)), 3.0));
    }

    #[test]
    fn test_closest_point_on_segment() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);
        assert!(vec3_approx_eq(
            closest_point_on_segment(Vec3::new(3.0, 5.0, 0.0), a, b),
            Vec3::new(3.0, 0.0, 0.0)
        ));
        // Clamped to the endpoints
        assert!(vec3_approx_eq(
            closest_point_on_segment(Vec3::new(-2.0, 1.0, 0.0), a, b),
            a
        ));
        assert!(vec3_approx_eq(
            closest_point_on_segment(Vec3::new(12.0, 1.0, 0.0), a, b),
            b
        ));
        // Degenerate segment
        assert_eq!(closest_point_on_segment(Vec3::ONE, a, a), a);
    }
}
