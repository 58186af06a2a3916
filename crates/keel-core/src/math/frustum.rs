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

//! View frustum extraction and containment queries.
//!
//! A [`Frustum`] is extracted from a combined view-projection matrix and used to
//! answer "can the camera see this?" questions against points, spheres, and
//! bounding boxes. All tests are conservative: geometry touching a clipping
//! plane counts as visible.

use super::{Aabb, Mat4, Plane, Sphere, Vec3};

/// A camera view frustum described by six inward-facing clipping planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// The clipping planes in the order left, right, bottom, top, near, far.
    /// Every normal points into the frustum volume and is unit length.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the six clipping planes from a combined view-projection matrix.
    ///
    /// The planes are recovered from row combinations of the matrix and then
    /// normalized, so the signed distances they report are metric. The matrix
    /// is expected to map onto the `[0, 1]` clip depth range, which is what
    /// [`Mat4::perspective_rh_zo`] and [`Mat4::orthographic_rh_zo`] produce.
    pub fn from_view_proj(view_proj: &Mat4) -> Self {
        let row0 = view_proj.get_row(0);
        let row1 = view_proj.get_row(1);
        let row2 = view_proj.get_row(2);
        let row3 = view_proj.get_row(3);

        Self {
            planes: [
                Plane::from_vec4(row3 + row0).normalized(), // left
                Plane::from_vec4(row3 - row0).normalized(), // right
                Plane::from_vec4(row3 + row1).normalized(), // bottom
                Plane::from_vec4(row3 - row1).normalized(), // top
                Plane::from_vec4(row2).normalized(),        // near ([0, 1] depth)
                Plane::from_vec4(row3 - row2).normalized(), // far
            ],
        }
    }

    /// Checks whether a point lies inside the frustum.
    /// Points exactly on a plane are treated as inside.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to(point) >= 0.0)
    }

    /// Checks whether a sphere is at least partially inside the frustum.
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to(sphere.center) >= -sphere.radius)
    }

    /// Checks whether an `Aabb` is at least partially inside the frustum.
    ///
    /// Uses the positive-vertex test: for each plane, only the box corner
    /// furthest along the plane normal is examined. If that corner is behind
    /// any plane the whole box is outside.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.planes.iter().all(|plane| {
            let positive_vertex = Vec3::new(
                if plane.normal.x >= 0.0 {
                    aabb.max.x
                } else {
                    aabb.min.x
                },
                if plane.normal.y >= 0.0 {
                    aabb.max.y
                } else {
                    aabb.min.y
                },
                if plane.normal.z >= 0.0 {
                    aabb.max.z
                } else {
                    aabb.min.z
                },
            );
            plane.distance_to(positive_vertex) >= 0.0
        })
    }
}
