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

//! Camera projection parameters and visibility queries.
//!
//! [`Camera`] stores projection settings only; where the camera sits in the
//! world is the caller's business and enters through a view matrix. The
//! `can_see_*` helpers combine both into a frustum test in one call.

use crate::math::{Aabb, Frustum, Mat4, Sphere, Vec3};
use serde::{Deserialize, Serialize};

/// Defines the type of camera projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// Perspective projection with field of view.
    Perspective {
        /// The vertical field of view in radians.
        fov_y_radians: f32,
    },
    /// Orthographic projection with view bounds.
    Orthographic {
        /// The width of the orthographic view volume.
        width: f32,
        /// The height of the orthographic view volume.
        height: f32,
    },
}

/// A camera's projection parameters.
///
/// Supports both perspective and orthographic projections and produces
/// matrices for a right-handed coordinate system with a `[0, 1]` depth range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// The type of projection (perspective or orthographic).
    pub projection: Projection,

    /// The aspect ratio of the viewport (width / height).
    /// This is typically updated when the window is resized.
    pub aspect_ratio: f32,

    /// The distance to the near clipping plane.
    /// Should be a small positive value (e.g., 0.1) for perspective cameras.
    pub z_near: f32,

    /// The distance to the far clipping plane.
    /// Should be larger than `z_near` (e.g., 1000.0).
    pub z_far: f32,
}

impl Camera {
    /// Creates a new perspective camera with the given parameters.
    pub fn new_perspective(fov_y_radians: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            projection: Projection::Perspective { fov_y_radians },
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a new orthographic camera with the given parameters.
    pub fn new_orthographic(width: f32, height: f32, z_near: f32, z_far: f32) -> Self {
        let aspect_ratio = if height > 0.0 { width / height } else { 1.0 };
        Self {
            projection: Projection::Orthographic { width, height },
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a default perspective camera suitable for most 3D applications.
    ///
    /// - FOV: 60 degrees (~1.047 radians)
    /// - Aspect ratio: 16:9 (~1.777)
    /// - Near plane: 0.1
    /// - Far plane: 1000.0
    pub fn default_perspective() -> Self {
        Self::new_perspective(60.0_f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
    }

    /// Creates a default orthographic camera.
    ///
    /// - Width: 1920.0
    /// - Height: 1080.0
    /// - Near plane: -1.0
    /// - Far plane: 1000.0
    pub fn default_orthographic() -> Self {
        Self::new_orthographic(1920.0, 1080.0, -1.0, 1000.0)
    }

    /// Calculates the projection matrix for this camera.
    ///
    /// This uses a right-handed coordinate system with a [0, 1] depth range,
    /// which is standard for modern rendering APIs like Vulkan and WebGPU.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y_radians } => {
                Mat4::perspective_rh_zo(fov_y_radians, self.aspect_ratio, self.z_near, self.z_far)
            }
            Projection::Orthographic { width, height } => {
                let half_width = width / 2.0;
                let half_height = height / 2.0;
                Mat4::orthographic_rh_zo(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.z_near,
                    self.z_far,
                )
            }
        }
    }

    /// Updates the aspect ratio, typically called when the window is resized.
    pub fn set_aspect_ratio(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect_ratio = width as f32 / height as f32;
        }
    }

    /// Combines this camera's projection with a view matrix.
    pub fn view_projection(&self, view: &Mat4) -> Mat4 {
        self.projection_matrix() * *view
    }

    /// Builds the view frustum for this camera at the pose described by `view`.
    pub fn frustum(&self, view: &Mat4) -> Frustum {
        Frustum::from_view_proj(&self.view_projection(view))
    }

    /// Checks whether a world-space point falls inside the camera's view.
    pub fn can_see_point(&self, view: &Mat4, point: Vec3) -> bool {
        self.frustum(view).contains_point(point)
    }

    /// Checks whether any part of a sphere falls inside the camera's view.
    pub fn can_see_sphere(&self, view: &Mat4, sphere: &Sphere) -> bool {
        self.frustum(view).intersects_sphere(sphere)
    }

    /// Checks whether any part of a bounding box falls inside the camera's view.
    pub fn can_see_aabb(&self, view: &Mat4, aabb: &Aabb) -> bool {
        self.frustum(view).intersects_aabb(aabb)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::default_perspective()
    }
}
