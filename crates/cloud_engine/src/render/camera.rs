//! # Camera and frustum corners
//!
//! The cloud pass never rasterizes geometry. Each pixel's view ray is rebuilt
//! from the four far-plane corner directions, interpolated across the screen.
//!
//! ## Coordinate System
//! Right-handed, Y-up world space. `u` runs left to right and `v` bottom to
//! top, both in [0, 1].

use crate::foundation::math::{utils, Vec3};
use crate::geometry::Ray;

/// Perspective camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Width / height of the output
    /// * `near` - Near plane distance (must be > 0)
    /// * `far` - Far plane distance (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Aim at a point with a custom up vector
    pub fn look_at(mut self, target: Vec3, up: Vec3) -> Self {
        self.target = target;
        self.up = up;
        log::trace!("Camera looking at {:?}", target);
        self
    }

    /// Orthonormal (right, up, forward) basis
    ///
    /// Falls back to world Z as the reference up when the view direction is
    /// parallel to `up`, so looking straight down still yields a valid frame.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, 0.0, -1.0));
        let right = forward
            .cross(&self.up)
            .try_normalize(1e-6)
            .or_else(|| forward.cross(&Vec3::new(0.0, 0.0, -1.0)).try_normalize(1e-6))
            .unwrap_or_else(|| Vec3::new(1.0, 0.0, 0.0));
        let up = right.cross(&forward);
        (right, up, forward)
    }

    /// World-space directions from the camera to the far-plane corners
    pub fn frustum_corners(&self) -> FrustumCorners {
        let (right, up, forward) = self.basis();
        let half_height = self.far * (self.fov * 0.5).tan();
        let half_width = half_height * self.aspect;

        let centre = forward * self.far;
        let r = right * half_width;
        let u = up * half_height;

        FrustumCorners {
            bottom_left: centre - r - u,
            top_left: centre - r + u,
            top_right: centre + r + u,
            bottom_right: centre + r - u,
        }
    }
}

impl Default for Camera {
    /// Camera below the default cloud layer looking up and across it
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, -300.0), 60.0, 16.0 / 9.0, 0.3, 1000.0)
            .look_at(Vec3::new(0.0, 65.0, 0.0), Vec3::new(0.0, 1.0, 0.0))
    }
}

/// Far-plane corner directions, relative to the camera position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumCorners {
    /// Bottom-left corner direction
    pub bottom_left: Vec3,
    /// Top-left corner direction
    pub top_left: Vec3,
    /// Top-right corner direction
    pub top_right: Vec3,
    /// Bottom-right corner direction
    pub bottom_right: Vec3,
}

impl FrustumCorners {
    /// Bilinearly interpolated direction for screen coordinates in [0, 1]
    pub fn direction(&self, u: f32, v: f32) -> Vec3 {
        let bottom = self.bottom_left.lerp(&self.bottom_right, u);
        let top = self.top_left.lerp(&self.top_right, u);
        bottom.lerp(&top, v)
    }

    /// View ray through screen coordinates in [0, 1]
    pub fn ray(&self, origin: Vec3, u: f32, v: f32) -> Ray {
        Ray::new(origin, self.direction(u, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centre_direction_is_forward() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 90.0, 1.0, 0.1, 100.0);
        let corners = camera.frustum_corners();
        let centre = corners.direction(0.5, 0.5);
        assert_relative_eq!(centre, Vec3::new(0.0, 0.0, -100.0), epsilon = 1e-3);
    }

    #[test]
    fn test_corner_layout() {
        let camera = Camera::perspective(Vec3::zeros(), 90.0, 2.0, 0.1, 10.0)
            .look_at(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0));
        let corners = camera.frustum_corners();
        // tan(45) = 1, so the far plane spans +-20 horizontally and +-10 vertically
        assert_relative_eq!(corners.bottom_left, Vec3::new(-20.0, -10.0, -10.0), epsilon = 1e-4);
        assert_relative_eq!(corners.top_right, Vec3::new(20.0, 10.0, -10.0), epsilon = 1e-4);
        assert_relative_eq!(corners.direction(0.0, 1.0), corners.top_left, epsilon = 1e-5);
    }

    #[test]
    fn test_looking_straight_down_has_valid_basis() {
        let camera = Camera::perspective(Vec3::new(0.0, 200.0, 0.0), 60.0, 1.0, 0.1, 1000.0)
            .look_at(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
        let (right, up, forward) = camera.basis();
        assert_relative_eq!(forward, Vec3::new(0.0, -1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(right.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(up.norm(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(right.dot(&forward), 0.0, epsilon = 1e-6);
    }
}
