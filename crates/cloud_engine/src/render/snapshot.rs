//! Frozen per-frame evaluator input

use super::bundle::ParameterBundle;
use super::camera::FrustumCorners;
use super::light::SunLight;
use crate::foundation::math::Vec3;
use crate::geometry::{ContainerGeometry, Ray};

/// Everything a pixel evaluation reads, captured once per frame
///
/// Built by the frame assembler and never mutated afterwards; moving the
/// container mid-frame only shows up in the next snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Resolved settings
    pub params: ParameterBundle,
    /// Container matrices and bounds
    pub container: ContainerGeometry,
    /// Camera position in world space
    pub camera_position: Vec3,
    /// Far-plane corner directions
    pub frustum: FrustumCorners,
    /// Sun
    pub sun: SunLight,
    /// Seconds since start, used for wind
    pub time: f32,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Sequence number of this frame
    pub frame_index: u64,
}

impl FrameSnapshot {
    /// Screen coordinates of a pixel centre, `v` pointing up
    pub fn pixel_uv(&self, x: u32, y: u32) -> (f32, f32) {
        let u = (x as f32 + 0.5) / self.width as f32;
        let v = 1.0 - (y as f32 + 0.5) / self.height as f32;
        (u, v)
    }

    /// View ray through a pixel centre (row 0 is the top of the image)
    pub fn view_ray(&self, x: u32, y: u32) -> Ray {
        let (u, v) = self.pixel_uv(x, y);
        self.frustum.ray(self.camera_position, u, v)
    }
}
