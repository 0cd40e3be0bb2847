//! Sun light

use crate::foundation::math::Vec3;

/// Directional light that illuminates the clouds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunLight {
    /// Direction the light travels (normalized), e.g. downward for a noon sun
    pub direction: Vec3,
    /// Light color (linear RGB)
    pub color: Vec3,
    /// Light intensity
    pub intensity: f32,
}

impl SunLight {
    /// Create a directional light
    pub fn directional(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction: direction
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(|| Vec3::new(0.0, -1.0, 0.0)),
            color,
            intensity,
        }
    }

    /// Unit vector from a lit point toward the sun
    pub fn to_sun(&self) -> Vec3 {
        -self.direction
    }

    /// Color scaled by intensity
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

impl Default for SunLight {
    /// Outdoor daylight sun
    fn default() -> Self {
        Self::directional(Vec3::new(-0.2, -1.0, -0.3), Vec3::new(1.0, 1.0, 0.9), 1.0)
    }
}
