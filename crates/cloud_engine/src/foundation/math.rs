//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the scalar shaping functions the cloud
//! density and lighting models are written in.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with position and scale, no rotation
    pub fn from_position_scale(position: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            scale,
            ..Default::default()
        }
    }

    /// Create a transform with position, rotation and scale
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { position, rotation, scale }
    }

    /// Local-to-world matrix (translation * rotation * scale)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// World-to-local matrix, or `None` when the transform cannot be inverted
    ///
    /// Built from the decomposed parts rather than a general 4x4 inverse so
    /// that a valid transform round-trips without drift.
    pub fn inverse_matrix(&self) -> Option<Mat4> {
        if self.is_degenerate() {
            return None;
        }
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        Some(
            Mat4::new_nonuniform_scaling(&inv_scale)
                * self.rotation.inverse().to_homogeneous()
                * Mat4::new_translation(&-self.position),
        )
    }

    /// Scale is zero, negative or non-finite, or any component is NaN
    pub fn is_degenerate(&self) -> bool {
        let finite = self.position.iter().all(|v| v.is_finite())
            && self.rotation.coords.iter().all(|v| v.is_finite())
            && self.scale.iter().all(|v| v.is_finite());
        !finite || self.scale.iter().any(|&s| s <= 0.0)
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Clamp to [0, 1]
    pub fn saturate(value: f32) -> f32 {
        value.clamp(0.0, 1.0)
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Position of `value` between `a` and `b`, clamped to [0, 1]
    ///
    /// A zero-width interval acts as a step at `b`.
    pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
        let span = b - a;
        if span.abs() <= f32::EPSILON {
            return if value >= b { 1.0 } else { 0.0 };
        }
        saturate((value - a) / span)
    }

    /// Hermite smoothstep between two edges
    ///
    /// Exactly 0 at `edge0` and exactly 1 at `edge1`.
    pub fn smoothstep(edge0: f32, edge1: f32, value: f32) -> f32 {
        let t = inverse_lerp(edge0, edge1, value);
        t * t * (3.0 - 2.0 * t)
    }
}
