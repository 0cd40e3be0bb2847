//! View and light rays

use crate::foundation::math::Vec3;

/// A ray in world or container-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray (unit length, or zero for an unusable ray)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray, normalizing the direction
    ///
    /// A zero or non-finite direction yields a zero direction, which every
    /// intersection test treats as a miss.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction
            .try_normalize(f32::EPSILON)
            .filter(|d| d.iter().all(|v| v.is_finite()))
            .unwrap_or_else(Vec3::zeros);
        Self { origin, direction }
    }

    /// Creates a ray without touching the direction
    ///
    /// Used after an affine change of space, where keeping the direction's
    /// length keeps the ray parameter measured in the original space.
    pub fn unnormalized(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the ray can be intersected at all
    pub fn is_usable(&self) -> bool {
        self.origin.iter().chain(self.direction.iter()).all(|v| v.is_finite())
            && self.direction.norm_squared() > f32::EPSILON * f32::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_is_normalized() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, -10.0, 0.0));
        assert_relative_eq!(ray.direction, Vec3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(ray.point_at(3.0), Vec3::new(0.0, -3.0, 0.0));
    }

    #[test]
    fn test_zero_direction_is_unusable() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::zeros());
        assert!(!ray.is_usable());
        let nan = Ray::new(Vec3::zeros(), Vec3::new(f32::NAN, 1.0, 0.0));
        assert!(!nan.is_usable());
    }
}
