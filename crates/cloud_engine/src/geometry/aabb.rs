//! Axis-aligned box and the slab intersection test

use super::ray::Ray;
use crate::foundation::math::Vec3;

/// Smallest direction component magnitude the slab test divides by
pub const SLAB_EPSILON: f32 = 1e-8;

/// Entry and exit distances of a ray through a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayBoxHit {
    /// Distance to the entry face, clamped to 0 when the origin is inside
    pub near: f32,
    /// Distance to the exit face
    pub far: f32,
}

impl RayBoxHit {
    /// Length of the ray segment inside the box
    pub fn length(&self) -> f32 {
        self.far - self.near
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The unit cube centred on the origin, `[-0.5, 0.5]` on every axis
    pub fn unit_centered() -> Self {
        Self::new(Vec3::repeat(-0.5), Vec3::repeat(0.5))
    }

    /// Slab test
    ///
    /// Returns the distances at which the ray enters and leaves the box, or
    /// `None` when the box lies entirely behind the ray or is missed. Near
    /// direction components are replaced by `±SLAB_EPSILON` before taking the
    /// reciprocal, so axis-parallel rays never produce NaN.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayBoxHit> {
        if !ray.is_usable() {
            return None;
        }

        let guarded = |d: f32| {
            if d.abs() < SLAB_EPSILON {
                1.0 / SLAB_EPSILON.copysign(d)
            } else {
                1.0 / d
            }
        };
        let inv_dir = ray.direction.map(guarded);

        let t0 = (self.min - ray.origin).component_mul(&inv_dir);
        let t1 = (self.max - ray.origin).component_mul(&inv_dir);

        let t_min = t0.inf(&t1);
        let t_max = t0.sup(&t1);

        let entry = t_min.max();
        let exit = t_max.min();

        if !entry.is_finite() || !exit.is_finite() {
            return None;
        }

        let near = entry.max(0.0);
        if exit < near {
            return None;
        }
        Some(RayBoxHit { near, far: exit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cloud_layer() -> Aabb {
        Aabb::new(Vec3::new(-250.0, 50.0, -250.0), Vec3::new(250.0, 80.0, 250.0))
    }

    #[test]
    fn test_ray_from_above_hits_layer() {
        let ray = Ray::new(Vec3::new(0.0, 200.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let hit = cloud_layer().intersect_ray(&ray).unwrap();
        assert_relative_eq!(hit.near, 120.0, epsilon = 1e-3);
        assert_relative_eq!(hit.far, 150.0, epsilon = 1e-3);
        assert_relative_eq!(hit.length(), 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_origin_inside_clamps_near_to_zero() {
        let ray = Ray::new(Vec3::new(0.0, 60.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let hit = cloud_layer().intersect_ray(&ray).unwrap();
        assert_eq!(hit.near, 0.0);
        assert_relative_eq!(hit.far, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_box_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 200.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(cloud_layer().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_axis_parallel_ray_inside_slab() {
        // Horizontal ray at cloud height: y component exactly zero
        let ray = Ray::new(Vec3::new(-1000.0, 65.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = cloud_layer().intersect_ray(&ray).unwrap();
        assert_relative_eq!(hit.near, 750.0, epsilon = 1e-2);
        assert_relative_eq!(hit.far, 1250.0, epsilon = 1e-2);
    }

    #[test]
    fn test_axis_parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Vec3::new(-1000.0, 10.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(cloud_layer().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_on_face_plane_does_not_produce_nan() {
        // Origin lies exactly on the min-y plane with zero y direction
        let ray = Ray::new(Vec3::new(-1000.0, 50.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        if let Some(hit) = cloud_layer().intersect_ray(&ray) {
            assert!(hit.near.is_finite() && hit.far.is_finite());
        }
    }
}
