//! The oriented box clouds live in
//!
//! A container is a transform applied to the unit cube `[-0.5, 0.5]^3`. The
//! scene owns and edits [`CloudContainer`]; once per frame it is resolved into
//! a [`ContainerGeometry`] that the evaluator reads.

use super::aabb::{Aabb, RayBoxHit};
use super::ray::Ray;
use crate::foundation::math::{Mat4, Point3, Transform, Vec3};

/// Scene-side cloud volume description
#[derive(Debug, Clone, PartialEq)]
pub struct CloudContainer {
    /// Position, rotation and size of the box
    pub transform: Transform,
}

impl CloudContainer {
    /// Wrap an existing transform
    pub fn new(transform: Transform) -> Self {
        Self { transform }
    }

    /// Axis-aligned container spanning two world corners
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        Self::new(Transform::from_position_scale((min + max) * 0.5, max - min))
    }

    /// Any axis has zero, negative or non-finite extent
    pub fn is_degenerate(&self) -> bool {
        self.transform.is_degenerate()
    }

    /// World-space bounds as position ± scale / 2
    ///
    /// Rotation is ignored here; this is what gets handed to the GPU as the
    /// coarse bounds, while intersection always goes through the full
    /// world-to-local transform.
    pub fn world_bounds(&self) -> Aabb {
        let half = self.transform.scale * 0.5;
        Aabb::new(self.transform.position - half, self.transform.position + half)
    }

    /// Resolve into per-frame geometry
    pub fn geometry(&self) -> ContainerGeometry {
        match self.transform.inverse_matrix() {
            Some(world_to_local) => ContainerGeometry {
                world_to_local,
                local_to_world: self.transform.to_matrix(),
                bounds: self.world_bounds(),
                scale: self.transform.scale,
                valid: true,
            },
            None => ContainerGeometry::degenerate(),
        }
    }
}

/// Frame-frozen container matrices and bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    /// World to container-local space
    pub world_to_local: Mat4,
    /// Container-local to world space
    pub local_to_world: Mat4,
    /// Axis-aligned world bounds (position ± scale / 2)
    pub bounds: Aabb,
    /// World-space edge lengths of the box
    pub scale: Vec3,
    valid: bool,
}

impl ContainerGeometry {
    /// Geometry that every ray misses
    pub fn degenerate() -> Self {
        Self {
            world_to_local: Mat4::identity(),
            local_to_world: Mat4::identity(),
            bounds: Aabb::new(Vec3::zeros(), Vec3::zeros()),
            scale: Vec3::zeros(),
            valid: false,
        }
    }

    /// Whether the container can be intersected
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Intersect a world-space ray with the oriented box
    ///
    /// The ray is carried into local space without renormalizing, so the
    /// returned distances are measured along the world-space ray.
    pub fn intersect(&self, ray: &Ray) -> Option<RayBoxHit> {
        if !self.valid {
            return None;
        }
        let local = Ray::unnormalized(
            self.world_to_local.transform_point(&Point3::from(ray.origin)).coords,
            self.world_to_local.transform_vector(&ray.direction),
        );
        Aabb::unit_centered().intersect_ray(&local)
    }

    /// Container-normalized coordinates of a world point, 0..1 per axis inside the box
    pub fn normalized(&self, world: &Vec3) -> Vec3 {
        let local = self.world_to_local.transform_point(&Point3::from(*world)).coords;
        local + Vec3::repeat(0.5)
    }

    /// World-space distance from a normalized point to the nearest side wall (x or z face)
    pub fn distance_to_side_wall(&self, normalized: &Vec3) -> f32 {
        let dx = normalized.x.min(1.0 - normalized.x) * self.scale.x;
        let dz = normalized.z.min(1.0 - normalized.z) * self.scale.z;
        dx.min(dz).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_aligned_matches_world_aabb() {
        let container = CloudContainer::from_bounds(
            Vec3::new(-250.0, 50.0, -250.0),
            Vec3::new(250.0, 80.0, 250.0),
        );
        let geometry = container.geometry();
        let ray = Ray::new(Vec3::new(10.0, 200.0, -20.0), Vec3::new(0.0, -1.0, 0.0));

        let oriented = geometry.intersect(&ray).unwrap();
        let aligned = container.world_bounds().intersect_ray(&ray).unwrap();
        assert_relative_eq!(oriented.near, aligned.near, epsilon = 1e-2);
        assert_relative_eq!(oriented.far, aligned.far, epsilon = 1e-2);
    }

    #[test]
    fn test_rotated_container_uses_local_frame() {
        // A 10x2x2 bar rotated 90 degrees about Y lies along world Z
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let container = CloudContainer::new(Transform::new(
            Vec3::zeros(),
            rotation,
            Vec3::new(10.0, 2.0, 2.0),
        ));
        let geometry = container.geometry();

        let along_z = Ray::new(Vec3::new(0.0, 0.0, -20.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = geometry.intersect(&along_z).unwrap();
        assert_relative_eq!(hit.length(), 10.0, epsilon = 1e-3);

        let along_x = Ray::new(Vec3::new(-20.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hit = geometry.intersect(&along_x).unwrap();
        assert_relative_eq!(hit.length(), 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_normalized_coordinates() {
        let geometry =
            CloudContainer::from_bounds(Vec3::zeros(), Vec3::new(10.0, 4.0, 10.0)).geometry();
        assert_relative_eq!(
            geometry.normalized(&Vec3::new(5.0, 1.0, 0.0)),
            Vec3::new(0.5, 0.25, 0.0),
            epsilon = 1e-5
        );
        let wall = geometry.distance_to_side_wall(&Vec3::new(0.1, 0.5, 0.5));
        assert_relative_eq!(wall, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_container_misses_everything() {
        let container =
            CloudContainer::from_bounds(Vec3::new(0.0, 5.0, 0.0), Vec3::new(10.0, 5.0, 10.0));
        assert!(container.is_degenerate());
        let geometry = container.geometry();
        assert!(!geometry.is_valid());
        let ray = Ray::new(Vec3::new(5.0, 10.0, 5.0), Vec3::new(0.0, -1.0, 0.0));
        assert!(geometry.intersect(&ray).is_none());
    }
}
