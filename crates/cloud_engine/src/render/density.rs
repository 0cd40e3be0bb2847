//! # Density Field Sampler
//!
//! Density at a world position is a pure function of the frame's parameters
//! and textures:
//!
//! 1. base noise at `(position * cloud_scale + wind_offset)`
//! 2. shaped by horizontal softness, side-wall fade and the height ramp
//! 3. thresholded and scaled by the density multiplier
//! 4. eroded by the detail octaves, never above the scaled value

use super::bundle::{
    ParameterBundle, BASE_NOISE_FREQUENCY, DETAIL_NOISE_FREQUENCY, EXTRA_DETAIL_NOISE_FREQUENCY,
};
use super::material::CloudTextures;
use crate::foundation::math::{utils, Vec2, Vec3};
use crate::geometry::ContainerGeometry;

/// Evaluates the cloud density field for one frame
#[derive(Clone, Copy)]
pub struct DensitySampler<'a> {
    params: &'a ParameterBundle,
    container: &'a ContainerGeometry,
    textures: CloudTextures<'a>,
}

impl<'a> DensitySampler<'a> {
    /// Bind a frame's parameters, container and textures
    pub fn new(
        params: &'a ParameterBundle,
        container: &'a ContainerGeometry,
        textures: CloudTextures<'a>,
    ) -> Self {
        Self { params, container, textures }
    }

    /// Horizontal shaping weight at container-normalized coordinates
    pub fn edge_weight(&self, normalized: &Vec3) -> f32 {
        let params = self.params;

        let offset = Vec2::new(normalized.x - 0.5, normalized.z - 0.5);
        let radius = offset.norm() * 2.0;
        let softness =
            1.0 - utils::smoothstep(params.edge_softness_start, params.edge_softness_end, radius);

        let wall = if params.edge_fade_distance > 0.0 {
            let distance = self.container.distance_to_side_wall(normalized);
            distance.min(params.edge_fade_distance) / params.edge_fade_distance
        } else {
            1.0
        };

        softness * wall
    }

    /// Density at a world position, 0 outside the container
    pub fn sample(&self, world: &Vec3) -> f32 {
        let params = self.params;
        let normalized = self.container.normalized(world);
        if normalized.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return 0.0;
        }

        let base_coord = (world * params.cloud_scale + params.wind_offset) * BASE_NOISE_FREQUENCY;
        let base = self.textures.base.sample(&base_coord);

        let edge = self.edge_weight(&normalized);
        let shape = base * edge * params.height_fade.weight(normalized.y);
        let scaled = (shape - params.density_threshold).max(0.0) * params.density_multiplier;
        if scaled <= 0.0 {
            return 0.0;
        }

        match self.textures.detail {
            Some(detail) => {
                let detail_coord = (world * params.detail_scale + params.detail_offset)
                    * DETAIL_NOISE_FREQUENCY;
                let extra_coord = (world * params.extra_detail_scale + params.extra_detail_offset)
                    * EXTRA_DETAIL_NOISE_FREQUENCY;
                let erosion = (1.0 - detail.sample(&detail_coord)) * params.detail_weight
                    + (1.0 - detail.sample(&extra_coord)) * params.extra_detail_weight;
                (scaled - erosion).clamp(0.0, scaled)
            }
            None => scaled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CloudContainer;
    use crate::noise::{ConstantField, NoiseField};
    use crate::settings::CloudRenderSettings;
    use approx::assert_relative_eq;

    fn layer() -> ContainerGeometry {
        CloudContainer::from_bounds(
            Vec3::new(-250.0, 50.0, -250.0),
            Vec3::new(250.0, 80.0, 250.0),
        )
        .geometry()
    }

    fn params(detail_weight: f32) -> ParameterBundle {
        let mut settings = CloudRenderSettings::default();
        settings.cloud.bottom_fade_end = 0.0;
        settings.cloud.top_fade_start = 1.0;
        settings.cloud.container_edge_fade_distance = 0.0;
        settings.detail.detail_cloud_weight = detail_weight;
        settings.extra_detail.extra_detail_cloud_weight = 0.0;
        ParameterBundle::from_settings(&settings, 0.0)
    }

    fn textures<'a>(
        base: &'a dyn NoiseField,
        detail: Option<&'a dyn NoiseField>,
    ) -> CloudTextures<'a> {
        CloudTextures { base, detail, blue_noise: None }
    }

    #[test]
    fn test_uniform_noise_at_centre() {
        let (params, container) = (params(0.0), layer());
        let base = ConstantField(1.0);
        let sampler = DensitySampler::new(&params, &container, textures(&base, None));
        // 1.0 minus the 0.25 threshold
        assert_relative_eq!(sampler.sample(&Vec3::new(0.0, 65.0, 0.0)), 0.75, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_outside_container() {
        let (params, container) = (params(0.0), layer());
        let base = ConstantField(1.0);
        let sampler = DensitySampler::new(&params, &container, textures(&base, None));
        assert_eq!(sampler.sample(&Vec3::new(0.0, 100.0, 0.0)), 0.0);
        assert_eq!(sampler.sample(&Vec3::new(400.0, 65.0, 0.0)), 0.0);
    }

    #[test]
    fn test_horizontal_softness_fades_toward_edges() {
        let (params, container) = (params(0.0), layer());
        let base = ConstantField(1.0);
        let sampler = DensitySampler::new(&params, &container, textures(&base, None));
        // Normalized radius 0.6 is past the default softness end of 0.5
        assert_eq!(sampler.sample(&Vec3::new(150.0, 65.0, 0.0)), 0.0);
        let near = sampler.sample(&Vec3::new(30.0, 65.0, 0.0));
        let mid = sampler.sample(&Vec3::new(70.0, 65.0, 0.0));
        assert!(near > mid && mid > 0.0);
    }

    #[test]
    fn test_side_wall_fade() {
        let mut params = params(0.0);
        params.edge_softness_start = 5.0;
        params.edge_softness_end = 5.0;
        params.edge_fade_distance = 45.0;
        let container = layer();
        let base = ConstantField(1.0);
        let sampler = DensitySampler::new(&params, &container, textures(&base, None));

        let normalized = container.normalized(&Vec3::new(240.0, 65.0, 0.0));
        assert_relative_eq!(sampler.edge_weight(&normalized), 10.0 / 45.0, epsilon = 1e-4);
    }

    #[test]
    fn test_erosion_only_removes_density() {
        let container = layer();
        let base = ConstantField(1.0);
        let point = Vec3::new(0.0, 65.0, 0.0);

        let plain_params = params(0.0);
        let plain = DensitySampler::new(&plain_params, &container, textures(&base, None))
            .sample(&point);

        let eroded_params = params(0.5);
        let full_detail = ConstantField(1.0);
        let no_detail = ConstantField(0.0);
        let untouched =
            DensitySampler::new(&eroded_params, &container, textures(&base, Some(&full_detail)))
                .sample(&point);
        let carved =
            DensitySampler::new(&eroded_params, &container, textures(&base, Some(&no_detail)))
                .sample(&point);

        assert_eq!(untouched, plain);
        assert_relative_eq!(carved, 0.25, epsilon = 1e-6);
        assert!(carved <= plain);
    }

    #[test]
    fn test_multiplier_applies_before_erosion() {
        let mut params = params(0.5);
        params.density_multiplier = 2.0;
        let container = layer();
        let base = ConstantField(1.0);
        let no_detail = ConstantField(0.0);
        let sampler = DensitySampler::new(&params, &container, textures(&base, Some(&no_detail)));

        // (1.0 - 0.25) * 2.0 - 0.5
        let density = sampler.sample(&Vec3::new(0.0, 65.0, 0.0));
        assert_relative_eq!(density, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_base_noise_gives_zero_density() {
        let mut params = params(0.0);
        params.density_multiplier = 1000.0;
        params.density_threshold = 0.0;
        let container = layer();
        let base = ConstantField(0.0);
        let sampler = DensitySampler::new(&params, &container, textures(&base, None));
        assert_eq!(sampler.sample(&Vec3::new(0.0, 65.0, 0.0)), 0.0);
    }
}
