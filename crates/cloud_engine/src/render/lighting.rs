//! # Cloud Lighting
//!
//! Sun visibility through the cloud from a point inside it, plus the phase
//! and powder terms that shape how much of that light scatters toward the
//! viewer.

use super::bundle::{ParameterBundle, PhaseParams};
use super::density::DensitySampler;
use crate::foundation::math::{constants, Vec3};
use crate::geometry::{ContainerGeometry, Ray};

/// Henyey-Greenstein phase for scattering angle cosine `cos_angle` and asymmetry `g`
pub fn henyey_greenstein(cos_angle: f32, g: f32) -> f32 {
    let g2 = g * g;
    let denom = (1.0 + g2 - 2.0 * g * cos_angle).max(1e-6);
    (1.0 - g2) / (4.0 * constants::PI * denom.powf(1.5))
}

impl PhaseParams {
    /// Two-lobe phase with a brightness floor
    ///
    /// `cos_angle` is the cosine between the view direction and the direction
    /// to the sun.
    pub fn evaluate(&self, cos_angle: f32) -> f32 {
        let lobes = 0.5 * henyey_greenstein(cos_angle, self.forward)
            + 0.5 * henyey_greenstein(cos_angle, -self.backward);
        self.base_brightness + self.factor * lobes
    }
}

/// Powder term for a sun optical depth
///
/// 1 where no cloud lies toward the sun, rising toward `1 + intensity` as the
/// optical depth grows, so points deeper inside the cloud gain energy.
pub fn powder(optical_depth: f32, intensity: f32) -> f32 {
    1.0 + intensity * (1.0 - (-2.0 * optical_depth).exp())
}

/// Result of marching from a sample toward the sun
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Fraction of sunlight reaching the point, in [0, 1]
    pub transmittance: f32,
    /// Accumulated optical depth toward the sun
    pub optical_depth: f32,
    /// Scattered energy factor after darkness floor, phase and powder
    pub energy: f32,
}

/// Marches toward the sun through the container
pub struct LightMarcher<'a> {
    params: &'a ParameterBundle,
    container: &'a ContainerGeometry,
    density: DensitySampler<'a>,
    to_sun: Vec3,
}

impl<'a> LightMarcher<'a> {
    /// Light marcher for one frame; `to_sun` must point from the scene toward the sun
    pub fn new(
        params: &'a ParameterBundle,
        container: &'a ContainerGeometry,
        density: DensitySampler<'a>,
        to_sun: Vec3,
    ) -> Self {
        Self { params, container, density, to_sun }
    }

    /// Sun transmittance at `point`, weighted by `phase`
    pub fn sample(&self, point: &Vec3, phase: f32) -> LightSample {
        let params = self.params;
        let optical_depth = self.optical_depth(point);
        let transmittance = (-optical_depth).exp();

        let darkness = params.darkness_threshold;
        let lit = darkness + transmittance * (1.0 - darkness);
        let energy = lit * phase * powder(optical_depth, params.powder_intensity);

        LightSample { transmittance, optical_depth, energy }
    }

    fn optical_depth(&self, point: &Vec3) -> f32 {
        let params = self.params;
        if params.absorption_toward_sun <= 0.0 || params.light_steps == 0 {
            return 0.0;
        }

        let ray = Ray::new(*point, self.to_sun);
        let distance = match self.container.intersect(&ray) {
            Some(hit) => hit.far,
            None => return 0.0,
        };
        if distance <= 0.0 {
            return 0.0;
        }

        let step = distance / params.light_steps as f32;
        let total: f32 = (0..params.light_steps)
            .map(|i| self.density.sample(&ray.point_at((i as f32 + 0.5) * step)))
            .sum();

        total * step * params.absorption_toward_sun
    }
}
