//! # Primary March
//!
//! Walks a view ray through the container in `steps` equal increments,
//! accumulating scattered sunlight and optical depth. The march segment is the
//! container hit clipped to the pixel's scene depth and the render distance.

use super::lighting::LightMarcher;
use super::density::DensitySampler;
use super::material::CloudTextures;
use super::snapshot::FrameSnapshot;
use crate::foundation::math::Vec3;
use crate::geometry::Ray;
use crate::noise::BlueNoiseTile;

/// Transmittance below which a ray is treated as opaque
pub const OPAQUE_TRANSMITTANCE: f32 = 0.01;

/// Color written for pixels closer than the debug depth threshold
pub const DEBUG_DEPTH_COLOR: Vec3 = Vec3::new(1.0, 0.0, 1.0);

/// Outcome of one view ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Background attenuated by the cloud plus scattered light
    pub color: Vec3,
    /// Scattered light alone
    pub light: Vec3,
    /// Fraction of the background still visible
    pub transmittance: f32,
}

impl MarchResult {
    /// Untouched background
    pub fn passthrough(background: Vec3) -> Self {
        Self { color: background, light: Vec3::zeros(), transmittance: 1.0 }
    }

    /// Cloud coverage, `1 - transmittance`
    pub fn alpha(&self) -> f32 {
        1.0 - self.transmittance
    }
}

/// Evaluates view rays against one frame snapshot
pub struct RayMarcher<'a> {
    snapshot: &'a FrameSnapshot,
    density: DensitySampler<'a>,
    light: LightMarcher<'a>,
    blue_noise: Option<&'a BlueNoiseTile>,
    radiance: Vec3,
    to_sun: Vec3,
}

impl<'a> RayMarcher<'a> {
    /// Bind a snapshot and the textures assembled with it
    pub fn new(snapshot: &'a FrameSnapshot, textures: CloudTextures<'a>) -> Self {
        let params = &snapshot.params;
        let container = &snapshot.container;
        let to_sun = snapshot.sun.to_sun();
        let density = DensitySampler::new(params, container, textures);
        Self {
            snapshot,
            density,
            light: LightMarcher::new(params, container, density, to_sun),
            blue_noise: textures.blue_noise,
            radiance: snapshot.sun.radiance(),
            to_sun,
        }
    }

    /// Evaluate the pixel at `(x, y)` over `background`
    ///
    /// `scene_depth` is the distance along the view ray to the nearest opaque
    /// surface, `f32::INFINITY` for open sky.
    pub fn evaluate_pixel(
        &self,
        x: u32,
        y: u32,
        scene_depth: f32,
        background: Vec3,
    ) -> MarchResult {
        let dither = self.blue_noise.map_or(0.0, |tile| tile.texel(x, y));
        self.march(&self.snapshot.view_ray(x, y), scene_depth, dither, background)
    }

    /// March a single ray; `dither` is in [0, 1)
    pub fn march(&self, ray: &Ray, scene_depth: f32, dither: f32, background: Vec3) -> MarchResult {
        let params = &self.snapshot.params;

        if params.debug_depth_threshold > 0.0 && scene_depth < params.debug_depth_threshold {
            return MarchResult {
                color: DEBUG_DEPTH_COLOR,
                light: DEBUG_DEPTH_COLOR,
                transmittance: 0.0,
            };
        }
        if !ray.is_usable() {
            return MarchResult::passthrough(background);
        }

        let hit = match self.snapshot.container.intersect(ray) {
            Some(hit) => hit,
            None => return MarchResult::passthrough(background),
        };
        let near = hit.near;
        let far = hit.far.min(scene_depth).min(params.render_distance);
        if far <= near {
            return MarchResult::passthrough(background);
        }

        let step = (far - near) / params.steps as f32;
        let jitter = if params.uses_dither() {
            (dither * params.ray_offset_strength) % step
        } else {
            0.0
        };
        let phase = params.phase.evaluate(ray.direction.dot(&self.to_sun));

        let mut optical_depth = 0.0;
        let mut transmittance = 1.0;
        let mut light = Vec3::zeros();

        for i in 0..params.steps {
            let point = ray.point_at(near + jitter + i as f32 * step);
            let density = self.density.sample(&point);
            if density <= 0.0 {
                continue;
            }

            optical_depth += density * step * params.absorption_through_cloud;
            transmittance = (-optical_depth).exp();

            let sun = self.light.sample(&point, phase);
            let tint = params.shadow_color.lerp(&params.color, sun.transmittance);
            light += tint.component_mul(&self.radiance)
                * (transmittance * sun.energy * density * step);

            if transmittance < OPAQUE_TRANSMITTANCE {
                transmittance = 0.0;
                break;
            }
        }

        MarchResult { color: background * transmittance + light, light, transmittance }
    }
}
