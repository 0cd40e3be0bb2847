//! # Parameter Bundle
//!
//! Flat, `Copy` view of [`CloudRenderSettings`] resolved for a single frame:
//! wind velocities are turned into offsets for the frame time and grouped
//! parameters get small helper types for the pieces of math they drive.

use crate::foundation::math::{utils, Vec3};
use crate::settings::CloudRenderSettings;

/// Noise tiles per world unit for the base shape at `cloud_scale = 1`
pub const BASE_NOISE_FREQUENCY: f32 = 1.0 / 1000.0;

/// Noise tiles per world unit for the detail octave at scale 1
pub const DETAIL_NOISE_FREQUENCY: f32 = 1.0 / 250.0;

/// Noise tiles per world unit for the extra detail octave at scale 1
pub const EXTRA_DETAIL_NOISE_FREQUENCY: f32 = 1.0 / 500.0;

/// Vertical density ramp over normalized container height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightFade {
    /// Height fraction where density starts rising
    pub bottom_start: f32,
    /// Height fraction where density reaches full
    pub bottom_end: f32,
    /// Height fraction where density starts falling
    pub top_start: f32,
    /// Height fraction where density reaches zero
    pub top_end: f32,
}

impl HeightFade {
    /// Weight in [0, 1] at a height fraction
    ///
    /// 0 at `bottom_start`, 1 at `bottom_end`, smooth in between; mirrored at the top.
    pub fn weight(&self, height: f32) -> f32 {
        let rise = utils::smoothstep(self.bottom_start, self.bottom_end, height);
        let fall = 1.0 - utils::smoothstep(self.top_start, self.top_end, height);
        rise * fall
    }
}

/// Two-lobe phase function parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseParams {
    /// Forward lobe asymmetry
    pub forward: f32,
    /// Backward lobe asymmetry
    pub backward: f32,
    /// Angle-independent floor
    pub base_brightness: f32,
    /// Weight of the lobes
    pub factor: f32,
}

/// Per-frame evaluator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterBundle {
    /// Samples along each view ray
    pub steps: u32,
    /// Samples toward the sun per lit sample
    pub light_steps: u32,

    /// Base noise frequency multiplier
    pub cloud_scale: f32,
    /// Base noise offset for this frame (wind * time)
    pub wind_offset: Vec3,
    /// Detail erosion weight
    pub detail_weight: f32,
    /// Detail noise frequency multiplier
    pub detail_scale: f32,
    /// Detail noise offset for this frame
    pub detail_offset: Vec3,
    /// Extra detail erosion weight
    pub extra_detail_weight: f32,
    /// Extra detail noise frequency multiplier
    pub extra_detail_scale: f32,
    /// Extra detail noise offset for this frame
    pub extra_detail_offset: Vec3,
    /// Density removed before anything is visible
    pub density_threshold: f32,
    /// Overall density scale
    pub density_multiplier: f32,
    /// World distance of the side-wall fade (0 disables)
    pub edge_fade_distance: f32,
    /// Normalized radius where horizontal softening begins
    pub edge_softness_start: f32,
    /// Normalized radius where horizontal softening ends
    pub edge_softness_end: f32,
    /// Vertical ramp
    pub height_fade: HeightFade,

    /// Extinction along view rays
    pub absorption_through_cloud: f32,
    /// Extinction toward the sun
    pub absorption_toward_sun: f32,
    /// Minimum sunlight fraction
    pub darkness_threshold: f32,
    /// Thin-edge brightening strength
    pub powder_intensity: f32,
    /// Phase function
    pub phase: PhaseParams,

    /// March start jitter in world units
    pub ray_offset_strength: f32,

    /// Lit tint
    pub color: Vec3,
    /// Shadow tint
    pub shadow_color: Vec3,
    /// Marching limit from the camera
    pub render_distance: f32,
    /// Debug depth marker threshold (0 disables)
    pub debug_depth_threshold: f32,
}

impl ParameterBundle {
    /// Resolve settings at a point in time
    pub fn from_settings(settings: &CloudRenderSettings, time: f32) -> Self {
        let cloud = &settings.cloud;
        let light = &settings.light;
        Self {
            steps: cloud.steps,
            light_steps: light.light_steps,

            cloud_scale: cloud.cloud_scale,
            wind_offset: cloud.wind * time,
            detail_weight: settings.detail.detail_cloud_weight,
            detail_scale: settings.detail.detail_cloud_scale,
            detail_offset: settings.detail.detail_cloud_wind * time,
            extra_detail_weight: settings.extra_detail.extra_detail_cloud_weight,
            extra_detail_scale: settings.extra_detail.extra_detail_cloud_scale,
            extra_detail_offset: settings.extra_detail.extra_detail_cloud_wind * time,
            density_threshold: cloud.density_threshold,
            density_multiplier: cloud.density_multiplier,
            edge_fade_distance: cloud.container_edge_fade_distance,
            edge_softness_start: cloud.edge_softness_start,
            edge_softness_end: cloud.edge_softness_end,
            height_fade: HeightFade {
                bottom_start: cloud.bottom_fade_start,
                bottom_end: cloud.bottom_fade_end,
                top_start: cloud.top_fade_start,
                top_end: cloud.top_fade_end,
            },

            absorption_through_cloud: light.light_absorption_through_cloud,
            absorption_toward_sun: light.light_absorption_toward_sun,
            darkness_threshold: light.darkness_threshold,
            powder_intensity: light.powder_effect_intensity,
            phase: PhaseParams {
                forward: light.forward_scattering,
                backward: light.backward_scattering,
                base_brightness: light.base_brightness,
                factor: light.phase_factor,
            },

            ray_offset_strength: settings.blue_noise.ray_offset_strength,

            color: settings.color,
            shadow_color: settings.shadow_color,
            render_distance: settings.render_distance,
            debug_depth_threshold: settings.debug_depth_threshold,
        }
    }

    /// Whether either erosion octave contributes
    pub fn uses_detail_noise(&self) -> bool {
        self.detail_weight > 0.0 || self.extra_detail_weight > 0.0
    }

    /// Whether the march start is jittered
    pub fn uses_dither(&self) -> bool {
        self.ray_offset_strength > 0.0
    }
}
