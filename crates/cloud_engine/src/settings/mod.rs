//! # Cloud Render Settings
//!
//! Every tunable the cloud effect exposes, grouped the way a user edits them:
//! shape, lighting, detail erosion, extra detail erosion and dithering. The
//! whole tree is serde-serializable so it can live in a TOML or RON file
//! through [`Config`].
//!
//! Step control uses explicit counts: `steps` samples along the view ray and
//! `light_steps` samples toward the sun, each spread evenly over the part of
//! the ray that lies inside the container.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::foundation::math::Vec3;

/// Settings validation failures
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    /// A value is NaN or infinite
    #[error("setting `{field}` must be finite")]
    NotFinite {
        /// Offending field
        field: &'static str,
    },

    /// A value lies outside its allowed range
    #[error("setting `{field}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Offending field
        field: &'static str,
        /// Value found
        value: f32,
        /// Inclusive lower bound
        min: f32,
        /// Inclusive upper bound
        max: f32,
    },

    /// A step count is zero
    #[error("step count `{field}` must be at least 1")]
    ZeroSteps {
        /// Offending field
        field: &'static str,
    },

    /// A start/end pair is inverted
    #[error("`{start}` ({start_value}) must not exceed `{end}` ({end_value})")]
    InvertedRange {
        /// Start field
        start: &'static str,
        /// Start value
        start_value: f32,
        /// End field
        end: &'static str,
        /// End value
        end_value: f32,
    },
}

/// Shape of the base cloud field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudShapeSettings {
    /// Samples along the view ray inside the container
    pub steps: u32,
    /// Frequency multiplier for the base noise
    pub cloud_scale: f32,
    /// Base noise scroll velocity (noise units per second)
    pub wind: Vec3,
    /// Base density removed before anything becomes visible
    pub density_threshold: f32,
    /// Overall density scale
    pub density_multiplier: f32,
    /// World-space distance over which density fades out toward the side walls (0 disables)
    pub container_edge_fade_distance: f32,
    /// Normalized radius where horizontal softening begins
    pub edge_softness_start: f32,
    /// Normalized radius where horizontal softening reaches zero density
    pub edge_softness_end: f32,
    /// Height fraction where clouds start fading in from the bottom
    pub bottom_fade_start: f32,
    /// Height fraction where clouds reach full density from the bottom
    pub bottom_fade_end: f32,
    /// Height fraction where clouds start fading out toward the top
    pub top_fade_start: f32,
    /// Height fraction where clouds have completely faded at the top
    pub top_fade_end: f32,
}

impl Default for CloudShapeSettings {
    fn default() -> Self {
        Self {
            steps: 15,
            cloud_scale: 1.0,
            wind: Vec3::new(1.0, 0.0, 0.0),
            density_threshold: 0.25,
            density_multiplier: 1.0,
            container_edge_fade_distance: 45.0,
            edge_softness_start: 0.1,
            edge_softness_end: 0.5,
            bottom_fade_start: 0.0,
            bottom_fade_end: 0.2,
            top_fade_start: 0.7,
            top_fade_end: 1.0,
        }
    }
}

/// Absorption and scattering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    /// Extinction along the view ray
    pub light_absorption_through_cloud: f32,
    /// Extinction along the path toward the sun
    pub light_absorption_toward_sun: f32,
    /// Samples toward the sun for each lit sample
    pub light_steps: u32,
    /// Minimum fraction of sunlight any sample receives
    pub darkness_threshold: f32,
    /// Strength of the thin-edge brightening term
    pub powder_effect_intensity: f32,
    /// Henyey-Greenstein asymmetry of the forward lobe
    pub forward_scattering: f32,
    /// Henyey-Greenstein asymmetry of the backward lobe
    pub backward_scattering: f32,
    /// Phase value independent of angle
    pub base_brightness: f32,
    /// Weight of the angular lobes on top of the base brightness
    pub phase_factor: f32,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            light_absorption_through_cloud: 0.15,
            light_absorption_toward_sun: 0.25,
            light_steps: 10,
            darkness_threshold: 0.1,
            powder_effect_intensity: 0.5,
            forward_scattering: 0.1,
            backward_scattering: 0.25,
            base_brightness: 0.5,
            phase_factor: 0.0,
        }
    }
}

/// First erosion octave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailCloudSettings {
    /// How strongly detail noise carves the base shape
    pub detail_cloud_weight: f32,
    /// Frequency multiplier for detail noise
    pub detail_cloud_scale: f32,
    /// Detail noise scroll velocity
    pub detail_cloud_wind: Vec3,
}

impl Default for DetailCloudSettings {
    fn default() -> Self {
        Self {
            detail_cloud_weight: 0.24,
            detail_cloud_scale: 1.0,
            detail_cloud_wind: Vec3::new(0.5, 0.0, 0.0),
        }
    }
}

/// Second, independently scrolled erosion octave
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraDetailCloudSettings {
    /// How strongly the extra octave carves the base shape
    pub extra_detail_cloud_weight: f32,
    /// Frequency multiplier for the extra octave
    pub extra_detail_cloud_scale: f32,
    /// Extra octave scroll velocity
    pub extra_detail_cloud_wind: Vec3,
}

impl Default for ExtraDetailCloudSettings {
    fn default() -> Self {
        Self {
            extra_detail_cloud_weight: 0.24,
            extra_detail_cloud_scale: 1.0,
            extra_detail_cloud_wind: Vec3::new(0.5, 0.0, 0.0),
        }
    }
}

/// March start dithering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueNoiseSettings {
    /// World-space jitter applied to the first sample, wrapped to one step
    pub ray_offset_strength: f32,
}

impl Default for BlueNoiseSettings {
    fn default() -> Self {
        Self { ray_offset_strength: 50.0 }
    }
}

/// Complete cloud effect configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudRenderSettings {
    /// Tint for fully lit samples (linear RGB)
    pub color: Vec3,
    /// Tint for fully shadowed samples (linear RGB)
    pub shadow_color: Vec3,
    /// Marching stops this far from the camera
    pub render_distance: f32,
    /// Pixels with scene depth below this are painted as a debug marker (0 disables)
    pub debug_depth_threshold: f32,
    /// Lighting
    pub light: LightSettings,
    /// Base shape
    pub cloud: CloudShapeSettings,
    /// Detail erosion
    pub detail: DetailCloudSettings,
    /// Extra detail erosion
    pub extra_detail: ExtraDetailCloudSettings,
    /// Dithering
    pub blue_noise: BlueNoiseSettings,
}

impl Default for CloudRenderSettings {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 1.0, 1.0),
            shadow_color: Vec3::new(0.7, 0.9, 0.9),
            render_distance: 1000.0,
            debug_depth_threshold: 0.0,
            light: LightSettings::default(),
            cloud: CloudShapeSettings::default(),
            detail: DetailCloudSettings::default(),
            extra_detail: ExtraDetailCloudSettings::default(),
            blue_noise: BlueNoiseSettings::default(),
        }
    }
}

impl Config for CloudRenderSettings {}

fn finite(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SettingsError::NotFinite { field })
    }
}

fn finite_vec(field: &'static str, value: &Vec3) -> Result<(), SettingsError> {
    value.iter().try_for_each(|&v| finite(field, v))
}

fn in_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), SettingsError> {
    finite(field, value)?;
    if value < min || value > max {
        return Err(SettingsError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f32) -> Result<(), SettingsError> {
    in_range(field, value, 0.0, f32::MAX)
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    in_range(field, value, f32::MIN_POSITIVE, f32::MAX)
}

fn unit(field: &'static str, value: f32) -> Result<(), SettingsError> {
    in_range(field, value, 0.0, 1.0)
}

fn ordered(
    start: &'static str,
    start_value: f32,
    end: &'static str,
    end_value: f32,
) -> Result<(), SettingsError> {
    if start_value > end_value {
        return Err(SettingsError::InvertedRange { start, start_value, end, end_value });
    }
    Ok(())
}

fn at_least_one(field: &'static str, steps: u32) -> Result<(), SettingsError> {
    if steps == 0 {
        return Err(SettingsError::ZeroSteps { field });
    }
    Ok(())
}

impl CloudShapeSettings {
    /// Validate shape settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        at_least_one("cloud.steps", self.steps)?;
        positive("cloud.cloud_scale", self.cloud_scale)?;
        finite_vec("cloud.wind", &self.wind)?;
        finite("cloud.density_threshold", self.density_threshold)?;
        non_negative("cloud.density_multiplier", self.density_multiplier)?;
        non_negative("cloud.container_edge_fade_distance", self.container_edge_fade_distance)?;

        unit("cloud.edge_softness_start", self.edge_softness_start)?;
        in_range("cloud.edge_softness_end", self.edge_softness_end, 0.01, 5.0)?;
        ordered(
            "cloud.edge_softness_start",
            self.edge_softness_start,
            "cloud.edge_softness_end",
            self.edge_softness_end,
        )?;

        unit("cloud.bottom_fade_start", self.bottom_fade_start)?;
        unit("cloud.bottom_fade_end", self.bottom_fade_end)?;
        unit("cloud.top_fade_start", self.top_fade_start)?;
        unit("cloud.top_fade_end", self.top_fade_end)?;
        ordered(
            "cloud.bottom_fade_start",
            self.bottom_fade_start,
            "cloud.bottom_fade_end",
            self.bottom_fade_end,
        )?;
        ordered(
            "cloud.top_fade_start",
            self.top_fade_start,
            "cloud.top_fade_end",
            self.top_fade_end,
        )
    }
}

impl LightSettings {
    /// Validate lighting settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        at_least_one("light.light_steps", self.light_steps)?;
        non_negative("light.light_absorption_through_cloud", self.light_absorption_through_cloud)?;
        non_negative("light.light_absorption_toward_sun", self.light_absorption_toward_sun)?;
        unit("light.darkness_threshold", self.darkness_threshold)?;
        in_range("light.powder_effect_intensity", self.powder_effect_intensity, 0.0, 10.0)?;
        unit("light.forward_scattering", self.forward_scattering)?;
        unit("light.backward_scattering", self.backward_scattering)?;
        unit("light.base_brightness", self.base_brightness)?;
        in_range("light.phase_factor", self.phase_factor, 0.0, 5.0)
    }
}

impl CloudRenderSettings {
    /// Check every invariant the evaluator relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        finite_vec("color", &self.color)?;
        finite_vec("shadow_color", &self.shadow_color)?;
        positive("render_distance", self.render_distance)?;
        in_range("debug_depth_threshold", self.debug_depth_threshold, 0.0, 100.0)?;

        self.cloud.validate()?;
        self.light.validate()?;

        unit("detail.detail_cloud_weight", self.detail.detail_cloud_weight)?;
        positive("detail.detail_cloud_scale", self.detail.detail_cloud_scale)?;
        finite_vec("detail.detail_cloud_wind", &self.detail.detail_cloud_wind)?;

        let extra = &self.extra_detail;
        unit("extra_detail.extra_detail_cloud_weight", extra.extra_detail_cloud_weight)?;
        positive("extra_detail.extra_detail_cloud_scale", extra.extra_detail_cloud_scale)?;
        finite_vec("extra_detail.extra_detail_cloud_wind", &extra.extra_detail_cloud_wind)?;

        non_negative("blue_noise.ray_offset_strength", self.blue_noise.ray_offset_strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(CloudRenderSettings::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_steps() {
        let mut settings = CloudRenderSettings::default();
        settings.light.light_steps = 0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::ZeroSteps { field: "light.light_steps" })
        );
    }

    #[test]
    fn test_rejects_weight_outside_unit_range() {
        let mut settings = CloudRenderSettings::default();
        settings.detail.detail_cloud_weight = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::OutOfRange { field: "detail.detail_cloud_weight", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_fade() {
        let mut settings = CloudRenderSettings::default();
        settings.cloud.top_fade_start = 0.9;
        settings.cloud.top_fade_end = 0.8;
        assert!(matches!(settings.validate(), Err(SettingsError::InvertedRange { .. })));
    }

    #[test]
    fn test_rejects_nan() {
        let mut settings = CloudRenderSettings::default();
        settings.cloud.wind.y = f32::NAN;
        assert_eq!(settings.validate(), Err(SettingsError::NotFinite { field: "cloud.wind" }));
    }

    #[test]
    fn test_toml_and_ron_roundtrip() {
        let mut settings = CloudRenderSettings::default();
        settings.cloud.steps = 32;
        settings.light.phase_factor = 0.75;
        settings.shadow_color = Vec3::new(0.2, 0.3, 0.4);

        for format in [ConfigFormat::Toml, ConfigFormat::Ron] {
            let text = settings.to_string_as(format).unwrap();
            let parsed = CloudRenderSettings::from_str_as(&text, format).unwrap();
            assert_eq!(parsed, settings);
        }
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let text = "render_distance = 500.0\n\n[cloud]\nsteps = 8\n";
        let parsed = CloudRenderSettings::from_str_as(text, ConfigFormat::Toml).unwrap();
        assert_eq!(parsed.cloud.steps, 8);
        assert_eq!(parsed.render_distance, 500.0);
        assert_eq!(parsed.light, LightSettings::default());
    }
}
