//! # Frame Data Assembler
//!
//! Runs once per frame, before any pixel is evaluated. Validates the
//! settings, checks that the container and every texture the settings use
//! are present, and freezes camera and container state into a
//! [`FrameSnapshot`].

use super::bundle::ParameterBundle;
use super::camera::Camera;
use super::light::SunLight;
use super::material::{CloudMaterial, CloudTextures, TextureSlot};
use super::snapshot::FrameSnapshot;
use crate::geometry::CloudContainer;
use crate::settings::{CloudRenderSettings, SettingsError};

/// Reasons a frame is skipped
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FrameError {
    /// No cloud container in the scene
    #[error("no cloud container assigned")]
    MissingContainer,

    /// The renderer has no material
    #[error("no cloud material assigned")]
    MissingMaterial,

    /// A texture the settings need is not bound
    #[error("cloud material has no {0} texture")]
    MissingTexture(TextureSlot),

    /// Settings violate an invariant
    #[error("invalid cloud settings: {0}")]
    InvalidSettings(#[from] SettingsError),

    /// Output has zero width or height
    #[error("render target is {width}x{height}")]
    InvalidTarget {
        /// Target width
        width: u32,
        /// Target height
        height: u32,
    },
}

/// Host-side state handed to the assembler each frame
#[derive(Debug, Clone, Copy)]
pub struct FrameInputs<'a> {
    /// Current settings
    pub settings: &'a CloudRenderSettings,
    /// Container, if the scene has one
    pub container: Option<&'a CloudContainer>,
    /// Material, if one is assigned
    pub material: Option<&'a CloudMaterial>,
    /// Viewing camera
    pub camera: &'a Camera,
    /// Sun
    pub sun: &'a SunLight,
    /// Seconds since start
    pub time: f32,
    /// Output width
    pub width: u32,
    /// Output height
    pub height: u32,
}

/// Snapshot plus the textures it is evaluated against
#[derive(Clone, Copy)]
pub struct AssembledFrame<'a> {
    /// Frozen frame data
    pub snapshot: FrameSnapshot,
    /// Textures for this frame
    pub textures: CloudTextures<'a>,
}

/// Builds one snapshot per frame
#[derive(Debug, Default)]
pub struct FrameAssembler {
    frame_index: u64,
}

impl FrameAssembler {
    /// New assembler at frame 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames assembled so far
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Gather everything for one frame
    pub fn assemble<'a>(
        &mut self,
        inputs: &FrameInputs<'a>,
    ) -> Result<AssembledFrame<'a>, FrameError> {
        if inputs.width == 0 || inputs.height == 0 {
            return Err(FrameError::InvalidTarget { width: inputs.width, height: inputs.height });
        }
        inputs.settings.validate()?;

        let container = inputs.container.ok_or(FrameError::MissingContainer)?;
        let material = inputs.material.ok_or(FrameError::MissingMaterial)?;

        let params = ParameterBundle::from_settings(inputs.settings, inputs.time);
        let textures = material.textures(&params)?;

        let geometry = container.geometry();
        if !geometry.is_valid() {
            log::warn!(
                "Cloud container has degenerate transform (scale {:?}); no clouds this frame",
                container.transform.scale
            );
        }

        let snapshot = FrameSnapshot {
            params,
            container: geometry,
            camera_position: inputs.camera.position,
            frustum: inputs.camera.frustum_corners(),
            sun: *inputs.sun,
            time: inputs.time,
            width: inputs.width,
            height: inputs.height,
            frame_index: self.frame_index,
        };
        self.frame_index += 1;

        log::trace!("Assembled cloud frame {} at t={:.3}s", snapshot.frame_index, snapshot.time);
        Ok(AssembledFrame { snapshot, textures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::noise::ConstantField;
    use std::sync::Arc;

    fn layer() -> CloudContainer {
        CloudContainer::from_bounds(Vec3::new(-250.0, 50.0, -250.0), Vec3::new(250.0, 80.0, 250.0))
    }

    fn bare_settings() -> CloudRenderSettings {
        let mut settings = CloudRenderSettings::default();
        settings.detail.detail_cloud_weight = 0.0;
        settings.extra_detail.extra_detail_cloud_weight = 0.0;
        settings.blue_noise.ray_offset_strength = 0.0;
        settings
    }

    fn inputs<'a>(
        settings: &'a CloudRenderSettings,
        container: Option<&'a CloudContainer>,
        material: Option<&'a CloudMaterial>,
        camera: &'a Camera,
        sun: &'a SunLight,
    ) -> FrameInputs<'a> {
        FrameInputs { settings, container, material, camera, sun, time: 2.0, width: 4, height: 2 }
    }

    #[test]
    fn test_missing_container_is_rejected() {
        let settings = bare_settings();
        let material = CloudMaterial::new().with_base_noise(Arc::new(ConstantField(1.0)));
        let (camera, sun) = (Camera::default(), SunLight::default());

        let result = FrameAssembler::new()
            .assemble(&inputs(&settings, None, Some(&material), &camera, &sun));
        assert!(matches!(result, Err(FrameError::MissingContainer)));
    }

    #[test]
    fn test_missing_textures_are_rejected() {
        let settings = CloudRenderSettings::default();
        let container = layer();
        let (camera, sun) = (Camera::default(), SunLight::default());
        let mut assembler = FrameAssembler::new();

        let result = assembler.assemble(&inputs(&settings, Some(&container), None, &camera, &sun));
        assert!(matches!(result, Err(FrameError::MissingMaterial)));

        let empty = CloudMaterial::new();
        let result =
            assembler.assemble(&inputs(&settings, Some(&container), Some(&empty), &camera, &sun));
        assert!(matches!(result, Err(FrameError::MissingTexture(TextureSlot::BaseNoise))));

        // Default settings erode, so detail noise is required
        let base_only = CloudMaterial::new().with_base_noise(Arc::new(ConstantField(1.0)));
        let result = assembler
            .assemble(&inputs(&settings, Some(&container), Some(&base_only), &camera, &sun));
        assert!(matches!(result, Err(FrameError::MissingTexture(TextureSlot::DetailNoise))));

        // Without erosion or dithering, base noise alone is enough
        let bare = bare_settings();
        let result =
            assembler.assemble(&inputs(&bare, Some(&container), Some(&base_only), &camera, &sun));
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut settings = bare_settings();
        settings.cloud.steps = 0;
        let container = layer();
        let material = CloudMaterial::new().with_base_noise(Arc::new(ConstantField(1.0)));
        let (camera, sun) = (Camera::default(), SunLight::default());

        let result = FrameAssembler::new()
            .assemble(&inputs(&settings, Some(&container), Some(&material), &camera, &sun));
        assert!(matches!(
            result,
            Err(FrameError::InvalidSettings(SettingsError::ZeroSteps { .. }))
        ));
    }

    #[test]
    fn test_snapshot_captures_frame_state() {
        let settings = bare_settings();
        let mut container = layer();
        let material = CloudMaterial::new().with_base_noise(Arc::new(ConstantField(1.0)));
        let (camera, sun) = (Camera::default(), SunLight::default());
        let mut assembler = FrameAssembler::new();

        let first = assembler
            .assemble(&inputs(&settings, Some(&container), Some(&material), &camera, &sun))
            .unwrap()
            .snapshot;

        // Moving the container afterwards leaves the captured frame untouched
        container.transform.position.y += 100.0;
        let second = assembler
            .assemble(&inputs(&settings, Some(&container), Some(&material), &camera, &sun))
            .unwrap()
            .snapshot;

        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert_eq!(first.container.bounds.min.y, 50.0);
        assert_eq!(second.container.bounds.min.y, 150.0);
        assert_eq!(first.params.wind_offset, settings.cloud.wind * 2.0);
        assert_eq!(first.frustum, camera.frustum_corners());
    }

    #[test]
    fn test_degenerate_container_still_assembles() {
        let settings = bare_settings();
        let container =
            CloudContainer::from_bounds(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 10.0, 10.0));
        let material = CloudMaterial::new().with_base_noise(Arc::new(ConstantField(1.0)));
        let (camera, sun) = (Camera::default(), SunLight::default());

        let frame = FrameAssembler::new()
            .assemble(&inputs(&settings, Some(&container), Some(&material), &camera, &sun))
            .unwrap();
        assert!(!frame.snapshot.container.is_valid());
    }
}
