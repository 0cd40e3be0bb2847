//! Texture set the cloud evaluator samples

use std::fmt;
use std::sync::Arc;

use super::assembler::FrameError;
use super::bundle::ParameterBundle;
use crate::noise::{BlueNoiseTile, NoiseField};

/// Texture inputs of the cloud effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    /// Base shape noise
    BaseNoise,
    /// Erosion noise shared by both detail octaves
    DetailNoise,
    /// March start dither tile
    BlueNoise,
}

impl fmt::Display for TextureSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BaseNoise => "base noise",
            Self::DetailNoise => "detail noise",
            Self::BlueNoise => "blue noise",
        };
        f.write_str(name)
    }
}

/// Shared, read-only textures bound to the cloud effect
#[derive(Clone, Default)]
pub struct CloudMaterial {
    base_noise: Option<Arc<dyn NoiseField>>,
    detail_noise: Option<Arc<dyn NoiseField>>,
    blue_noise: Option<Arc<BlueNoiseTile>>,
}

impl fmt::Debug for CloudMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudMaterial")
            .field("base_noise", &self.base_noise.is_some())
            .field("detail_noise", &self.detail_noise.is_some())
            .field("blue_noise", &self.blue_noise.is_some())
            .finish()
    }
}

impl CloudMaterial {
    /// Material with no textures bound
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the base shape noise
    pub fn with_base_noise(mut self, field: Arc<dyn NoiseField>) -> Self {
        self.base_noise = Some(field);
        self
    }

    /// Bind the erosion noise
    pub fn with_detail_noise(mut self, field: Arc<dyn NoiseField>) -> Self {
        self.detail_noise = Some(field);
        self
    }

    /// Bind the dither tile
    pub fn with_blue_noise(mut self, tile: Arc<BlueNoiseTile>) -> Self {
        self.blue_noise = Some(tile);
        self
    }

    /// Borrow the textures a frame with these parameters needs
    ///
    /// Base noise is always required. Detail noise is required while either
    /// erosion weight is non-zero, and the dither tile while the ray offset
    /// strength is non-zero.
    pub fn textures(&self, params: &ParameterBundle) -> Result<CloudTextures<'_>, FrameError> {
        let base = self
            .base_noise
            .as_deref()
            .ok_or(FrameError::MissingTexture(TextureSlot::BaseNoise))?;

        let detail = match (&self.detail_noise, params.uses_detail_noise()) {
            (Some(field), true) => Some(field.as_ref()),
            (None, true) => return Err(FrameError::MissingTexture(TextureSlot::DetailNoise)),
            (_, false) => None,
        };

        let blue_noise = match (&self.blue_noise, params.uses_dither()) {
            (Some(tile), true) => Some(tile.as_ref()),
            (None, true) => return Err(FrameError::MissingTexture(TextureSlot::BlueNoise)),
            (_, false) => None,
        };

        Ok(CloudTextures { base, detail, blue_noise })
    }
}

/// Borrowed textures for one frame
#[derive(Clone, Copy)]
pub struct CloudTextures<'a> {
    /// Base shape noise
    pub base: &'a dyn NoiseField,
    /// Erosion noise, present when erosion is active
    pub detail: Option<&'a dyn NoiseField>,
    /// Dither tile, present when jitter is active
    pub blue_noise: Option<&'a BlueNoiseTile>,
}
