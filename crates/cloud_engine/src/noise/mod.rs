//! # Noise textures
//!
//! The density sampler reads scalar fields through [`NoiseField`], so tests
//! and callers can swap a baked [`NoiseVolume`] for an analytic field such as
//! [`ConstantField`]. The dither tile is a plain 2-D texture.

pub mod blue_noise;
pub mod generate;
pub mod volume;

pub use blue_noise::BlueNoiseTile;
pub use volume::NoiseVolume;

use std::path::PathBuf;

use crate::foundation::math::Vec3;

/// Texture construction and loading failures
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    /// A dimension is zero
    #[error("texture dimensions must be non-zero")]
    EmptyDimensions,

    /// Voxel or texel count does not match dimensions
    #[error("expected {expected} values, got {actual}")]
    DataLength {
        /// Values the dimensions call for
        expected: usize,
        /// Values supplied
        actual: usize,
    },

    /// Image height is not a whole number of slices
    #[error("image height {height} cannot hold {depth} square slices")]
    SliceLayout {
        /// Image height in pixels
        height: usize,
        /// Requested slice count
        depth: usize,
    },

    /// Image could not be opened or decoded
    #[error("failed to read image {}: {source}", path.display())]
    Image {
        /// File that failed
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },
}

/// A scalar field sampled with wraparound in tile units
pub trait NoiseField: Send + Sync {
    /// Value in [0, 1] at the given coordinate
    fn sample(&self, coord: &Vec3) -> f32;
}

/// The same value everywhere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantField(pub f32);

impl NoiseField for ConstantField {
    fn sample(&self, _coord: &Vec3) -> f32 {
        self.0
    }
}
