//! 3-D noise textures with wraparound addressing

use std::path::Path;

use super::{NoiseField, TextureError};
use crate::foundation::math::Vec3;

/// Dense 3-D grid of scalar values in [0, 1]
///
/// Sampling coordinates are in tile units: `1.0` along an axis spans the
/// whole volume once, and the volume repeats in every direction.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseVolume {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<f32>,
}

impl NoiseVolume {
    /// Build from raw voxels, x fastest then y then z
    pub fn new(
        width: usize,
        height: usize,
        depth: usize,
        data: Vec<f32>,
    ) -> Result<Self, TextureError> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(TextureError::EmptyDimensions);
        }
        let expected = width * height * depth;
        if data.len() != expected {
            return Err(TextureError::DataLength { expected, actual: data.len() });
        }
        Ok(Self { width, height, depth, data })
    }

    /// Build a cube by evaluating `f` at every voxel's normalized centre
    pub fn from_fn(size: usize, mut f: impl FnMut(Vec3) -> f32) -> Result<Self, TextureError> {
        let mut data = Vec::with_capacity(size * size * size);
        let inv = 1.0 / size as f32;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    let p = Vec3::new(
                        (x as f32 + 0.5) * inv,
                        (y as f32 + 0.5) * inv,
                        (z as f32 + 0.5) * inv,
                    );
                    data.push(f(p).clamp(0.0, 1.0));
                }
            }
        }
        Self::new(size, size, size, data)
    }

    /// Load a volume stored as `depth` square slices stacked vertically in a PNG
    ///
    /// The red channel holds the value; a 32x1024 image holds 32 slices of 32x32.
    pub fn load_slices(path: impl AsRef<Path>, depth: usize) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TextureError::Image { path: path.to_path_buf(), source })?
            .to_rgba8();
        let (width, total_height) = image.dimensions();
        let (width, total_height) = (width as usize, total_height as usize);
        if depth == 0 || total_height % depth != 0 {
            return Err(TextureError::SliceLayout { height: total_height, depth });
        }
        let data = image.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();
        log::debug!(
            "Loaded {}x{}x{} noise volume from {}",
            width,
            total_height / depth,
            depth,
            path.display()
        );
        Self::new(width, total_height / depth, depth, data)
    }

    /// Dimensions as (width, height, depth)
    pub fn dimensions(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    fn voxel(&self, x: i64, y: i64, z: i64) -> f32 {
        let wrap = |v: i64, n: usize| v.rem_euclid(n as i64) as usize;
        let (x, y, z) = (wrap(x, self.width), wrap(y, self.height), wrap(z, self.depth));
        self.data[(z * self.height + y) * self.width + x]
    }
}

impl NoiseField for NoiseVolume {
    /// Trilinear sample with wraparound
    fn sample(&self, coord: &Vec3) -> f32 {
        if !coord.iter().all(|v| v.is_finite()) {
            return 0.0;
        }
        let gx = coord.x * self.width as f32 - 0.5;
        let gy = coord.y * self.height as f32 - 0.5;
        let gz = coord.z * self.depth as f32 - 0.5;

        let (x0, y0, z0) = (gx.floor(), gy.floor(), gz.floor());
        let (fx, fy, fz) = (gx - x0, gy - y0, gz - z0);
        let (x0, y0, z0) = (x0 as i64, y0 as i64, z0 as i64);

        let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
        let plane = |z: i64| {
            let c00 = self.voxel(x0, y0, z);
            let c10 = self.voxel(x0 + 1, y0, z);
            let c01 = self.voxel(x0, y0 + 1, z);
            let c11 = self.voxel(x0 + 1, y0 + 1, z);
            lerp(lerp(c00, c10, fx), lerp(c01, c11, fx), fy)
        };
        lerp(plane(z0), plane(z0 + 1), fz)
    }
}
