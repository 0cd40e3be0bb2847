//! 2-D dither tile used to jitter march start positions

use std::path::Path;

use rand::{rngs::StdRng, Rng, SeedableRng};

use super::TextureError;

/// Repeating 2-D tile of values in [0, 1)
#[derive(Debug, Clone, PartialEq)]
pub struct BlueNoiseTile {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl BlueNoiseTile {
    /// Build from raw texels, row-major
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::EmptyDimensions);
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(TextureError::DataLength { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// Generate a seeded high-pass noise tile
    ///
    /// White noise minus its 3x3 neighbourhood mean pushes energy toward high
    /// frequencies; ranking the result restores a uniform histogram.
    pub fn generate(size: usize, seed: u64) -> Result<Self, TextureError> {
        if size == 0 {
            return Err(TextureError::EmptyDimensions);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let white: Vec<f32> = (0..size * size).map(|_| rng.gen::<f32>()).collect();

        let at = |x: i64, y: i64| {
            let n = size as i64;
            white[(y.rem_euclid(n) * n + x.rem_euclid(n)) as usize]
        };
        let high_pass: Vec<f32> = (0..size * size)
            .map(|i| {
                let (x, y) = ((i % size) as i64, (i / size) as i64);
                let mut sum = 0.0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        sum += at(x + dx, y + dy);
                    }
                }
                at(x, y) - sum / 9.0
            })
            .collect();

        let mut order: Vec<usize> = (0..high_pass.len()).collect();
        order.sort_by(|&a, &b| high_pass[a].total_cmp(&high_pass[b]));

        let mut data = vec![0.0; high_pass.len()];
        let count = data.len() as f32;
        for (rank, &index) in order.iter().enumerate() {
            data[index] = rank as f32 / count;
        }
        Self::new(size, size, data)
    }

    /// Load a tile from the luminance of an image file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|source| TextureError::Image { path: path.to_path_buf(), source })?
            .to_luma8();
        let (width, height) = image.dimensions();
        let data = image.pixels().map(|p| f32::from(p.0[0]) / 256.0).collect();
        Self::new(width as usize, height as usize, data)
    }

    /// Dimensions as (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Nearest-texel lookup by pixel coordinate, wrapping in both axes
    pub fn texel(&self, x: u32, y: u32) -> f32 {
        let x = x as usize % self.width;
        let y = y as usize % self.height;
        self.data[y * self.width + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_seeded() {
        let a = BlueNoiseTile::generate(16, 7).unwrap();
        let b = BlueNoiseTile::generate(16, 7).unwrap();
        let c = BlueNoiseTile::generate(16, 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_generated_values_are_uniform_ranks() {
        let tile = BlueNoiseTile::generate(8, 1).unwrap();
        let mut values: Vec<f32> = (0..64).map(|i| tile.texel(i % 8, i / 8)).collect();
        values.sort_by(f32::total_cmp);
        for (rank, value) in values.iter().enumerate() {
            assert_eq!(*value, rank as f32 / 64.0);
        }
    }

    #[test]
    fn test_load_maps_luma_to_unit_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dither.png");
        image::GrayImage::from_raw(2, 2, vec![0, 64, 128, 255]).unwrap().save(&path).unwrap();

        let tile = BlueNoiseTile::load(&path).unwrap();
        assert_eq!(tile.dimensions(), (2, 2));
        assert_eq!(tile.texel(0, 0), 0.0);
        assert_eq!(tile.texel(1, 0), 0.25);
        assert_eq!(tile.texel(0, 1), 0.5);
        // Full white stays below 1
        assert_eq!(tile.texel(1, 1), 255.0 / 256.0);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.png");
        assert!(matches!(
            BlueNoiseTile::load(&path),
            Err(TextureError::Image { path: reported, .. }) if reported == path
        ));
    }

    #[test]
    fn test_texel_wraps() {
        let tile = BlueNoiseTile::new(2, 2, vec![0.0, 0.25, 0.5, 0.75]).unwrap();
        assert_eq!(tile.texel(3, 0), 0.25);
        assert_eq!(tile.texel(2, 3), 0.5);
    }
}
