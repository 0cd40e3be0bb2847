//! CPU render target the clouds are composited into

use std::path::Path;

use image::{ImageBuffer, RgbaImage};

use crate::foundation::math::{utils, Vec3, Vec4};

/// Render target failures
#[derive(thiserror::Error, Debug)]
pub enum TargetError {
    /// Depth buffer size differs from the color buffer
    #[error("depth buffer holds {actual} values, target needs {expected}")]
    DepthSize {
        /// Pixels in the target
        expected: usize,
        /// Values supplied
        actual: usize,
    },

    /// PNG encode or file write failure
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Linear RGBA color with optional per-pixel scene depth
///
/// Depth is the distance along each pixel's view ray to the nearest opaque
/// surface. Pixels without depth are treated as open sky.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    color: Vec<Vec4>,
    depth: Option<Vec<f32>>,
}

impl RenderTarget {
    /// Black, fully transparent target without depth
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: vec![Vec4::zeros(); width as usize * height as usize],
            depth: None,
        }
    }

    /// Attach a scene depth buffer in row-major order
    pub fn with_depth(mut self, depth: Vec<f32>) -> Result<Self, TargetError> {
        let expected = self.color.len();
        if depth.len() != expected {
            return Err(TargetError::DepthSize { expected, actual: depth.len() });
        }
        self.depth = Some(depth);
        Ok(self)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill the color buffer from a function of screen `(u, v)`, `v` up
    pub fn fill_background(&mut self, mut background: impl FnMut(f32, f32) -> Vec3) {
        let (width, height) = (self.width as usize, self.height as usize);
        for (index, pixel) in self.color.iter_mut().enumerate() {
            let u = ((index % width) as f32 + 0.5) / width as f32;
            let v = 1.0 - ((index / width) as f32 + 0.5) / height as f32;
            let rgb = background(u, v);
            *pixel = Vec4::new(rgb.x, rgb.y, rgb.z, 0.0);
        }
    }

    /// Color at a pixel
    pub fn pixel(&self, x: u32, y: u32) -> Vec4 {
        self.color[self.index(x, y)]
    }

    /// Scene depth at a pixel, infinite where there is none
    pub fn depth(&self, x: u32, y: u32) -> f32 {
        let index = self.index(x, y);
        self.depth.as_ref().map_or(f32::INFINITY, |depth| depth[index])
    }

    /// Color buffer in row-major order
    pub fn color(&self) -> &[Vec4] {
        &self.color
    }

    /// Color rows paired with their depth rows, for per-row evaluation
    pub(crate) fn buffers_mut(&mut self) -> (&mut [Vec4], Option<&[f32]>) {
        (&mut self.color, self.depth.as_deref())
    }

    /// Opaque 8-bit copy of the composited color, gamma 2.2
    pub fn to_rgba8(&self) -> RgbaImage {
        let to_byte = |value: f32| (utils::saturate(value).powf(1.0 / 2.2) * 255.0).round() as u8;
        let raw = self
            .color
            .iter()
            .flat_map(|c| [to_byte(c.x), to_byte(c.y), to_byte(c.z), 255])
            .collect();
        ImageBuffer::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Write the target as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), TargetError> {
        self.to_rgba8().save(path)?;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_size_is_checked() {
        let result = RenderTarget::new(4, 2).with_depth(vec![1.0; 7]);
        assert!(matches!(result, Err(TargetError::DepthSize { expected: 8, actual: 7 })));

        let target = RenderTarget::new(4, 2).with_depth(vec![3.0; 8]).unwrap();
        assert_eq!(target.depth(3, 1), 3.0);
        assert_eq!(RenderTarget::new(4, 2).depth(0, 0), f32::INFINITY);
    }

    #[test]
    fn test_background_gradient_orientation() {
        let mut target = RenderTarget::new(1, 4);
        target.fill_background(|_, v| Vec3::repeat(v));
        // Row 0 is the top of the image
        assert!(target.pixel(0, 0).x > target.pixel(0, 3).x);
        assert_eq!(target.pixel(0, 0).w, 0.0);
    }

    #[test]
    fn test_rgba8_conversion() {
        let mut target = RenderTarget::new(2, 1);
        target.fill_background(|u, _| {
            if u < 0.5 {
                Vec3::zeros()
            } else {
                Vec3::new(1.0, 2.0, -1.0)
            }
        });
        let image = target.to_rgba8();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 255, 0, 255]);
    }
}
