//! Procedural cloud noise volumes
//!
//! Shape noise is Perlin fBm remapped by inverted Worley cells, which gives
//! billowy lumps; detail noise is a few octaves of inverted Worley alone.
//! Both are made seamless by blending the eight periodic copies of the
//! source field, so the wraparound sampler shows no seams.

use noise::core::worley::ReturnType;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin, Worley};

use super::{NoiseVolume, TextureError};
use crate::foundation::math::{utils, Vec3};

/// Blend eight shifted copies of `f` so it repeats with period 1 on every axis
fn tileable(f: &impl Fn([f64; 3]) -> f64, p: Vec3) -> f64 {
    let (x, y, z) = (f64::from(p.x), f64::from(p.y), f64::from(p.z));
    let mut total = 0.0;
    for corner in 0..8u8 {
        let (ox, oy, oz) = (
            f64::from(corner & 1),
            f64::from((corner >> 1) & 1),
            f64::from((corner >> 2) & 1),
        );
        let weight = (if ox > 0.0 { x } else { 1.0 - x })
            * (if oy > 0.0 { y } else { 1.0 - y })
            * (if oz > 0.0 { z } else { 1.0 - z });
        total += weight * f([x - ox, y - oy, z - oz]);
    }
    total
}

fn inverted_worley(seed: u32, frequency: f64) -> impl Fn([f64; 3]) -> f64 {
    let worley = Worley::new(seed)
        .set_frequency(frequency)
        .set_return_type(ReturnType::Distance);
    move |p| (1.0 - (worley.get(p) * 0.5 + 0.5)).clamp(0.0, 1.0)
}

impl NoiseVolume {
    /// Base cloud shape: Perlin-Worley
    pub fn cloud_shape(size: usize, seed: u32) -> Result<Self, TextureError> {
        log::info!("Generating {size}^3 cloud shape volume (seed {seed})");
        let fbm = Fbm::<Perlin>::new(seed).set_octaves(4).set_frequency(4.0);
        let cells = inverted_worley(seed.wrapping_add(1), 4.0);

        let perlin_worley = move |p: [f64; 3]| {
            let perlin = fbm.get(p) * 0.5 + 0.5;
            let worley = cells(p);
            // Remap perlin from [worley - 1, 1] to [0, 1]
            (perlin - (worley - 1.0)) / (2.0 - worley)
        };
        Self::from_fn(size, |p| utils::saturate(tileable(&perlin_worley, p) as f32))
    }

    /// Erosion detail: three octaves of inverted Worley
    pub fn cloud_detail(size: usize, seed: u32) -> Result<Self, TextureError> {
        log::info!("Generating {size}^3 cloud detail volume (seed {seed})");
        let octaves = [
            (inverted_worley(seed, 4.0), 0.625),
            (inverted_worley(seed.wrapping_add(1), 8.0), 0.25),
            (inverted_worley(seed.wrapping_add(2), 16.0), 0.125),
        ];
        let layered = move |p: [f64; 3]| octaves.iter().map(|(f, w)| f(p) * w).sum::<f64>();
        Self::from_fn(size, |p| utils::saturate(tileable(&layered, p) as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::NoiseField;

    #[test]
    fn test_shape_volume_is_in_unit_range() {
        let volume = NoiseVolume::cloud_shape(8, 3).unwrap();
        for i in 0..64 {
            let p = Vec3::new(i as f32 * 0.13, i as f32 * 0.07, i as f32 * 0.29);
            let v = volume.sample(&p);
            assert!((0.0..=1.0).contains(&v), "sample {v} out of range");
        }
    }

    #[test]
    fn test_detail_volume_is_deterministic() {
        let a = NoiseVolume::cloud_detail(6, 11).unwrap();
        let b = NoiseVolume::cloud_detail(6, 11).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tileable_blend_is_periodic() {
        let f = |p: [f64; 3]| p[0] * 3.0 + p[1] - p[2] * 0.5;
        let low = tileable(&f, Vec3::new(0.0, 0.4, 0.6));
        let high = tileable(&f, Vec3::new(1.0, 0.4, 0.6));
        assert!((low - high).abs() < 1e-9);
    }
}
