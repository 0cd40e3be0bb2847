use cloud_engine::render::RenderTarget;
use image::RgbaImage;

/// Alpha above which a pixel counts as cloud
const COVERAGE_ALPHA: f32 = 0.02;

/// Summarizes a rendered frame for quick sanity checks
pub fn analyze_frame(target: &RenderTarget, image: &RgbaImage) -> FrameAnalysis {
    let (width, height) = image.dimensions();
    let total_pixels = (width as usize * height as usize).max(1);

    let mut total_brightness = 0u64;
    let mut white_pixels = 0;
    for pixel in image.pixels() {
        let [r, g, b, _a] = pixel.0;
        total_brightness += (u64::from(r) + u64::from(g) + u64::from(b)) / 3;
        if r > 245 && g > 245 && b > 245 {
            white_pixels += 1;
        }
    }

    let (covered, alpha_sum) = target
        .color()
        .iter()
        .fold((0usize, 0.0f32), |(covered, sum), pixel| {
            (covered + usize::from(pixel.w > COVERAGE_ALPHA), sum + pixel.w)
        });

    let coverage = covered as f32 / total_pixels as f32;
    let mean_alpha = alpha_sum / total_pixels as f32;
    let white_ratio = white_pixels as f32 / total_pixels as f32;
    let avg_brightness = (total_brightness / total_pixels as u64) as u8;

    FrameAnalysis {
        width,
        height,
        coverage,
        mean_alpha,
        white_ratio,
        avg_brightness,
        sky: classify_sky(coverage, mean_alpha, white_ratio),
    }
}

#[derive(Debug)]
pub struct FrameAnalysis {
    pub width: u32,
    pub height: u32,
    pub coverage: f32,
    pub mean_alpha: f32,
    pub white_ratio: f32,
    pub avg_brightness: u8,
    pub sky: SkyClassification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyClassification {
    Clear,       // No visible cloud
    Scattered,   // Broken cloud over visible sky
    Overcast,    // Cloud over most of the frame
    BlownOut,    // Mostly saturated white, lighting is likely too strong
}

fn classify_sky(coverage: f32, mean_alpha: f32, white_ratio: f32) -> SkyClassification {
    if white_ratio > 0.5 {
        SkyClassification::BlownOut
    } else if coverage < 0.01 {
        SkyClassification::Clear
    } else if coverage > 0.7 && mean_alpha > 0.5 {
        SkyClassification::Overcast
    } else {
        SkyClassification::Scattered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloud_engine::foundation::math::Vec3;

    #[test]
    fn test_clear_sky() {
        let mut target = RenderTarget::new(4, 4);
        target.fill_background(|_, _| Vec3::new(0.3, 0.5, 0.9));
        let analysis = analyze_frame(&target, &target.to_rgba8());
        assert_eq!(analysis.coverage, 0.0);
        assert_eq!(analysis.sky, SkyClassification::Clear);
    }

    #[test]
    fn test_blown_out_sky() {
        let mut target = RenderTarget::new(4, 4);
        target.fill_background(|_, _| Vec3::repeat(5.0));
        let analysis = analyze_frame(&target, &target.to_rgba8());
        assert_eq!(analysis.white_ratio, 1.0);
        assert_eq!(analysis.sky, SkyClassification::BlownOut);
    }
}
