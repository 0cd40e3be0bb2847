//! # Cloud Renderer
//!
//! Owns the cloud material and the frame assembler. Each call to
//! [`CloudRenderer::render`] assembles a snapshot and, if that succeeds,
//! evaluates every pixel of the target in parallel by rows. A frame that
//! cannot be assembled leaves the target exactly as it was.

use std::time::Instant;

use rayon::prelude::*;

use super::assembler::{FrameAssembler, FrameError, FrameInputs};
use super::camera::Camera;
use super::light::SunLight;
use super::march::RayMarcher;
use super::material::CloudMaterial;
use super::target::RenderTarget;
use crate::foundation::math::Vec4;
use crate::geometry::CloudContainer;
use crate::settings::CloudRenderSettings;

/// Scene state the cloud pass reads each frame
#[derive(Debug, Clone, Copy)]
pub struct CloudScene<'a> {
    /// Current settings
    pub settings: &'a CloudRenderSettings,
    /// Container, if the scene has one
    pub container: Option<&'a CloudContainer>,
    /// Viewing camera
    pub camera: &'a Camera,
    /// Sun
    pub sun: &'a SunLight,
    /// Seconds since start
    pub time: f32,
}

/// Result of one cloud pass
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// Clouds were composited into the target
    Rendered {
        /// Sequence number of the rendered frame
        frame_index: u64,
    },
    /// The target was left untouched
    Skipped(FrameError),
}

impl RenderOutcome {
    /// Whether clouds were drawn
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}

/// CPU cloud pass
#[derive(Debug, Default)]
pub struct CloudRenderer {
    material: Option<CloudMaterial>,
    assembler: FrameAssembler,
}

impl CloudRenderer {
    /// Renderer without a material; frames are skipped until one is set
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer with a material
    pub fn with_material(material: CloudMaterial) -> Self {
        Self { material: Some(material), assembler: FrameAssembler::new() }
    }

    /// Replace or clear the material
    pub fn set_material(&mut self, material: Option<CloudMaterial>) {
        self.material = material;
    }

    /// Frames successfully assembled so far
    pub fn frames_rendered(&self) -> u64 {
        self.assembler.frame_index()
    }

    /// Composite clouds over the target's current color
    ///
    /// The target's color is the background and its depth buffer, if any,
    /// clips the march. On success each pixel holds the composited color with
    /// cloud coverage in alpha.
    pub fn render(&mut self, target: &mut RenderTarget, scene: &CloudScene<'_>) -> RenderOutcome {
        let inputs = FrameInputs {
            settings: scene.settings,
            container: scene.container,
            material: self.material.as_ref(),
            camera: scene.camera,
            sun: scene.sun,
            time: scene.time,
            width: target.width(),
            height: target.height(),
        };

        let frame = match self.assembler.assemble(&inputs) {
            Ok(frame) => frame,
            Err(error) => {
                log::warn!("Skipping cloud pass: {}", error);
                return RenderOutcome::Skipped(error);
            }
        };

        let start = Instant::now();
        let marcher = RayMarcher::new(&frame.snapshot, frame.textures);
        let width = target.width() as usize;
        let (color, depth) = target.buffers_mut();

        color.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let scene_depth = depth.map_or(f32::INFINITY, |depth| depth[y * width + x]);
                let result = marcher.evaluate_pixel(x as u32, y as u32, scene_depth, pixel.xyz());
                *pixel = Vec4::new(result.color.x, result.color.y, result.color.z, result.alpha());
            }
        });

        log::debug!(
            "Cloud frame {} ({}x{}) evaluated in {:.2?}",
            frame.snapshot.frame_index,
            frame.snapshot.width,
            frame.snapshot.height,
            start.elapsed()
        );
        RenderOutcome::Rendered { frame_index: frame.snapshot.frame_index }
    }
}
