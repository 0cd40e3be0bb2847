//! # Cloud rendering
//!
//! Per-frame pipeline:
//!
//! ```text
//! CloudRenderSettings ─┐
//! CloudContainer ──────┼─► FrameAssembler ─► FrameSnapshot ─► RayMarcher (per pixel, rayon rows)
//! Camera, SunLight ────┘                                        ├─ DensitySampler
//! CloudMaterial ─────────────► CloudTextures ───────────────────┴─ LightMarcher
//! ```
//!
//! The assembler runs single-threaded before any pixel is touched and either
//! produces an immutable snapshot or a [`FrameError`]. Evaluation only reads
//! the snapshot and the shared textures.

pub mod assembler;
pub mod bundle;
pub mod camera;
pub mod density;
pub mod light;
pub mod lighting;
pub mod march;
pub mod material;
pub mod renderer;
pub mod snapshot;
pub mod target;
pub mod uniforms;

#[cfg(test)]
mod tests;

pub use assembler::{AssembledFrame, FrameAssembler, FrameError, FrameInputs};
pub use bundle::{HeightFade, ParameterBundle, PhaseParams};
pub use camera::{Camera, FrustumCorners};
pub use density::DensitySampler;
pub use light::SunLight;
pub use lighting::{henyey_greenstein, powder, LightMarcher, LightSample};
pub use march::{MarchResult, RayMarcher};
pub use material::{CloudMaterial, CloudTextures, TextureSlot};
pub use renderer::{CloudRenderer, CloudScene, RenderOutcome};
pub use snapshot::FrameSnapshot;
pub use target::{RenderTarget, TargetError};
pub use uniforms::CloudUniforms;
