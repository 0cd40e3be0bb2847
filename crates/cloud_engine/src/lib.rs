//! # Cloud Engine
//!
//! Volumetric clouds ray-marched through an oriented box.
//!
//! ## Features
//!
//! - **Oriented container**: any translation, rotation and scale; rays are
//!   intersected in the box's local space
//! - **Layered density**: tileable base noise eroded by two detail octaves,
//!   shaped by height and edge fades
//! - **Single scattering**: light march toward the sun with a two-lobe
//!   phase function, darkness floor and powder term
//! - **Per-frame snapshots**: settings, camera and container are frozen
//!   before any pixel is evaluated
//! - **Parallel evaluation**: rows of the target are marched with rayon
//! - **GPU packing**: the frame snapshot packs into a `Pod` uniform block
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cloud_engine::prelude::*;
//!
//! let material = CloudMaterial::new()
//!     .with_base_noise(Arc::new(NoiseVolume::cloud_shape(64, 1)?))
//!     .with_detail_noise(Arc::new(NoiseVolume::cloud_detail(32, 2)?))
//!     .with_blue_noise(Arc::new(BlueNoiseTile::generate(64, 3)?));
//! let mut renderer = CloudRenderer::with_material(material);
//!
//! let settings = CloudRenderSettings::default();
//! let container = CloudContainer::from_bounds(
//!     Vec3::new(-250.0, 50.0, -250.0),
//!     Vec3::new(250.0, 80.0, 250.0),
//! );
//! let (camera, sun) = (Camera::default(), SunLight::default());
//!
//! let mut target = RenderTarget::new(320, 180);
//! target.fill_background(|_, v| Vec3::new(0.4, 0.6, 0.9) * (0.5 + 0.5 * v));
//! let scene = CloudScene {
//!     settings: &settings,
//!     container: Some(&container),
//!     camera: &camera,
//!     sun: &sun,
//!     time: 0.0,
//! };
//! renderer.render(&mut target, &scene);
//! target.save_png("clouds.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod noise;
pub mod render;
pub mod settings;

/// Common imports for cloud engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        foundation::{
            math::{Transform, Vec3},
            time::FrameClock,
        },
        geometry::{CloudContainer, Ray},
        noise::{BlueNoiseTile, NoiseField, NoiseVolume},
        render::{
            Camera, CloudMaterial, CloudRenderer, CloudScene, CloudUniforms, FrameError,
            RenderOutcome, RenderTarget, SunLight,
        },
        settings::{CloudRenderSettings, SettingsError},
    };
}
