use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use cloud_engine::foundation::logging;
use cloud_engine::prelude::*;

mod analysis;
use analysis::{analyze_frame, FrameAnalysis};

const DEFAULT_OUTPUT_DIR: &str = "renders";
const SHAPE_NOISE_SIZE: usize = 48;
const DETAIL_NOISE_SIZE: usize = 24;
const BLUE_NOISE_SIZE: usize = 64;

#[derive(Debug)]
struct ViewerConfig {
    settings_path: Option<PathBuf>,
    width: u32,
    height: u32,
    frames: u32,
    dt: f32,
    seed: u32,
    shape_noise: Option<PathBuf>,
    blue_noise: Option<PathBuf>,
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    logging::init_with_level("info");

    let matches = Command::new("cloud_viewer")
        .about("Renders volumetric clouds over a sky gradient and writes PNG frames")
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("FILE")
                .help("Cloud settings file (.toml or .ron)"),
        )
        .arg(
            Arg::new("width")
                .long("width")
                .value_name("PIXELS")
                .help("Output width")
                .default_value("640"),
        )
        .arg(
            Arg::new("height")
                .long("height")
                .value_name("PIXELS")
                .help("Output height")
                .default_value("360"),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("COUNT")
                .help("Number of frames to render")
                .default_value("1"),
        )
        .arg(
            Arg::new("dt")
                .long("dt")
                .value_name("SECONDS")
                .help("Time step between frames")
                .default_value("0.5"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for the generated noise textures")
                .default_value("1"),
        )
        .arg(
            Arg::new("shape-noise")
                .long("shape-noise")
                .value_name("PNG")
                .help("Shape noise as square slices stacked vertically, instead of generating it"),
        )
        .arg(
            Arg::new("blue-noise")
                .long("blue-noise")
                .value_name("PNG")
                .help("Dither tile image, instead of generating one"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for frames")
                .default_value(DEFAULT_OUTPUT_DIR),
        )
        .arg(
            Arg::new("write-default")
                .long("write-default")
                .value_name("FILE")
                .help("Write the default settings to FILE and exit"),
        )
        .get_matches();

    if let Some(path) = matches.get_one::<String>("write-default") {
        CloudRenderSettings::default()
            .save_to_file(path)
            .with_context(|| format!("Failed to write default settings to {}", path))?;
        log::info!("Wrote default cloud settings to {}", path);
        return Ok(());
    }

    let config = ViewerConfig {
        settings_path: matches.get_one::<String>("settings").map(PathBuf::from),
        width: parse_arg(&matches, "width")?,
        height: parse_arg(&matches, "height")?,
        frames: parse_arg(&matches, "frames")?,
        dt: parse_arg(&matches, "dt")?,
        seed: parse_arg(&matches, "seed")?,
        shape_noise: matches.get_one::<String>("shape-noise").map(PathBuf::from),
        blue_noise: matches.get_one::<String>("blue-noise").map(PathBuf::from),
        output_dir: matches
            .get_one::<String>("output")
            .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR), PathBuf::from),
    };

    render_sequence(&config)
}

fn parse_arg<T>(matches: &clap::ArgMatches, name: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = matches
        .get_one::<String>(name)
        .with_context(|| format!("Missing --{}", name))?;
    raw.parse().with_context(|| format!("Invalid --{} value '{}'", name, raw))
}

fn load_settings(path: Option<&PathBuf>) -> Result<CloudRenderSettings> {
    let settings = match path {
        Some(path) => CloudRenderSettings::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => CloudRenderSettings::default(),
    };
    settings.validate().context("Cloud settings are invalid")?;
    Ok(settings)
}

fn load_shape_noise(path: &Path) -> Result<NoiseVolume> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let depth = (height / width.max(1)) as usize;
    let volume = NoiseVolume::load_slices(path, depth)
        .with_context(|| format!("Failed to load shape noise from {}", path.display()))?;
    log::info!("Loaded shape noise {:?} from {}", volume.dimensions(), path.display());
    Ok(volume)
}

fn build_material(settings: &CloudRenderSettings, config: &ViewerConfig) -> Result<CloudMaterial> {
    let seed = config.seed;
    let shape = match &config.shape_noise {
        Some(path) => load_shape_noise(path)?,
        None => {
            log::info!("Generating {0}^3 shape noise (seed {1})", SHAPE_NOISE_SIZE, seed);
            NoiseVolume::cloud_shape(SHAPE_NOISE_SIZE, seed)?
        }
    };
    log::info!("Generating {0}^3 detail noise", DETAIL_NOISE_SIZE);
    let detail = NoiseVolume::cloud_detail(DETAIL_NOISE_SIZE, seed.wrapping_add(1))?;
    let mut material = CloudMaterial::new()
        .with_base_noise(Arc::new(shape))
        .with_detail_noise(Arc::new(detail));

    if settings.blue_noise.ray_offset_strength > 0.0 {
        let tile = match &config.blue_noise {
            Some(path) => BlueNoiseTile::load(path)
                .with_context(|| format!("Failed to load blue noise from {}", path.display()))?,
            None => {
                log::debug!("Generating {0}x{0} blue noise tile", BLUE_NOISE_SIZE);
                BlueNoiseTile::generate(BLUE_NOISE_SIZE, u64::from(seed))?
            }
        };
        material = material.with_blue_noise(Arc::new(tile));
    }
    Ok(material)
}

fn sky_gradient(_u: f32, v: f32) -> Vec3 {
    let horizon = Vec3::new(0.75, 0.85, 0.95);
    let zenith = Vec3::new(0.25, 0.45, 0.85);
    horizon.lerp(&zenith, v.clamp(0.0, 1.0))
}

fn render_sequence(config: &ViewerConfig) -> Result<()> {
    let settings = load_settings(config.settings_path.as_ref())?;
    std::fs::create_dir_all(&config.output_dir)
        .context("Failed to create output directory")?;

    let mut renderer = CloudRenderer::with_material(build_material(&settings, config)?);
    let container = CloudContainer::from_bounds(
        Vec3::new(-250.0, 50.0, -250.0),
        Vec3::new(250.0, 80.0, 250.0),
    );
    let aspect = config.width as f32 / config.height.max(1) as f32;
    let camera = Camera::perspective(Vec3::new(0.0, 0.0, -300.0), 60.0, aspect, 0.3, 1000.0)
        .look_at(Vec3::new(0.0, 65.0, 0.0), Vec3::y());
    let sun = SunLight::default();
    let mut clock = FrameClock::new();

    for frame in 0..config.frames {
        let mut target = RenderTarget::new(config.width, config.height);
        target.fill_background(sky_gradient);

        let scene = CloudScene {
            settings: &settings,
            container: Some(&container),
            camera: &camera,
            sun: &sun,
            time: clock.total_time(),
        };
        if let RenderOutcome::Skipped(reason) = renderer.render(&mut target, &scene) {
            log::warn!("Frame {} written without clouds: {}", frame, reason);
        }

        let path = config.output_dir.join(format!("clouds_{:04}.png", frame));
        let image = target.to_rgba8();
        image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        report(frame, &path, &analyze_frame(&target, &image));
        clock.advance(config.dt);
    }

    log::info!(
        "Rendered {} frame(s) into {}",
        renderer.frames_rendered(),
        config.output_dir.display()
    );
    Ok(())
}

fn report(frame: u32, path: &Path, analysis: &FrameAnalysis) {
    log::info!("Frame {} saved: {}", frame, path.display());
    log::info!(
        "  {}x{} {:?}: coverage {:.1}%, mean alpha {:.2}, brightness {}/255, white {:.1}%",
        analysis.width,
        analysis.height,
        analysis.sky,
        analysis.coverage * 100.0,
        analysis.mean_alpha,
        analysis.avg_brightness,
        analysis.white_ratio * 100.0
    );
}
