//! `lumen`: render the demo scene to a PNG.
//!
//! Usage: `lumen [settings.json]`

mod demo_scene;
mod settings;

use anyhow::{Context, Result};
use lumen_renderer::{render_parallel, ImageBuffer, XorShift};
use settings::Settings;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };

    let seed = settings.seed.unwrap_or_else(clock_seed);
    log::info!("Using seed {}", seed);

    let start = Instant::now();
    let mut rng = XorShift::new(seed);
    let world = demo_scene::build_demo_scene(&mut rng).context("Failed to build scene")?;
    log::info!("Scene with {} spheres built in {:?}", world.len(), start.elapsed());

    let camera = settings
        .camera()
        .build()
        .context("Invalid camera settings")?;
    log::info!(
        "Rendering {}x{} @ {} spp...",
        settings.render.width,
        settings.render.height,
        settings.render.samples_per_pixel
    );
    let image = render_parallel(&camera, &world, &settings.render, seed)?;

    save_png(&image, &settings.output)?;
    log::info!("Saved to {}", settings.output.display());

    Ok(())
}

/// Seed derived from the wall clock, for runs without an explicit seed.
fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u32)
        .unwrap_or_default()
}

fn save_png(buffer: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = image::RgbImage::from_raw(buffer.width, buffer.height, buffer.to_rgb8())
        .context("Image buffer size does not match its dimensions")?;
    rgb.save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}
