mod cli;
mod logger;
mod output;
mod postprocess;
mod scenes;
mod settings;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use lumen_renderer::{render, Camera};
use scenes::Scene;
use settings::RenderSettings;

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_logger(args.log_level.into());

    log::info!("Starting Lumen");

    let settings = RenderSettings::resolve(&args).context("Failed to load render settings")?;
    log::debug!("Settings: {:?}", settings);

    let Scene { big, small, view } = Scene::build(settings.scene, settings.seed)
        .with_context(|| format!("Failed to build scene {:?}", settings.scene))?;

    let camera_settings = if settings.scene_camera {
        view.apply(settings.camera.clone())
    } else {
        settings.camera.clone()
    };
    let camera = Camera::new(camera_settings).context("Invalid camera settings")?;

    let world = scenes::assemble(big, &small);
    let mut image = render(&camera, &world, settings.seed).context("Render failed")?;

    if settings.blur {
        log::info!("Applying blur");
        postprocess::blur(&mut image);
    }
    if let Some(levels) = settings.cartoonize {
        log::info!("Cartoonizing to {} levels", levels);
        postprocess::cartoonize(&mut image, levels);
    }

    output::save(&image, &settings.output)
        .with_context(|| format!("Failed to save {}", settings.output.display()))?;

    Ok(())
}
