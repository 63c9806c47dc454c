mod scenes;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ember_core::ImageBuffer;
use ember_renderer::{random, render, RenderConfig};
use indicatif::{ProgressBar, ProgressStyle};

use scenes::SceneKind;

const ASPECT_RATIO: f32 = 16.0 / 9.0;

/// Offline path tracer
#[derive(Parser, Debug)]
#[command(name = "ember", version, about)]
struct Args {
    /// Output image, encoded by its extension (png, tga, ...)
    #[arg(default_value = "image.png")]
    output: PathBuf,

    /// Samples per pixel
    #[arg(long, default_value_t = 100)]
    spp: u32,

    /// Worker threads, one row slice each
    #[arg(long, default_value_t = 8)]
    threads: usize,

    /// Display gamma
    #[arg(long, default_value_t = 2.0)]
    gamma: f32,

    /// Image height in pixels; width follows a 16:9 aspect
    #[arg(long, default_value_t = 400)]
    height: u32,

    /// Maximum path depth
    #[arg(long, default_value_t = 50)]
    depth: u32,

    #[arg(long, value_enum, default_value_t = SceneKind::Cornell)]
    scene: SceneKind,

    /// Seed for reproducible renders
    #[arg(long)]
    seed: Option<u64>,

    /// Image used by the globe scene
    #[arg(long, default_value = "earthmap.jpg")]
    texture: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if let Some(seed) = args.seed {
        // Scene setup draws from the main thread's generator
        random::reseed(seed);
    }

    let width = (ASPECT_RATIO * args.height as f32) as u32;
    let demo = scenes::build(args.scene, ASPECT_RATIO, &args.texture)
        .with_context(|| format!("failed to build scene {:?}", args.scene))?;

    let mut config = RenderConfig::default()
        .with_resolution(width, args.height)
        .with_samples(args.spp)
        .with_max_depth(args.depth)
        .with_threads(args.threads)
        .with_gamma(args.gamma)
        .with_background(demo.background);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let bar = ProgressBar::new(width as u64 * args.height as u64 * args.spp.max(1) as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {percent}% {eta_precise}",
        )
        .context("invalid progress bar template")?
        .progress_chars("#>-"),
    );

    let mut image = ImageBuffer::new(width, args.height);
    render(&config, &demo.camera, &demo.scene, &mut image, |progress| {
        bar.set_length(progress.total);
        bar.set_position(progress.completed);
    })
    .context("render failed")?;
    bar.finish();

    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}
