#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Tron Rider in a macroquad window.

mod config;
mod scene;

use std::{
    path::PathBuf,
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::filter::EnvFilter;
use tron_rider_core::{ScoreStore, Tuning, WINDOW_TITLE};
use tron_rider_game_loop::GameLoop;
use tron_rider_persistence::{FileScoreStore, MemoryScoreStore, DEFAULT_HIGH_SCORE_FILE};
use tron_rider_rendering::{Color, FrameSimulationBreakdown, Presentation, RenderingBackend};
use tron_rider_rendering_macroquad::{MacroquadBackend, SpriteManifest};

#[derive(Parser, Debug)]
#[command(name = "tron-rider")]
#[command(about = "Side-scrolling light-cycle survival game")]
struct Args {
    /// TOML file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,
    /// File holding the best score
    #[arg(long, default_value = DEFAULT_HIGH_SCORE_FILE)]
    high_score_file: PathBuf,
    /// Keep the best score in memory only
    #[arg(long)]
    ephemeral: bool,
    /// Seed for obstacle placement; defaults to the system clock
    #[arg(long)]
    seed: Option<u64>,
    /// Sprite manifest listing the Background, Bike and Wall images
    #[arg(long, default_value = "assets/manifest.toml")]
    assets: PathBuf,
    /// Draw primitives instead of loading sprites
    #[arg(long)]
    no_sprites: bool,
    /// Synchronise presentation with the display refresh rate
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,
    /// Render as fast as possible
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,
    /// Log frame timings once per second
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    fn vsync_preference(&self) -> Option<bool> {
        match (self.vsync, self.no_vsync) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Entry point for the Tron Rider command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(),
        ))
        .init();

    let args = Args::parse();
    let tuning = config::load_tuning(args.config.as_deref())?;
    let sprite_manifest = if args.no_sprites {
        None
    } else {
        let manifest = SpriteManifest::from_path(&args.assets).context(
            "required sprites are unavailable (pass --no-sprites to draw primitives instead)",
        )?;
        Some(manifest)
    };

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_sprite_manifest(sprite_manifest);
    if let Some(enabled) = args.vsync_preference() {
        backend = backend.with_vsync(enabled);
    }

    let seed = args.seed.unwrap_or_else(clock_seed);
    if args.ephemeral {
        run(backend, tuning, MemoryScoreStore::default(), seed)
    } else {
        run(
            backend,
            tuning,
            FileScoreStore::new(args.high_score_file),
            seed,
        )
    }
}

fn run<S>(backend: MacroquadBackend, tuning: Tuning, store: S, seed: u64) -> Result<()>
where
    S: ScoreStore + 'static,
{
    let scene = scene::initial_scene(&tuning)?;
    let presentation = Presentation::new(WINDOW_TITLE, Color::BLACK, scene);
    let mut game = GameLoop::new(tuning, store, seed);

    backend.run(presentation, move |frame_dt, input, frame_scene| {
        let simulation_start = Instant::now();
        for signal in input.signals {
            game.submit(signal);
        }
        let _ = game.advance_frame(frame_dt);
        let simulation = simulation_start.elapsed();

        let population_start = Instant::now();
        scene::populate(frame_scene, &game.snapshot());

        FrameSimulationBreakdown {
            simulation,
            scene_population: population_start.elapsed(),
            exit: game.is_quit_requested(),
        }
    })
}

/// Uses the `RUST_LOG` directives as given, or `info` when they are absent or malformed.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
