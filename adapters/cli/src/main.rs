#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Asteroids.
//!
//! Without `--headless-frames` the game opens a macroquad window. With it, the
//! session runs for the requested number of frames against scripted input and
//! a recording renderer, then logs a summary.

mod headless;

use std::path::PathBuf;

use anyhow::{Context, Result};
use asteroids_audio::LoggingAudio;
use asteroids_core::{Bounds, WINDOW_TITLE};
use asteroids_rendering::{palette, Presentation, RenderingBackend};
use asteroids_rendering_macroquad::MacroquadBackend;
use asteroids_score_store::{FileScoreStore, MemoryScoreStore, ScoreStore};
use asteroids_system_frame::{Config, FrameOrchestrator};
use asteroids_system_lifecycle as lifecycle;
use asteroids_world::{self as world, DEFAULT_RNG_SEED, STARTING_LIVES};
use clap::{ArgAction, Parser};
use log::info;

/// File the windowed game keeps its best score in when none is given.
const DEFAULT_HIGH_SCORE_FILE: &str = "asteroids_high_score.toml";

/// Command-line arguments accepted by the `asteroids` binary.
#[derive(Debug, Parser)]
#[command(name = "asteroids", about = "Classic vector Asteroids")]
struct Args {
    /// Seed for asteroid placement, headings and outlines.
    #[arg(long, default_value_t = DEFAULT_RNG_SEED)]
    seed: u64,
    /// Lives granted at the start of every game.
    #[arg(long, default_value_t = STARTING_LIVES, value_parser = clap::value_parser!(u32).range(1..))]
    lives: u32,
    /// TOML file holding the best score. Windowed runs default to
    /// `asteroids_high_score.toml`; headless runs keep it in memory.
    #[arg(long)]
    high_score_file: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
    /// Log frame rate metrics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Run this many frames without a window and exit.
    #[arg(long)]
    headless_frames: Option<u64>,
}

impl Args {
    fn config(&self) -> Config {
        Config::new(
            world::Config::new(Bounds::CLASSIC, self.lives, self.seed),
            lifecycle::Config::default(),
        )
    }

    fn score_store(&self, fallback: Option<&str>) -> Box<dyn ScoreStore> {
        match self.high_score_file.as_deref() {
            Some(path) => Box::new(FileScoreStore::new(path)),
            None => match fallback {
                Some(path) => Box::new(FileScoreStore::new(path)),
                None => Box::new(MemoryScoreStore::default()),
            },
        }
    }
}

/// Entry point for the Asteroids command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match args.headless_frames {
        Some(frames) => {
            let summary = headless::run(args.config(), args.score_store(None), frames);
            info!("{summary}");
            Ok(())
        }
        None => run_windowed(&args),
    }
}

fn run_windowed(args: &Args) -> Result<()> {
    info!("starting {WINDOW_TITLE} with seed {:#x}", args.seed);
    let mut orchestrator = FrameOrchestrator::new(
        args.config(),
        LoggingAudio,
        args.score_store(Some(DEFAULT_HIGH_SCORE_FILE)),
    );
    let presentation = Presentation::new(WINDOW_TITLE, palette::BACKGROUND, Bounds::CLASSIC);
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);

    backend
        .run(presentation, move |_dt, input, renderer| {
            orchestrator.tick(&input, renderer);
        })
        .context("failed to run the game window")
}
