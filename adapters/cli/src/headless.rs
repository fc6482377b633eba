//! Windowless runs driven by a fixed input script.

use std::fmt;

use asteroids_audio::LoggingAudio;
use asteroids_core::{Action, InputSnapshot};
use asteroids_rendering::RecordingRenderer;
use asteroids_score_store::ScoreStore;
use asteroids_system_frame::{Config, FrameOrchestrator};
use asteroids_world::query;
use log::{debug, info};

/// State of the session after a headless run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) frames: u64,
    pub(crate) level: u32,
    pub(crate) lives: u32,
    pub(crate) score: u32,
    pub(crate) high_score: u32,
    pub(crate) asteroids: usize,
    pub(crate) game_over: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "headless run: {} frames, level {}, {} lives, score {} (best {}), {} asteroids left{}",
            self.frames,
            self.level,
            self.lives,
            self.score,
            self.high_score,
            self.asteroids,
            if self.game_over { ", game over" } else { "" },
        )
    }
}

/// Input a pilot would produce on `frame`: short thrust bursts, a slow
/// counter-clockwise turn and a shot every quarter second.
pub(crate) fn scripted_input(frame: u64) -> InputSnapshot {
    let mut input = InputSnapshot::new();
    input.set(Action::Thrust, frame % 90 < 20);
    input.set(Action::RotateLeft, frame % 4 == 0);
    input.set(Action::Fire, frame % 15 == 0);
    input
}

/// Runs `frames` frames and reports where the session ended up.
pub(crate) fn run<S: ScoreStore>(config: Config, store: S, frames: u64) -> Summary {
    info!("running {frames} headless frames");
    let mut orchestrator = FrameOrchestrator::new(config, LoggingAudio, store);
    let mut renderer = RecordingRenderer::new();

    let mut was_over = false;
    for frame in 0..frames {
        orchestrator.tick(&scripted_input(frame), &mut renderer);
        if orchestrator.is_game_over() && !was_over {
            debug!("game over after {} frames", frame + 1);
            was_over = true;
        }
    }

    let status = query::session_status(orchestrator.world());
    Summary {
        frames: renderer.frames(),
        level: status.level,
        lives: status.lives,
        score: status.score,
        high_score: orchestrator.lifecycle().high_score(),
        asteroids: status.asteroid_count,
        game_over: orchestrator.is_game_over(),
    }
}
