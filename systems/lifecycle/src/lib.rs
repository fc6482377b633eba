#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session lifecycle: waves, lives, respawns and the level banner.
//!
//! The controller reacts to world events and the session status. It spawns the
//! next wave as soon as the belt is empty, spends a life once an explosion has
//! played out, asks for a replacement ship while lives remain, and keeps the
//! best score seen so far.

use asteroids_core::{Command, Event, SessionMode, SessionStatus};
use log::debug;

/// Frames the level banner takes to fade from opaque to invisible.
pub const LEVEL_BANNER_FRAMES: u32 = 120;

/// Stands in for the spawned total before the first wave.
pub const BASE_WAVE_QUANTITY: u32 = 1;

/// Tunable wave progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    base_wave_quantity: u32,
}

impl Config {
    /// Creates a configuration whose first wave holds `base_wave_quantity + 1` asteroids.
    #[must_use]
    pub const fn new(base_wave_quantity: u32) -> Self {
        Self { base_wave_quantity }
    }

    /// Quantity added to the first level number.
    #[must_use]
    pub const fn base_wave_quantity(&self) -> u32 {
        self.base_wave_quantity
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(BASE_WAVE_QUANTITY)
    }
}

/// Fading "Level N" announcement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelBanner {
    level: u32,
    alpha: f32,
}

impl LevelBanner {
    /// Level being announced.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Opacity between 0 and 1.
    #[must_use]
    pub const fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Pure system that drives wave progression and the lives state machine.
#[derive(Debug)]
pub struct Lifecycle {
    config: Config,
    started: bool,
    spawned_total: u32,
    banner_level: u32,
    banner_frames: u32,
    high_score: u32,
}

impl Lifecycle {
    /// Creates the controller, seeding the best score from persistent storage.
    #[must_use]
    pub fn new(config: Config, high_score: u32) -> Self {
        Self {
            config,
            started: false,
            spawned_total: 0,
            banner_level: 0,
            banner_frames: 0,
            high_score,
        }
    }

    /// Consumes world events and the session status to emit lifecycle commands.
    pub fn handle(&mut self, events: &[Event], status: &SessionStatus, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameStarted { .. } => {
                    self.started = true;
                    self.spawned_total = 0;
                }
                Event::TimeAdvanced { .. } => {
                    self.banner_frames = self.banner_frames.saturating_sub(1);
                }
                Event::WaveSpawned { level, .. } => self.show_banner(*level),
                Event::ExplosionFinished => out.push(Command::LoseLife),
                Event::LifeLost { remaining } => {
                    debug!("respawning ship, {remaining} lives left");
                    self.show_banner(status.level);
                    out.push(Command::RespawnShip);
                }
                Event::GameOver { .. } => self.started = false,
                _ => {}
            }
        }

        if self.level_cleared(status) {
            let level = status.level.saturating_add(1);
            let count = self.wave_size(level);
            self.spawned_total = self.spawned_total.saturating_add(count);
            out.push(Command::SpawnWave { level, count });
        }
    }

    /// Asteroids spawned so far this game plus the level number.
    fn wave_size(&self, level: u32) -> u32 {
        self.spawned_total
            .max(self.config.base_wave_quantity)
            .saturating_add(level)
    }

    fn level_cleared(&self, status: &SessionStatus) -> bool {
        self.started
            && status.mode == SessionMode::Playing
            && status.asteroid_count == 0
            && status.ship_state.accepts_input()
    }

    fn show_banner(&mut self, level: u32) {
        self.banner_level = level;
        self.banner_frames = LEVEL_BANNER_FRAMES;
    }

    /// Banner to display this frame, if it has not faded out yet.
    #[must_use]
    pub fn level_banner(&self) -> Option<LevelBanner> {
        if self.banner_frames == 0 {
            return None;
        }

        Some(LevelBanner {
            level: self.banner_level,
            alpha: self.banner_frames as f32 / LEVEL_BANNER_FRAMES as f32,
        })
    }

    /// Best score observed so far.
    #[must_use]
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Records the current score and returns the new best score when it was beaten.
    pub fn record_score(&mut self, score: u32) -> Option<u32> {
        if score <= self.high_score {
            return None;
        }
        self.high_score = score;
        Some(score)
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new(Config::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::{BlinkTimer, ShipState};

    fn status(asteroid_count: usize, level: u32, ship_state: ShipState) -> SessionStatus {
        SessionStatus {
            mode: SessionMode::Playing,
            level,
            lives: 3,
            asteroid_count,
            ship_state,
            score: 0,
        }
    }

    fn invulnerable() -> ShipState {
        ShipState::Invulnerable {
            blink: BlinkTimer::new(6, 30),
        }
    }

    #[test]
    fn game_start_requests_the_first_wave() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        lifecycle.handle(
            &[Event::GameStarted { lives: 3 }],
            &status(0, 0, invulnerable()),
            &mut out,
        );
        assert_eq!(out, vec![Command::SpawnWave { level: 1, count: 2 }]);
    }

    #[test]
    fn waves_grow_by_everything_spawned_so_far_plus_the_level() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        lifecycle.handle(
            &[Event::GameStarted { lives: 3 }],
            &status(0, 0, ShipState::Normal),
            &mut out,
        );
        lifecycle.handle(&[], &status(0, 1, ShipState::Normal), &mut out);
        lifecycle.handle(&[], &status(0, 2, ShipState::Normal), &mut out);

        assert_eq!(
            out,
            vec![
                Command::SpawnWave { level: 1, count: 2 },
                Command::SpawnWave { level: 2, count: 4 },
                Command::SpawnWave { level: 3, count: 9 },
            ]
        );
    }

    #[test]
    fn a_new_game_restarts_the_spawned_total() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        lifecycle.handle(
            &[Event::GameStarted { lives: 3 }],
            &status(0, 0, ShipState::Normal),
            &mut out,
        );
        lifecycle.handle(&[], &status(0, 1, ShipState::Normal), &mut out);
        out.clear();

        lifecycle.handle(
            &[Event::GameStarted { lives: 3 }],
            &status(0, 0, ShipState::Normal),
            &mut out,
        );
        lifecycle.handle(&[], &status(0, 1, ShipState::Normal), &mut out);

        assert_eq!(
            out,
            vec![
                Command::SpawnWave { level: 1, count: 2 },
                Command::SpawnWave { level: 2, count: 4 },
            ]
        );
    }

    #[test]
    fn no_wave_while_the_ship_is_exploding() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        lifecycle.handle(
            &[Event::GameStarted { lives: 3 }],
            &status(0, 1, ShipState::Exploding {
                frames_remaining: 10,
            }),
            &mut out,
        );
        assert!(out.is_empty());

        lifecycle.handle(&[Event::ShipRespawned], &status(0, 1, invulnerable()), &mut out);
        assert_eq!(out, vec![Command::SpawnWave { level: 2, count: 3 }]);
    }

    #[test]
    fn explosion_and_life_loss_chain_into_a_respawn() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        let crashed = status(3, 1, ShipState::Exploding {
            frames_remaining: 0,
        });

        lifecycle.handle(&[Event::ExplosionFinished], &crashed, &mut out);
        lifecycle.handle(&[Event::LifeLost { remaining: 2 }], &crashed, &mut out);

        assert_eq!(out, vec![Command::LoseLife, Command::RespawnShip]);
        assert_eq!(lifecycle.level_banner().map(|banner| banner.alpha()), Some(1.0));
    }

    #[test]
    fn level_banner_fades_over_its_duration() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        let playing = status(2, 1, ShipState::Normal);
        lifecycle.handle(
            &[Event::WaveSpawned { level: 1, count: 2 }],
            &playing,
            &mut out,
        );
        assert_eq!(
            lifecycle.level_banner(),
            Some(LevelBanner {
                level: 1,
                alpha: 1.0
            })
        );

        for _ in 0..LEVEL_BANNER_FRAMES / 2 {
            lifecycle.handle(&[Event::TimeAdvanced { frame: 1 }], &playing, &mut out);
        }
        let halfway = lifecycle.level_banner().expect("banner still visible");
        assert!((halfway.alpha() - 0.5).abs() < 1e-6);

        for _ in 0..LEVEL_BANNER_FRAMES / 2 {
            lifecycle.handle(&[Event::TimeAdvanced { frame: 1 }], &playing, &mut out);
        }
        assert_eq!(lifecycle.level_banner(), None);
        assert!(out.is_empty());
    }

    #[test]
    fn high_score_only_moves_up() {
        let mut lifecycle = Lifecycle::new(Config::default(), 100);
        assert_eq!(lifecycle.record_score(90), None);
        assert_eq!(lifecycle.record_score(100), None);
        assert_eq!(lifecycle.record_score(115), Some(115));
        assert_eq!(lifecycle.high_score(), 115);
    }

    #[test]
    fn nothing_spawns_after_game_over() {
        let mut lifecycle = Lifecycle::default();
        let mut out = Vec::new();
        lifecycle.handle(
            &[Event::GameStarted { lives: 1 }],
            &status(1, 1, ShipState::Normal),
            &mut out,
        );
        lifecycle.handle(
            &[Event::GameOver { final_score: 0 }],
            &status(0, 1, ShipState::Dead),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
