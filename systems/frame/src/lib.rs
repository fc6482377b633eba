#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestrator that sequences one simulation step per displayed frame.
//!
//! Each call to [`FrameOrchestrator::tick`] clears the frame, feeds the sampled
//! input to the ship, advances the world, resolves collisions, lets the
//! lifecycle controller react, and finally issues audio, persistence and draw
//! requests. Once the game is over only the HUD and the game-over caption are
//! drawn.

use asteroids_audio::AudioSink;
use asteroids_core::{Command, Event, InputSnapshot, SessionMode, ShipState, SoundEffect};
use asteroids_rendering::{Hud, LevelText, Renderer};
use asteroids_score_store::ScoreStore;
use asteroids_system_collision::CollisionResolver;
use asteroids_system_lifecycle::{self as lifecycle, Lifecycle};
use asteroids_world::{self as world, query, World};
use log::{debug, warn};

const MAX_PUMP_ROUNDS: usize = 16;

/// Configuration for every component the orchestrator owns.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Config {
    world: world::Config,
    lifecycle: lifecycle::Config,
}

impl Config {
    /// Bundles the world and lifecycle configurations.
    #[must_use]
    pub const fn new(world: world::Config, lifecycle: lifecycle::Config) -> Self {
        Self { world, lifecycle }
    }

    /// World configuration.
    #[must_use]
    pub const fn world(&self) -> world::Config {
        self.world
    }

    /// Lifecycle configuration.
    #[must_use]
    pub const fn lifecycle(&self) -> lifecycle::Config {
        self.lifecycle
    }
}

/// Owns the session and its systems for the lifetime of the frame loop.
#[derive(Debug)]
pub struct FrameOrchestrator<A, S> {
    world: World,
    collision: CollisionResolver,
    lifecycle: Lifecycle,
    audio: A,
    store: S,
    thrust_playing: bool,
}

impl<A, S> FrameOrchestrator<A, S>
where
    A: AudioSink,
    S: ScoreStore,
{
    /// Creates the orchestrator and starts the first game.
    ///
    /// The best score is read from `store` once, here.
    pub fn new(config: Config, audio: A, mut store: S) -> Self {
        let high_score = store.read_high_score();
        debug!("loaded high score {high_score}");
        let mut orchestrator = Self {
            world: World::new(config.world),
            collision: CollisionResolver::new(),
            lifecycle: Lifecycle::new(config.lifecycle, high_score),
            audio,
            store,
            thrust_playing: false,
        };
        orchestrator.start_new_game();
        orchestrator
    }

    /// Discards the current session and starts a fresh one.
    pub fn start_new_game(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::NewGame, &mut events);
        let _ = self.pump_lifecycle(events);
    }

    /// Runs one frame against the sampled input.
    pub fn tick(&mut self, input: &InputSnapshot, renderer: &mut dyn Renderer) {
        renderer.clear_frame();

        if self.is_game_over() {
            self.present(renderer);
            return;
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SteerShip {
                thrust: input.thrust(),
                rotation: input.rotation(),
            },
            &mut events,
        );
        if input.fire() {
            world::apply(&mut self.world, Command::FireBullet, &mut events);
        }
        world::apply(&mut self.world, Command::Tick, &mut events);

        let mut commands = Vec::new();
        self.collision.handle(
            &events,
            &query::ship(&self.world),
            &query::asteroid_view(&self.world),
            &query::bullet_view(&self.world),
            query::bounds(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let frame_events = self.pump_lifecycle(events);
        self.persist_high_score();
        self.play_audio(&frame_events);
        self.present(renderer);
    }

    /// Feeds events to the lifecycle controller until it stops issuing commands.
    ///
    /// Returns every event observed, in order.
    fn pump_lifecycle(&mut self, initial: Vec<Event>) -> Vec<Event> {
        let mut log = initial.clone();
        let mut pending = initial;

        for _ in 0..MAX_PUMP_ROUNDS {
            let mut commands = Vec::new();
            self.lifecycle.handle(
                &pending,
                &query::session_status(&self.world),
                &mut commands,
            );
            if commands.is_empty() {
                return log;
            }

            pending.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut pending);
            }
            log.extend(pending.iter().cloned());
        }

        warn!("lifecycle still issuing commands after {MAX_PUMP_ROUNDS} rounds");
        log
    }

    fn persist_high_score(&mut self) {
        let score = query::ship(&self.world).score;
        if let Some(best) = self.lifecycle.record_score(score) {
            self.store.write_high_score(best);
        }
    }

    fn play_audio(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::BulletFired { .. } => self.audio.play(SoundEffect::Laser),
                Event::AsteroidDestroyed { .. } => self.audio.play(SoundEffect::Hit),
                Event::ShipExploded { .. } => {
                    self.stop_thrust();
                    self.audio.play(SoundEffect::Explosion);
                }
                _ => {}
            }
        }

        let ship = query::ship(&self.world);
        if ship.thrusting && ship.state.accepts_input() {
            if !self.thrust_playing {
                self.audio.play(SoundEffect::ThrustLoop);
                self.thrust_playing = true;
            }
        } else {
            self.stop_thrust();
        }
    }

    fn stop_thrust(&mut self) {
        if self.thrust_playing {
            self.audio.stop(SoundEffect::ThrustLoop);
            self.thrust_playing = false;
        }
    }

    fn present(&self, renderer: &mut dyn Renderer) {
        let status = query::session_status(&self.world);
        if status.mode == SessionMode::Playing {
            let ship = query::ship(&self.world);
            match ship.state {
                ShipState::Exploding { .. } => {
                    renderer.draw_explosion(ship.body.position, ship.body.radius);
                }
                ShipState::Invulnerable { .. } | ShipState::Normal => {
                    renderer.draw_ship(&ship, ship.state.blink_visible());
                }
                ShipState::Dead => {}
            }

            for asteroid in query::asteroid_view(&self.world).iter() {
                renderer.draw_asteroid(asteroid);
            }
            for bullet in query::bullet_view(&self.world).iter() {
                renderer.draw_bullet(bullet);
            }
        }

        renderer.draw_hud(&Hud {
            lives: status.lives,
            score: status.score,
            high_score: self.lifecycle.high_score(),
            level_text: self.lifecycle.level_banner().map(|banner| LevelText {
                level: banner.level(),
                alpha: banner.alpha(),
            }),
            ship_crashed: status.ship_state.is_crashed(),
        });

        if status.mode == SessionMode::GameOver {
            renderer.draw_game_over();
        }
    }

    /// Whether the session ended.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        query::session_status(&self.world).mode == SessionMode::GameOver
    }

    /// Read-only access to the session.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the session for harnesses that script it directly.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Lifecycle controller state, including the level banner and best score.
    #[must_use]
    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    /// Audio collaborator.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Score store collaborator.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
