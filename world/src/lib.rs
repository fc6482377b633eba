#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Asteroids.
//!
//! The [`World`] is the game session aggregate. It exclusively owns the ship,
//! the asteroid belt, the bullets in flight, the lives counter and the random
//! number generator. [`apply`] is the only way to mutate it; [`query`] hands out
//! read-only snapshots.

mod asteroids;
mod bullets;
mod ship;

use asteroids_core::{
    AsteroidId, AsteroidTier, Bounds, BulletId, Command, Event, SessionMode, ShipState,
};
use asteroids_system_kinematics::Kinematics;
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    asteroids::{AsteroidBelt, Placement},
    bullets::Magazine,
    ship::{Ship, TimerTransition},
};

pub use asteroids::{level_speed, SPAWN_CLEARANCE};
pub use bullets::{bullet_radius, BULLET_SPEED};
pub use ship::{
    BLINK_CYCLES, BLINK_INTERVAL, EXPLOSION_FRAMES, ROTATION_SPEED, SHIP_RADIUS, SPAWN_ANGLE,
};

/// Seed used when the caller does not supply one.
pub const DEFAULT_RNG_SEED: u64 = 0x5eed_a57e_701d_0001;

/// Lives granted at the start of a session.
pub const STARTING_LIVES: u32 = 3;

/// Parameters fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    bounds: Bounds,
    starting_lives: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a world configuration.
    #[must_use]
    pub const fn new(bounds: Bounds, starting_lives: u32, rng_seed: u64) -> Self {
        Self {
            bounds,
            starting_lives,
            rng_seed,
        }
    }

    /// Playfield the session takes place on.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Lives granted when a new game starts.
    #[must_use]
    pub const fn starting_lives(&self) -> u32 {
        self.starting_lives
    }

    /// Seed for asteroid placement and shape generation.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Bounds::CLASSIC, STARTING_LIVES, DEFAULT_RNG_SEED)
    }
}

/// Represents the authoritative Asteroids session state.
#[derive(Debug)]
pub struct World {
    config: Config,
    kinematics: Kinematics,
    rng: ChaCha8Rng,
    ship: Ship,
    asteroids: AsteroidBelt,
    bullets: Magazine,
    lives: u32,
    level: u32,
    mode: SessionMode,
    frame: u64,
}

impl World {
    /// Creates a world with a parked ship and no asteroids.
    ///
    /// Nothing moves until [`Command::NewGame`] is applied.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            kinematics: Kinematics::default(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            ship: Ship::spawn(config.bounds),
            asteroids: AsteroidBelt::new(),
            bullets: Magazine::new(),
            lives: config.starting_lives.max(1),
            level: 0,
            mode: SessionMode::Playing,
            frame: 0,
            config,
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.ship = Ship::spawn(self.config.bounds);
        self.asteroids.clear();
        self.bullets.clear();
        self.lives = self.config.starting_lives.max(1);
        self.level = 0;
        self.mode = SessionMode::Playing;
        self.frame = 0;
        info!("new game started with {} lives", self.lives);
        out_events.push(Event::GameStarted { lives: self.lives });
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        let bounds = self.config.bounds;
        let kinematics = self.kinematics;
        self.frame = self.frame.saturating_add(1);

        match self.ship.tick_timers() {
            Some(TimerTransition::InvulnerabilityEnded) => {
                debug!("ship invulnerability ended at frame {}", self.frame);
                out_events.push(Event::InvulnerabilityEnded);
            }
            Some(TimerTransition::ExplosionFinished) => {
                out_events.push(Event::ExplosionFinished);
            }
            None => {}
        }

        if self.ship.state.accepts_input() {
            let ship = &mut self.ship;
            kinematics.integrate_ship(&mut ship.body, ship.angle, ship.thrusting, bounds);
        }

        for asteroid in self.asteroids.iter_mut() {
            kinematics.integrate_asteroid(&mut asteroid.body, bounds);
        }

        for bullet in self.bullets.iter_mut() {
            kinematics.integrate_bullet(&mut bullet.body);
        }

        out_events.push(Event::TimeAdvanced { frame: self.frame });
    }

    fn destroy_asteroid(
        &mut self,
        asteroid: AsteroidId,
        bullet: BulletId,
        out_events: &mut Vec<Event>,
    ) {
        if !self.bullets.contains(bullet) {
            return;
        }
        let Some(destroyed) = self.asteroids.remove(asteroid) else {
            return;
        };
        let _ = self.bullets.remove(bullet);

        let tier = destroyed.tier;
        let position = destroyed.body.position;
        let points = tier.points();
        out_events.push(Event::AsteroidDestroyed {
            asteroid,
            bullet,
            tier,
            points,
            position,
        });

        let score = self.ship.award(points);
        out_events.push(Event::ScoreChanged { score });

        if let Some(fragment_tier) = tier.split_into() {
            let bounds = self.config.bounds;
            let placement = Placement::At(position);
            let first =
                self.asteroids
                    .spawn(&mut self.rng, fragment_tier, self.level, placement, bounds);
            let second =
                self.asteroids
                    .spawn(&mut self.rng, fragment_tier, self.level, placement, bounds);
            out_events.push(Event::AsteroidSplit {
                parent: asteroid,
                fragments: [first, second],
            });
        }
    }

    fn spawn_wave(&mut self, level: u32, count: u32, out_events: &mut Vec<Event>) {
        self.level = level;
        let bounds = self.config.bounds;
        let placement = Placement::AwayFrom(self.ship.body.position);
        for _ in 0..count {
            let _ = self.asteroids.spawn(
                &mut self.rng,
                AsteroidTier::Large,
                level,
                placement,
                bounds,
            );
        }
        debug!("level {level} wave spawned with {count} asteroids");
        out_events.push(Event::WaveSpawned { level, count });
    }

    fn lose_life(&mut self, out_events: &mut Vec<Event>) {
        if self.ship.state != (ShipState::Exploding { frames_remaining: 0 }) {
            return;
        }

        self.ship.state = ShipState::Dead;
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.mode = SessionMode::GameOver;
            info!("game over with a final score of {}", self.ship.score);
            out_events.push(Event::GameOver {
                final_score: self.ship.score,
            });
        } else {
            debug!("life lost, {} remaining", self.lives);
            out_events.push(Event::LifeLost {
                remaining: self.lives,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands referring to unknown entities, or arriving after the game ended,
/// are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.mode == SessionMode::GameOver && command != Command::NewGame {
        return;
    }

    match command {
        Command::NewGame => world.reset(out_events),
        Command::SteerShip { thrust, rotation } => world.ship.steer(thrust, rotation),
        Command::FireBullet => {
            if !world.ship.state.accepts_input() {
                return;
            }
            let position = world.ship.nose();
            let bullet = world.bullets.fire(position, world.ship.angle);
            out_events.push(Event::BulletFired { bullet, position });
        }
        Command::Tick => world.advance(out_events),
        Command::DestroyAsteroid { asteroid, bullet } => {
            world.destroy_asteroid(asteroid, bullet, out_events);
        }
        Command::RemoveBullet { bullet } => {
            if world.bullets.remove(bullet).is_some() {
                out_events.push(Event::BulletRemoved { bullet });
            }
        }
        Command::ExplodeShip => {
            if world.ship.explode() {
                debug!("ship exploded at frame {}", world.frame);
                out_events.push(Event::ShipExploded {
                    position: world.ship.body.position,
                });
            }
        }
        Command::SpawnWave { level, count } => world.spawn_wave(level, count, out_events),
        Command::LoseLife => world.lose_life(out_events),
        Command::RespawnShip => {
            if world.ship.state != ShipState::Dead {
                return;
            }
            world.ship = Ship::spawn(world.config.bounds);
            out_events.push(Event::ShipRespawned);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use asteroids_core::{
        AsteroidSnapshot, AsteroidView, Bounds, BulletSnapshot, BulletView, SessionStatus,
        ShipSnapshot,
    };

    /// Playfield the session takes place on.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.config.bounds
    }

    /// Number of frames simulated since the session started.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Captures the current ship.
    #[must_use]
    pub fn ship(world: &World) -> ShipSnapshot {
        world.ship.snapshot()
    }

    /// Captures a read-only view of the live asteroids.
    #[must_use]
    pub fn asteroid_view(world: &World) -> AsteroidView {
        let snapshots: Vec<AsteroidSnapshot> =
            world.asteroids.iter().map(|asteroid| asteroid.snapshot()).collect();
        AsteroidView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        let snapshots: Vec<BulletSnapshot> =
            world.bullets.iter().map(|bullet| bullet.snapshot()).collect();
        BulletView::from_snapshots(snapshots)
    }

    /// Summarises lives, level, mode and ship phase.
    #[must_use]
    pub fn session_status(world: &World) -> SessionStatus {
        SessionStatus {
            mode: world.mode,
            level: world.level,
            lives: world.lives,
            asteroid_count: world.asteroids.len(),
            ship_state: world.ship.state,
            score: world.ship.score,
        }
    }
}

/// Helpers that place entities directly, bypassing the random generators.
#[cfg(any(test, feature = "test_scaffolding"))]
pub mod scaffolding {
    use super::World;
    use asteroids_core::{AsteroidId, AsteroidTier, Body, BulletId, ShipState};
    use glam::Vec2;

    /// Removes every asteroid from the belt.
    pub fn clear_asteroids(world: &mut World) {
        world.asteroids.clear();
    }

    /// Inserts an asteroid with the provided tier and body.
    pub fn place_asteroid(world: &mut World, tier: AsteroidTier, body: Body) -> AsteroidId {
        world.asteroids.insert(tier, body)
    }

    /// Fires a bullet from an arbitrary position and angle.
    pub fn place_bullet(world: &mut World, position: Vec2, angle: f32) -> BulletId {
        world.bullets.fire(position, angle)
    }

    /// Forces the ship into the provided phase.
    pub fn set_ship_state(world: &mut World, state: ShipState) {
        world.ship.state = state;
    }

    /// Teleports the ship and brings it to rest.
    pub fn move_ship(world: &mut World, position: Vec2) {
        world.ship.body.position = position;
        world.ship.body.velocity = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::{Body, Rotation};
    use glam::Vec2;

    fn started_world() -> (World, Vec<Event>) {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(&mut world, Command::NewGame, &mut events);
        (world, events)
    }

    #[test]
    fn new_game_announces_the_starting_lives() {
        let (world, events) = started_world();
        assert_eq!(events, vec![Event::GameStarted { lives: 3 }]);
        let status = query::session_status(&world);
        assert_eq!(status.lives, 3);
        assert_eq!(status.asteroid_count, 0);
        assert!(status.ship_state.is_invulnerable());
    }

    #[test]
    fn spawn_wave_creates_large_asteroids_clear_of_the_ship() {
        let (mut world, mut events) = started_world();
        events.clear();
        apply(
            &mut world,
            Command::SpawnWave { level: 1, count: 2 },
            &mut events,
        );

        assert_eq!(events, vec![Event::WaveSpawned { level: 1, count: 2 }]);
        let ship = query::ship(&world);
        let view = query::asteroid_view(&world);
        assert_eq!(view.len(), 2);
        for asteroid in view.iter() {
            assert_eq!(asteroid.tier, AsteroidTier::Large);
            assert!(asteroid.body.position.distance(ship.body.position) > SPAWN_CLEARANCE);
        }
        assert_eq!(query::session_status(&world).level, 1);
    }

    #[test]
    fn destroying_a_large_asteroid_splits_and_scores() {
        let (mut world, mut events) = started_world();
        let position = Vec2::new(100.0, 100.0);
        let asteroid = scaffolding::place_asteroid(
            &mut world,
            AsteroidTier::Large,
            Body::at_rest(position, AsteroidTier::Large.radius()),
        );
        let bullet = scaffolding::place_bullet(&mut world, position, 0.0);
        events.clear();

        apply(
            &mut world,
            Command::DestroyAsteroid { asteroid, bullet },
            &mut events,
        );

        let view = query::asteroid_view(&world);
        assert_eq!(view.len(), 2);
        assert!(view
            .iter()
            .all(|fragment| fragment.tier == AsteroidTier::Medium
                && fragment.body.position == position
                && fragment.id > asteroid));
        assert!(query::bullet_view(&world).is_empty());
        assert_eq!(query::ship(&world).score, 15);
        assert!(events.contains(&Event::ScoreChanged { score: 15 }));
    }

    #[test]
    fn destroying_a_small_asteroid_leaves_nothing_behind() {
        let (mut world, mut events) = started_world();
        let position = Vec2::new(600.0, 100.0);
        let asteroid = scaffolding::place_asteroid(
            &mut world,
            AsteroidTier::Small,
            Body::at_rest(position, AsteroidTier::Small.radius()),
        );
        let bullet = scaffolding::place_bullet(&mut world, position, 0.0);
        apply(
            &mut world,
            Command::DestroyAsteroid { asteroid, bullet },
            &mut events,
        );

        assert!(query::asteroid_view(&world).is_empty());
        assert_eq!(query::ship(&world).score, 50);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::AsteroidSplit { .. })));
    }

    #[test]
    fn stale_destroy_commands_are_ignored() {
        let (mut world, mut events) = started_world();
        let position = Vec2::new(600.0, 500.0);
        let asteroid = scaffolding::place_asteroid(
            &mut world,
            AsteroidTier::Medium,
            Body::at_rest(position, AsteroidTier::Medium.radius()),
        );
        let bullet = scaffolding::place_bullet(&mut world, position, 0.0);
        apply(
            &mut world,
            Command::DestroyAsteroid { asteroid, bullet },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::DestroyAsteroid { asteroid, bullet },
            &mut events,
        );

        assert!(events.is_empty());
        assert_eq!(query::asteroid_view(&world).len(), 2);
        assert_eq!(query::ship(&world).score, 30);
    }

    #[test]
    fn firing_spawns_a_bullet_at_the_nose() {
        let (mut world, mut events) = started_world();
        apply(&mut world, Command::FireBullet, &mut events);

        let ship = query::ship(&world);
        let bullets = query::bullet_view(&world);
        let bullet = bullets.iter().next().copied().expect("bullet fired");
        assert_eq!(bullet.body.position, ship.nose());
        assert_eq!(bullet.angle, ship.angle);
        assert!((bullet.body.velocity.length() - BULLET_SPEED).abs() < 1e-4);
    }

    #[test]
    fn exploding_ship_cannot_fire_or_move() {
        let (mut world, mut events) = started_world();
        scaffolding::set_ship_state(&mut world, ShipState::Normal);
        apply(&mut world, Command::ExplodeShip, &mut events);
        let before = query::ship(&world);

        apply(
            &mut world,
            Command::SteerShip {
                thrust: true,
                rotation: Some(Rotation::Left),
            },
            &mut events,
        );
        apply(&mut world, Command::FireBullet, &mut events);
        apply(&mut world, Command::Tick, &mut events);

        let after = query::ship(&world);
        assert!(query::bullet_view(&world).is_empty());
        assert_eq!(after.body.position, before.body.position);
        assert_eq!(after.angle, before.angle);
    }

    #[test]
    fn invulnerable_ship_ignores_explode_commands() {
        let (mut world, mut events) = started_world();
        events.clear();
        apply(&mut world, Command::ExplodeShip, &mut events);
        assert!(events.is_empty());
        assert!(query::ship(&world).state.is_invulnerable());
    }

    #[test]
    fn explosion_countdown_finishes_after_the_configured_frames() {
        let (mut world, mut events) = started_world();
        scaffolding::set_ship_state(&mut world, ShipState::Normal);
        apply(&mut world, Command::ExplodeShip, &mut events);
        events.clear();

        for _ in 1..EXPLOSION_FRAMES {
            apply(&mut world, Command::Tick, &mut events);
        }
        assert!(!events.contains(&Event::ExplosionFinished));

        apply(&mut world, Command::Tick, &mut events);
        assert!(events.contains(&Event::ExplosionFinished));
    }

    #[test]
    fn losing_the_last_life_ends_the_session() {
        let mut world = World::new(Config::new(Bounds::CLASSIC, 1, 9));
        let mut events = Vec::new();
        apply(&mut world, Command::NewGame, &mut events);
        scaffolding::set_ship_state(
            &mut world,
            ShipState::Exploding {
                frames_remaining: 0,
            },
        );
        events.clear();

        apply(&mut world, Command::LoseLife, &mut events);
        apply(&mut world, Command::LoseLife, &mut events);

        assert_eq!(events, vec![Event::GameOver { final_score: 0 }]);
        let status = query::session_status(&world);
        assert_eq!(status.mode, SessionMode::GameOver);
        assert_eq!(status.lives, 0);
        assert_eq!(status.ship_state, ShipState::Dead);
    }

    #[test]
    fn lives_decrement_once_per_death_and_a_fresh_ship_respawns() {
        let (mut world, mut events) = started_world();
        scaffolding::set_ship_state(
            &mut world,
            ShipState::Exploding {
                frames_remaining: 0,
            },
        );
        events.clear();

        apply(&mut world, Command::LoseLife, &mut events);
        apply(&mut world, Command::LoseLife, &mut events);
        apply(&mut world, Command::RespawnShip, &mut events);

        assert_eq!(
            events,
            vec![Event::LifeLost { remaining: 2 }, Event::ShipRespawned]
        );
        let ship = query::ship(&world);
        assert!(ship.state.is_invulnerable());
        assert_eq!(ship.score, 0);
        assert_eq!(ship.body.position, Bounds::CLASSIC.center());
    }

    #[test]
    fn game_over_freezes_the_world() {
        let mut world = World::new(Config::new(Bounds::CLASSIC, 1, 9));
        let mut events = Vec::new();
        apply(&mut world, Command::NewGame, &mut events);
        apply(
            &mut world,
            Command::SpawnWave { level: 1, count: 2 },
            &mut events,
        );
        scaffolding::set_ship_state(
            &mut world,
            ShipState::Exploding {
                frames_remaining: 0,
            },
        );
        apply(&mut world, Command::LoseLife, &mut events);
        let before = query::asteroid_view(&world).into_vec();
        events.clear();

        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::FireBullet, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::asteroid_view(&world).into_vec(), before);
    }

    #[test]
    fn offscreen_removal_reports_each_bullet() {
        let (mut world, mut events) = started_world();
        let bullet = scaffolding::place_bullet(&mut world, Vec2::new(900.0, 100.0), 0.0);
        events.clear();

        apply(&mut world, Command::RemoveBullet { bullet }, &mut events);
        apply(&mut world, Command::RemoveBullet { bullet }, &mut events);

        assert_eq!(events, vec![Event::BulletRemoved { bullet }]);
    }

    #[test]
    fn asteroids_drift_and_wrap_every_tick() {
        let (mut world, mut events) = started_world();
        let asteroid = scaffolding::place_asteroid(
            &mut world,
            AsteroidTier::Small,
            Body::new(Vec2::new(14.0, 300.0), Vec2::new(-2.0, 0.0), 13.0),
        );
        apply(&mut world, Command::Tick, &mut events);

        let view = query::asteroid_view(&world);
        let moved = view
            .iter()
            .find(|snapshot| snapshot.id == asteroid)
            .expect("asteroid");
        assert_eq!(moved.body.position, Vec2::new(800.0, 300.0));
    }
}
