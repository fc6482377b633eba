//! Asteroid population: id allocation, spawning and splitting.

use std::f32::consts::TAU;

use asteroids_core::{heading_vector, AsteroidId, AsteroidSnapshot, AsteroidTier, Body, Bounds};
use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::ship::SHIP_RADIUS;

/// Minimum distance between the ship and a freshly spawned asteroid.
pub const SPAWN_CLEARANCE: f32 = 2.0 * AsteroidTier::Large.radius() + SHIP_RADIUS;

const MIN_VERTICES: usize = 5;
const MAX_VERTICES: usize = 15;
const JAGGEDNESS_MIN: f32 = 0.5;
const JAGGEDNESS_MAX: f32 = 1.5;
const BASE_SPEED: f64 = 0.6;
const SPEED_PER_LEVEL: f64 = 0.1;
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Drift speed of every asteroid created during the provided level.
#[must_use]
pub fn level_speed(level: u32) -> f32 {
    (BASE_SPEED + SPEED_PER_LEVEL * f64::from(level)).ceil() as f32
}

/// Where a new asteroid should appear.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Placement {
    /// Exactly at the provided point.
    At(Vec2),
    /// Anywhere on the playfield farther than the spawn clearance from the ship.
    AwayFrom(Vec2),
}

#[derive(Clone, Debug)]
pub(crate) struct Asteroid {
    pub(crate) id: AsteroidId,
    pub(crate) tier: AsteroidTier,
    pub(crate) body: Body,
    pub(crate) heading: f32,
    pub(crate) speed: f32,
    pub(crate) jaggedness: Vec<f32>,
}

impl Asteroid {
    pub(crate) fn snapshot(&self) -> AsteroidSnapshot {
        AsteroidSnapshot {
            id: self.id,
            tier: self.tier,
            body: self.body,
            heading: self.heading,
            speed: self.speed,
            jaggedness: self.jaggedness.clone(),
        }
    }
}

/// Ordered collection of live asteroids plus the monotonic id counter.
#[derive(Debug)]
pub(crate) struct AsteroidBelt {
    asteroids: Vec<Asteroid>,
    next_id: AsteroidId,
}

impl AsteroidBelt {
    pub(crate) fn new() -> Self {
        Self {
            asteroids: Vec::new(),
            next_id: AsteroidId::new(1),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.asteroids.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.asteroids.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Asteroid> {
        self.asteroids.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Asteroid> {
        self.asteroids.iter_mut()
    }

    pub(crate) fn remove(&mut self, id: AsteroidId) -> Option<Asteroid> {
        let index = self.asteroids.iter().position(|asteroid| asteroid.id == id)?;
        Some(self.asteroids.remove(index))
    }

    fn allocate_id(&mut self) -> AsteroidId {
        let id = self.next_id;
        self.next_id = AsteroidId::new(id.get().saturating_add(1));
        id
    }

    /// Generates a fresh asteroid of the given tier and appends it to the belt.
    pub(crate) fn spawn(
        &mut self,
        rng: &mut ChaCha8Rng,
        tier: AsteroidTier,
        level: u32,
        placement: Placement,
        bounds: Bounds,
    ) -> AsteroidId {
        let position = match placement {
            Placement::At(position) => position,
            Placement::AwayFrom(ship) => clear_position(rng, ship, bounds),
        };

        let vertices = rng.gen_range(MIN_VERTICES..=MAX_VERTICES);
        let jaggedness: Vec<f32> = (0..vertices)
            .map(|_| rng.gen_range(JAGGEDNESS_MIN..JAGGEDNESS_MAX))
            .collect();
        let heading = rng.gen_range(0.0..TAU);
        let speed = level_speed(level);
        let velocity = heading_vector(heading) * speed * jaggedness[0];

        let id = self.allocate_id();
        self.asteroids.push(Asteroid {
            id,
            tier,
            body: Body::new(position, velocity, tier.radius()),
            heading,
            speed,
            jaggedness,
        });
        id
    }

    /// Inserts a fully specified asteroid, allocating a fresh id for it.
    #[cfg(any(test, feature = "test_scaffolding"))]
    pub(crate) fn insert(&mut self, tier: AsteroidTier, body: Body) -> AsteroidId {
        let id = self.allocate_id();
        self.asteroids.push(Asteroid {
            id,
            tier,
            body,
            heading: 0.0,
            speed: body.velocity.length(),
            jaggedness: vec![1.0; MIN_VERTICES],
        });
        id
    }
}

/// Whether `candidate` lies strictly beyond the spawn clearance around `ship`.
fn clears_ship(candidate: Vec2, ship: Vec2) -> bool {
    candidate.distance(ship) > SPAWN_CLEARANCE
}

/// Samples playfield positions until one lies outside the spawn clearance.
///
/// Falls back to the playfield corner farthest from the ship when sampling
/// keeps landing too close.
fn clear_position(rng: &mut ChaCha8Rng, ship: Vec2, bounds: Bounds) -> Vec2 {
    let columns = bounds.width().max(1.0) as u32;
    let rows = bounds.height().max(1.0) as u32;
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let candidate = Vec2::new(
            rng.gen_range(0..columns) as f32,
            rng.gen_range(0..rows) as f32,
        );
        if clears_ship(candidate, ship) {
            return candidate;
        }
    }

    let corners = [
        Vec2::ZERO,
        Vec2::new(bounds.width(), 0.0),
        Vec2::new(0.0, bounds.height()),
        Vec2::new(bounds.width(), bounds.height()),
    ];
    corners
        .into_iter()
        .fold(Vec2::ZERO, |farthest, corner| {
            if corner.distance(ship) > farthest.distance(ship) {
                corner
            } else {
                farthest
            }
        })
}
