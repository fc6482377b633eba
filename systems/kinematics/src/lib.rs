#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-frame integration of ships, asteroids and bullets.
//!
//! Every body advances by its velocity once per frame. Ships and asteroids wrap
//! to the opposite edge when they leave the playfield, bullets keep flying so
//! the collision resolver can discard them once they are off screen.

use asteroids_core::{heading_vector, Body, Bounds};

/// Acceleration applied along the facing angle for every thrusting frame.
pub const SHIP_THRUST: f32 = 0.05;

/// Fraction of the ship's velocity retained after every frame.
pub const SHIP_FRICTION: f32 = 0.99;

/// Tunable parameters of the ship's flight model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipDynamics {
    thrust: f32,
    friction: f32,
}

impl ShipDynamics {
    /// Creates a flight model with the provided thrust and friction factors.
    #[must_use]
    pub const fn new(thrust: f32, friction: f32) -> Self {
        Self { thrust, friction }
    }

    /// Acceleration applied while thrusting.
    #[must_use]
    pub const fn thrust(&self) -> f32 {
        self.thrust
    }

    /// Velocity damping factor applied every frame.
    #[must_use]
    pub const fn friction(&self) -> f32 {
        self.friction
    }
}

impl Default for ShipDynamics {
    fn default() -> Self {
        Self::new(SHIP_THRUST, SHIP_FRICTION)
    }
}

/// Integrates bodies against a fixed flight model.
#[derive(Clone, Copy, Debug, Default)]
pub struct Kinematics {
    dynamics: ShipDynamics,
}

impl Kinematics {
    /// Creates the integrator with the provided ship flight model.
    #[must_use]
    pub const fn new(dynamics: ShipDynamics) -> Self {
        Self { dynamics }
    }

    /// Flight model used for the ship.
    #[must_use]
    pub const fn dynamics(&self) -> ShipDynamics {
        self.dynamics
    }

    /// Advances the ship by one frame.
    ///
    /// Thrust accumulates along `angle` only while `thrusting` is set, friction
    /// damps the resulting velocity, then the ship moves and wraps.
    pub fn integrate_ship(&self, body: &mut Body, angle: f32, thrusting: bool, bounds: Bounds) {
        if thrusting {
            body.velocity += heading_vector(angle) * self.dynamics.thrust;
        }
        body.velocity *= self.dynamics.friction;
        body.position += body.velocity;
        wrap(body, bounds);
    }

    /// Advances a drifting asteroid by one frame and wraps it.
    pub fn integrate_asteroid(&self, body: &mut Body, bounds: Bounds) {
        body.position += body.velocity;
        wrap(body, bounds);
    }

    /// Advances a bullet by one frame. Bullets never wrap.
    pub fn integrate_bullet(&self, body: &mut Body) {
        body.position += body.velocity;
    }
}

/// Teleports a body that left the playfield to the opposite edge.
///
/// A coordinate below the body's radius jumps to the far boundary, a coordinate
/// beyond the far boundary jumps to the radius. Each axis is handled on its own.
pub fn wrap(body: &mut Body, bounds: Bounds) {
    let radius = body.radius;
    if body.position.x < radius {
        body.position.x = bounds.width();
    } else if body.position.x > bounds.width() {
        body.position.x = radius;
    }

    if body.position.y < radius {
        body.position.y = bounds.height();
    } else if body.position.y > bounds.height() {
        body.position.y = radius;
    }
}

/// Reports whether a bullet centre left the playfield.
#[must_use]
pub fn is_offscreen(body: &Body, bounds: Bounds) -> bool {
    let position = body.position;
    position.x < body.radius
        || position.x > bounds.width()
        || position.y < body.radius
        || position.y > bounds.height()
}
