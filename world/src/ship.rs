//! Ship record and its per-frame state transitions.

use std::f32::consts::PI;

use asteroids_core::{
    heading_vector, BlinkTimer, Body, Bounds, Rotation, ShipSnapshot, ShipState,
};
use glam::Vec2;

/// Collision radius of the ship.
pub const SHIP_RADIUS: f32 = 15.0;

/// Angle added per frame while a rotation input is held.
///
/// The classic cabinet rotated by 0.0005 "degrees" and converted with 180/pi,
/// which amounts to roughly 0.0286 radians per frame.
pub const ROTATION_SPEED: f32 = 0.0005 * 180.0 / PI;

/// Facing angle of a freshly spawned ship; the nose points towards -x.
pub const SPAWN_ANGLE: f32 = PI;

/// Frames the explosion plays before the life is spent.
pub const EXPLOSION_FRAMES: u32 = 120;

/// Frames per blink cycle during invulnerability.
pub const BLINK_INTERVAL: u32 = 6;

/// Number of blink cycles that make up the invulnerability window.
pub const BLINK_CYCLES: u32 = 30;

/// Outcome of advancing the ship's timers by one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerTransition {
    /// The blink countdown ran out and the ship became vulnerable.
    InvulnerabilityEnded,
    /// The explosion countdown reached zero.
    ExplosionFinished,
}

#[derive(Clone, Debug)]
pub(crate) struct Ship {
    pub(crate) body: Body,
    pub(crate) angle: f32,
    pub(crate) state: ShipState,
    pub(crate) score: u32,
    pub(crate) thrusting: bool,
}

impl Ship {
    /// Creates a ship at the centre of the playfield inside its invulnerability window.
    pub(crate) fn spawn(bounds: Bounds) -> Self {
        Self {
            body: Body::at_rest(bounds.center(), SHIP_RADIUS),
            angle: SPAWN_ANGLE,
            state: ShipState::Invulnerable {
                blink: BlinkTimer::new(BLINK_INTERVAL, BLINK_CYCLES),
            },
            score: 0,
            thrusting: false,
        }
    }

    pub(crate) fn steer(&mut self, thrust: bool, rotation: Option<Rotation>) {
        if !self.state.accepts_input() {
            self.thrusting = false;
            return;
        }

        self.thrusting = thrust;
        if let Some(rotation) = rotation {
            self.angle += rotation.sign() * ROTATION_SPEED;
        }
    }

    pub(crate) fn nose(&self) -> Vec2 {
        self.body.position + heading_vector(self.angle) * self.body.radius
    }

    pub(crate) fn award(&mut self, points: u32) -> u32 {
        self.score = self.score.saturating_add(points);
        self.score
    }

    /// Starts the explosion sequence. Only a vulnerable ship can explode.
    pub(crate) fn explode(&mut self) -> bool {
        if !self.state.is_vulnerable() {
            return false;
        }

        self.state = ShipState::Exploding {
            frames_remaining: EXPLOSION_FRAMES,
        };
        self.thrusting = false;
        true
    }

    pub(crate) fn tick_timers(&mut self) -> Option<TimerTransition> {
        match &mut self.state {
            ShipState::Invulnerable { blink } => {
                if blink.tick() {
                    self.state = ShipState::Normal;
                    Some(TimerTransition::InvulnerabilityEnded)
                } else {
                    None
                }
            }
            ShipState::Exploding { frames_remaining } => {
                if *frames_remaining == 0 {
                    return None;
                }
                *frames_remaining -= 1;
                (*frames_remaining == 0).then_some(TimerTransition::ExplosionFinished)
            }
            ShipState::Normal | ShipState::Dead => None,
        }
    }

    pub(crate) fn snapshot(&self) -> ShipSnapshot {
        ShipSnapshot {
            body: self.body,
            angle: self.angle,
            state: self.state,
            score: self.score,
            thrusting: self.thrusting,
        }
    }
}
