#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Proximity checks between bullets, asteroids and the ship.
//!
//! The resolver only detects. Every collision it finds becomes a command for the
//! world, which performs the removal, scoring and splitting.

use std::collections::BTreeSet;

use asteroids_core::{
    AsteroidId, AsteroidView, Bounds, BulletId, BulletView, Command, Event, ShipSnapshot,
};
use asteroids_system_kinematics::is_offscreen;

/// Pure system that turns overlapping bodies into resolution commands.
#[derive(Debug, Default)]
pub struct CollisionResolver {
    claimed: BTreeSet<BulletId>,
    destroyed: BTreeSet<AsteroidId>,
}

impl CollisionResolver {
    /// Creates a resolver with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans the current frame for collisions once time advanced.
    pub fn handle(
        &mut self,
        events: &[Event],
        ship: &ShipSnapshot,
        asteroids: &AsteroidView,
        bullets: &BulletView,
        bounds: Bounds,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        self.claimed.clear();
        self.destroyed.clear();

        self.resolve_bullet_hits(asteroids, bullets, out);
        self.remove_offscreen_bullets(bullets, bounds, out);
        self.resolve_ship_hit(ship, asteroids, out);
    }

    fn resolve_bullet_hits(
        &mut self,
        asteroids: &AsteroidView,
        bullets: &BulletView,
        out: &mut Vec<Command>,
    ) {
        for asteroid in asteroids.iter() {
            let hit = bullets.iter().find(|bullet| {
                !self.claimed.contains(&bullet.id) && bullet.body.overlaps(&asteroid.body)
            });
            let Some(bullet) = hit else {
                continue;
            };

            let _ = self.claimed.insert(bullet.id);
            let _ = self.destroyed.insert(asteroid.id);
            out.push(Command::DestroyAsteroid {
                asteroid: asteroid.id,
                bullet: bullet.id,
            });
        }
    }

    fn remove_offscreen_bullets(
        &mut self,
        bullets: &BulletView,
        bounds: Bounds,
        out: &mut Vec<Command>,
    ) {
        for bullet in bullets.iter() {
            if self.claimed.contains(&bullet.id) || !is_offscreen(&bullet.body, bounds) {
                continue;
            }
            out.push(Command::RemoveBullet { bullet: bullet.id });
        }
    }

    fn resolve_ship_hit(
        &self,
        ship: &ShipSnapshot,
        asteroids: &AsteroidView,
        out: &mut Vec<Command>,
    ) {
        if !ship.state.is_vulnerable() {
            return;
        }

        let struck = asteroids.iter().any(|asteroid| {
            !self.destroyed.contains(&asteroid.id) && asteroid.body.overlaps(&ship.body)
        });
        if struck {
            out.push(Command::ExplodeShip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asteroids_core::{
        AsteroidSnapshot, AsteroidTier, BlinkTimer, Body, BulletSnapshot, ShipState,
    };
    use glam::Vec2;

    fn asteroid(id: u32, x: f32, y: f32) -> AsteroidSnapshot {
        AsteroidSnapshot {
            id: AsteroidId::new(id),
            tier: AsteroidTier::Large,
            body: Body::at_rest(Vec2::new(x, y), AsteroidTier::Large.radius()),
            heading: 0.0,
            speed: 1.0,
            jaggedness: vec![1.0; 5],
        }
    }

    fn bullet(id: u32, x: f32, y: f32) -> BulletSnapshot {
        BulletSnapshot {
            id: BulletId::new(id),
            body: Body::at_rest(Vec2::new(x, y), 8f32.sqrt()),
            angle: 0.0,
        }
    }

    fn ship(state: ShipState, x: f32, y: f32) -> ShipSnapshot {
        ShipSnapshot {
            body: Body::at_rest(Vec2::new(x, y), 15.0),
            angle: 0.0,
            state,
            score: 0,
            thrusting: false,
        }
    }

    fn tick() -> Vec<Event> {
        vec![Event::TimeAdvanced { frame: 1 }]
    }

    #[test]
    fn nothing_happens_without_time_advancing() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            &[],
            &ship(ShipState::Normal, 100.0, 100.0),
            &AsteroidView::from_snapshots(vec![asteroid(1, 100.0, 100.0)]),
            &BulletView::default(),
            Bounds::CLASSIC,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn a_bullet_destroys_at_most_one_asteroid() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            &tick(),
            &ship(ShipState::Normal, 700.0, 500.0),
            &AsteroidView::from_snapshots(vec![
                asteroid(2, 210.0, 200.0),
                asteroid(1, 190.0, 200.0),
            ]),
            &BulletView::from_snapshots(vec![bullet(1, 200.0, 200.0)]),
            Bounds::CLASSIC,
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::DestroyAsteroid {
                asteroid: AsteroidId::new(1),
                bullet: BulletId::new(1),
            }]
        );
    }

    #[test]
    fn every_offscreen_bullet_is_removed_in_one_pass() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            &tick(),
            &ship(ShipState::Normal, 400.0, 300.0),
            &AsteroidView::default(),
            &BulletView::from_snapshots(vec![
                bullet(1, 805.0, 300.0),
                bullet(2, 400.0, 300.0),
                bullet(3, 400.0, -4.0),
            ]),
            Bounds::CLASSIC,
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Command::RemoveBullet {
                    bullet: BulletId::new(1)
                },
                Command::RemoveBullet {
                    bullet: BulletId::new(3)
                },
            ]
        );
    }

    #[test]
    fn invulnerable_ship_survives_overlap() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            &tick(),
            &ship(
                ShipState::Invulnerable {
                    blink: BlinkTimer::new(6, 1),
                },
                100.0,
                100.0,
            ),
            &AsteroidView::from_snapshots(vec![asteroid(1, 100.0, 100.0)]),
            &BulletView::default(),
            Bounds::CLASSIC,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn vulnerable_ship_explodes_once_per_frame() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            &tick(),
            &ship(ShipState::Normal, 100.0, 100.0),
            &AsteroidView::from_snapshots(vec![
                asteroid(1, 100.0, 100.0),
                asteroid(2, 120.0, 100.0),
            ]),
            &BulletView::default(),
            Bounds::CLASSIC,
            &mut out,
        );
        assert_eq!(out, vec![Command::ExplodeShip]);
    }

    #[test]
    fn asteroid_shot_this_frame_cannot_hit_the_ship() {
        let mut resolver = CollisionResolver::new();
        let mut out = Vec::new();
        resolver.handle(
            &tick(),
            &ship(ShipState::Normal, 100.0, 100.0),
            &AsteroidView::from_snapshots(vec![asteroid(1, 140.0, 100.0)]),
            &BulletView::from_snapshots(vec![bullet(4, 170.0, 100.0)]),
            Bounds::CLASSIC,
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::DestroyAsteroid {
                asteroid: AsteroidId::new(1),
                bullet: BulletId::new(4),
            }]
        );
    }
}
