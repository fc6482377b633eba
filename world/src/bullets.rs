//! Bullets fired by the ship.

use asteroids_core::{heading_vector, Body, BulletId, BulletSnapshot};
use glam::Vec2;

/// Distance travelled by a bullet every frame.
pub const BULLET_SPEED: f32 = 5.0;

const BULLET_EXTENT: f32 = 4.0;

/// Collision radius of a bullet: the half-diagonal of its square sprite.
#[must_use]
pub fn bullet_radius() -> f32 {
    let half = BULLET_EXTENT / 2.0;
    (half * half + half * half).sqrt()
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Bullet {
    pub(crate) id: BulletId,
    pub(crate) body: Body,
    pub(crate) angle: f32,
}

impl Bullet {
    pub(crate) fn snapshot(&self) -> BulletSnapshot {
        BulletSnapshot {
            id: self.id,
            body: self.body,
            angle: self.angle,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Magazine {
    bullets: Vec<Bullet>,
    next_id: BulletId,
}

impl Magazine {
    pub(crate) fn new() -> Self {
        Self {
            bullets: Vec::new(),
            next_id: BulletId::new(1),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.bullets.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Bullet> {
        self.bullets.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bullet> {
        self.bullets.iter_mut()
    }

    pub(crate) fn contains(&self, id: BulletId) -> bool {
        self.bullets.iter().any(|bullet| bullet.id == id)
    }

    pub(crate) fn remove(&mut self, id: BulletId) -> Option<Bullet> {
        let index = self.bullets.iter().position(|bullet| bullet.id == id)?;
        Some(self.bullets.remove(index))
    }

    /// Fires a bullet from `origin` travelling along `angle`.
    pub(crate) fn fire(&mut self, origin: Vec2, angle: f32) -> BulletId {
        let id = self.next_id;
        self.next_id = BulletId::new(id.get().saturating_add(1));
        self.bullets.push(Bullet {
            id,
            body: Body::new(origin, heading_vector(angle) * BULLET_SPEED, bullet_radius()),
            angle,
        });
        id
    }
}
