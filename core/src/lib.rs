#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Asteroids engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The frame orchestrator submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Title shown by windowed adapters.
pub const WINDOW_TITLE: &str = "Asteroids";

/// Reference size from which the three asteroid tier radii are derived.
pub const ASTEROID_BASE_SIZE: f32 = 100.0;

/// Describes the active phase of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// The ship is flying, exploding or respawning and the simulation advances.
    Playing,
    /// Every life was spent; only the game-over view is presented.
    GameOver,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Discards the current session and starts a fresh one with a new ship.
    NewGame,
    /// Applies the per-frame steering input to the ship.
    SteerShip {
        /// Whether the thrust input is held this frame.
        thrust: bool,
        /// Rotation requested this frame, if any.
        rotation: Option<Rotation>,
    },
    /// Requests that the ship fire a bullet from its nose.
    FireBullet,
    /// Advances every moving entity and every countdown by one frame.
    Tick,
    /// Resolves a bullet striking an asteroid.
    DestroyAsteroid {
        /// Asteroid that was struck.
        asteroid: AsteroidId,
        /// Bullet that struck the asteroid and is consumed by the hit.
        bullet: BulletId,
    },
    /// Removes a bullet that left the playfield.
    RemoveBullet {
        /// Identifier of the bullet to remove.
        bullet: BulletId,
    },
    /// Starts the ship's explosion sequence after a fatal collision.
    ExplodeShip,
    /// Spawns a wave of large asteroids and makes the provided level current.
    SpawnWave {
        /// Level that the wave belongs to.
        level: u32,
        /// Number of large asteroids to create.
        count: u32,
    },
    /// Spends one life after the explosion sequence finished.
    LoseLife,
    /// Replaces the destroyed ship with a fresh invulnerable one.
    RespawnShip,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a fresh session started.
    GameStarted {
        /// Lives available to the player.
        lives: u32,
    },
    /// Indicates that the simulation advanced by one frame.
    TimeAdvanced {
        /// Index of the frame that just completed.
        frame: u64,
    },
    /// Confirms that the ship fired a bullet.
    BulletFired {
        /// Identifier allocated to the bullet.
        bullet: BulletId,
        /// Position the bullet was spawned at.
        position: Vec2,
    },
    /// Confirms that a bullet left the playfield and was discarded.
    BulletRemoved {
        /// Identifier of the removed bullet.
        bullet: BulletId,
    },
    /// Confirms that an asteroid was destroyed by a bullet.
    AsteroidDestroyed {
        /// Identifier of the destroyed asteroid.
        asteroid: AsteroidId,
        /// Bullet consumed by the hit.
        bullet: BulletId,
        /// Tier the asteroid belonged to.
        tier: AsteroidTier,
        /// Points awarded for the hit.
        points: u32,
        /// Centre of the asteroid at the time of destruction.
        position: Vec2,
    },
    /// Reports the two fragments created when a large or medium asteroid broke apart.
    AsteroidSplit {
        /// Asteroid that broke apart.
        parent: AsteroidId,
        /// Identifiers allocated to the fragments.
        fragments: [AsteroidId; 2],
    },
    /// Reports the ship's updated score.
    ScoreChanged {
        /// Score after the change.
        score: u32,
    },
    /// Announces that the ship collided and started exploding.
    ShipExploded {
        /// Centre of the ship when it exploded.
        position: Vec2,
    },
    /// Announces that the explosion countdown reached zero.
    ExplosionFinished,
    /// Announces that the post-spawn invulnerability window closed.
    InvulnerabilityEnded,
    /// Reports that a life was spent and the game continues.
    LifeLost {
        /// Lives left after the loss.
        remaining: u32,
    },
    /// Confirms that a new ship entered the playfield.
    ShipRespawned,
    /// Confirms that a new wave of asteroids was created.
    WaveSpawned {
        /// Level that became current.
        level: u32,
        /// Number of asteroids spawned for the wave.
        count: u32,
    },
    /// Announces that the last life was spent.
    GameOver {
        /// Score held by the ship when the session ended.
        final_score: u32,
    },
}

/// Playfield dimensions used for wrapping and off-screen checks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    width: f32,
    height: f32,
}

impl Bounds {
    /// The 800 by 600 playfield of the classic cabinet layout.
    pub const CLASSIC: Self = Self::new(800.0, 600.0);

    /// Creates playfield bounds with the provided dimensions.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal extent of the playfield.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Vertical extent of the playfield.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Centre point of the playfield.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Circular collision shape that moves with a constant per-frame velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    /// Centre of the body.
    pub position: Vec2,
    /// Displacement applied every frame.
    pub velocity: Vec2,
    /// Radius of the collision circle.
    pub radius: f32,
}

impl Body {
    /// Creates a body with the provided position, velocity and radius.
    #[must_use]
    pub const fn new(position: Vec2, velocity: Vec2, radius: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Creates a motionless body.
    #[must_use]
    pub const fn at_rest(position: Vec2, radius: f32) -> Self {
        Self::new(position, Vec2::ZERO, radius)
    }

    /// Euclidean distance between the centres of two bodies.
    #[must_use]
    pub fn distance_to(&self, other: &Body) -> f32 {
        self.position.distance(other.position)
    }

    /// Reports whether the two collision circles overlap.
    ///
    /// Touching circles do not overlap: the distance must be strictly smaller
    /// than the sum of both radii.
    #[must_use]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }
}

/// Unit vector pointing along the provided angle in radians.
#[must_use]
pub fn heading_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Unique identifier assigned to an asteroid. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AsteroidId(u32);

impl AsteroidId {
    /// Creates a new asteroid identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Size classes an asteroid can belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidTier {
    /// Wave asteroids; split into two medium asteroids.
    Large,
    /// Fragments of large asteroids; split into two small asteroids.
    Medium,
    /// Smallest fragments; vanish when hit.
    Small,
}

impl AsteroidTier {
    /// Every tier ordered from largest to smallest.
    pub const ALL: [AsteroidTier; 3] = [Self::Large, Self::Medium, Self::Small];

    /// Collision radius of the tier.
    ///
    /// Radii are the base size divided by 2, 4 and 8, rounded up.
    #[must_use]
    pub const fn radius(self) -> f32 {
        match self {
            Self::Large => 50.0,
            Self::Medium => 25.0,
            Self::Small => 13.0,
        }
    }

    /// Points awarded for destroying an asteroid of this tier.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::Large => 15,
            Self::Medium => 30,
            Self::Small => 50,
        }
    }

    /// Tier of the two fragments produced when the asteroid is destroyed.
    #[must_use]
    pub const fn split_into(self) -> Option<AsteroidTier> {
        match self {
            Self::Large => Some(Self::Medium),
            Self::Medium => Some(Self::Small),
            Self::Small => None,
        }
    }
}

/// Direction the ship turns in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Decreasing facing angle.
    Left,
    /// Increasing facing angle.
    Right,
}

impl Rotation {
    /// Sign applied to the rotation speed.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Alternating visible/invisible countdown that drives post-spawn invulnerability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlinkTimer {
    interval: u32,
    ticks_remaining: u32,
    cycles_remaining: u32,
}

impl BlinkTimer {
    /// Creates a timer lasting `cycles` blink cycles of `interval` frames each.
    #[must_use]
    pub const fn new(interval: u32, cycles: u32) -> Self {
        Self {
            interval,
            ticks_remaining: interval,
            cycles_remaining: cycles,
        }
    }

    /// Frames left in the current blink cycle.
    #[must_use]
    pub const fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }

    /// Blink cycles left before invulnerability ends.
    #[must_use]
    pub const fn cycles_remaining(&self) -> u32 {
        self.cycles_remaining
    }

    /// Whether the ship is drawn during the current cycle.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.cycles_remaining % 2 == 0
    }

    /// Whether every blink cycle has elapsed.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.cycles_remaining == 0
    }

    /// Advances the timer by one frame and reports whether it is now exhausted.
    pub fn tick(&mut self) -> bool {
        if self.is_exhausted() {
            return true;
        }

        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining == 0 {
            self.ticks_remaining = self.interval;
            self.cycles_remaining -= 1;
        }

        self.is_exhausted()
    }
}

/// Phases of the ship's life.
///
/// `Invulnerable` follows every spawn and `Normal` is open to collisions.
/// `Exploding` freezes the ship while the countdown runs. A `Dead` ship is a
/// spent hull: it is replaced on respawn, or stays when the last life is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipState {
    /// Immune to asteroid collisions while blink cycles remain.
    Invulnerable {
        /// Countdown driving the blink cycles.
        blink: BlinkTimer,
    },
    /// Controllable and vulnerable.
    Normal,
    /// Frozen while the explosion plays out.
    Exploding {
        /// Frames left before the life is spent.
        frames_remaining: u32,
    },
    /// Destroyed after its life was spent.
    Dead,
}

impl ShipState {
    /// Whether the ship still takes part in the session.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !matches!(self, Self::Dead)
    }

    /// Whether the ship is mid-explosion.
    #[must_use]
    pub const fn is_crashed(&self) -> bool {
        matches!(self, Self::Exploding { .. })
    }

    /// Whether an invulnerability window is active.
    #[must_use]
    pub const fn is_invulnerable(&self) -> bool {
        matches!(self, Self::Invulnerable { .. })
    }

    /// Whether steering, thrust and fire inputs affect the ship.
    #[must_use]
    pub const fn accepts_input(&self) -> bool {
        matches!(self, Self::Invulnerable { .. } | Self::Normal)
    }

    /// Whether an asteroid overlap destroys the ship.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Whether the ship outline is drawn this frame.
    #[must_use]
    pub const fn blink_visible(&self) -> bool {
        match self {
            Self::Invulnerable { blink } => blink.is_visible(),
            Self::Normal => true,
            Self::Exploding { .. } | Self::Dead => false,
        }
    }
}

/// Named sound effects the simulation asks the audio collaborator to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Engine loop played while thrusting.
    ThrustLoop,
    /// Ship explosion.
    Explosion,
    /// Bullet striking an asteroid.
    Hit,
    /// Bullet being fired.
    Laser,
}

impl SoundEffect {
    /// Stable name used to look up the effect's asset.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ThrustLoop => "thrust",
            Self::Explosion => "explode",
            Self::Hit => "hit",
            Self::Laser => "laser",
        }
    }
}

/// Player actions sampled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Accelerate along the facing angle while held.
    Thrust,
    /// Turn left while held.
    RotateLeft,
    /// Turn right while held.
    RotateRight,
    /// Fire a bullet; edge-triggered by the adapter.
    Fire,
}

impl Action {
    /// Number of distinct actions.
    pub const COUNT: usize = 4;

    /// Every action in declaration order.
    pub const ALL: [Action; Self::COUNT] = [
        Self::Thrust,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Fire,
    ];

    const fn index(self) -> usize {
        match self {
            Self::Thrust => 0,
            Self::RotateLeft => 1,
            Self::RotateRight => 2,
            Self::Fire => 3,
        }
    }
}

/// Immutable per-frame snapshot of which actions are active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputSnapshot {
    pressed: [bool; Action::COUNT],
}

impl InputSnapshot {
    /// Creates a snapshot with every action released.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pressed: [false; Action::COUNT],
        }
    }

    /// Returns a copy of the snapshot with the provided action pressed.
    #[must_use]
    pub fn with(mut self, action: Action) -> Self {
        self.set(action, true);
        self
    }

    /// Records whether the action is active.
    pub fn set(&mut self, action: Action, pressed: bool) {
        self.pressed[action.index()] = pressed;
    }

    /// Reports whether the action is active.
    #[must_use]
    pub const fn is_pressed(&self, action: Action) -> bool {
        self.pressed[action.index()]
    }

    /// Whether thrust is held.
    #[must_use]
    pub const fn thrust(&self) -> bool {
        self.is_pressed(Action::Thrust)
    }

    /// Whether the fire edge fired this frame.
    #[must_use]
    pub const fn fire(&self) -> bool {
        self.is_pressed(Action::Fire)
    }

    /// Net rotation requested; opposing inputs cancel out.
    #[must_use]
    pub const fn rotation(&self) -> Option<Rotation> {
        match (
            self.is_pressed(Action::RotateLeft),
            self.is_pressed(Action::RotateRight),
        ) {
            (true, false) => Some(Rotation::Left),
            (false, true) => Some(Rotation::Right),
            _ => None,
        }
    }
}

/// Immutable representation of the ship used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipSnapshot {
    /// Position, velocity and collision radius.
    pub body: Body,
    /// Facing angle in radians.
    pub angle: f32,
    /// Current phase of the ship's life.
    pub state: ShipState,
    /// Points collected by this ship.
    pub score: u32,
    /// Whether thrust was applied during the last frame.
    pub thrusting: bool,
}

impl ShipSnapshot {
    /// Point at the tip of the ship, where bullets leave the hull.
    #[must_use]
    pub fn nose(&self) -> Vec2 {
        self.body.position + heading_vector(self.angle) * self.body.radius
    }
}

/// Immutable representation of a single asteroid.
#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidSnapshot {
    /// Identifier allocated at creation.
    pub id: AsteroidId,
    /// Size class of the asteroid.
    pub tier: AsteroidTier,
    /// Position, velocity and collision radius.
    pub body: Body,
    /// Direction of travel in radians; also the outline's rotation.
    pub heading: f32,
    /// Level-derived speed before the jaggedness scaling.
    pub speed: f32,
    /// Per-vertex radius multipliers fixed at creation.
    pub jaggedness: Vec<f32>,
}

/// Immutable representation of a single bullet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Identifier allocated when the bullet was fired.
    pub id: BulletId,
    /// Position, velocity and collision radius.
    pub body: Body,
    /// Facing angle of the ship when the bullet was fired.
    pub angle: f32,
}

/// Read-only snapshot describing all live asteroids.
#[derive(Clone, Debug, Default)]
pub struct AsteroidView {
    snapshots: Vec<AsteroidSnapshot>,
}

impl AsteroidView {
    /// Creates a new asteroid view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AsteroidSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured asteroid snapshots in id order.
    pub fn iter(&self) -> impl Iterator<Item = &AsteroidSnapshot> {
        self.snapshots.iter()
    }

    /// Number of asteroids in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AsteroidSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all live bullets.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bullet snapshots in id order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Number of bullets in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

/// Aggregate session counters consumed by the lifecycle controller and HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionStatus {
    /// Whether the session is still being simulated.
    pub mode: SessionMode,
    /// Current level, starting at 1.
    pub level: u32,
    /// Lives left.
    pub lives: u32,
    /// Number of live asteroids.
    pub asteroid_count: usize,
    /// Phase of the current ship.
    pub ship_state: ShipState,
    /// Score held by the current ship.
    pub score: u32,
}

#[cfg(test)]
mod tests {
    use super::{
        Action, AsteroidTier, BlinkTimer, Body, InputSnapshot, Rotation, ShipState,
    };
    use glam::Vec2;

    #[test]
    fn tiers_map_to_fixed_points_and_split_products() {
        assert_eq!(AsteroidTier::Large.points(), 15);
        assert_eq!(AsteroidTier::Medium.points(), 30);
        assert_eq!(AsteroidTier::Small.points(), 50);
        assert_eq!(AsteroidTier::Large.split_into(), Some(AsteroidTier::Medium));
        assert_eq!(AsteroidTier::Medium.split_into(), Some(AsteroidTier::Small));
        assert_eq!(AsteroidTier::Small.split_into(), None);
    }

    #[test]
    fn tier_radii_shrink_with_each_split() {
        for pair in AsteroidTier::ALL.windows(2) {
            assert!(pair[0].radius() > pair[1].radius());
        }
    }

    #[test]
    fn touching_bodies_do_not_overlap() {
        let left = Body::at_rest(Vec2::new(0.0, 0.0), 5.0);
        let touching = Body::at_rest(Vec2::new(10.0, 0.0), 5.0);
        let inside = Body::at_rest(Vec2::new(9.5, 0.0), 5.0);

        assert!(!left.overlaps(&touching));
        assert!(left.overlaps(&inside));
    }

    #[test]
    fn blink_timer_exhausts_after_all_cycles() {
        let mut blink = BlinkTimer::new(2, 3);
        let mut frames = 0;
        while !blink.tick() {
            frames += 1;
        }
        assert_eq!(frames + 1, 6);
        assert!(blink.is_exhausted());
        assert!(blink.tick());
    }

    #[test]
    fn blink_visibility_alternates_per_cycle() {
        let mut blink = BlinkTimer::new(1, 4);
        let mut visibility = vec![blink.is_visible()];
        while !blink.tick() {
            visibility.push(blink.is_visible());
        }
        assert_eq!(visibility, vec![true, false, true, false]);
    }

    #[test]
    fn ship_state_flags_follow_the_phase() {
        let invulnerable = ShipState::Invulnerable {
            blink: BlinkTimer::new(6, 30),
        };
        assert!(invulnerable.accepts_input());
        assert!(!invulnerable.is_vulnerable());
        assert!(ShipState::Normal.is_vulnerable());
        assert!(ShipState::Exploding { frames_remaining: 3 }.is_crashed());
        assert!(!ShipState::Exploding { frames_remaining: 3 }.accepts_input());
        assert!(!ShipState::Dead.is_alive());
    }

    #[test]
    fn opposing_rotation_inputs_cancel() {
        let both = InputSnapshot::new()
            .with(Action::RotateLeft)
            .with(Action::RotateRight);
        assert_eq!(both.rotation(), None);
        assert_eq!(
            InputSnapshot::new().with(Action::RotateRight).rotation(),
            Some(Rotation::Right)
        );
    }

    #[test]
    fn input_snapshot_round_trips_through_bincode() {
        let snapshot = InputSnapshot::new().with(Action::Thrust).with(Action::Fire);
        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: InputSnapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
    }
}
