#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Asteroids adapters.
//!
//! The frame orchestrator talks to a [`Renderer`] through plain draw requests.
//! Backends implement the trait against a real drawing surface, while
//! [`RecordingRenderer`] captures requests for tests and headless runs. The
//! outline helpers keep every backend drawing the same vector shapes.

use std::{
    f32::consts::{PI, TAU},
    time::Duration,
};

use anyhow::Result as AnyResult;
use asteroids_core::{
    heading_vector, AsteroidSnapshot, Bounds, BulletSnapshot, InputSnapshot, ShipSnapshot,
};
use glam::Vec2;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided opacity.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// Palette shared by every backend.
pub mod palette {
    use super::Color;

    /// Frame background.
    pub const BACKGROUND: Color = Color::from_rgb_u8(0, 0, 0);
    /// Ship outline, bullets and HUD text.
    pub const WHITE: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
    /// Asteroid outline.
    pub const SLATE_GREY: Color = Color::from_rgb_u8(0x70, 0x80, 0x90);
    /// Outermost explosion ring.
    pub const DARK_RED: Color = Color::from_rgb_u8(0x8b, 0x00, 0x00);
    /// Second explosion ring and the crashed life icon.
    pub const RED: Color = Color::from_rgb_u8(0xff, 0x00, 0x00);
    /// Middle explosion ring.
    pub const ORANGE: Color = Color::from_rgb_u8(0xff, 0xa5, 0x00);
    /// Fourth explosion ring and debug hitboxes.
    pub const YELLOW: Color = Color::from_rgb_u8(0xff, 0xff, 0x00);
    /// Debug asteroid ids.
    pub const AQUA: Color = Color::from_rgb_u8(0x00, 0xff, 0xff);
    /// Debug vertical axis.
    pub const GREEN: Color = Color::from_rgb_u8(0x00, 0x80, 0x00);
}

/// Explosion rings from the outside in, as multiples of the exploding radius.
pub const EXPLOSION_RINGS: [(f32, Color); 5] = [
    (1.7, palette::DARK_RED),
    (1.4, palette::RED),
    (1.1, palette::ORANGE),
    (0.8, palette::YELLOW),
    (0.5, palette::WHITE),
];

/// Angle between the ship's nose and each rear corner.
const SHIP_WING_ANGLE: f32 = 3.0 * PI / 4.0;

/// Radius of a life icon in the HUD.
pub const LIFE_ICON_RADIUS: f32 = 15.0;

/// Vertices of the triangular ship outline: nose, right wing, left wing.
#[must_use]
pub fn ship_outline(ship: &ShipSnapshot) -> [Vec2; 3] {
    triangle(ship.body.position, ship.body.radius, ship.angle)
}

/// Upward-pointing ship outline used for the lives indicator.
#[must_use]
pub fn life_icon(center: Vec2) -> [Vec2; 3] {
    triangle(center, LIFE_ICON_RADIUS, -PI / 2.0)
}

fn triangle(center: Vec2, radius: f32, angle: f32) -> [Vec2; 3] {
    [
        center + heading_vector(angle) * radius,
        center + heading_vector(angle + SHIP_WING_ANGLE) * radius,
        center + heading_vector(angle + 2.0 * PI - SHIP_WING_ANGLE) * radius,
    ]
}

/// Closed polygon approximating an asteroid's jagged outline.
///
/// Vertex `i` sits at `heading + i * 2pi / n` with its radius scaled by the
/// matching jaggedness offset.
#[must_use]
pub fn asteroid_outline(asteroid: &AsteroidSnapshot) -> Vec<Vec2> {
    let count = asteroid.jaggedness.len().max(1) as f32;
    asteroid
        .jaggedness
        .iter()
        .enumerate()
        .map(|(index, &offset)| {
            let angle = asteroid.heading + index as f32 * TAU / count;
            asteroid.body.position + heading_vector(angle) * asteroid.body.radius * offset
        })
        .collect()
}

/// Centre of the life icon at `index` counting from the left.
#[must_use]
pub fn life_icon_center(index: u32) -> Vec2 {
    Vec2::new(20.0 + 30.0 * index as f32, 20.0)
}

/// Fading level announcement shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelText {
    /// Level being announced.
    pub level: u32,
    /// Opacity between 0 and 1.
    pub alpha: f32,
}

/// Heads-up display contents for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Lives left, drawn as ship icons.
    pub lives: u32,
    /// Score of the current ship.
    pub score: u32,
    /// Best score on record.
    pub high_score: u32,
    /// Level banner, while it is still visible.
    pub level_text: Option<LevelText>,
    /// Whether the ship is exploding; the last life icon turns red.
    pub ship_crashed: bool,
}

/// Collaborator that turns draw requests into pixels.
///
/// Requests are fire-and-forget and always succeed from the caller's view.
pub trait Renderer {
    /// Starts a new frame.
    fn clear_frame(&mut self);

    /// Draws the ship outline. `blink_visible` is false during the dark half of a blink cycle.
    fn draw_ship(&mut self, ship: &ShipSnapshot, blink_visible: bool);

    /// Draws an asteroid outline.
    fn draw_asteroid(&mut self, asteroid: &AsteroidSnapshot);

    /// Draws a bullet.
    fn draw_bullet(&mut self, bullet: &BulletSnapshot);

    /// Draws the concentric explosion rings.
    fn draw_explosion(&mut self, position: Vec2, radius: f32);

    /// Draws lives, scores and the level banner.
    fn draw_hud(&mut self, hud: &Hud);

    /// Draws the game-over caption.
    fn draw_game_over(&mut self);
}

/// Draw request captured by [`RecordingRenderer`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawRequest {
    /// A new frame began.
    ClearFrame,
    /// Ship outline.
    Ship {
        /// Ship that was drawn.
        ship: ShipSnapshot,
        /// Whether the outline is visible this frame.
        blink_visible: bool,
    },
    /// Asteroid outline.
    Asteroid(AsteroidSnapshot),
    /// Bullet sprite.
    Bullet(BulletSnapshot),
    /// Explosion rings.
    Explosion {
        /// Centre of the explosion.
        position: Vec2,
        /// Radius the rings are scaled from.
        radius: f32,
    },
    /// Heads-up display.
    Hud(Hud),
    /// Game-over caption.
    GameOver,
}

/// Renderer that keeps the requests issued since the last clear.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    requests: Vec<DrawRequest>,
    frames: u64,
}

impl RecordingRenderer {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests issued during the current frame, starting with its clear.
    #[must_use]
    pub fn requests(&self) -> &[DrawRequest] {
        &self.requests
    }

    /// Number of frames started so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Heads-up display drawn during the current frame, if any.
    #[must_use]
    pub fn hud(&self) -> Option<&Hud> {
        self.requests.iter().find_map(|request| match request {
            DrawRequest::Hud(hud) => Some(hud),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn clear_frame(&mut self) {
        self.requests.clear();
        self.frames = self.frames.saturating_add(1);
        self.requests.push(DrawRequest::ClearFrame);
    }

    fn draw_ship(&mut self, ship: &ShipSnapshot, blink_visible: bool) {
        self.requests.push(DrawRequest::Ship {
            ship: *ship,
            blink_visible,
        });
    }

    fn draw_asteroid(&mut self, asteroid: &AsteroidSnapshot) {
        self.requests.push(DrawRequest::Asteroid(asteroid.clone()));
    }

    fn draw_bullet(&mut self, bullet: &BulletSnapshot) {
        self.requests.push(DrawRequest::Bullet(*bullet));
    }

    fn draw_explosion(&mut self, position: Vec2, radius: f32) {
        self.requests
            .push(DrawRequest::Explosion { position, radius });
    }

    fn draw_hud(&mut self, hud: &Hud) {
        self.requests.push(DrawRequest::Hud(*hud));
    }

    fn draw_game_over(&mut self) {
        self.requests.push(DrawRequest::GameOver);
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Playfield the window must show.
    pub bounds: Bounds,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, bounds: Bounds) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            bounds,
        }
    }
}

/// Rendering backend capable of hosting the Asteroids frame loop.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update` closure runs once per displayed frame with the
    /// elapsed frame time, the input sampled for that frame and the renderer to
    /// issue draw requests against.
    fn run<F>(self, presentation: Presentation, update: F) -> AnyResult<()>
    where
        F: FnMut(Duration, InputSnapshot, &mut dyn Renderer) + 'static;
}
