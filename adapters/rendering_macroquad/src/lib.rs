#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Asteroids.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature, so sound requests go to a logging sink instead.
//!
//! The backend owns the window, samples the keyboard into an
//! [`InputSnapshot`] once per frame and draws the playfield as vector outlines.
//! A debug overlay (`;`) adds hitboxes, asteroid ids and centre coordinates.

use anyhow::Result;
use asteroids_core::{
    Action, AsteroidSnapshot, Bounds, BulletSnapshot, InputSnapshot, ShipSnapshot,
};
use asteroids_rendering::{
    asteroid_outline, life_icon, life_icon_center, palette, ship_outline, Color, Hud,
    Presentation, Renderer, RenderingBackend, EXPLOSION_RINGS,
};
use glam::Vec2;
use log::info;
use macroquad::input::{is_key_down, is_key_pressed, is_key_released, KeyCode};
use macroquad::math::Vec2 as MacroquadVec2;
use std::{collections::VecDeque, time::Duration};

const OUTLINE_THICKNESS: f32 = 1.5;
const BULLET_SIZE: f32 = 4.0;
const HUD_FONT_SIZE: u16 = 32;
const LEVEL_FONT_SIZE: u16 = 48;
const GAME_OVER_FONT_SIZE: u16 = 64;
const DEBUG_FONT_SIZE: u16 = 16;
const HUD_MARGIN: f32 = 10.0;

/// Keys held or released during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyState {
    /// `W` is held.
    thrust: bool,
    /// `A` is held.
    rotate_left: bool,
    /// `D` is held.
    rotate_right: bool,
    /// `Space` was released this frame.
    fire_released: bool,
}

impl KeyState {
    fn poll() -> Self {
        Self {
            thrust: is_key_down(KeyCode::W),
            rotate_left: is_key_down(KeyCode::A),
            rotate_right: is_key_down(KeyCode::D),
            fire_released: is_key_released(KeyCode::Space),
        }
    }

    fn snapshot(self) -> InputSnapshot {
        let mut input = InputSnapshot::new();
        input.set(Action::Thrust, self.thrust);
        input.set(Action::RotateLeft, self.rotate_left);
        input.set(Action::RotateRight, self.rotate_right);
        input.set(Action::Fire, self.fire_released);
        input
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Escape` closes the window.
    quit_requested: bool,
    /// `;` toggles the debug overlay.
    toggle_debug_overlay: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            toggle_debug_overlay: is_key_pressed(KeyCode::Semicolon),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
}

impl FpsCounter {
    /// Records a frame and returns the per-second and trailing ten-second
    /// averages once a second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<FpsMetrics> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);
        self.frame_times.push_back(frame);
        self.window_duration += frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            match self.frame_times.pop_front() {
                Some(removed) => {
                    self.window_duration = self.window_duration.saturating_sub(removed);
                }
                None => break,
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let per_second = self.frames as f32 / self.elapsed.as_secs_f32();
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(FpsMetrics {
            per_second,
            trailing_ten_seconds,
        })
    }
}

/// Uniform scale and letterbox offset mapping the playfield onto the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    fn fit(bounds: Bounds, screen_width: f32, screen_height: f32) -> Self {
        let scale = (screen_width / bounds.width())
            .min(screen_height / bounds.height())
            .max(f32::EPSILON);
        let offset = Vec2::new(
            (screen_width - bounds.width() * scale) / 2.0,
            (screen_height - bounds.height() * scale) / 2.0,
        );
        Self { scale, offset }
    }

    fn project(&self, point: Vec2) -> MacroquadVec2 {
        let screen = self.offset + point * self.scale;
        MacroquadVec2::new(screen.x, screen.y)
    }

    fn length(&self, length: f32) -> f32 {
        length * self.scale
    }
}

/// Horizontal start of `text_width` wide text centred in a `width` wide area.
fn centered(width: f32, text_width: f32) -> f32 {
    (width - text_width) / 2.0
}

/// Vertical baseline of the level banner.
fn level_banner_y(bounds: Bounds) -> f32 {
    bounds.height() * 0.75
}

/// Vertical baseline of the score readout.
fn score_y(bounds: Bounds) -> f32 {
    bounds.height() * 0.05
}

struct MacroquadRenderer {
    bounds: Bounds,
    background: macroquad::color::Color,
    viewport: Viewport,
    debug_overlay: bool,
}

impl MacroquadRenderer {
    fn new(bounds: Bounds, background: Color) -> Self {
        Self {
            bounds,
            background: to_macroquad_color(background),
            viewport: Viewport::fit(bounds, bounds.width(), bounds.height()),
            debug_overlay: false,
        }
    }

    fn polygon(&self, points: &[Vec2], color: Color) {
        let color = to_macroquad_color(color);
        let thickness = self.viewport.length(OUTLINE_THICKNESS);
        for (index, start) in points.iter().enumerate() {
            let end = points[(index + 1) % points.len()];
            let start = self.viewport.project(*start);
            let end = self.viewport.project(end);
            macroquad::shapes::draw_line(start.x, start.y, end.x, end.y, thickness, color);
        }
    }

    fn text(&self, text: &str, position: Vec2, font_size: u16, color: Color) {
        let screen = self.viewport.project(position);
        macroquad::text::draw_text(
            text,
            screen.x,
            screen.y,
            self.viewport.length(f32::from(font_size)),
            to_macroquad_color(color),
        );
    }

    fn text_width(text: &str, font_size: u16) -> f32 {
        macroquad::text::measure_text(text, None, font_size, 1.0).width
    }

    fn centered_text(&self, text: &str, y: f32, font_size: u16, color: Color) {
        let x = centered(self.bounds.width(), Self::text_width(text, font_size));
        self.text(text, Vec2::new(x, y), font_size, color);
    }

    fn hitbox(&self, center: Vec2, radius: f32) {
        if !self.debug_overlay {
            return;
        }
        let screen = self.viewport.project(center);
        macroquad::shapes::draw_circle_lines(
            screen.x,
            screen.y,
            self.viewport.length(radius),
            1.0,
            to_macroquad_color(palette::YELLOW),
        );
    }

    fn coordinates(&self, center: Vec2, radius: f32) {
        if !self.debug_overlay {
            return;
        }
        let label = format!("({:.0}, {:.0})", center.x, center.y);
        let position = center + Vec2::new(-radius, radius + f32::from(DEBUG_FONT_SIZE));
        self.text(&label, position, DEBUG_FONT_SIZE, palette::YELLOW);
    }
}

impl Renderer for MacroquadRenderer {
    fn clear_frame(&mut self) {
        self.viewport = Viewport::fit(
            self.bounds,
            macroquad::window::screen_width(),
            macroquad::window::screen_height(),
        );
        macroquad::window::clear_background(self.background);
    }

    fn draw_ship(&mut self, ship: &ShipSnapshot, blink_visible: bool) {
        if blink_visible {
            self.polygon(&ship_outline(ship), palette::WHITE);
        }
        self.hitbox(ship.body.position, ship.body.radius);
        self.coordinates(ship.body.position, ship.body.radius);
    }

    fn draw_asteroid(&mut self, asteroid: &AsteroidSnapshot) {
        self.polygon(&asteroid_outline(asteroid), palette::SLATE_GREY);
        self.hitbox(asteroid.body.position, asteroid.body.radius);
        if self.debug_overlay {
            self.text(
                &asteroid.id.get().to_string(),
                asteroid.body.position,
                DEBUG_FONT_SIZE,
                palette::AQUA,
            );
        }
        self.coordinates(asteroid.body.position, asteroid.body.radius);
    }

    fn draw_bullet(&mut self, bullet: &BulletSnapshot) {
        let half = BULLET_SIZE / 2.0;
        let corner = self
            .viewport
            .project(bullet.body.position - Vec2::splat(half));
        let size = self.viewport.length(BULLET_SIZE);
        macroquad::shapes::draw_rectangle(
            corner.x,
            corner.y,
            size,
            size,
            to_macroquad_color(palette::WHITE),
        );
        self.hitbox(bullet.body.position, bullet.body.radius);
    }

    fn draw_explosion(&mut self, position: Vec2, radius: f32) {
        let center = self.viewport.project(position);
        for (scale, color) in EXPLOSION_RINGS {
            macroquad::shapes::draw_circle(
                center.x,
                center.y,
                self.viewport.length(radius * scale),
                to_macroquad_color(color),
            );
        }
    }

    fn draw_hud(&mut self, hud: &Hud) {
        for index in 0..hud.lives {
            let last = index + 1 == hud.lives;
            let color = if last && hud.ship_crashed {
                palette::RED
            } else {
                palette::WHITE
            };
            self.polygon(&life_icon(life_icon_center(index)), color);
        }

        self.centered_text(
            &hud.score.to_string(),
            score_y(self.bounds) + f32::from(HUD_FONT_SIZE) / 2.0,
            HUD_FONT_SIZE,
            palette::WHITE,
        );

        let best = format!("Best: {}", hud.high_score);
        let best_x = self.bounds.width() - Self::text_width(&best, HUD_FONT_SIZE) - HUD_MARGIN;
        self.text(
            &best,
            Vec2::new(best_x, score_y(self.bounds) + f32::from(HUD_FONT_SIZE) / 2.0),
            HUD_FONT_SIZE,
            palette::WHITE,
        );

        if let Some(level) = hud.level_text {
            self.centered_text(
                &format!("Level {}", level.level),
                level_banner_y(self.bounds),
                LEVEL_FONT_SIZE,
                palette::WHITE.with_alpha(level.alpha),
            );
        }
    }

    fn draw_game_over(&mut self) {
        self.centered_text(
            "Game Over",
            self.bounds.height() / 2.0,
            GAME_OVER_FONT_SIZE,
            palette::WHITE,
        );
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update: F) -> Result<()>
    where
        F: FnMut(Duration, InputSnapshot, &mut dyn Renderer) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            bounds,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: bounds.width().round() as i32,
            window_height: bounds.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut renderer = MacroquadRenderer::new(bounds, clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let shortcuts = KeyboardShortcuts::poll();
                if shortcuts.quit_requested {
                    info!("quit requested");
                    break;
                }
                if shortcuts.toggle_debug_overlay {
                    renderer.debug_overlay = !renderer.debug_overlay;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update(frame_dt, KeyState::poll().snapshot(), &mut renderer);

                if let Some(FpsMetrics {
                    per_second,
                    trailing_ten_seconds,
                }) = fps_counter.record_frame(frame_dt)
                {
                    if show_fps {
                        info!("FPS: {per_second:.2} (10s avg: {trailing_ten_seconds:.2})");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
