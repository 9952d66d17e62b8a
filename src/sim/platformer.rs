//! Platformer: gravity, jumping, patrol platforms and platform riding
//!
//! The player integrates gravity while airborne, resolves collisions
//! against every platform each frame, and rides moving platforms by
//! adopting their vertical velocity on a top hit and re-pinning to the
//! platform's top edge between frames. Platforms patrol between pixel
//! limits derived from their configured range; they are obstacles only and
//! never respond to collisions themselves.

use glam::Vec2;

use crate::consts::*;
use crate::error::ArcadeError;
use crate::platform::{
    Axis, Button, Color, InputEvent, InputSource, Key, RenderSurface, VisualStore,
};
use crate::sim::entity::{Deadline, Entity};
use crate::sim::geom::{Dimension, HitPosition, NormRect, PixelRect};
use crate::sim::level::{Level, LevelCatalog, MovementLimits};

pub const PLAYER_COLOR: Color = Color::rgb(210, 160, 10);

const PLAYER_SPAWN: NormRect = NormRect {
    x: 0.9,
    y: 0.9,
    w: 0.02,
    h: 0.07,
};

/// A static or patrolling obstacle.
#[derive(Debug, Clone)]
pub struct Platform {
    pub ent: Entity,
    /// Configured patrol speed magnitudes; zero means static
    patrol_vel: Vec2,
    /// Absolute pixel bounds, anchored at spawn
    limits: MovementLimits,
}

impl Platform {
    pub fn new(norm: NormRect, dim: Dimension, visual: crate::platform::VisualId) -> Self {
        Self {
            ent: Entity::new(norm, dim, visual, "tile"),
            patrol_vel: Vec2::ZERO,
            limits: MovementLimits::default(),
        }
    }

    /// Anchor patrol offsets to the spawn rect, producing absolute bounds.
    pub fn set_limits(&mut self, offsets: MovementLimits) {
        self.limits = MovementLimits {
            left: self.ent.pixel.x - offsets.left,
            right: self.ent.pixel.right() + offsets.right,
            top: self.ent.pixel.y - offsets.top,
            bottom: self.ent.pixel.bottom() + offsets.bottom,
        };
    }

    pub fn set_velocities(&mut self, vel: Vec2) {
        self.patrol_vel = vel;
        self.ent.vel = vel;
    }

    pub fn patrols(&self) -> bool {
        (self.patrol_vel.x > 0.0 && self.limits.left != self.limits.right)
            || (self.patrol_vel.y > 0.0 && self.limits.top != self.limits.bottom)
    }

    /// Patrol step: reverse at the limits (sign-gated so an already
    /// reversed platform is left alone), then integrate.
    pub fn move_step(&mut self, dim: Dimension) {
        let dt = self.ent.timer.elapsed_ms() as f32;

        if self.patrol_vel.x > 0.0 && self.limits.left != self.limits.right {
            if self.ent.pixel.right() >= self.limits.right {
                if self.ent.vel.x > 0.0 {
                    self.ent.vel.x = -self.ent.vel.x;
                }
            } else if self.ent.pixel.x < self.limits.left && self.ent.vel.x < 0.0 {
                self.ent.vel.x = -self.ent.vel.x;
            }
        }
        if self.patrol_vel.y > 0.0 && self.limits.top != self.limits.bottom {
            if self.ent.pixel.bottom() >= self.limits.bottom {
                if self.ent.vel.y > 0.0 {
                    self.ent.vel.y = -self.ent.vel.y;
                }
            } else if self.ent.pixel.y < self.limits.top && self.ent.vel.y < 0.0 {
                self.ent.vel.y = -self.ent.vel.y;
            }
        }

        self.ent.norm.x += self.ent.vel.x * dt;
        self.ent.norm.y += self.ent.vel.y * dt;
        self.ent.sync_pixel_from_norm(dim);
        self.ent.timer.restart();
    }
}

/// Direction intent from the input handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlDir {
    #[default]
    None,
    Left,
    Right,
    Up,
    Down,
}

/// The platformer's player character.
#[derive(Debug, Clone)]
pub struct Player {
    pub ent: Entity,
    direction: ControlDir,
    pub on_surface: bool,
    /// Index into the level's platform list; an arena index, never a
    /// reference, so the platform collection can move freely
    pub standing_on: Option<usize>,
    /// Horizontal steering spent since leaving the ground
    in_air_deltav: f32,
    pub exited: bool,
}

impl Player {
    pub fn new(dim: Dimension, visual: crate::platform::VisualId) -> Self {
        Self {
            ent: Entity::new(PLAYER_SPAWN, dim, visual, "player"),
            direction: ControlDir::None,
            on_surface: false,
            standing_on: None,
            in_air_deltav: 0.0,
            exited: false,
        }
    }

    /// While airborne, horizontal control draws down a fixed budget;
    /// returns whether steering is still allowed.
    fn check_air_deltav(&mut self, sensitivity: f32) -> bool {
        if !self.on_surface && self.in_air_deltav > AIR_DELTAV_BUDGET {
            return false;
        }
        if !self.on_surface {
            self.in_air_deltav += sensitivity;
        }
        true
    }

    pub fn handle_event(&mut self, event: &InputEvent) {
        let mut sensitivity = 1.0;

        match *event {
            InputEvent::KeyDown { key, repeat: false } => match key {
                Key::Up | Key::Space => self.direction = ControlDir::Up,
                Key::Down => self.direction = ControlDir::Down,
                Key::Left => self.direction = ControlDir::Left,
                Key::Right => self.direction = ControlDir::Right,
                _ => {}
            },
            InputEvent::KeyUp { key, repeat: false } => match key {
                Key::Up | Key::Down | Key::Space | Key::Left | Key::Right => {
                    self.direction = ControlDir::None
                }
                _ => {}
            },
            InputEvent::ControllerAxis { axis, value } => {
                sensitivity = CONTROLLER_SENSITIVITY;
                self.direction = ControlDir::None;
                match axis {
                    Axis::X => {
                        if value < -CONTROLLER_DEADZONE {
                            self.direction = ControlDir::Left;
                        } else if value > CONTROLLER_DEADZONE {
                            self.direction = ControlDir::Right;
                        }
                    }
                    Axis::Y => {
                        if value < -CONTROLLER_DEADZONE {
                            self.direction = ControlDir::Up;
                        } else if value > CONTROLLER_DEADZONE {
                            self.direction = ControlDir::Down;
                        }
                    }
                }
            }
            InputEvent::ControllerButton {
                button: Button::A,
                down: true,
            } => self.direction = ControlDir::Up,
            _ => {}
        }

        match self.direction {
            ControlDir::Up => {
                if self.on_surface {
                    self.ent.vel.y = -(JUMP_SPEED * sensitivity);
                    self.on_surface = false;
                    self.standing_on = None;
                    self.in_air_deltav = 0.0;
                }
            }
            ControlDir::Left => {
                if self.check_air_deltav(sensitivity) {
                    self.ent.vel.x = -(PLAYER_SPEED * sensitivity);
                }
            }
            ControlDir::Right => {
                if self.check_air_deltav(sensitivity) {
                    self.ent.vel.x = PLAYER_SPEED * sensitivity;
                }
            }
            ControlDir::None => self.ent.vel.x = 0.0,
            ControlDir::Down => {}
        }
    }

    /// One physics frame: gravity, integration, collision response
    /// against every platform. A no-op once the exit has been reached.
    pub fn move_step(&mut self, dim: Dimension, platforms: &[Platform]) {
        if self.exited {
            return;
        }

        let dt = self.ent.timer.elapsed_ms() as f32;
        if !self.on_surface {
            self.ent.vel.y += GRAVITY * dt;
        }

        self.ent.norm.x += self.ent.vel.x * dt;
        self.ent.norm.y += self.ent.vel.y * dt;
        self.ent.sync_pixel_from_norm(dim);

        self.on_surface = false;
        for (i, platform) in platforms.iter().enumerate() {
            match self.ent.check_hit(&platform.ent) {
                HitPosition::None => continue,
                HitPosition::Left => {
                    if self.ent.vel.x > 0.0 {
                        self.ent.vel.x = 0.0;
                    }
                    self.ent.pixel.x = platform.ent.pixel.x - self.ent.pixel.w;
                }
                HitPosition::Right => {
                    if self.ent.vel.x < 0.0 {
                        self.ent.vel.x = 0.0;
                    }
                    self.ent.pixel.x = platform.ent.pixel.right();
                }
                HitPosition::Top => {
                    // Ride the platform: adopt its vertical velocity and
                    // rest exactly on its top edge.
                    self.ent.vel.y = platform.ent.vel.y;
                    self.ent.pixel.y = platform.ent.pixel.y - self.ent.pixel.h;
                    self.on_surface = true;
                    self.standing_on = Some(i);
                }
                HitPosition::Bottom => {
                    if self.ent.vel.y < 0.0 {
                        self.ent.vel.y = -self.ent.vel.y;
                    }
                }
            }
        }

        self.ent.sync_norm_from_pixel(dim);
        self.ent.timer.restart();
    }

    /// Keep the player glued to the platform it stands on, even when the
    /// platform moved this frame.
    pub fn follow_platform(&mut self, platforms: &[Platform], dim: Dimension) {
        if let Some(i) = self.standing_on
            && let Some(platform) = platforms.get(i)
        {
            self.ent.pixel.y = platform.ent.pixel.y - self.ent.pixel.h;
            self.ent.sync_norm_from_pixel(dim);
        }
    }

    /// Snap into the exit and freeze movement when touching it.
    pub fn check_exit(&mut self, exit: &Entity, dim: Dimension) -> bool {
        self.exited = false;
        if self.ent.check_hit(exit) != HitPosition::None {
            self.ent.center_inside(&exit.pixel, dim);
            self.exited = true;
        }
        self.exited
    }

    pub fn reset(&mut self, dim: Dimension) {
        self.exited = false;
        self.ent.vel = Vec2::ZERO;
        self.ent.norm = PLAYER_SPAWN;
        self.ent.sync_pixel_from_norm(dim);
        self.on_surface = false;
        self.standing_on = None;
        self.in_air_deltav = 0.0;
        self.direction = ControlDir::None;
        self.ent.timer.restart();
    }
}

/// The platformer round: level, player, camera, exit handling.
#[derive(Debug)]
pub struct Platformer {
    catalog: LevelCatalog,
    pub level: Level,
    pub player: Player,
    camera: PixelRect,
    in_exit: bool,
    reset_at: Option<Deadline>,
    pub quit: bool,
}

impl Platformer {
    pub fn new(
        window: Dimension,
        catalog: LevelCatalog,
        visuals: &mut dyn VisualStore,
    ) -> Result<Self, ArcadeError> {
        let level = Level::build(&catalog, 0, visuals)?;
        let spawn_pixel = PLAYER_SPAWN.to_pixel(level.dimension);
        let visual =
            visuals.from_solid_color(spawn_pixel.w as u32, spawn_pixel.h as u32, PLAYER_COLOR);
        let player = Player::new(level.dimension, visual);
        Ok(Self {
            catalog,
            level,
            player,
            camera: PixelRect::new(0, 0, window.w as i32, window.h as i32),
            in_exit: false,
            reset_at: None,
            quit: false,
        })
    }

    /// Drain this frame's events.
    pub fn poll_input(&mut self, input: &mut dyn InputSource) {
        while let Some(event) = input.poll() {
            match event {
                InputEvent::Quit
                | InputEvent::KeyDown {
                    key: Key::Escape, ..
                }
                | InputEvent::ControllerButton {
                    button: Button::B,
                    down: true,
                } => self.quit = true,
                _ => {}
            }
            self.player.handle_event(&event);
        }
    }

    /// One frame: pending level advance, player physics, platform patrol,
    /// platform ride, camera follow, exit check.
    pub fn advance(&mut self, visuals: &mut dyn VisualStore) -> Result<(), ArcadeError> {
        if let Some(deadline) = self.reset_at
            && deadline.is_due()
        {
            self.next_level(visuals)?;
        }

        let dim = self.level.dimension;
        self.player.move_step(dim, &self.level.platforms);
        self.level.move_platforms();
        self.player.follow_platform(&self.level.platforms, dim);
        self.player.ent.center_camera(&mut self.camera, dim);

        if !self.in_exit && self.player.check_exit(&self.level.goal, dim) {
            self.in_exit = true;
            self.reset_at = Some(Deadline::after_ms(EXIT_RESET_MS));
            log::info!("level {} exit reached", self.level.number);
        }
        Ok(())
    }

    fn next_level(&mut self, visuals: &mut dyn VisualStore) -> Result<(), ArcadeError> {
        let next = (self.level.number + 1) % self.catalog.len();
        self.level = Level::build(&self.catalog, next, visuals)?;
        self.player.reset(self.level.dimension);
        self.in_exit = false;
        self.reset_at = None;
        Ok(())
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.clear();
        self.level.render(surface, Some(&self.camera));
        self.player.ent.render(surface, Some(&self.camera));
        surface.present();
    }
}
