//! Maze: steer a damped bouncing ball through walls to the goal
//!
//! Arrow keys add fixed acceleration increments. Wall and boundary bounces
//! reflect the struck velocity component scaled by the momentum loss
//! factor, so the ball calms down instead of ricocheting forever. Levels
//! are larger than the window; the camera follows the ball.

use glam::Vec2;

use crate::consts::*;
use crate::error::ArcadeError;
use crate::platform::{
    Button, Color, InputEvent, InputSource, Key, RenderSurface, VisualStore,
};
use crate::sim::entity::{Deadline, Entity};
use crate::sim::geom::{Dimension, HitPosition, NormRect, PixelRect};
use crate::sim::level::{Level, LevelCatalog};
use crate::sim::platformer::Platform;

pub const BALL_COLOR: Color = Color::rgb(210, 160, 10);

const BALL_SPAWN: NormRect = NormRect {
    x: 0.9,
    y: 0.92,
    w: 0.0125,
    h: 0.0125,
};

/// The rolling ball: accelerates under key input, bounces with damping.
#[derive(Debug, Clone)]
pub struct Ball {
    pub ent: Entity,
    momentum_loss: f32,
    pub goal: bool,
}

impl Ball {
    pub fn new(dim: Dimension, visual: crate::platform::VisualId) -> Self {
        Self {
            ent: Entity::new(BALL_SPAWN, dim, visual, "ball"),
            momentum_loss: MOMENTUM_LOSS,
            goal: false,
        }
    }

    pub fn set_momentum_loss(&mut self, loss: f32) {
        self.momentum_loss = loss;
    }

    /// Arrow keys nudge the velocity by a fixed increment. Held-key
    /// repeats are ignored so each press counts once.
    pub fn handle_event(&mut self, event: &InputEvent) {
        if let InputEvent::KeyDown { key, repeat: false } = *event {
            match key {
                Key::Up => self.ent.vel.y -= MAZE_ACCEL,
                Key::Down => self.ent.vel.y += MAZE_ACCEL,
                Key::Left => self.ent.vel.x -= MAZE_ACCEL,
                Key::Right => self.ent.vel.x += MAZE_ACCEL,
                _ => {}
            }
        }
    }

    /// One frame: integrate, bounce off walls (at most two wall contacts
    /// per frame), then off the level boundary. A no-op once the goal has
    /// been reached.
    pub fn move_step(&mut self, dim: Dimension, walls: &[Platform]) {
        if self.goal {
            return;
        }

        let dt = self.ent.timer.elapsed_ms() as f32;
        self.ent.pixel.x += (dim.w as f32 * self.ent.vel.x * dt) as i32;
        self.ent.pixel.y += (dim.h as f32 * self.ent.vel.y * dt) as i32;

        let mut hits = 0;
        for wall in walls {
            match self.ent.check_hit(&wall.ent) {
                HitPosition::None => continue,
                HitPosition::Left => {
                    if self.ent.vel.x > 0.0 {
                        self.ent.vel.x *= -self.momentum_loss;
                    }
                }
                HitPosition::Right => {
                    if self.ent.vel.x < 0.0 {
                        self.ent.vel.x *= -self.momentum_loss;
                    }
                }
                HitPosition::Top => {
                    if self.ent.vel.y > 0.0 {
                        self.ent.vel.y *= -self.momentum_loss;
                    }
                }
                HitPosition::Bottom => {
                    if self.ent.vel.y < 0.0 {
                        self.ent.vel.y *= -self.momentum_loss;
                    }
                }
            }
            hits += 1;
            if hits >= 2 {
                break;
            }
        }

        // Level boundary, same damping
        if self.ent.pixel.x <= 0 && self.ent.vel.x < 0.0 {
            self.ent.vel.x *= -self.momentum_loss;
        }
        if self.ent.pixel.right() >= dim.w as i32 && self.ent.vel.x > 0.0 {
            self.ent.vel.x *= -self.momentum_loss;
        }
        if self.ent.pixel.y <= 0 && self.ent.vel.y < 0.0 {
            self.ent.vel.y *= -self.momentum_loss;
        }
        if self.ent.pixel.bottom() >= dim.h as i32 && self.ent.vel.y > 0.0 {
            self.ent.vel.y *= -self.momentum_loss;
        }

        self.ent.sync_norm_from_pixel(dim);
        self.ent.timer.restart();
    }

    /// Touching the goal snaps the ball to its center and latches the
    /// goal state until reset.
    pub fn check_goal(&mut self, goal: &Entity, dim: Dimension) -> bool {
        if self.ent.check_hit(goal) != HitPosition::None {
            self.ent.center_inside(&goal.pixel, dim);
            self.goal = true;
        }
        self.goal
    }

    pub fn reset(&mut self, dim: Dimension) {
        self.goal = false;
        self.ent.vel = Vec2::ZERO;
        self.ent.norm = BALL_SPAWN;
        self.ent.sync_pixel_from_norm(dim);
        self.ent.timer.restart();
    }
}

/// The maze round: current level, ball, scrolling camera.
#[derive(Debug)]
pub struct Maze {
    catalog: LevelCatalog,
    pub level: Level,
    pub ball: Ball,
    camera: PixelRect,
    in_goal: bool,
    reset_at: Option<Deadline>,
    pub quit: bool,
}

impl Maze {
    pub fn new(
        window: Dimension,
        catalog: LevelCatalog,
        visuals: &mut dyn VisualStore,
    ) -> Result<Self, ArcadeError> {
        let level = Level::build(&catalog, 0, visuals)?;
        let spawn = BALL_SPAWN.to_pixel(level.dimension);
        let visual = visuals.from_solid_color(spawn.w as u32, spawn.h as u32, BALL_COLOR);
        let ball = Ball::new(level.dimension, visual);
        Ok(Self {
            catalog,
            level,
            ball,
            camera: PixelRect::new(0, 0, window.w as i32, window.h as i32),
            in_goal: false,
            reset_at: None,
            quit: false,
        })
    }

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
            self.ball.handle_event(&event);
        }
    }

    /// One frame: pending level advance, ball physics, camera follow,
    /// goal detection.
    pub fn advance(&mut self, visuals: &mut dyn VisualStore) -> Result<(), ArcadeError> {
        if let Some(deadline) = self.reset_at
            && deadline.is_due()
        {
            self.next_level(visuals)?;
        }

        let dim = self.level.dimension;
        self.ball.move_step(dim, &self.level.platforms);
        self.ball.ent.center_camera(&mut self.camera, dim);

        if !self.in_goal && self.ball.check_goal(&self.level.goal, dim) {
            self.in_goal = true;
            self.reset_at = Some(Deadline::after_ms(GOAL_RESET_MS));
            log::info!("level {} goal reached", self.level.number);
        }
        Ok(())
    }

    fn next_level(&mut self, visuals: &mut dyn VisualStore) -> Result<(), ArcadeError> {
        let next = (self.level.number + 1) % self.catalog.len();
        self.level = Level::build(&self.catalog, next, visuals)?;
        self.ball.reset(self.level.dimension);
        self.in_goal = false;
        self.reset_at = None;
        Ok(())
    }

    pub fn render(&self, surface: &mut dyn RenderSurface) {
        surface.clear();
        self.level.render(surface, Some(&self.camera));
        self.ball.ent.render(surface, Some(&self.camera));
        surface.present();
    }
}
