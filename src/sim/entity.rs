//! Base movable/renderable entity and the polled timing primitives
//!
//! Each entity carries its own frame timer: `move` implementations read the
//! elapsed milliseconds since the last restart, integrate with that delta,
//! and restart the timer. This keeps the physics decoupled from any fixed
//! tick rate. Delayed actions (goal resets, level advances) are `Deadline`s
//! checked once per frame, never scheduled callbacks.

use std::time::{Duration, Instant};

use glam::Vec2;

use crate::platform::{RenderSurface, VisualId};
use crate::sim::geom::{Dimension, HitPosition, NormRect, PixelRect, hit_position};

/// Wall-clock elapsed-time measurement, polled synchronously.
#[derive(Debug, Clone, Copy)]
pub struct FrameTimer {
    started: Instant,
}

impl FrameTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds since the timer was last (re)started.
    pub fn elapsed_ms(&self) -> u32 {
        self.started.elapsed().as_millis() as u32
    }

    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Shift the start backwards so `elapsed_ms` reports at least `ms`.
    /// Lets tests drive exact frame deltas without sleeping.
    #[cfg(test)]
    pub(crate) fn advance(&mut self, ms: u64) {
        self.started -= Duration::from_millis(ms);
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::start()
    }
}

/// A point in time checked once per frame.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    due: Instant,
}

impl Deadline {
    pub fn after_ms(ms: u64) -> Self {
        Self {
            due: Instant::now() + Duration::from_millis(ms),
        }
    }

    pub fn is_due(&self) -> bool {
        Instant::now() >= self.due
    }
}

/// Base movable object: synchronized normalized/pixel rectangles, a
/// velocity in normalized distance per millisecond, an opaque visual
/// handle, a name tag and the per-entity frame timer.
#[derive(Debug, Clone)]
pub struct Entity {
    pub norm: NormRect,
    pub pixel: PixelRect,
    pub vel: Vec2,
    pub visual: VisualId,
    pub name: &'static str,
    pub hidden: bool,
    pub timer: FrameTimer,
}

impl Entity {
    pub fn new(norm: NormRect, dim: Dimension, visual: VisualId, name: &'static str) -> Self {
        Self {
            norm,
            pixel: norm.to_pixel(dim),
            vel: Vec2::ZERO,
            visual,
            name,
            hidden: false,
            timer: FrameTimer::start(),
        }
    }

    pub fn from_pixel(pixel: PixelRect, dim: Dimension, visual: VisualId, name: &'static str) -> Self {
        Self {
            norm: pixel.to_norm(dim),
            pixel,
            vel: Vec2::ZERO,
            visual,
            name,
            hidden: false,
            timer: FrameTimer::start(),
        }
    }

    /// Re-derive the pixel rect after the normalized rect changed.
    pub fn sync_pixel_from_norm(&mut self, dim: Dimension) {
        self.pixel = self.norm.to_pixel(dim);
    }

    /// Re-derive the normalized rect after the pixel rect changed.
    pub fn sync_norm_from_pixel(&mut self, dim: Dimension) {
        self.norm = self.pixel.to_norm(dim);
    }

    /// Point-in-rect test against the pixel rect.
    pub fn is_inside(&self, px: i32, py: i32) -> bool {
        self.pixel.contains(px, py)
    }

    /// Directional hit classification against another entity.
    pub fn check_hit(&self, other: &Entity) -> HitPosition {
        hit_position(&self.pixel, &other.pixel)
    }

    /// Snap this entity so it is centered inside `target` (goal/exit
    /// capture behavior shared by the maze ball and the player).
    pub fn center_inside(&mut self, target: &PixelRect, dim: Dimension) {
        self.pixel.x = target.x + (target.w - self.pixel.w) / 2;
        self.pixel.y = target.y + (target.h - self.pixel.h) / 2;
        self.sync_norm_from_pixel(dim);
    }

    /// Center the camera rect on this entity, clamped to the level bounds.
    pub fn center_camera(&self, camera: &mut PixelRect, dim: Dimension) {
        camera.x = self.pixel.center_x() - camera.w / 2;
        camera.y = self.pixel.center_y() - camera.h / 2;
        camera.x = camera.x.clamp(0, (dim.w as i32 - camera.w).max(0));
        camera.y = camera.y.clamp(0, (dim.h as i32 - camera.h).max(0));
    }

    /// Draw at the pixel rect, shifted by the camera offset when one is
    /// given. Hidden entities draw nothing.
    pub fn render(&self, surface: &mut dyn RenderSurface, camera: Option<&PixelRect>) {
        if self.hidden {
            return;
        }
        let rect = match camera {
            Some(cam) => PixelRect::new(
                self.pixel.x - cam.x,
                self.pixel.y - cam.y,
                self.pixel.w,
                self.pixel.h,
            ),
            None => self.pixel,
        };
        surface.draw(&rect, self.visual);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessSurface;

    fn test_entity(dim: Dimension) -> Entity {
        Entity::new(NormRect::new(0.5, 0.5, 0.05, 0.05), dim, VisualId(0), "test")
    }

    #[test]
    fn test_sync_round_trip() {
        let dim = Dimension::new(800, 600);
        let mut ent = test_entity(dim);
        assert_eq!(ent.pixel, PixelRect::new(400, 300, 40, 30));

        ent.pixel.x = 123;
        ent.sync_norm_from_pixel(dim);
        ent.sync_pixel_from_norm(dim);
        assert_eq!(ent.pixel.x, 123);
    }

    #[test]
    fn test_sync_idempotent() {
        let dim = Dimension::new(800, 600);
        let mut ent = test_entity(dim);
        ent.norm.x = 0.317;
        ent.sync_pixel_from_norm(dim);
        let once = ent.pixel;
        ent.sync_pixel_from_norm(dim);
        assert_eq!(ent.pixel, once);
    }

    #[test]
    fn test_is_inside() {
        let dim = Dimension::new(800, 600);
        let ent = test_entity(dim);
        assert!(ent.is_inside(410, 310));
        assert!(!ent.is_inside(0, 0));
    }

    #[test]
    fn test_render_applies_camera_offset() {
        let dim = Dimension::new(800, 600);
        let ent = test_entity(dim);
        let mut surface = HeadlessSurface::new(800, 600);
        let camera = PixelRect::new(100, 50, 800, 600);
        ent.render(&mut surface, Some(&camera));
        assert_eq!(surface.draws[0].0, PixelRect::new(300, 250, 40, 30));
    }

    #[test]
    fn test_hidden_suppresses_render() {
        let dim = Dimension::new(800, 600);
        let mut ent = test_entity(dim);
        ent.hidden = true;
        let mut surface = HeadlessSurface::new(800, 600);
        ent.render(&mut surface, None);
        assert!(surface.draws.is_empty());
    }

    #[test]
    fn test_timer_advance() {
        let mut timer = FrameTimer::start();
        timer.advance(250);
        assert!(timer.elapsed_ms() >= 250);
        timer.restart();
        assert!(timer.elapsed_ms() < 250);
    }

    #[test]
    fn test_deadline_polling() {
        let due_now = Deadline::after_ms(0);
        assert!(due_now.is_due());
        let later = Deadline::after_ms(60_000);
        assert!(!later.is_due());
    }
}
