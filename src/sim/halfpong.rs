//! Half-Pong: one paddle against the right wall
//!
//! The ball bounces off the left wall, floor and ceiling; the paddle
//! defends the right wall. Getting past the paddle costs a life and parks
//! the ball in front of it until a short delay relaunches it. Every return
//! scores a point and throws a burst of short-lived sparks.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::highscore::HighScoreFile;
use crate::platform::{
    Color, InputEvent, InputSource, Key, RenderSurface, VisualStore,
};
use crate::sim::entity::{Deadline, Entity};
use crate::sim::geom::{Dimension, NormRect, PixelRect};

pub const PADDLE_COLOR: Color = Color::rgb(210, 160, 10);
pub const BALL_COLOR: Color = Color::rgb(210, 210, 210);

const PADDLE_SPAWN: PixelRect = PixelRect {
    x: 730,
    y: 200,
    w: 20,
    h: 80,
};
const BALL_SPAWN: PixelRect = PixelRect {
    x: 50,
    y: 300,
    w: 25,
    h: 25,
};

/// Outcome of one ball frame, reported so the round can keep score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallOutcome {
    None,
    /// The ball got past the paddle
    Goal,
    /// The paddle returned the ball
    PaddleReturn,
}

/// The player's paddle, driven by keys or mouse drag.
#[derive(Debug, Clone)]
pub struct Paddle {
    pub ent: Entity,
    has_mouse: bool,
}

impl Paddle {
    pub fn new(dim: Dimension, visual: crate::platform::VisualId) -> Self {
        Self {
            ent: Entity::from_pixel(PADDLE_SPAWN, dim, visual, "paddle"),
            has_mouse: false,
        }
    }

    /// Key presses add velocity, releases take it back, so opposing keys
    /// held together cancel out. A click on the paddle grabs it for
    /// dragging.
    pub fn handle_event(&mut self, event: &InputEvent, dim: Dimension) {
        match *event {
            InputEvent::KeyDown { key, repeat: false } => match key {
                Key::Up => self.ent.vel.y -= PADDLE_SPEED,
                Key::Down => self.ent.vel.y += PADDLE_SPEED,
                _ => {}
            },
            InputEvent::KeyUp { key, repeat: false } => match key {
                Key::Up => self.ent.vel.y += PADDLE_SPEED,
                Key::Down => self.ent.vel.y -= PADDLE_SPEED,
                _ => {}
            },
            InputEvent::MouseButton { x, y, down: true } => {
                self.has_mouse = self.ent.is_inside(x, y);
            }
            InputEvent::MouseButton { down: false, .. } => self.has_mouse = false,
            InputEvent::MouseMotion { dy, .. } if self.has_mouse => {
                self.ent.pixel.y += dy;
                let max_y = dim.h as i32 - self.ent.pixel.h;
                self.ent.pixel.y = self.ent.pixel.y.clamp(0, max_y);
                self.ent.sync_norm_from_pixel(dim);
            }
            _ => {}
        }
    }

    /// Velocity step, reverted when it would leave the window.
    pub fn move_step(&mut self, dim: Dimension) {
        let dt = self.ent.timer.elapsed_ms() as f32;
        let dy = (dim.h as f32 * self.ent.vel.y * dt) as i32;
        self.ent.pixel.y += dy;
        if self.ent.pixel.y < 0 || self.ent.pixel.bottom() > dim.h as i32 {
            self.ent.pixel.y -= dy;
        }
        self.ent.sync_norm_from_pixel(dim);
        self.ent.timer.restart();
    }
}

/// One spark from a paddle return. Shares the ball's visual handle.
#[derive(Debug, Clone)]
struct Spark {
    ent: Entity,
    lifetime_ms: u32,
}

impl Spark {
    fn is_expired(&self) -> bool {
        self.ent.timer.elapsed_ms() > self.lifetime_ms
    }
}

/// The ball, its spark pool and the seeded generator feeding them.
#[derive(Debug, Clone)]
pub struct Ball {
    pub ent: Entity,
    pub goal: bool,
    sparks: Vec<Spark>,
    rng: Pcg32,
    jitter: Normal<f32>,
    size_dist: Normal<f32>,
}

impl Ball {
    pub fn new(dim: Dimension, visual: crate::platform::VisualId, seed: u64) -> Self {
        let mut ent = Entity::from_pixel(BALL_SPAWN, dim, visual, "ball");
        ent.vel = Vec2::new(PONG_BALL_SPEED, PONG_BALL_SPEED);
        Self {
            ent,
            goal: false,
            sparks: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            // Constant parameters, always valid
            jitter: Normal::new(0.0, 0.01).expect("valid spark jitter"),
            size_dist: Normal::new(0.003, 0.002).expect("valid spark size"),
        }
    }

    /// One frame: integrate, score a goal at the right wall, return off
    /// the paddle's front face (with sparks) or deflect off its top/bottom
    /// faces, bounce off the other three walls. A parked (post-goal) ball
    /// does not move until reset.
    pub fn move_step(&mut self, dim: Dimension, paddle: &PixelRect) -> BallOutcome {
        if self.goal {
            return BallOutcome::None;
        }

        let dt = self.ent.timer.elapsed_ms() as f32;
        self.ent.pixel.x += (dim.w as f32 * self.ent.vel.x * dt) as i32;
        self.ent.pixel.y += (dim.h as f32 * self.ent.vel.y * dt) as i32;
        let rect = self.ent.pixel;

        if rect.right() >= dim.w as i32 {
            // Past the paddle: park in front of it until relaunch
            self.goal = true;
            self.ent.pixel.x = paddle.x - rect.w - 2;
            self.ent.pixel.y = paddle.center_y() - rect.h / 2;
            self.ent.sync_norm_from_pixel(dim);
            self.ent.timer.restart();
            return BallOutcome::Goal;
        }

        // Center-in-span tests pick the struck face; edge-overlap tests
        // detect contact at all.
        let in_xrange = rect.center_x() >= paddle.x && rect.center_x() <= paddle.right();
        let in_yrange = rect.center_y() >= paddle.y && rect.center_y() <= paddle.bottom();
        let x_hit = rect.right() >= paddle.x && rect.x <= paddle.right();
        let y_hit = rect.bottom() >= paddle.y && rect.y <= paddle.bottom();
        let y_hit_bottom = y_hit && rect.y > paddle.y;
        let y_hit_top = y_hit && !y_hit_bottom && rect.bottom() < paddle.bottom();

        let mut outcome = BallOutcome::None;
        if x_hit && in_yrange {
            if self.ent.vel.x > 0.0 {
                self.ent.vel.x = -self.ent.vel.x;
            }
            self.create_sparks(dim);
            outcome = BallOutcome::PaddleReturn;
        } else if rect.x <= 0 && self.ent.vel.x < 0.0 {
            self.ent.vel.x = -self.ent.vel.x;
        }

        if (y_hit_bottom && in_xrange) || rect.y <= 0 {
            if self.ent.vel.y < 0.0 {
                self.ent.vel.y = -self.ent.vel.y;
            }
        } else if (y_hit_top && in_xrange) || rect.bottom() >= dim.h as i32 {
            if self.ent.vel.y > 0.0 {
                self.ent.vel.y = -self.ent.vel.y;
            }
        }

        self.ent.sync_norm_from_pixel(dim);
        self.ent.timer.restart();
        outcome
    }

    /// Throw a fresh burst of sparks around the ball's center.
    fn create_sparks(&mut self, dim: Dimension) {
        self.sparks.clear();
        let count = self.rng.random_range(SPARK_COUNT_MIN..=SPARK_COUNT_MAX);
        let cx = self.ent.norm.x + self.ent.norm.w / 2.0;
        let cy = self.ent.norm.y + self.ent.norm.h / 2.0;
        for _ in 0..count {
            let size = self.size_dist.sample(&mut self.rng).abs().max(0.001);
            let norm = NormRect::new(
                cx + self.jitter.sample(&mut self.rng),
                cy + self.jitter.sample(&mut self.rng),
                size,
                size,
            );
            let ent = Entity::new(norm, dim, self.ent.visual, "spark");
            self.sparks.push(Spark {
                ent,
                lifetime_ms: self
                    .rng
                    .random_range(SPARK_LIFETIME_MIN_MS..=SPARK_LIFETIME_MAX_MS),
            });
        }
    }

    #[cfg(test)]
    fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    /// Relaunch leftward, away from the paddle. Safe to call repeatedly.
    pub fn reset(&mut self) {
        self.goal = false;
        self.ent.vel.x = -self.ent.vel.x.abs();
        self.ent.timer.restart();
    }

    /// Draw the ball and its live sparks, dropping the expired ones.
    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        self.sparks.retain(|spark| !spark.is_expired());
        for spark in &self.sparks {
            spark.ent.render(surface, None);
        }
        self.ent.render(surface, None);
    }
}

/// The Half-Pong round: paddle, ball, lives, score and the persisted
/// high score.
#[derive(Debug)]
pub struct HalfPong {
    dim: Dimension,
    pub paddle: Paddle,
    pub ball: Ball,
    pub lives: u32,
    pub score: u32,
    pub high_score: u32,
    store: HighScoreFile,
    reset_at: Option<Deadline>,
    pub quit: bool,
}

impl HalfPong {
    pub fn new(dim: Dimension, visuals: &mut dyn VisualStore, store: HighScoreFile) -> Self {
        let paddle_visual = visuals.from_solid_color(
            PADDLE_SPAWN.w as u32,
            PADDLE_SPAWN.h as u32,
            PADDLE_COLOR,
        );
        let ball_visual =
            visuals.from_solid_color(BALL_SPAWN.w as u32, BALL_SPAWN.h as u32, BALL_COLOR);
        let high_score = store.read();
        Self {
            dim,
            paddle: Paddle::new(dim, paddle_visual),
            ball: Ball::new(dim, ball_visual, 0xA11AD),
            lives: START_LIVES,
            score: 0,
            high_score,
            store,
            reset_at: None,
            quit: false,
        }
    }

    pub fn poll_input(&mut self, input: &mut dyn InputSource) {
        while let Some(event) = input.poll() {
            match event {
                InputEvent::Quit
                | InputEvent::KeyDown {
                    key: Key::Escape, ..
                } => self.quit = true,
                InputEvent::KeyDown {
                    key: Key::N | Key::Space | Key::Return,
                    repeat: false,
                } if self.lives == 0 => self.restart(),
                _ => {}
            }
            self.paddle.handle_event(&event, self.dim);
        }
    }

    /// One frame: pending relaunch, paddle, then the ball with its
    /// scoring outcome.
    pub fn advance(&mut self) {
        if let Some(deadline) = self.reset_at
            && deadline.is_due()
        {
            self.ball.reset();
            self.reset_at = None;
        }

        self.paddle.move_step(self.dim);
        if self.lives == 0 {
            return;
        }

        match self.ball.move_step(self.dim, &self.paddle.ent.pixel) {
            BallOutcome::Goal => {
                self.lives -= 1;
                if self.lives > 0 {
                    self.reset_at = Some(Deadline::after_ms(GOAL_RESET_MS));
                } else {
                    self.finish_game();
                }
            }
            BallOutcome::PaddleReturn => self.score += 1,
            BallOutcome::None => {}
        }
    }

    fn finish_game(&mut self) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.write(self.score);
            log::info!("game over, new high score {}", self.score);
        } else {
            log::info!(
                "game over, score {} (high score {})",
                self.score,
                self.high_score
            );
        }
    }

    fn restart(&mut self) {
        self.lives = START_LIVES;
        self.score = 0;
        self.reset_at = None;
        self.ball.reset();
    }

    pub fn render(&mut self, surface: &mut dyn RenderSurface) {
        surface.clear();
        self.ball.render(surface);
        self.paddle.ent.render(surface, None);
        surface.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessVisuals, VisualId};

    const DIM: Dimension = Dimension { w: 800, h: 600 };

    fn test_ball() -> Ball {
        Ball::new(DIM, VisualId(0), 42)
    }

    #[test]
    fn test_left_wall_flip_once() {
        let mut ball = test_ball();
        ball.ent.pixel.x = 0;
        ball.ent.sync_norm_from_pixel(DIM);
        ball.ent.vel.x = -PONG_BALL_SPEED;
        ball.ent.vel.y = 0.0;
        let paddle = PADDLE_SPAWN;

        ball.move_step(DIM, &paddle);
        assert!(ball.ent.vel.x > 0.0, "reflects off the left wall");

        // Already moving away: the next frame must not flip back
        ball.move_step(DIM, &paddle);
        assert!(ball.ent.vel.x > 0.0);
    }

    #[test]
    fn test_paddle_return_scores_and_sparks() {
        let mut ball = test_ball();
        ball.ent.pixel = PixelRect::new(700, 230, 25, 25);
        ball.ent.sync_norm_from_pixel(DIM);
        ball.ent.vel = Vec2::new(PONG_BALL_SPEED, 0.0);
        ball.ent.timer.restart();
        ball.ent.timer.advance(16);

        let outcome = ball.move_step(DIM, &PADDLE_SPAWN);
        assert_eq!(outcome, BallOutcome::PaddleReturn);
        assert!(ball.ent.vel.x < 0.0);
        let sparks = ball.spark_count();
        assert!((SPARK_COUNT_MIN as usize..=SPARK_COUNT_MAX as usize).contains(&sparks));
    }

    #[test]
    fn test_paddle_top_face_bounces_vy() {
        let mut ball = test_ball();
        // Descending onto the paddle's top edge, centered in its x-span
        ball.ent.pixel = PixelRect::new(735, 190, 25, 25);
        ball.ent.sync_norm_from_pixel(DIM);
        ball.ent.vel = Vec2::new(0.0, PONG_BALL_SPEED);
        ball.ent.timer.restart();
        ball.ent.timer.advance(16);

        ball.move_step(DIM, &PADDLE_SPAWN);
        assert_eq!(
            ball.ent.vel.y, -PONG_BALL_SPEED,
            "descending ball reflects off the paddle top"
        );
    }

    #[test]
    fn test_paddle_bottom_face_bounces_vy() {
        let mut ball = test_ball();
        // Rising into the paddle's bottom edge from below
        ball.ent.pixel = PixelRect::new(735, 270, 25, 25);
        ball.ent.sync_norm_from_pixel(DIM);
        ball.ent.vel = Vec2::new(0.0, -PONG_BALL_SPEED);
        ball.ent.timer.restart();
        ball.ent.timer.advance(16);

        ball.move_step(DIM, &PADDLE_SPAWN);
        assert_eq!(
            ball.ent.vel.y, PONG_BALL_SPEED,
            "rising ball reflects off the paddle bottom"
        );
    }

    #[test]
    fn test_goal_parks_ball_before_paddle() {
        let mut ball = test_ball();
        // Above the paddle, so it slips past into the right wall
        ball.ent.pixel = PixelRect::new(770, 50, 25, 25);
        ball.ent.sync_norm_from_pixel(DIM);
        ball.ent.vel = Vec2::new(PONG_BALL_SPEED, 0.0);
        ball.ent.timer.restart();
        ball.ent.timer.advance(16);

        let outcome = ball.move_step(DIM, &PADDLE_SPAWN);
        assert_eq!(outcome, BallOutcome::Goal);
        assert!(ball.goal);
        assert_eq!(ball.ent.pixel.x, PADDLE_SPAWN.x - 25 - 2);

        // Parked: no further motion until reset
        let parked = ball.ent.pixel;
        ball.ent.timer.advance(100);
        assert_eq!(ball.move_step(DIM, &PADDLE_SPAWN), BallOutcome::None);
        assert_eq!(ball.ent.pixel, parked);
    }

    #[test]
    fn test_reset_relaunches_leftward() {
        let mut ball = test_ball();
        ball.goal = true;
        ball.ent.vel.x = PONG_BALL_SPEED;
        ball.reset();
        assert!(!ball.goal);
        assert_eq!(ball.ent.vel.x, -PONG_BALL_SPEED);
        // Idempotent
        ball.reset();
        assert_eq!(ball.ent.vel.x, -PONG_BALL_SPEED);
    }

    #[test]
    fn test_paddle_key_velocity_cancels() {
        let mut visuals = HeadlessVisuals::new();
        let visual = visuals.from_solid_color(20, 80, PADDLE_COLOR);
        let mut paddle = Paddle::new(DIM, visual);

        paddle.handle_event(
            &InputEvent::KeyDown {
                key: Key::Up,
                repeat: false,
            },
            DIM,
        );
        paddle.handle_event(
            &InputEvent::KeyDown {
                key: Key::Down,
                repeat: false,
            },
            DIM,
        );
        assert_eq!(paddle.ent.vel.y, 0.0);

        paddle.handle_event(
            &InputEvent::KeyUp {
                key: Key::Down,
                repeat: false,
            },
            DIM,
        );
        assert_eq!(paddle.ent.vel.y, -PADDLE_SPEED);
    }

    #[test]
    fn test_paddle_stops_at_window_edge() {
        let mut visuals = HeadlessVisuals::new();
        let visual = visuals.from_solid_color(20, 80, PADDLE_COLOR);
        let mut paddle = Paddle::new(DIM, visual);
        paddle.ent.pixel.y = 2;
        paddle.ent.sync_norm_from_pixel(DIM);
        paddle.ent.vel.y = -PADDLE_SPEED;

        paddle.ent.timer.restart();
        paddle.ent.timer.advance(50);
        paddle.move_step(DIM);
        assert_eq!(paddle.ent.pixel.y, 2, "step that would leave is reverted");
    }

    #[test]
    fn test_mouse_drag_requires_grab() {
        let mut visuals = HeadlessVisuals::new();
        let visual = visuals.from_solid_color(20, 80, PADDLE_COLOR);
        let mut paddle = Paddle::new(DIM, visual);
        let y0 = paddle.ent.pixel.y;

        // Motion without a grab does nothing
        paddle.handle_event(
            &InputEvent::MouseMotion {
                x: 0,
                y: 0,
                dx: 0,
                dy: 30,
            },
            DIM,
        );
        assert_eq!(paddle.ent.pixel.y, y0);

        // Click inside the paddle, then drag
        paddle.handle_event(
            &InputEvent::MouseButton {
                x: 735,
                y: y0 + 10,
                down: true,
            },
            DIM,
        );
        paddle.handle_event(
            &InputEvent::MouseMotion {
                x: 0,
                y: 0,
                dx: 0,
                dy: 30,
            },
            DIM,
        );
        assert_eq!(paddle.ent.pixel.y, y0 + 30);
    }

    #[test]
    fn test_round_counts_lives_and_score() {
        let dir = std::env::temp_dir().join("box_arcade_halfpong_test");
        std::fs::create_dir_all(&dir).unwrap();
        let store = HighScoreFile::new(dir.join("scores.dat"));
        let mut visuals = HeadlessVisuals::new();
        let mut game = HalfPong::new(DIM, &mut visuals, store);
        assert_eq!(game.lives, START_LIVES);

        // Steer the ball past the paddle
        game.ball.ent.pixel = PixelRect::new(770, 50, 25, 25);
        game.ball.ent.sync_norm_from_pixel(DIM);
        game.ball.ent.vel = Vec2::new(PONG_BALL_SPEED, 0.0);
        game.ball.ent.timer.advance(16);

        game.advance();
        assert_eq!(game.lives, START_LIVES - 1);
        assert!(game.reset_at.is_some());

        std::fs::remove_file(dir.join("scores.dat")).ok();
    }
}
