//! Box Arcade - three small rectangle-physics arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, entities, collisions, the
//!   three game state machines)
//! - `platform`: Rendering/input/asset collaborator traits + headless impls
//! - `highscore`: Single-integer binary high-score store
//! - `error`: Crate error taxonomy

pub mod error;
pub mod highscore;
pub mod platform;
pub mod sim;

pub use error::ArcadeError;
pub use highscore::HighScoreFile;

/// Game configuration constants
///
/// Velocities are normalized distance per millisecond: a speed of `1/1200`
/// crosses the reference dimension in 1.2 seconds. The movement constants
/// are tuning values, not contracts; games expose setters where behavior
/// depends on overriding them.
pub mod consts {
    /// Default window size
    pub const SCREEN_WIDTH: u32 = 800;
    pub const SCREEN_HEIGHT: u32 = 600;

    /// Paddle drive speed (normalized height per ms)
    pub const PADDLE_SPEED: f32 = 1.0 / 1200.0;
    /// Pong ball speed on both axes
    pub const PONG_BALL_SPEED: f32 = 1.0 / 1500.0;
    /// Velocity added per steering key press in the maze
    pub const MAZE_ACCEL: f32 = 1.0 / 4000.0;
    /// Rebound speed factor after a maze collision (0 < f <= 1)
    pub const MOMENTUM_LOSS: f32 = 0.95;

    /// Platformer run speed
    pub const PLAYER_SPEED: f32 = 1.0 / 5000.0;
    /// Jump impulse (upward, so applied negated)
    pub const JUMP_SPEED: f32 = 1.0 / 1200.0;
    /// Gravitational acceleration (normalized height per ms^2)
    pub const GRAVITY: f32 = 1.0 / 1_000_000.0;
    /// Cumulative steering budget while airborne; further horizontal
    /// control is refused once exceeded
    pub const AIR_DELTAV_BUDGET: f32 = 3.0;
    /// Controller axis values below this are ignored
    pub const CONTROLLER_DEADZONE: i16 = 8000;
    /// Controller steering accumulates air deltav slower than keys
    pub const CONTROLLER_SENSITIVITY: f32 = 0.5;

    /// Delay before the pong ball is re-served after a goal
    pub const GOAL_RESET_MS: u64 = 1000;
    /// Delay before the next platformer level loads after the exit
    pub const EXIT_RESET_MS: u64 = 1500;
    /// Lives per half-pong round
    pub const START_LIVES: u32 = 3;

    /// Spark burst bounds (batch size, lifetime in ms)
    pub const SPARK_COUNT_MIN: u32 = 15;
    pub const SPARK_COUNT_MAX: u32 = 30;
    pub const SPARK_LIFETIME_MIN_MS: u32 = 100;
    pub const SPARK_LIFETIME_MAX_MS: u32 = 400;
}
