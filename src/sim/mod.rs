//! Gameplay simulation module
//!
//! All game logic lives here, behind the traits in `crate::platform`:
//! - Variable timestep, driven by per-entity frame timers
//! - Seeded RNG only (spark bursts)
//! - No rendering or input backend dependencies

pub mod entity;
pub mod geom;
pub mod halfpong;
pub mod level;
pub mod maze;
pub mod platformer;

pub use entity::{Deadline, Entity, FrameTimer};
pub use geom::{Dimension, HitPosition, NormRect, PixelRect, hit_position};
pub use halfpong::{Ball as PongBall, BallOutcome, HalfPong, Paddle};
pub use level::{Level, LevelCatalog, LevelDef, MovementLimits, MovementRange};
pub use maze::{Ball as MazeBall, Maze};
pub use platformer::{Platform, Platformer, Player};
