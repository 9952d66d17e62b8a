//! Level definitions and the runtime level container
//!
//! A `LevelDef` is pure data: a reference dimension plus normalized tile
//! rectangles, one goal/exit rectangle, and optional patrol range/velocity
//! pairs aligned with the leading tiles. The ordered `LevelCatalog` is
//! either built in (the shipped maze and platformer layouts) or loaded from
//! JSON. `Level::build` instantiates the definition into live entities.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::platform::{Color, RenderSurface, VisualStore};
use crate::sim::entity::Entity;
use crate::sim::geom::{Dimension, NormRect, PixelRect};
use crate::sim::platformer::Platform;

pub const TILE_COLOR: Color = Color::rgb(40, 40, 160);
pub const GOAL_COLOR: Color = Color::rgb(200, 100, 100);

/// Patrol extent around a platform's spawn position, as fractions of the
/// level dimension.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementRange {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl MovementRange {
    /// Resolve to pixel offsets from the spawn rect.
    pub fn to_limits(&self, dim: Dimension) -> MovementLimits {
        MovementLimits {
            left: (self.left * dim.w as f32).round() as i32,
            right: (self.right * dim.w as f32).round() as i32,
            top: (self.top * dim.h as f32).round() as i32,
            bottom: (self.bottom * dim.h as f32).round() as i32,
        }
    }
}

/// Pixel bounds beyond which a patrolling platform reverses. Stored as
/// offsets in a definition; anchored to absolute coordinates by
/// `Platform::set_limits`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementLimits {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// One level: reference dimension, tiles, goal, optional patrol data.
///
/// `ranges` and `velocities` run parallel to `tiles`; tile `i` patrols only
/// when both vectors have an entry for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDef {
    pub dimension: Dimension,
    pub tiles: Vec<NormRect>,
    pub goal: NormRect,
    #[serde(default)]
    pub ranges: Vec<MovementRange>,
    #[serde(default)]
    pub velocities: Vec<Vec2>,
}

/// Ordered table of level definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelDef>,
}

impl LevelCatalog {
    pub fn get(&self, index: usize) -> Option<&LevelDef> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Load a catalog from a JSON file. Missing or malformed files are
    /// asset failures (fatal at startup).
    pub fn from_json_file(path: &Path) -> Result<Self, ArcadeError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArcadeError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|err| ArcadeError::AssetLoad {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, err),
        })
    }

    /// The shipped maze layouts: an outer box plus interior obstacles.
    pub fn maze_levels() -> Self {
        let dimension = Dimension::new(2000, 1500);
        let lev0 = LevelDef {
            dimension,
            tiles: vec![
                // outer boxes
                NormRect::new(0.0, 0.0, 1.0, 0.05),
                NormRect::new(0.95, 0.0, 0.05, 1.0),
                NormRect::new(0.0, 0.0, 0.05, 1.0),
                NormRect::new(0.0, 0.95, 1.0, 0.05),
                // central boxes
                NormRect::new(0.45, 0.45, 0.1, 0.1),
                NormRect::new(0.35, 0.35, 0.1, 0.1),
                NormRect::new(0.55, 0.35, 0.1, 0.1),
                NormRect::new(0.55, 0.55, 0.1, 0.1),
                NormRect::new(0.35, 0.55, 0.1, 0.1),
                // barrier next to goal
                NormRect::new(0.85, 0.4, 0.03, 0.53),
            ],
            goal: NormRect::new(0.4, 0.48, 0.03, 0.03),
            ranges: Vec::new(),
            velocities: Vec::new(),
        };
        let lev1 = LevelDef {
            dimension,
            tiles: vec![
                NormRect::new(0.0, 0.0, 1.0, 0.03),
                NormRect::new(0.97, 0.0, 0.03, 1.0),
                NormRect::new(0.0, 0.0, 0.03, 1.0),
                NormRect::new(0.0, 0.97, 1.0, 0.03),
                // lower horizontal bars with a gap
                NormRect::new(0.15, 0.85, 0.18, 0.03),
                NormRect::new(0.4, 0.85, 0.52, 0.03),
                // vertical bar
                NormRect::new(0.2, 0.2, 0.03, 0.6),
            ],
            goal: NormRect::new(0.85, 0.1, 0.03, 0.03),
            ranges: Vec::new(),
            velocities: Vec::new(),
        };
        Self {
            levels: vec![lev0, lev1],
        }
    }

    /// The shipped platformer layout. The two moving platforms come first
    /// so the patrol vectors can stay short.
    pub fn platformer_levels() -> Self {
        let dimension = Dimension::new(1600, 1200);
        let lev0 = LevelDef {
            dimension,
            tiles: vec![
                // horizontal patroller
                NormRect::new(0.7, 0.5, 0.1, 0.03),
                // vertical patroller
                NormRect::new(0.12, 0.35, 0.1, 0.03),
                // floor and walls
                NormRect::new(0.0, 0.95, 1.0, 0.05),
                NormRect::new(0.0, 0.0, 0.03, 1.0),
                NormRect::new(0.97, 0.0, 0.03, 1.0),
                // fixed ledges
                NormRect::new(0.55, 0.8, 0.12, 0.03),
                NormRect::new(0.3, 0.65, 0.12, 0.03),
            ],
            goal: NormRect::new(0.05, 0.28, 0.03, 0.05),
            ranges: vec![
                MovementRange {
                    left: 0.15,
                    ..Default::default()
                },
                MovementRange {
                    bottom: 0.25,
                    ..Default::default()
                },
            ],
            velocities: vec![Vec2::new(1.0 / 8000.0, 0.0), Vec2::new(0.0, 1.0 / 9000.0)],
        };
        Self { levels: vec![lev0] }
    }
}

/// A built level: live obstacle entities plus the goal/exit.
#[derive(Debug)]
pub struct Level {
    pub number: usize,
    pub dimension: Dimension,
    pub platforms: Vec<Platform>,
    pub goal: Entity,
}

impl Level {
    /// Instantiate catalog entry `index`. An out-of-range index is a
    /// fatal configuration error.
    pub fn build(
        catalog: &LevelCatalog,
        index: usize,
        visuals: &mut dyn VisualStore,
    ) -> Result<Self, ArcadeError> {
        let def = catalog.get(index).ok_or(ArcadeError::LevelIndex(index))?;
        let dim = def.dimension;

        let mut platforms = Vec::with_capacity(def.tiles.len());
        for (i, rect) in def.tiles.iter().enumerate() {
            let pixel = rect.to_pixel(dim);
            let visual = visuals.from_solid_color(pixel.w as u32, pixel.h as u32, TILE_COLOR);
            let mut platform = Platform::new(*rect, dim, visual);
            if let (Some(range), Some(vel)) = (def.ranges.get(i), def.velocities.get(i)) {
                platform.set_limits(range.to_limits(dim));
                platform.set_velocities(*vel);
            }
            platforms.push(platform);
        }

        let goal_pixel = def.goal.to_pixel(dim);
        let goal_visual =
            visuals.from_solid_color(goal_pixel.w as u32, goal_pixel.h as u32, GOAL_COLOR);
        let goal = Entity::new(def.goal, dim, goal_visual, "goal");

        log::info!(
            "built level {index}: {} tiles, {}x{}",
            platforms.len(),
            dim.w,
            dim.h
        );
        Ok(Self {
            number: index,
            dimension: dim,
            platforms,
            goal,
        })
    }

    /// Advance every patrolling platform one frame.
    pub fn move_platforms(&mut self) {
        let dim = self.dimension;
        for platform in &mut self.platforms {
            platform.move_step(dim);
        }
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, camera: Option<&PixelRect>) {
        for platform in &self.platforms {
            platform.ent.render(surface, camera);
        }
        self.goal.render(surface, camera);
    }
}
