//! Platform abstraction layer
//!
//! Narrow trait interfaces for everything the simulation core consumes but
//! does not own: the rendering surface, the visual-handle factory, and the
//! per-frame input event stream. Headless implementations back the tests
//! and the demo binary.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::error::ArcadeError;
use crate::sim::geom::PixelRect;

/// Opaque handle to a loaded visual (texture, solid rectangle, ...).
/// Cheap to copy; sparks share their ball's handle rather than owning one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisualId(pub u32);

/// RGBA color for solid-rectangle visuals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }
}

/// Drawing target for one frame: clear, entity draws, present.
pub trait RenderSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn clear(&mut self);
    fn present(&mut self);
    fn draw(&mut self, rect: &PixelRect, visual: VisualId);
}

/// Mints visual handles from solid colors or image files.
pub trait VisualStore {
    fn from_solid_color(&mut self, w: u32, h: u32, color: Color) -> VisualId;
    fn from_image_file(&mut self, path: &Path, w: u32, h: u32) -> Result<VisualId, ArcadeError>;
}

/// Keys the games understand. Anything else arrives as `Other` and is
/// ignored by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Return,
    Escape,
    N,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    Other,
}

/// A discrete input event. Each entity's handler consumes the subset it
/// understands and ignores the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    KeyDown { key: Key, repeat: bool },
    KeyUp { key: Key, repeat: bool },
    MouseMotion { x: i32, y: i32, dx: i32, dy: i32 },
    MouseButton { x: i32, y: i32, down: bool },
    ControllerAxis { axis: Axis, value: i16 },
    ControllerButton { button: Button, down: bool },
}

/// Lazy, exhaustible-per-frame event sequence.
pub trait InputSource {
    fn poll(&mut self) -> Option<InputEvent>;
}

/// Render target that records draw calls instead of drawing.
#[derive(Debug)]
pub struct HeadlessSurface {
    w: u32,
    h: u32,
    /// Draws since the last clear, in submission order
    pub draws: Vec<(PixelRect, VisualId)>,
    /// Completed frames
    pub presented: u64,
}

impl HeadlessSurface {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            draws: Vec::new(),
            presented: 0,
        }
    }
}

impl RenderSurface for HeadlessSurface {
    fn width(&self) -> u32 {
        self.w
    }

    fn height(&self) -> u32 {
        self.h
    }

    fn clear(&mut self) {
        self.draws.clear();
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn draw(&mut self, rect: &PixelRect, visual: VisualId) {
        self.draws.push((*rect, visual));
    }
}

/// Handle factory that decodes nothing. Image loads still verify the file
/// exists so missing-asset failures surface the same way they would with a
/// real backend.
#[derive(Debug, Default)]
pub struct HeadlessVisuals {
    next: u32,
}

impl HeadlessVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> VisualId {
        let id = VisualId(self.next);
        self.next += 1;
        id
    }
}

impl VisualStore for HeadlessVisuals {
    fn from_solid_color(&mut self, _w: u32, _h: u32, _color: Color) -> VisualId {
        self.mint()
    }

    fn from_image_file(&mut self, path: &Path, _w: u32, _h: u32) -> Result<VisualId, ArcadeError> {
        match std::fs::metadata(path) {
            Ok(_) => Ok(self.mint()),
            Err(source) => Err(ArcadeError::AssetLoad {
                path: PathBuf::from(path),
                source,
            }),
        }
    }
}

/// Replays a prepared event script, a frame's worth at a time.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    queue: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.queue.push_back(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        self.queue.extend(events);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<InputEvent> {
        self.queue.pop_front()
    }
}
