//! Rectangle geometry and directional hit classification
//!
//! Every entity keeps two views of its footprint: a `NormRect` with
//! position/size as fractions of a reference `Dimension`, and the derived
//! integer `PixelRect` used for collision tests and drawing. The invariant
//! `pixel == round(norm * dimension)` is re-established by the sync
//! operations whenever either side changes.

use serde::{Deserialize, Serialize};

/// Pixel size of the coordinate space an entity lives in: the game window,
/// or a larger scrollable level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub w: u32,
    pub h: u32,
}

impl Dimension {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

/// Location and size as fractions of the reference dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl NormRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Resolve to integer pixel coordinates.
    pub fn to_pixel(&self, dim: Dimension) -> PixelRect {
        PixelRect {
            x: (self.x * dim.w as f32).round() as i32,
            y: (self.y * dim.h as f32).round() as i32,
            w: (self.w * dim.w as f32).round() as i32,
            h: (self.h * dim.h as f32).round() as i32,
        }
    }
}

/// The same rectangle resolved to integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    #[inline]
    pub fn center_y(&self) -> i32 {
        self.y + self.h / 2
    }

    /// AABB overlap test. Touching edges count as contact, which is what
    /// lets a player resting exactly on a platform top register a hit
    /// every frame.
    pub fn overlaps(&self, other: &PixelRect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// Point-in-rect test (pointer interaction).
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// Convert back to fractions of the reference dimension.
    pub fn to_norm(&self, dim: Dimension) -> NormRect {
        NormRect {
            x: self.x as f32 / dim.w as f32,
            y: self.y as f32 / dim.h as f32,
            w: self.w as f32 / dim.w as f32,
            h: self.h as f32 / dim.h as f32,
        }
    }
}

/// The face of the obstacle that a moving rect struck. `Left` means the
/// mover came from the left (its right edge crossed the obstacle's left
/// face), so the repulsion is leftward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPosition {
    None,
    Top,
    Bottom,
    Left,
    Right,
}

/// Classify the contact between a moving rect and an obstacle rect.
///
/// Returns `HitPosition::None` exactly when the rects do not overlap.
/// Otherwise the dominant penetrated face is chosen: if the mover's
/// vertical center lies within the obstacle's vertical span the contact is
/// horizontal (left/right by shallower penetration); else if its horizontal
/// center lies within the horizontal span the contact is vertical
/// (top/bottom likewise). A corner graze where neither center is in span
/// falls back to the shallowest of the four penetrations. One face per
/// call; a second call against a different obstacle in the same frame can
/// produce the second simultaneous contact.
pub fn hit_position(mover: &PixelRect, obstacle: &PixelRect) -> HitPosition {
    if !mover.overlaps(obstacle) {
        return HitPosition::None;
    }

    // Depth through each obstacle face.
    let pen_left = mover.right() - obstacle.x;
    let pen_right = obstacle.right() - mover.x;
    let pen_top = mover.bottom() - obstacle.y;
    let pen_bottom = obstacle.bottom() - mover.y;

    let y_center_in = mover.center_y() >= obstacle.y && mover.center_y() <= obstacle.bottom();
    let x_center_in = mover.center_x() >= obstacle.x && mover.center_x() <= obstacle.right();

    if y_center_in {
        if pen_left <= pen_right {
            HitPosition::Left
        } else {
            HitPosition::Right
        }
    } else if x_center_in {
        if pen_top <= pen_bottom {
            HitPosition::Top
        } else {
            HitPosition::Bottom
        }
    } else {
        // Corner contact: take the shallowest penetration.
        let min = pen_left.min(pen_right).min(pen_top).min(pen_bottom);
        if min == pen_left {
            HitPosition::Left
        } else if min == pen_right {
            HitPosition::Right
        } else if min == pen_top {
            HitPosition::Top
        } else {
            HitPosition::Bottom
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_pixel_round_trip() {
        let dim = Dimension::new(800, 600);
        let norm = NormRect::new(0.5, 0.25, 0.05, 0.1);
        let pixel = norm.to_pixel(dim);
        assert_eq!(pixel, PixelRect::new(400, 150, 40, 60));
        let back = pixel.to_norm(dim);
        assert!((back.x - 0.5).abs() < 1e-6);
        assert!((back.h - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_to_pixel_idempotent() {
        let dim = Dimension::new(800, 600);
        let norm = NormRect::new(0.123, 0.456, 0.031, 0.072);
        assert_eq!(norm.to_pixel(dim), norm.to_pixel(dim));
    }

    #[test]
    fn test_no_overlap_is_none() {
        let a = PixelRect::new(0, 0, 10, 10);
        let b = PixelRect::new(100, 100, 10, 10);
        assert_eq!(hit_position(&a, &b), HitPosition::None);
    }

    #[test]
    fn test_left_face_hit() {
        // Mover approaching from the left, vertical centers aligned
        let mover = PixelRect::new(90, 50, 20, 20);
        let obstacle = PixelRect::new(105, 40, 40, 40);
        assert_eq!(hit_position(&mover, &obstacle), HitPosition::Left);
    }

    #[test]
    fn test_right_face_hit() {
        let mover = PixelRect::new(140, 50, 20, 20);
        let obstacle = PixelRect::new(105, 40, 40, 40);
        assert_eq!(hit_position(&mover, &obstacle), HitPosition::Right);
    }

    #[test]
    fn test_top_face_hit() {
        // Mover resting on the obstacle's top edge
        let mover = PixelRect::new(110, 25, 20, 20);
        let obstacle = PixelRect::new(100, 45, 60, 30);
        assert_eq!(hit_position(&mover, &obstacle), HitPosition::Top);
    }

    #[test]
    fn test_bottom_face_hit() {
        let mover = PixelRect::new(110, 70, 20, 20);
        let obstacle = PixelRect::new(100, 30, 60, 45);
        assert_eq!(hit_position(&mover, &obstacle), HitPosition::Bottom);
    }

    #[test]
    fn test_touching_edge_counts() {
        // Exactly resting on top: bottom of mover == top of obstacle
        let mover = PixelRect::new(110, 20, 20, 20);
        let obstacle = PixelRect::new(100, 40, 60, 30);
        assert!(mover.overlaps(&obstacle));
        assert_eq!(hit_position(&mover, &obstacle), HitPosition::Top);
    }

    proptest! {
        /// hit_position and the plain AABB overlap oracle must agree exactly:
        /// a non-None classification iff the rects overlap.
        #[test]
        fn hit_agrees_with_overlap(
            ax in -200i32..200, ay in -200i32..200,
            aw in 1i32..80, ah in 1i32..80,
            bx in -200i32..200, by in -200i32..200,
            bw in 1i32..80, bh in 1i32..80,
        ) {
            let a = PixelRect::new(ax, ay, aw, ah);
            let b = PixelRect::new(bx, by, bw, bh);
            let hit = hit_position(&a, &b);
            prop_assert_eq!(hit != HitPosition::None, a.overlaps(&b));
        }

        /// Sync invariant: pixel == norm * dimension to integer rounding.
        #[test]
        fn sync_invariant(
            x in 0.0f32..1.0, y in 0.0f32..1.0,
            w in 0.001f32..0.5, h in 0.001f32..0.5,
        ) {
            let dim = Dimension::new(800, 600);
            let pixel = NormRect::new(x, y, w, h).to_pixel(dim);
            prop_assert_eq!(pixel.x, (x * 800.0).round() as i32);
            prop_assert_eq!(pixel.y, (y * 600.0).round() as i32);
        }
    }
}
