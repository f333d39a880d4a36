//! Axis-aligned rectangles
//!
//! Screen-space convention: `y` grows downward, so `top()` is the smaller Y.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Strict overlap test. Rectangles that only share an edge do not collide.
    #[inline]
    pub fn collides(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True if the horizontal extents overlap (strictly)
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.right() > other.x && self.x < other.right()
    }

    /// Clamp the X position so the rectangle stays within `[0, max_right]`
    pub fn clamp_x(&mut self, max_right: f32) {
        if self.x < 0.0 {
            self.x = 0.0;
        }
        if self.right() > max_right {
            self.x = max_right - self.width;
        }
    }
}

/// Free-function form of [`Rect::collides`]
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.collides(b)
}
