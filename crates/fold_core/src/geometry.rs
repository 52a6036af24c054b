//! Geometry types
//!
//! Float types (`Point`, `Size`, `Rect`) describe visual quantities such as
//! transform anchors. Item placement happens on whole pixels, so the layout
//! engine works with `PixelRect` and `EdgeInsets`.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Float Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pixel Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Rectangle on whole pixels, stored as edges
///
/// This is the shape the host's placement call receives: left/top are
/// inclusive, right/bottom exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl PixelRect {
    pub const ZERO: PixelRect = PixelRect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rect from its top-left corner and size
    pub const fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Move horizontally, keeping the width
    pub const fn translate_x(&self, dx: i32) -> Self {
        Self::new(self.left + dx, self.top, self.right + dx, self.bottom)
    }

    /// Move so that `left` becomes the new leading edge, keeping the width
    pub const fn with_left(&self, left: i32) -> Self {
        Self::new(left, self.top, left + self.width(), self.bottom)
    }

    /// Convert to a float rect
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.left as f32,
            self.top as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }
}

/// Insets on the four sides of a box (paddings, margins)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeInsets {
    #[serde(default)]
    pub left: i32,
    #[serde(default)]
    pub top: i32,
    #[serde(default)]
    pub right: i32,
    #[serde(default)]
    pub bottom: i32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Same inset on every side
    pub const fn uniform(value: i32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Sum of left and right
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of top and bottom
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}
