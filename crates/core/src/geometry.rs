//! Geometric primitives for recognizer output.
//!
//! Recognizers report axis-aligned boxes in integer pixel coordinates with
//! the origin at the top-left of the page image (y grows downward).

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box in integer pixel coordinates.
///
/// `(x1, y1)` is the top-left corner and `(x2, y2)` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BBox {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl BBox {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub const fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub const fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f64 {
        f64::from(self.x1 + self.x2) / 2.0
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f64 {
        f64::from(self.y1 + self.y2) / 2.0
    }

    /// True for boxes with inverted extents.
    ///
    /// Zero width or height is still a valid box: some recognizers report
    /// collapsed boxes for thin glyphs and those items must survive
    /// clustering.
    pub const fn is_degenerate(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }
}
