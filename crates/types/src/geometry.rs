//! Integer geometry for the area tree.
//!
//! All lengths are millipoints (1/1000 of a typographic point), the unit the
//! layout engine produces. Output formats convert to their own device units
//! with [`mpt_to_units`].

use serde::{Deserialize, Serialize};

/// Millipoints per typographic point.
pub const MPT_PER_POINT: i32 = 1000;

/// Millipoints per inch.
pub const MPT_PER_INCH: i64 = 72_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// The same size with width and height swapped (a quarter turn).
    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Converts a millipoint length to device units at `resolution` units per
/// inch, rounding half away from zero.
pub fn mpt_to_units(mpt: i32, resolution: u32) -> i32 {
    let scaled = i64::from(mpt) * i64::from(resolution);
    let half = MPT_PER_INCH / 2;
    let rounded = if scaled >= 0 {
        (scaled + half) / MPT_PER_INCH
    } else {
        (scaled - half) / MPT_PER_INCH
    };
    rounded as i32
}
