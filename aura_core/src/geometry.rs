//! Device-independent coordinates shared by the orb and the dock.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        debug_assert!(x.is_finite() && y.is_finite(), "NaN pointer coordinates");
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen space (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        debug_assert!(
            width.is_finite() && height.is_finite(),
            "non-finite viewport size"
        );
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Maps a screen point to [-1, 1] on both axes, 0 at the center.
    pub fn normalize(&self, point: Point) -> Point {
        let nx = if self.width > 0.0 {
            (point.x / self.width) * 2.0 - 1.0
        } else {
            0.0
        };
        let ny = if self.height > 0.0 {
            (point.y / self.height) * 2.0 - 1.0
        } else {
            0.0
        };
        Point {
            x: nx.clamp(-1.0, 1.0),
            y: ny.clamp(-1.0, 1.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}
