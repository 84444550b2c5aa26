//! Geometry primitives for the layout canvas

use serde::{Deserialize, Serialize};

/// A 2D vector in canvas space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Vector pointing from `self` to `other`
    pub fn to(self, other: Vec2) -> Vec2 {
        Vec2::new(other.x - self.x, other.y - self.y)
    }

    /// Sum of absolute components (L1 norm)
    pub fn manhattan(self) -> f64 {
        self.x.abs() + self.y.abs()
    }
}

/// Fixed logical canvas the layout lives in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp `x` into `[inset, width - inset]`.
    ///
    /// When the inset exceeds half the width the range is empty and the
    /// horizontal center is returned instead.
    pub fn clamp_x(&self, x: f64, inset: f64) -> f64 {
        clamp_axis(x, inset, self.width - inset)
    }

    /// Clamp `y` into `[inset, height - inset]`, see [`Bounds::clamp_x`].
    pub fn clamp_y(&self, y: f64, inset: f64) -> f64 {
        clamp_axis(y, inset, self.height - inset)
    }

    pub fn contains(&self, p: Vec2, inset: f64) -> bool {
        p.x >= inset && p.x <= self.width - inset && p.y >= inset && p.y <= self.height - inset
    }
}

// `f64::clamp` panics on NaN bounds as well as on `lo > hi`
fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    if lo.is_nan() || hi.is_nan() || lo > hi {
        (lo + hi) / 2.0
    } else {
        v.clamp(lo, hi)
    }
}
