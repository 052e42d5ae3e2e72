//! 2D geometry primitives used by the polygon editor.

pub mod intersect;

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

pub use intersect::{IntersectionTest, is_simple, segments_intersect};

/// A 2D point or displacement in shape space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Vector2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at parameter `t` on the segment from `self` to `other`.
    pub fn lerp(&self, other: &Vector2D, t: f64) -> Vector2D {
        Vector2D::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Exact bisector of the segment from `self` to `other`.
    pub fn midpoint(&self, other: &Vector2D) -> Vector2D {
        Vector2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Scale both coordinates by a ratio.
    pub fn scale(&self, ratio: f64) -> Vector2D {
        Vector2D::new(self.x * ratio, self.y * ratio)
    }
}

impl Add for Vector2D {
    type Output = Vector2D;

    fn add(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2D {
    type Output = Vector2D;

    fn sub(self, rhs: Vector2D) -> Vector2D {
        Vector2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2D {
    type Output = Vector2D;

    fn mul(self, rhs: f64) -> Vector2D {
        self.scale(rhs)
    }
}

impl From<(f64, f64)> for Vector2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Signed shoelace area of a closed ring. Positive for counter-clockwise rings.
pub fn signed_area(ring: &[Vector2D]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, a) in ring.iter().enumerate() {
        let b = &ring[(i + 1) % ring.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Point-in-polygon test using ray casting.
pub fn ring_contains(ring: &[Vector2D], point: Vector2D) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
