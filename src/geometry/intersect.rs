//! Segment intersection tests and polygon simplicity.
//!
//! Two pairwise tests are available. The orientation test is exact up to
//! floating point and handles collinear overlap; it decides validity by
//! default. The bounding-box test only checks whether the segments' boxes
//! overlap strictly, which is cheaper but coarser.

use serde::{Deserialize, Serialize};

use super::Vector2D;

/// Which pairwise segment test is used by the simplicity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntersectionTest {
    /// Orientation (cross product sign) test with collinear handling.
    #[default]
    Orientation,
    /// Strict overlap of the two segments' bounding boxes.
    BoundingBox,
}

impl IntersectionTest {
    /// Test whether segment `a1-a2` intersects segment `b1-b2`.
    pub fn intersects(&self, a1: Vector2D, a2: Vector2D, b1: Vector2D, b2: Vector2D) -> bool {
        match self {
            IntersectionTest::Orientation => segments_intersect(a1, a2, b1, b2),
            IntersectionTest::BoundingBox => bounding_boxes_overlap(a1, a2, b1, b2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Collinear,
    Clockwise,
    CounterClockwise,
}

fn orientation(p: Vector2D, q: Vector2D, r: Vector2D) -> Orientation {
    let val = (q.y - p.y) * (r.x - q.x) - (q.x - p.x) * (r.y - q.y);
    if val == 0.0 {
        Orientation::Collinear
    } else if val > 0.0 {
        Orientation::Clockwise
    } else {
        Orientation::CounterClockwise
    }
}

/// `q` lies on segment `p-r`, given the three points are collinear.
fn on_segment(p: Vector2D, q: Vector2D, r: Vector2D) -> bool {
    q.x <= p.x.max(r.x) && q.x >= p.x.min(r.x) && q.y <= p.y.max(r.y) && q.y >= p.y.min(r.y)
}

/// Orientation-based segment intersection, including touching and collinear overlap.
pub fn segments_intersect(a1: Vector2D, a2: Vector2D, b1: Vector2D, b2: Vector2D) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    (o1 == Orientation::Collinear && on_segment(a1, b1, a2))
        || (o2 == Orientation::Collinear && on_segment(a1, b2, a2))
        || (o3 == Orientation::Collinear && on_segment(b1, a1, b2))
        || (o4 == Orientation::Collinear && on_segment(b1, a2, b2))
}

/// Strict bounding-box overlap of two segments.
pub fn bounding_boxes_overlap(a1: Vector2D, a2: Vector2D, b1: Vector2D, b2: Vector2D) -> bool {
    a1.x.min(a2.x) < b1.x.max(b2.x)
        && b1.x.min(b2.x) < a1.x.max(a2.x)
        && a1.y.min(a2.y) < b1.y.max(b2.y)
        && b1.y.min(b2.y) < a1.y.max(a2.y)
}

/// Check that no two non-adjacent edges of the closed ring intersect.
///
/// Edges that share an endpoint (by coordinate equality) are adjacent and
/// are never tested against each other.
pub fn is_simple(ring: &[Vector2D], test: IntersectionTest) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let edge = |i: usize| (ring[i], ring[(i + 1) % n]);

    for i in 0..n {
        let (a1, a2) = edge(i);
        for j in (i + 1)..n {
            let (b1, b2) = edge(j);
            let shares_endpoint = a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2;
            if shares_endpoint {
                continue;
            }
            if test.intersects(a1, a2, b1, b2) {
                log::trace!("Edges {} and {} intersect", i, j);
                return false;
            }
        }
    }
    true
}
