//! Persisted polygon shape.

use serde::{Deserialize, Serialize};

use super::path_point::{PathPoint, PointKind};
use crate::constants::MIN_POLYGON_VERTICES;
use crate::geometry::{IntersectionTest, Vector2D, is_simple, ring_contains, signed_area};

/// A closed polygon boundary as an ordered sequence of path points.
///
/// Committed polygons hold vertices and bezier control pairs only. Midpoints
/// are accepted so that interchange data round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<PathPoint>,
}

impl Polygon {
    pub fn new(points: Vec<PathPoint>) -> Self {
        Self { points }
    }

    /// Build a polygon of plain vertices from coordinate pairs.
    pub fn from_vertices(vertices: &[(f64, f64)]) -> Self {
        Self {
            points: vertices
                .iter()
                .map(|&(x, y)| PathPoint::vertex(x, y))
                .collect(),
        }
    }

    /// The vertex chord: the closed ring through vertex points only.
    pub fn vertex_ring(&self) -> Vec<Vector2D> {
        vertex_ring(&self.points)
    }

    pub fn vertex_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_vertex()).count()
    }

    /// Unsigned shoelace area of the vertex chord.
    pub fn area(&self) -> f64 {
        signed_area(&self.vertex_ring()).abs()
    }

    pub fn contains(&self, point: Vector2D) -> bool {
        ring_contains(&self.vertex_ring(), point)
    }

    /// Check the committed-boundary rules: enough vertices, enough area, and
    /// no self-intersection of the vertex chord.
    pub fn is_valid(&self, min_area: f64, test: IntersectionTest) -> bool {
        is_valid_boundary(&self.points, min_area, test)
    }

    /// Whether every point is a vertex.
    pub fn is_plain(&self) -> bool {
        self.points.iter().all(|p| p.kind == PointKind::Vertex)
    }

    /// Translate every point by an offset.
    pub fn translated(&self, offset: Vector2D) -> Polygon {
        Polygon {
            points: self
                .points
                .iter()
                .map(|p| PathPoint::at(p.position() + offset, p.kind))
                .collect(),
        }
    }
}

/// Vertex positions of a boundary in order.
pub fn vertex_ring(points: &[PathPoint]) -> Vec<Vector2D> {
    points
        .iter()
        .filter(|p| p.is_vertex())
        .map(PathPoint::position)
        .collect()
}

/// Whether every run of bezier controls between two vertices is a pair.
pub fn controls_paired(points: &[PathPoint]) -> bool {
    let Some(start) = points.iter().position(PathPoint::is_vertex) else {
        return !points.iter().any(|p| p.kind == PointKind::BezierControl);
    };
    let mut run = 0;
    for i in 0..points.len() {
        if points[(start + i) % points.len()].kind == PointKind::BezierControl {
            run += 1;
            continue;
        }
        if run != 0 && run != 2 {
            return false;
        }
        run = 0;
    }
    run == 0 || run == 2
}

/// Validity of a boundary given as path points.
pub fn is_valid_boundary(points: &[PathPoint], min_area: f64, test: IntersectionTest) -> bool {
    if !controls_paired(points) {
        return false;
    }
    let ring = vertex_ring(points);
    if ring.len() < MIN_POLYGON_VERTICES {
        return false;
    }
    if signed_area(&ring).abs() < min_area {
        return false;
    }
    is_simple(&ring, test)
}
