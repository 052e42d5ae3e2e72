//! Typed control points of a polygon boundary.

use serde::{Deserialize, Serialize};

use crate::geometry::Vector2D;

/// Role of a point on the polygon boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PointKind {
    /// A corner of the polygon.
    #[default]
    #[serde(rename = "vertex")]
    Vertex,
    /// Editor helper on a straight edge; dragging it inserts a vertex.
    #[serde(rename = "mid")]
    Midpoint,
    /// One of the two control points of a cubic edge.
    #[serde(rename = "bezier")]
    BezierControl,
}

impl PointKind {
    /// Interchange tag for this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            PointKind::Vertex => "vertex",
            PointKind::Midpoint => "mid",
            PointKind::BezierControl => "bezier",
        }
    }
}

/// A point of the boundary with its role. Serializes as `{x, y, type}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "type")]
    pub kind: PointKind,
}

impl PathPoint {
    pub fn new(x: f64, y: f64, kind: PointKind) -> Self {
        Self { x, y, kind }
    }

    pub fn vertex(x: f64, y: f64) -> Self {
        Self::new(x, y, PointKind::Vertex)
    }

    pub fn midpoint(x: f64, y: f64) -> Self {
        Self::new(x, y, PointKind::Midpoint)
    }

    pub fn bezier(x: f64, y: f64) -> Self {
        Self::new(x, y, PointKind::BezierControl)
    }

    /// Create a point of the given kind at a position.
    pub fn at(position: Vector2D, kind: PointKind) -> Self {
        Self::new(position.x, position.y, kind)
    }

    pub fn position(&self) -> Vector2D {
        Vector2D::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Vector2D) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn is_vertex(&self) -> bool {
        self.kind == PointKind::Vertex
    }
}
