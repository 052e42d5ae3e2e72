//! Shape payloads and their indexed (stored) form.

use serde::{Deserialize, Serialize};

use super::polygon::Polygon;
use super::{LabelId, ShapeId};

/// Type tag of a shape payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rect,
    Polygon2d,
}

impl ShapeType {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeType::Rect => "rect",
            ShapeType::Polygon2d => "polygon2d",
        }
    }
}

/// Axis-aligned rectangle given by its corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// A shape payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Rect(Rect),
    Polygon2d(Polygon),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Rect(_) => ShapeType::Rect,
            Shape::Polygon2d(_) => ShapeType::Polygon2d,
        }
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon2d(polygon) => Some(polygon),
            Shape::Rect(_) => None,
        }
    }

    pub fn as_rect(&self) -> Option<&Rect> {
        match self {
            Shape::Rect(rect) => Some(rect),
            Shape::Polygon2d(_) => None,
        }
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Shape::Polygon2d(polygon)
    }
}

impl From<Rect> for Shape {
    fn from(rect: Rect) -> Self {
        Shape::Rect(rect)
    }
}

/// A shape as stored in the document, with its owners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexedShape {
    pub id: ShapeId,
    /// Labels that own this shape
    pub label: Vec<LabelId>,
    pub shape_type: ShapeType,
    pub shape: Shape,
}

impl IndexedShape {
    pub fn new(id: ShapeId, label: Vec<LabelId>, shape: Shape) -> Self {
        Self {
            id,
            label,
            shape_type: shape.shape_type(),
            shape,
        }
    }
}
