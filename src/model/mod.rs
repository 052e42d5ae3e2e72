//! Data model: path points, polygons, labels and shapes.

mod label;
mod path_point;
mod polygon;
mod shape;

pub use label::{Label, LabelType, LabelUpdate};
pub use path_point::{PathPoint, PointKind};
pub use polygon::{Polygon, controls_paired, is_valid_boundary, vertex_ring};
pub use shape::{IndexedShape, Rect, Shape, ShapeType};

/// Identifier of a label, unique and never reused within a document.
pub type LabelId = u64;

/// Identifier of a shape.
pub type ShapeId = u64;

/// Identifier of a track linking labels across items.
pub type TrackId = u64;

/// Index of an item (image or frame) in the task.
pub type ItemIndex = usize;
