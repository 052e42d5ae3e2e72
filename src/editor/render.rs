//! Renderer-agnostic drawing output.
//!
//! Each editor produces a [`RenderSnapshot`] per frame; [`draw_commands`]
//! turns it into paths and circles. In [`DrawMode::View`] shapes are drawn in
//! their label color. In [`DrawMode::Control`] every handle is drawn in a color
//! encoding `(label index, handle)`, so reading back the pixel under the
//! pointer yields a [`super::Pick`].

use super::polygon::PolygonState;
use crate::color_utils::encode_control_color;
use crate::constants::WHOLE_SHAPE_HANDLE;
use crate::geometry::Vector2D;
use crate::model::{LabelId, PathPoint, PointKind};

/// Fill opacity of a polygon in view mode.
const VIEW_FILL_ALPHA: f64 = 0.3;

/// Which canvas is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Visible canvas
    #[default]
    View,
    /// Hidden canvas used for pixel picking
    Control,
}

/// Style of a point handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub radius: f64,
    pub color: [u8; 3],
    pub alpha: f64,
}

/// Style of the polygon outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub width: f64,
    pub color: [u8; 3],
    pub alpha: f64,
}

/// Point style for a mode; `highlighted` enlarges the handle.
pub fn point_style(mode: DrawMode, highlighted: bool, color: [u8; 3]) -> PointStyle {
    let radius = match (mode, highlighted) {
        (DrawMode::View, false) => 8.0,
        (DrawMode::View, true) => 12.0,
        (DrawMode::Control, false) => 12.0,
        (DrawMode::Control, true) => 14.0,
    };
    PointStyle {
        radius,
        color,
        alpha: 1.0,
    }
}

pub fn edge_style(mode: DrawMode, color: [u8; 3]) -> EdgeStyle {
    let width = match mode {
        DrawMode::View => 4.0,
        DrawMode::Control => 10.0,
    };
    EdgeStyle {
        width,
        color,
        alpha: 1.0,
    }
}

/// Per-frame view of one polygon editor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    /// Position in the label list, encoded into control colors
    pub index: usize,
    pub label_id: Option<LabelId>,
    pub state: PolygonState,
    pub points: Vec<PathPoint>,
    /// Rubber-band end while drawing
    pub cursor: Option<Vector2D>,
    pub color: [u8; 3],
    pub selected: bool,
    pub selected_handle: Option<usize>,
    pub highlighted_handle: Option<usize>,
}

impl RenderSnapshot {
    /// Whether any handle of this polygon is highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.highlighted_handle.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Vector2D),
    LineTo(Vector2D),
    CubicTo {
        control1: Vector2D,
        control2: Vector2D,
        end: Vector2D,
    },
}

/// A primitive for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Closed outline with an optional fill
    Path {
        segments: Vec<PathSegment>,
        edge: EdgeStyle,
        fill: Option<([u8; 3], f64)>,
    },
    /// Point handle
    Circle { center: Vector2D, style: PointStyle },
}

/// Drawing primitives for one polygon, with coordinates scaled by `ratio`.
///
/// Handles are drawn in control mode, or when the polygon is selected or
/// highlighted. Midpoints and bezier controls appear only once the polygon is
/// closed. In control mode, handles whose index cannot be encoded are skipped.
pub fn draw_commands(snapshot: &RenderSnapshot, mode: DrawMode, ratio: f64) -> Vec<DrawCommand> {
    let points = &snapshot.points;
    if points.is_empty() {
        return Vec::new();
    }
    let color_for = |handle: usize| -> Option<[u8; 3]> {
        match mode {
            DrawMode::View => Some(snapshot.color),
            DrawMode::Control => encode_control_color(snapshot.index, handle),
        }
    };

    let mut commands = Vec::new();
    if let Some(shape_color) = color_for(WHOLE_SHAPE_HANDLE) {
        let fill = match mode {
            DrawMode::View => (snapshot.color, VIEW_FILL_ALPHA),
            DrawMode::Control => (shape_color, 1.0),
        };
        commands.push(DrawCommand::Path {
            segments: outline(points, snapshot.cursor, ratio),
            edge: edge_style(mode, shape_color),
            fill: Some(fill),
        });
    }

    let show_handles =
        mode == DrawMode::Control || snapshot.selected || snapshot.is_highlighted();
    if !show_handles {
        return commands;
    }

    let drawing = snapshot.state == PolygonState::Draw;
    for (i, point) in points.iter().enumerate() {
        if drawing && !point.is_vertex() {
            continue;
        }
        let handle = i + 1;
        let Some(color) = color_for(handle) else {
            continue;
        };
        let highlighted = snapshot.highlighted_handle == Some(handle);
        commands.push(DrawCommand::Circle {
            center: point.position().scale(ratio),
            style: point_style(mode, highlighted, color),
        });
    }
    let cursor = snapshot.cursor.filter(|_| drawing);
    if let Some((cursor, color)) = cursor.zip(color_for(points.len() + 1)) {
        commands.push(DrawCommand::Circle {
            center: cursor.scale(ratio),
            style: point_style(mode, false, color),
        });
    }
    commands
}

/// Outline segments: straight edges between vertices, cubic curves through
/// bezier pairs, and the rubber band to `cursor` while drawing.
fn outline(points: &[PathPoint], cursor: Option<Vector2D>, ratio: f64) -> Vec<PathSegment> {
    let n = points.len();
    let at = |i: usize| points[i % n].position().scale(ratio);
    let mut segments = vec![PathSegment::MoveTo(at(0))];
    let mut i = 1;
    while i < n {
        match points[i].kind {
            PointKind::Vertex => {
                segments.push(PathSegment::LineTo(at(i)));
                i += 1;
            }
            PointKind::Midpoint => i += 1,
            PointKind::BezierControl => {
                if i + 1 < n && points[i + 1].kind == PointKind::BezierControl {
                    segments.push(PathSegment::CubicTo {
                        control1: at(i),
                        control2: at(i + 1),
                        end: at(i + 2),
                    });
                    i += 3;
                } else {
                    i += 1;
                }
            }
        }
    }
    if let Some(cursor) = cursor {
        segments.push(PathSegment::LineTo(cursor.scale(ratio)));
    }
    segments
}
