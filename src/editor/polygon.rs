//! Interactive polygon editor.
//!
//! A [`Polygon2d`] turns pointer and key events into a validated polygon.
//! While editing it holds the full editor point list, in which every straight
//! edge carries a midpoint and every curved edge two bezier controls:
//!
//! ```text
//! [v0, c01, v1, c12, ..., vn-1, c(n-1)0]
//! ```
//!
//! `v0` always sits at index 0. Handle `h > 0` addresses point `h - 1`;
//! handle `0` is the whole shape.
//!
//! On release the editor validates the boundary and either emits an action
//! for the store, rolls back to the pre-edit snapshot, or discards a fresh
//! drawing.

use std::collections::BTreeMap;

use super::error::EditError;
use super::input::KeyState;
use super::render::RenderSnapshot;
use crate::color_utils::color_for_id;
use crate::config::EditorConfig;
use crate::constants::{MIN_POLYGON_VERTICES, WHOLE_SHAPE_HANDLE};
use crate::geometry::{Vector2D, ring_contains};
use crate::keybindings::EditorKey;
use crate::model::{
    ItemIndex, Label, LabelId, LabelType, PathPoint, PointKind, Polygon, Shape, ShapeId,
    is_valid_boundary, vertex_ring,
};
use crate::store::Action;
use crate::store::action::{add_label, change_shape};

/// Editing state of a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonState {
    /// Not drawn yet, or discarded
    #[default]
    Free,
    /// Vertices are being placed
    Draw,
    /// Complete and idle
    Closed,
    /// A single point is being dragged
    Reshape,
    /// The whole shape is being dragged
    Move,
    /// Reserved for linking labels; never entered by point editing
    Link,
}

/// Result of finishing an edit on release.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Nothing to commit
    Unchanged,
    /// The edit is valid; the action must be dispatched
    Commit(Action),
    /// The edit was invalid; the points were restored
    RolledBack,
    /// A fresh drawing was invalid and has been dropped
    Discarded,
}

/// Editor for one polygon label.
#[derive(Debug, Clone)]
pub struct Polygon2d {
    points: Vec<PathPoint>,
    /// Points before the current edit, for drag deltas and rollback
    snapshot: Vec<PathPoint>,
    state: PolygonState,
    label_id: Option<LabelId>,
    shape_id: Option<ShapeId>,
    item: ItemIndex,
    category: Vec<usize>,
    attributes: BTreeMap<usize, Vec<usize>>,
    order: u64,
    color: [u8; 3],
    config: EditorConfig,
    /// Pointer position for the rubber-band edge while drawing
    cursor: Option<Vector2D>,
    /// Pointer position at the last press, while the button is down
    press: Option<Vector2D>,
    selected_handle: Option<usize>,
    highlighted_handle: Option<usize>,
    selected: bool,
    /// A press made an edit that commits on release
    pending_commit: bool,
}

impl Polygon2d {
    /// Start drawing a new polygon that will become label `next_label_id`.
    pub fn draft(
        item: ItemIndex,
        category: Vec<usize>,
        attributes: BTreeMap<usize, Vec<usize>>,
        order: u64,
        next_label_id: LabelId,
        config: EditorConfig,
    ) -> Self {
        log::debug!("✏️ Started drawing polygon on item {} (order={})", item, order);
        Self {
            points: Vec::new(),
            snapshot: Vec::new(),
            state: PolygonState::Draw,
            label_id: None,
            shape_id: None,
            item,
            category,
            attributes,
            order,
            color: color_for_id(next_label_id),
            config,
            cursor: None,
            press: None,
            selected_handle: None,
            highlighted_handle: None,
            selected: true,
            pending_commit: false,
        }
    }

    /// Load a committed polygon shape of a label.
    pub fn from_shape(
        label: &Label,
        shape_id: ShapeId,
        polygon: &Polygon,
        config: EditorConfig,
    ) -> Self {
        let points = editor_points(&polygon.points);
        Self {
            snapshot: points.clone(),
            points,
            state: PolygonState::Closed,
            label_id: Some(label.id),
            shape_id: Some(shape_id),
            item: label.item,
            category: label.category.clone(),
            attributes: label.attributes.clone(),
            order: label.order,
            color: color_for_id(label.id),
            config,
            cursor: None,
            press: None,
            selected_handle: None,
            highlighted_handle: None,
            selected: false,
            pending_commit: false,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn state(&self) -> PolygonState {
        self.state
    }

    /// Editor points, including midpoints.
    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn label_id(&self) -> Option<LabelId> {
        self.label_id
    }

    pub fn shape_id(&self) -> Option<ShapeId> {
        self.shape_id
    }

    pub fn item(&self) -> ItemIndex {
        self.item
    }

    pub fn order(&self) -> u64 {
        self.order
    }

    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    pub fn cursor(&self) -> Option<Vector2D> {
        self.cursor
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn selected_handle(&self) -> Option<usize> {
        self.selected_handle
    }

    pub fn highlighted_handle(&self) -> Option<usize> {
        self.highlighted_handle
    }

    pub fn set_highlighted(&mut self, handle: Option<usize>) {
        self.highlighted_handle = handle;
    }

    /// Whether a pointer button is down on this editor.
    pub fn is_pressed(&self) -> bool {
        self.press.is_some()
    }

    pub fn vertex_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_vertex()).count()
    }

    /// Attach the ids assigned by the store to a freshly committed drawing.
    pub fn bind(&mut self, label_id: LabelId, shape_id: ShapeId) {
        self.label_id = Some(label_id);
        self.shape_id = Some(shape_id);
    }

    /// The persisted form: vertices and bezier controls only.
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(
            self.points
                .iter()
                .filter(|p| p.kind != PointKind::Midpoint)
                .copied()
                .collect(),
        )
    }

    pub fn is_valid(&self) -> bool {
        is_valid_boundary(
            &self.points,
            self.config.min_area,
            self.config.intersection_test,
        )
    }

    pub fn render_snapshot(&self, index: usize) -> RenderSnapshot {
        RenderSnapshot {
            index,
            label_id: self.label_id,
            state: self.state,
            points: self.points.clone(),
            cursor: if self.state == PolygonState::Draw {
                self.cursor
            } else {
                None
            },
            color: self.color,
            selected: self.selected,
            selected_handle: self.selected_handle,
            highlighted_handle: self.highlighted_handle,
        }
    }

    // ========================================================================
    // Hit testing
    // ========================================================================

    /// Handle under `coord`, if any.
    ///
    /// The nearest point within the hit radius wins, ties going to the lower
    /// index. Midpoints and bezier controls are only hit on a selected, closed
    /// polygon. Otherwise a point inside a closed polygon hits handle 0.
    pub fn hit_test(&self, coord: Vector2D) -> Option<usize> {
        let helpers_visible = self.selected && self.is_closed();
        let mut best: Option<(usize, f64)> = None;
        for (i, point) in self.points.iter().enumerate() {
            if !point.is_vertex() && !helpers_visible {
                continue;
            }
            let distance = point.position().distance_to(&coord);
            if distance <= self.config.hit_radius && best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        if let Some((i, _)) = best {
            return Some(i + 1);
        }
        if self.is_closed() && ring_contains(&vertex_ring(&self.points), coord) {
            return Some(WHOLE_SHAPE_HANDLE);
        }
        None
    }

    fn is_closed(&self) -> bool {
        matches!(
            self.state,
            PolygonState::Closed | PolygonState::Reshape | PolygonState::Move
        )
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// Handle a pointer press over `handle`. Returns whether it was consumed.
    pub fn pointer_down(
        &mut self,
        coord: Vector2D,
        handle: Option<usize>,
        keys: &KeyState,
    ) -> Result<bool, EditError> {
        match self.state {
            PolygonState::Draw => {
                self.press = Some(coord);
                self.cursor = Some(coord);
                Ok(true)
            }
            PolygonState::Closed => {
                let Some(handle) = handle else {
                    return Ok(false);
                };
                if handle > self.points.len() {
                    return Err(EditError::InvalidHandle {
                        handle,
                        len: self.points.len(),
                    });
                }
                self.press = Some(coord);
                self.snapshot = self.points.clone();

                if handle == WHOLE_SHAPE_HANDLE {
                    self.state = PolygonState::Move;
                    self.selected_handle = Some(WHOLE_SHAPE_HANDLE);
                    return Ok(true);
                }

                let index = handle - 1;
                if keys.is_held(EditorKey::Curve) {
                    self.pending_commit |= self.toggle_curve(index);
                    return Ok(true);
                }
                if keys.is_held(EditorKey::DeleteVertex) {
                    if self.points[index].is_vertex() {
                        self.pending_commit |= self.delete_vertex(index);
                    }
                    return Ok(true);
                }

                let index = if self.points[index].kind == PointKind::Midpoint {
                    self.split_midpoint(index)
                } else {
                    index
                };
                self.selected_handle = Some(index + 1);
                self.state = PolygonState::Reshape;
                Ok(true)
            }
            PolygonState::Reshape | PolygonState::Move => Ok(true),
            PolygonState::Free | PolygonState::Link => Ok(false),
        }
    }

    /// Handle pointer motion.
    pub fn pointer_move(&mut self, coord: Vector2D) -> Result<(), EditError> {
        match self.state {
            PolygonState::Draw => {
                self.cursor = Some(coord);
                Ok(())
            }
            PolygonState::Reshape if self.press.is_some() => self.reshape(coord),
            PolygonState::Move if self.press.is_some() => self.translate(coord),
            _ => Ok(()),
        }
    }

    /// Handle a pointer release. `on_first_handle` tells whether the release
    /// is over this polygon's first vertex.
    pub fn pointer_up(
        &mut self,
        coord: Vector2D,
        on_first_handle: bool,
    ) -> Result<EditOutcome, EditError> {
        let pressed = self.press.take();
        match self.state {
            PolygonState::Draw => {
                if pressed.is_none() {
                    return Ok(EditOutcome::Unchanged);
                }
                self.cursor = Some(coord);
                if self.add_vertex(coord, on_first_handle) {
                    self.state = PolygonState::Closed;
                    self.cursor = None;
                    log::debug!("🔒 Closed polygon with {} vertices", self.vertex_count());
                    return Ok(self.commit());
                }
                Ok(EditOutcome::Unchanged)
            }
            PolygonState::Reshape | PolygonState::Move => {
                self.state = PolygonState::Closed;
                self.selected_handle = None;
                Ok(self.commit())
            }
            PolygonState::Closed if self.pending_commit => {
                self.pending_commit = false;
                Ok(self.commit())
            }
            _ => Ok(EditOutcome::Unchanged),
        }
    }

    /// Remove the last placed vertex while drawing.
    pub fn delete_last_vertex(&mut self) -> Result<(), EditError> {
        if self.state != PolygonState::Draw {
            return Err(EditError::invalid_operation(
                "delete last vertex",
                self.state,
            ));
        }
        match self.points.len() {
            0 => {}
            1 => self.points.clear(),
            n => self.points.truncate(n - 2),
        }
        log::debug!("⌫ Removed last vertex, {} left", self.vertex_count());
        Ok(())
    }

    /// Abandon an uncommitted drawing.
    pub fn cancel(&mut self) -> EditOutcome {
        if self.state != PolygonState::Draw || self.label_id.is_some() {
            return EditOutcome::Unchanged;
        }
        self.discard();
        EditOutcome::Discarded
    }

    // ========================================================================
    // Edits
    // ========================================================================

    /// Move the selected point to `coord`.
    pub fn reshape(&mut self, coord: Vector2D) -> Result<(), EditError> {
        if self.state != PolygonState::Reshape {
            return Err(EditError::invalid_operation("reshape", self.state));
        }
        let index = match self.selected_handle {
            Some(handle) if handle > 0 && handle <= self.points.len() => handle - 1,
            _ => return Err(EditError::invalid_operation("reshape", self.state)),
        };
        self.points[index].set_position(coord);
        if self.points[index].is_vertex() {
            let (prev, next) = (self.prev_index(index), self.next_index(index));
            self.refresh_midpoint(prev);
            self.refresh_midpoint(next);
        }
        Ok(())
    }

    /// Translate the whole shape by the pointer offset since the press.
    pub fn translate(&mut self, coord: Vector2D) -> Result<(), EditError> {
        if self.state != PolygonState::Move {
            return Err(EditError::invalid_operation("move", self.state));
        }
        let press = self
            .press
            .ok_or(EditError::invalid_operation("move", self.state))?;
        let delta = coord - press;
        for (point, original) in self.points.iter_mut().zip(&self.snapshot) {
            point.set_position(original.position() + delta);
        }
        Ok(())
    }

    /// Append a vertex while drawing. Returns true when the polygon closes.
    fn add_vertex(&mut self, coord: Vector2D, on_first_handle: bool) -> bool {
        let Some(last) = self.points.last().map(PathPoint::position) else {
            self.points.push(PathPoint::at(coord, PointKind::Vertex));
            return false;
        };
        let first = self.points[0].position();
        if self.vertex_count() >= MIN_POLYGON_VERTICES
            && self
                .config
                .close_policy
                .should_close(first, coord, on_first_handle)
        {
            self.points
                .push(PathPoint::at(last.midpoint(&first), PointKind::Midpoint));
            return true;
        }
        self.points
            .push(PathPoint::at(last.midpoint(&coord), PointKind::Midpoint));
        self.points.push(PathPoint::at(coord, PointKind::Vertex));
        false
    }

    /// Turn the midpoint at `index` into a vertex with fresh midpoints on both
    /// sides. Returns the index of the new vertex.
    fn split_midpoint(&mut self, index: usize) -> usize {
        let position = self.points[index].position();
        self.points[index].kind = PointKind::Vertex;

        let next = self.points[self.next_index(index)].position();
        self.points.insert(
            index + 1,
            PathPoint::at(position.midpoint(&next), PointKind::Midpoint),
        );
        let prev = self.points[self.prev_index(index)].position();
        self.points.insert(
            index,
            PathPoint::at(prev.midpoint(&position), PointKind::Midpoint),
        );
        log::debug!("➕ Split edge at point {}", index);
        index + 1
    }

    /// Convert a straight edge into a curve or back. Returns whether anything changed.
    fn toggle_curve(&mut self, index: usize) -> bool {
        match self.points[index].kind {
            PointKind::Vertex => false,
            PointKind::Midpoint => {
                let p = self.points[self.prev_index(index)].position();
                let q = self.points[self.next_index(index)].position();
                let controls = [
                    PathPoint::at(p.lerp(&q, 1.0 / 3.0), PointKind::BezierControl),
                    PathPoint::at(p.lerp(&q, 2.0 / 3.0), PointKind::BezierControl),
                ];
                self.points.splice(index..=index, controls);
                log::debug!("〰️ Curved edge at point {}", index);
                true
            }
            PointKind::BezierControl => {
                let prev = self.prev_index(index);
                let start = if self.points[prev].kind == PointKind::BezierControl {
                    prev
                } else {
                    index
                };
                let paired = self
                    .points
                    .get(start + 1)
                    .is_some_and(|next| next.kind == PointKind::BezierControl);
                if !paired {
                    return false;
                }
                let p = self.points[self.prev_index(start)].position();
                let q = self.points[self.next_index(start + 1)].position();
                let midpoint = PathPoint::at(p.midpoint(&q), PointKind::Midpoint);
                self.points.splice(start..=start + 1, [midpoint]);
                log::debug!("📏 Straightened edge at point {}", start);
                true
            }
        }
    }

    /// Remove the vertex at `index` together with its adjacent connectors and
    /// join its neighbours with a straight edge. Returns whether anything changed.
    fn delete_vertex(&mut self, index: usize) -> bool {
        if self.vertex_count() < MIN_POLYGON_VERTICES {
            return false;
        }
        let prev = self.prev_vertex(index);
        let next = self.next_vertex(index);

        let len = self.points.len();
        let mut doomed = Vec::new();
        let mut j = (prev + 1) % len;
        while j != next {
            doomed.push(j);
            j = (j + 1) % len;
        }
        doomed.sort_unstable();
        let shift = doomed.iter().filter(|&&d| d < prev).count();
        for d in doomed.iter().rev() {
            self.points.remove(*d);
        }

        let prev = prev - shift;
        let a = self.points[prev].position();
        let b = self.points[(prev + 1) % self.points.len()].position();
        self.points
            .insert(prev + 1, PathPoint::at(a.midpoint(&b), PointKind::Midpoint));
        log::debug!("🗑️ Deleted vertex at point {}", index);
        true
    }

    // ========================================================================
    // Commit
    // ========================================================================

    /// Validate the finished edit and decide what to do with it.
    fn commit(&mut self) -> EditOutcome {
        if !self.is_valid() {
            if self.label_id.is_none() {
                log::warn!("⚠️ Discarded invalid polygon on item {}", self.item);
                self.discard();
                return EditOutcome::Discarded;
            }
            log::warn!(
                "⚠️ Invalid edit of label {:?}, rolling back",
                self.label_id
            );
            self.points = self.snapshot.clone();
            self.state = PolygonState::Closed;
            return EditOutcome::RolledBack;
        }

        let polygon = self.to_polygon();
        self.snapshot = self.points.clone();
        match self.shape_id {
            Some(shape_id) => {
                log::debug!("✅ Changed polygon shape {}", shape_id);
                EditOutcome::Commit(change_shape(self.item, shape_id, Shape::Polygon2d(polygon)))
            }
            None => {
                log::info!(
                    "✅ Created polygon with {} points (category={:?})",
                    polygon.points.len(),
                    self.category
                );
                let label = Label::new(self.item, LabelType::Polygon2d)
                    .with_category(self.category.clone())
                    .with_attributes(self.attributes.clone())
                    .with_order(self.order);
                EditOutcome::Commit(add_label(self.item, label, vec![Shape::Polygon2d(polygon)]))
            }
        }
    }

    fn discard(&mut self) {
        self.points.clear();
        self.snapshot.clear();
        self.cursor = None;
        self.press = None;
        self.state = PolygonState::Free;
    }

    // ========================================================================
    // Cyclic index helpers
    // ========================================================================

    fn prev_index(&self, index: usize) -> usize {
        (index + self.points.len() - 1) % self.points.len()
    }

    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.points.len()
    }

    fn prev_vertex(&self, index: usize) -> usize {
        let mut j = self.prev_index(index);
        while !self.points[j].is_vertex() && j != index {
            j = self.prev_index(j);
        }
        j
    }

    fn next_vertex(&self, index: usize) -> usize {
        let mut j = self.next_index(index);
        while !self.points[j].is_vertex() && j != index {
            j = self.next_index(j);
        }
        j
    }

    /// Recompute a midpoint from its two neighbouring vertices.
    fn refresh_midpoint(&mut self, index: usize) {
        if self.points[index].kind != PointKind::Midpoint {
            return;
        }
        let a = self.points[self.prev_index(index)].position();
        let b = self.points[self.next_index(index)].position();
        self.points[index].set_position(a.midpoint(&b));
    }
}

/// Expand a persisted boundary into editor points: rotate so a vertex comes
/// first and insert a midpoint on every straight edge.
fn editor_points(persisted: &[PathPoint]) -> Vec<PathPoint> {
    let mut ordered = persisted.to_vec();
    if let Some(start) = ordered.iter().position(PathPoint::is_vertex) {
        ordered.rotate_left(start);
    }
    let n = ordered.len();
    let mut points = Vec::with_capacity(n * 2);
    for i in 0..n {
        let current = ordered[i];
        points.push(current);
        let next = ordered[(i + 1) % n];
        if n > 1 && current.is_vertex() && next.is_vertex() {
            points.push(PathPoint::at(
                current.position().midpoint(&next.position()),
                PointKind::Midpoint,
            ));
        }
    }
    points
}
