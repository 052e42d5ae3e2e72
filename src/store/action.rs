//! Declarative actions describing document mutations.

use serde::{Deserialize, Serialize};

use super::state::SelectUpdate;
use crate::model::{
    ItemIndex, Label, LabelId, LabelType, LabelUpdate, Polygon, Shape, ShapeId, ShapeType,
};

/// A request to change the document. Applied by [`super::reduce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Insert a label with its shapes into an item
    AddLabel {
        item: ItemIndex,
        label: Label,
        shape_types: Vec<ShapeType>,
        shapes: Vec<Shape>,
    },
    /// Insert one label per item, all sharing a new track
    AddTrack {
        items: Vec<ItemIndex>,
        labels: Vec<Label>,
        shape_types: Vec<Vec<ShapeType>>,
        shapes: Vec<Vec<Shape>>,
    },
    /// Replace a shape payload in place
    ChangeShape {
        item: ItemIndex,
        shape_id: ShapeId,
        shape: Shape,
    },
    /// Merge partial label properties
    ChangeLabel {
        item: ItemIndex,
        label_id: LabelId,
        props: LabelUpdate,
    },
    /// Make the labels share their shapes and track
    LinkLabels {
        item: ItemIndex,
        label_ids: Vec<LabelId>,
    },
    /// Remove a label and the shapes only it owned
    DeleteLabel { item: ItemIndex, label_id: LabelId },
    /// Update the selection
    ChangeSelect { select: SelectUpdate },
}

impl Action {
    /// Human-readable description, used by the history.
    pub fn description(&self) -> String {
        match self {
            Action::AddLabel { label, .. } => format!("Add {:?} label", label.label_type),
            Action::AddTrack { items, .. } => format!("Add track over {} items", items.len()),
            Action::ChangeShape { shape_id, .. } => format!("Change shape {}", shape_id),
            Action::ChangeLabel { label_id, .. } => format!("Change label {}", label_id),
            Action::LinkLabels { label_ids, .. } => format!("Link {} labels", label_ids.len()),
            Action::DeleteLabel { label_id, .. } => format!("Delete label {}", label_id),
            Action::ChangeSelect { .. } => "Change selection".to_string(),
        }
    }

    /// Whether the action mutates labels or shapes (and so is recorded for undo).
    pub fn is_undoable(&self) -> bool {
        !matches!(self, Action::ChangeSelect { .. })
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// Add a label with an arbitrary set of shapes.
pub fn add_label(item: ItemIndex, label: Label, shapes: Vec<Shape>) -> Action {
    let shape_types = shapes.iter().map(Shape::shape_type).collect();
    Action::AddLabel {
        item,
        label,
        shape_types,
        shapes,
    }
}

/// Add a polygon label with the given category.
pub fn add_polygon_label(
    item: ItemIndex,
    category: Vec<usize>,
    polygon: Polygon,
    order: u64,
) -> Action {
    let label = Label::new(item, LabelType::Polygon2d)
        .with_category(category)
        .with_order(order);
    add_label(item, label, vec![Shape::Polygon2d(polygon)])
}

/// Add a track: one label (with shapes) per item.
pub fn add_track(items: Vec<ItemIndex>, labels: Vec<Label>, shapes: Vec<Vec<Shape>>) -> Action {
    let shape_types = shapes
        .iter()
        .map(|s| s.iter().map(Shape::shape_type).collect())
        .collect();
    Action::AddTrack {
        items,
        labels,
        shape_types,
        shapes,
    }
}

pub fn change_shape(item: ItemIndex, shape_id: ShapeId, shape: Shape) -> Action {
    Action::ChangeShape {
        item,
        shape_id,
        shape,
    }
}

pub fn change_label(item: ItemIndex, label_id: LabelId, props: LabelUpdate) -> Action {
    Action::ChangeLabel {
        item,
        label_id,
        props,
    }
}

pub fn link_labels(item: ItemIndex, label_ids: Vec<LabelId>) -> Action {
    Action::LinkLabels { item, label_ids }
}

pub fn delete_label(item: ItemIndex, label_id: LabelId) -> Action {
    Action::DeleteLabel { item, label_id }
}

pub fn change_select(select: SelectUpdate) -> Action {
    Action::ChangeSelect { select }
}

/// Switch the active item.
pub fn go_to_item(item: ItemIndex) -> Action {
    change_select(SelectUpdate {
        item: Some(item),
        ..Default::default()
    })
}
