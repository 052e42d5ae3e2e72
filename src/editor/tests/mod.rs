//! Tests for the label list and polygon editor driven by event sequences.
//!
//! Scenario tests replay pointer and key events with explicit picks, the way a
//! host resolving handles from a control canvas would.

mod property_tests;

use crate::config::EditorConfig;
use crate::geometry::Vector2D;
use crate::keybindings::KeyBindings;
use crate::model::{Polygon, Shape};
use crate::store::{Dispatcher, State, Store, TaskConfig};

use super::{Label2dList, Pick};

/// A list over a fresh single-item store.
pub(super) fn new_list() -> Label2dList<Store> {
    let config = TaskConfig::new("test").with_categories(&["car", "person"]);
    let store = Store::new(State::new(config, &["a.jpg", "b.jpg"]));
    Label2dList::new(store, EditorConfig::default(), KeyBindings::default())
}

pub(super) fn v(x: f64, y: f64) -> Vector2D {
    Vector2D::new(x, y)
}

/// Move, press and release at `coord` with the same pick.
pub(super) fn click(list: &mut Label2dList<Store>, coord: Vector2D, pick: Option<Pick>) {
    list.pointer_move_with(coord, pick).unwrap();
    list.pointer_down_with(coord, pick).unwrap();
    list.pointer_up_with(coord, pick).unwrap();
}

/// Draw a polygon by clicking each vertex and closing on the first one.
pub(super) fn draw_polygon(list: &mut Label2dList<Store>, vertices: &[(f64, f64)]) {
    for &(x, y) in vertices {
        click(list, v(x, y), None);
    }
    let draft_index = list.labels().len();
    let (x, y) = vertices[0];
    click(list, v(x, y), Some(Pick::new(draft_index, 1)));
}

/// Persisted polygon of label `label_id` on item 0.
pub(super) fn persisted(list: &Label2dList<Store>, label_id: u64) -> Polygon {
    let state = list.store().state();
    let item = state.item(0).unwrap();
    let label = item.label(label_id).unwrap();
    match &item.shape(label.shapes[0]).unwrap().shape {
        Shape::Polygon2d(polygon) => polygon.clone(),
        other => panic!("unexpected shape {:?}", other),
    }
}

pub(super) fn label_count(list: &Label2dList<Store>) -> usize {
    list.store().state().item(0).unwrap().labels.len()
}
