//! Pure reducer: `(state, action) -> new state`.
//!
//! Each clause clones only the item it touches. Untouched items, labels and
//! shapes keep their `Arc`s, so consumers can detect changes by pointer.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::action::Action;
use super::error::StoreError;
use super::state::{ItemState, State, Track};
use crate::model::{
    IndexedShape, ItemIndex, Label, LabelId, LabelUpdate, Shape, ShapeId, ShapeType, TrackId,
};

/// Apply an action, producing the next document version.
pub fn reduce(state: &State, action: &Action) -> Result<State, StoreError> {
    let mut next = state.clone();
    match action {
        Action::AddLabel {
            item,
            label,
            shape_types,
            shapes,
        } => {
            insert_label(&mut next, *item, label, shape_types, shapes, None)?;
        }
        Action::AddTrack {
            items,
            labels,
            shape_types,
            shapes,
        } => add_track(&mut next, items, labels, shape_types, shapes)?,
        Action::ChangeShape {
            item,
            shape_id,
            shape,
        } => change_shape(&mut next, *item, *shape_id, shape)?,
        Action::ChangeLabel {
            item,
            label_id,
            props,
        } => change_label(&mut next, *item, *label_id, props)?,
        Action::LinkLabels { item, label_ids } => link_labels(&mut next, *item, label_ids)?,
        Action::DeleteLabel { item, label_id } => delete_label(&mut next, *item, *label_id)?,
        Action::ChangeSelect { select } => {
            let merged = next.select.merged(select);
            if merged.item >= next.items.len() {
                return Err(StoreError::ItemNotFound { item: merged.item });
            }
            next.select = merged;
        }
    }
    Ok(next)
}

fn item_mut(state: &mut State, item: ItemIndex) -> Result<&mut ItemState, StoreError> {
    state
        .items
        .get_mut(item)
        .map(Arc::make_mut)
        .ok_or(StoreError::ItemNotFound { item })
}

fn check_shapes(shape_types: &[ShapeType], shapes: &[Shape]) -> Result<(), StoreError> {
    if shape_types.len() != shapes.len() {
        return Err(StoreError::length_mismatch(
            "shape types",
            shape_types.len(),
            shapes.len(),
        ));
    }
    for (declared, shape) in shape_types.iter().zip(shapes) {
        if *declared != shape.shape_type() {
            return Err(StoreError::ShapeTypeMismatch {
                declared: *declared,
                actual: shape.shape_type(),
            });
        }
    }
    Ok(())
}

/// Insert a label template and its shapes, assigning fresh ids.
fn insert_label(
    state: &mut State,
    item: ItemIndex,
    template: &Label,
    shape_types: &[ShapeType],
    shapes: &[Shape],
    track: Option<TrackId>,
) -> Result<LabelId, StoreError> {
    check_shapes(shape_types, shapes)?;
    if item >= state.items.len() {
        return Err(StoreError::ItemNotFound { item });
    }

    let label_id = state.status.next_label_id;
    state.status.next_label_id += 1;
    state.status.max_order += 1;

    let mut shape_ids = Vec::with_capacity(shapes.len());
    let mut indexed = Vec::with_capacity(shapes.len());
    for shape in shapes {
        let shape_id = state.status.next_shape_id;
        state.status.next_shape_id += 1;
        shape_ids.push(shape_id);
        indexed.push(IndexedShape::new(shape_id, vec![label_id], shape.clone()));
    }

    let label = Label {
        id: label_id,
        item,
        shapes: shape_ids,
        track,
        order: state.status.max_order,
        ..template.clone()
    };

    let target = item_mut(state, item)?;
    for shape in indexed {
        target.shapes.insert(shape.id, Arc::new(shape));
    }
    target.labels.insert(label_id, Arc::new(label));
    log::debug!("➕ Added label {} to item {}", label_id, item);
    Ok(label_id)
}

fn add_track(
    state: &mut State,
    items: &[ItemIndex],
    labels: &[Label],
    shape_types: &[Vec<ShapeType>],
    shapes: &[Vec<Shape>],
) -> Result<(), StoreError> {
    if items.len() != labels.len() {
        return Err(StoreError::length_mismatch("track labels", items.len(), labels.len()));
    }
    if items.len() != shapes.len() || items.len() != shape_types.len() {
        return Err(StoreError::length_mismatch("track shapes", items.len(), shapes.len()));
    }

    let track_id = state.status.next_track_id;
    state.status.next_track_id += 1;

    let mut track = Track {
        id: track_id,
        labels: BTreeMap::new(),
    };
    for (i, &item) in items.iter().enumerate() {
        let label_id = insert_label(
            state,
            item,
            &labels[i],
            &shape_types[i],
            &shapes[i],
            Some(track_id),
        )?;
        track.labels.insert(item, label_id);
    }
    state.tracks.insert(track_id, Arc::new(track));
    log::debug!("🔗 Added track {} over {} items", track_id, items.len());
    Ok(())
}

fn change_shape(
    state: &mut State,
    item: ItemIndex,
    shape_id: ShapeId,
    shape: &Shape,
) -> Result<(), StoreError> {
    let target = item_mut(state, item)?;
    let existing = target.shapes.get(&shape_id).ok_or(StoreError::ShapeNotFound {
        item,
        shape: shape_id,
    })?;
    if existing.shape_type != shape.shape_type() {
        return Err(StoreError::ShapeTypeMismatch {
            declared: existing.shape_type,
            actual: shape.shape_type(),
        });
    }
    let updated = IndexedShape::new(shape_id, existing.label.clone(), shape.clone());
    target.shapes.insert(shape_id, Arc::new(updated));
    log::debug!("✏️ Changed shape {} in item {}", shape_id, item);
    Ok(())
}

fn change_label(
    state: &mut State,
    item: ItemIndex,
    label_id: LabelId,
    props: &LabelUpdate,
) -> Result<(), StoreError> {
    let target = item_mut(state, item)?;
    let label = target
        .labels
        .get(&label_id)
        .ok_or(StoreError::LabelNotFound {
            item,
            label: label_id,
        })?;
    let merged = props.apply(label);
    target.labels.insert(label_id, Arc::new(merged));
    Ok(())
}

fn link_labels(state: &mut State, item: ItemIndex, label_ids: &[LabelId]) -> Result<(), StoreError> {
    let target = item_mut(state, item)?;

    let mut shared_shapes: Vec<ShapeId> = Vec::new();
    let mut track = None;
    let mut previous: Vec<(LabelId, TrackId)> = Vec::new();
    for id in label_ids {
        let label = target.labels.get(id).ok_or(StoreError::LabelNotFound {
            item,
            label: *id,
        })?;
        for shape in &label.shapes {
            if !shared_shapes.contains(shape) {
                shared_shapes.push(*shape);
            }
        }
        if let Some(old) = label.track {
            previous.push((*id, old));
        }
        track = track.or(label.track);
    }

    for shape_id in &shared_shapes {
        let shape = target.shapes.get(shape_id).ok_or(StoreError::ShapeNotFound {
            item,
            shape: *shape_id,
        })?;
        let mut owners = shape.label.clone();
        for id in label_ids {
            if !owners.contains(id) {
                owners.push(*id);
            }
        }
        let updated = IndexedShape::new(*shape_id, owners, shape.shape.clone());
        target.shapes.insert(*shape_id, Arc::new(updated));
    }

    for id in label_ids {
        if let Some(label) = target.labels.get(id) {
            let linked = Label {
                shapes: shared_shapes.clone(),
                track,
                ..label.as_ref().clone()
            };
            target.labels.insert(*id, Arc::new(linked));
        }
    }

    // Labels leave their old tracks and the surviving track keeps a member here
    for (id, old) in previous {
        if Some(old) != track {
            unlist_track_member(state, old, item, id);
        }
    }
    if let (Some(track_id), Some(first)) = (track, label_ids.first()) {
        if let Some(entry) = state.tracks.get_mut(&track_id) {
            Arc::make_mut(entry).labels.entry(item).or_insert(*first);
        }
    }
    log::debug!("🔗 Linked labels {:?} in item {}", label_ids, item);
    Ok(())
}

/// Remove `label_id` as the member of `track_id` on `item`. Another label of
/// the item on the same track takes its place; a track left without members
/// is dropped.
fn unlist_track_member(state: &mut State, track_id: TrackId, item: ItemIndex, label_id: LabelId) {
    let successor = state.items.get(item).and_then(|target| {
        target
            .labels
            .values()
            .find(|label| label.id != label_id && label.track == Some(track_id))
            .map(|label| label.id)
    });
    let emptied = match state.tracks.get_mut(&track_id) {
        Some(track) if track.labels.get(&item) == Some(&label_id) => {
            let track = Arc::make_mut(track);
            match successor {
                Some(id) => {
                    track.labels.insert(item, id);
                }
                None => {
                    track.labels.remove(&item);
                }
            }
            track.labels.is_empty()
        }
        _ => false,
    };
    if emptied {
        state.tracks.remove(&track_id);
        log::debug!("🔗 Dropped empty track {}", track_id);
    }
}

fn delete_label(state: &mut State, item: ItemIndex, label_id: LabelId) -> Result<(), StoreError> {
    let target = item_mut(state, item)?;
    let label = target
        .labels
        .remove(&label_id)
        .ok_or(StoreError::LabelNotFound {
            item,
            label: label_id,
        })?;

    for shape_id in &label.shapes {
        let Some(shape) = target.shapes.get(shape_id) else {
            continue;
        };
        let owners: Vec<LabelId> = shape
            .label
            .iter()
            .copied()
            .filter(|owner| *owner != label_id)
            .collect();
        if owners.is_empty() {
            target.shapes.remove(shape_id);
        } else {
            let updated = IndexedShape::new(*shape_id, owners, shape.shape.clone());
            target.shapes.insert(*shape_id, Arc::new(updated));
        }
    }

    if let Some(track_id) = label.track {
        unlist_track_member(state, track_id, item, label_id);
    }

    if let Some(selected) = state.select.labels.get_mut(&item) {
        selected.retain(|id| *id != label_id);
    }
    log::debug!("🗑️ Deleted label {} from item {}", label_id, item);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelType, Polygon, Rect};
    use crate::store::action::{
        add_label, add_polygon_label, add_track, change_label, change_shape, delete_label,
        go_to_item, link_labels,
    };
    use crate::store::state::TaskConfig;

    fn triangle(offset: f64) -> Polygon {
        Polygon::from_vertices(&[
            (offset, 0.0),
            (offset + 10.0, 0.0),
            (offset, 10.0),
        ])
    }

    fn two_items() -> State {
        State::new(TaskConfig::new("test"), &["a.jpg", "b.jpg"])
    }

    fn with_labels(count: usize) -> State {
        let mut state = two_items();
        for i in 0..count {
            let action = add_polygon_label(0, vec![0], triangle(i as f64 * 20.0), 0);
            state = reduce(&state, &action).unwrap();
        }
        state
    }

    #[test]
    fn test_add_label_assigns_ids() {
        let state = with_labels(2);
        let item = state.item(0).unwrap();
        assert_eq!(item.labels.len(), 2);
        assert_eq!(item.shapes.len(), 2);
        assert_eq!(state.status.next_label_id, 2);
        assert_eq!(state.status.max_order, 2);

        let label = item.label(1).unwrap();
        assert_eq!(label.shapes, vec![1]);
        assert_eq!(label.order, 2);
        assert_eq!(item.shape(1).unwrap().label, vec![1]);
    }

    #[test]
    fn test_add_label_shares_untouched_parts() {
        let before = with_labels(1);
        let after = reduce(&before, &add_polygon_label(0, vec![0], triangle(50.0), 0)).unwrap();

        assert!(Arc::ptr_eq(&before.items[1], &after.items[1]));
        assert!(!Arc::ptr_eq(&before.items[0], &after.items[0]));
        assert!(Arc::ptr_eq(
            &before.items[0].labels[&0],
            &after.items[0].labels[&0]
        ));
        // Previous version is untouched
        assert_eq!(before.item(0).unwrap().labels.len(), 1);
    }

    #[test]
    fn test_add_multi_shape_label() {
        let state = two_items();
        let label = Label::new(1, LabelType::Box2d);
        let action = add_label(
            1,
            label,
            vec![
                Shape::Rect(Rect::new(0.0, 0.0, 5.0, 5.0)),
                Shape::Polygon2d(triangle(0.0)),
            ],
        );
        let state = reduce(&state, &action).unwrap();
        let item = state.item(1).unwrap();
        assert_eq!(item.label(0).unwrap().shapes, vec![0, 1]);
        assert_eq!(item.label_shapes(0).len(), 2);
    }

    #[test]
    fn test_add_label_type_mismatch() {
        let state = two_items();
        let action = Action::AddLabel {
            item: 0,
            label: Label::new(0, LabelType::Polygon2d),
            shape_types: vec![ShapeType::Rect],
            shapes: vec![Shape::Polygon2d(triangle(0.0))],
        };
        assert!(matches!(
            reduce(&state, &action),
            Err(StoreError::ShapeTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_unknown_item_fails() {
        let state = two_items();
        let action = add_polygon_label(7, vec![0], triangle(0.0), 0);
        assert_eq!(
            reduce(&state, &action),
            Err(StoreError::ItemNotFound { item: 7 })
        );
    }

    #[test]
    fn test_change_shape_in_place() {
        let before = with_labels(2);
        let after = reduce(
            &before,
            &change_shape(0, 0, Shape::Polygon2d(triangle(100.0))),
        )
        .unwrap();
        let shape = after.item(0).unwrap().shape(0).unwrap();
        assert_eq!(shape.shape.as_polygon(), Some(&triangle(100.0)));
        assert_eq!(shape.label, vec![0]);
        assert!(Arc::ptr_eq(
            &before.items[0].shapes[&1],
            &after.items[0].shapes[&1]
        ));
        assert_eq!(after.status, before.status);
    }

    #[test]
    fn test_change_unknown_shape_fails() {
        let state = with_labels(1);
        let result = reduce(&state, &change_shape(0, 9, Shape::Polygon2d(triangle(0.0))));
        assert_eq!(result, Err(StoreError::ShapeNotFound { item: 0, shape: 9 }));
    }

    #[test]
    fn test_change_label_props() {
        let state = with_labels(1);
        let state = reduce(&state, &change_label(0, 0, LabelUpdate::category(vec![2]))).unwrap();
        assert_eq!(state.label(0, 0).unwrap().category, vec![2]);
    }

    #[test]
    fn test_delete_label_keeps_other_ids() {
        let state = with_labels(3);
        let state = reduce(&state, &delete_label(0, 1)).unwrap();
        let item = state.item(0).unwrap();
        let ids: Vec<_> = item.labels.keys().copied().collect();
        assert_eq!(ids, vec![0, 2]);
        assert!(item.shape(1).is_none());
        assert_eq!(state.status.next_label_id, 3);

        // Ids are never reused
        let state = reduce(&state, &add_polygon_label(0, vec![0], triangle(0.0), 0)).unwrap();
        assert!(state.label(0, 3).is_some());
    }

    #[test]
    fn test_delete_missing_label_fails() {
        let state = with_labels(1);
        assert_eq!(
            reduce(&state, &delete_label(0, 5)),
            Err(StoreError::LabelNotFound { item: 0, label: 5 })
        );
    }

    #[test]
    fn test_link_then_delete_retains_shared_shape() {
        let state = with_labels(2);
        let state = reduce(&state, &link_labels(0, vec![0, 1])).unwrap();
        let item = state.item(0).unwrap();
        assert_eq!(item.label(0).unwrap().shapes, vec![0, 1]);
        assert_eq!(item.label(1).unwrap().shapes, vec![0, 1]);
        assert_eq!(item.shape(0).unwrap().label, vec![0, 1]);

        let state = reduce(&state, &delete_label(0, 0)).unwrap();
        let item = state.item(0).unwrap();
        assert_eq!(item.shapes.len(), 2);
        assert_eq!(item.shape(0).unwrap().label, vec![1]);
    }

    #[test]
    fn test_add_track_and_delete_member() {
        let state = two_items();
        let labels = vec![
            Label::new(0, LabelType::Polygon2d),
            Label::new(1, LabelType::Polygon2d),
        ];
        let shapes = vec![
            vec![Shape::Polygon2d(triangle(0.0))],
            vec![Shape::Polygon2d(triangle(5.0))],
        ];
        let state = reduce(&state, &add_track(vec![0, 1], labels, shapes)).unwrap();

        let track = state.track(0).unwrap();
        assert_eq!(track.labels.get(&0), Some(&0));
        assert_eq!(track.labels.get(&1), Some(&1));
        assert_eq!(state.label(1, 1).unwrap().track, Some(0));

        let state = reduce(&state, &delete_label(0, 0)).unwrap();
        assert_eq!(state.track(0).unwrap().labels.len(), 1);
        let state = reduce(&state, &delete_label(1, 1)).unwrap();
        assert!(state.track(0).is_none());
    }

    fn two_tracks() -> State {
        let mut state = two_items();
        for offset in [0.0, 40.0] {
            let labels = vec![
                Label::new(0, LabelType::Polygon2d),
                Label::new(1, LabelType::Polygon2d),
            ];
            let shapes = vec![
                vec![Shape::Polygon2d(triangle(offset))],
                vec![Shape::Polygon2d(triangle(offset + 5.0))],
            ];
            state = reduce(&state, &add_track(vec![0, 1], labels, shapes)).unwrap();
        }
        state
    }

    #[test]
    fn test_link_into_track_keeps_membership() {
        let state = two_tracks();
        let state = reduce(&state, &add_polygon_label(0, vec![0], triangle(80.0), 0)).unwrap();
        let state = reduce(&state, &link_labels(0, vec![0, 4])).unwrap();
        assert_eq!(state.label(0, 4).unwrap().track, Some(0));
        assert_eq!(state.track(0).unwrap().labels.get(&0), Some(&0));

        // The linked label takes over the item slot of the deleted member
        let state = reduce(&state, &delete_label(0, 0)).unwrap();
        let track = state.track(0).unwrap();
        assert_eq!(track.labels.get(&0), Some(&4));
        assert_eq!(track.labels.get(&1), Some(&1));
    }

    #[test]
    fn test_link_across_tracks_leaves_old_track() {
        let state = two_tracks();
        assert_eq!(state.track(1).unwrap().labels.get(&0), Some(&2));

        let state = reduce(&state, &link_labels(0, vec![0, 2])).unwrap();
        assert_eq!(state.label(0, 2).unwrap().track, Some(0));
        let old = state.track(1).unwrap();
        assert_eq!(old.labels.get(&0), None);
        assert_eq!(old.labels.get(&1), Some(&3));

        let state = reduce(&state, &delete_label(1, 3)).unwrap();
        assert!(state.track(1).is_none());
        assert_eq!(state.track(0).unwrap().labels.len(), 2);
    }

    #[test]
    fn test_go_to_item() {
        let state = two_items();
        let state = reduce(&state, &go_to_item(1)).unwrap();
        assert_eq!(state.select.item, 1);
        assert!(reduce(&state, &go_to_item(2)).is_err());
    }
}
