//! Conversion from BDD export records back to a document.
//!
//! Label ids are kept; each label's shape gets the label's id. Category and
//! attribute names are resolved against the task configuration. Unknown names
//! and 3D boxes are dropped with a warning, or rejected in strict mode.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::bdd::{AttributeValue, ItemExport, LabelExport};
use super::error::FormatError;
use super::traits::{FormatWarning, ImportOptions, ImportResult};
use crate::model::{IndexedShape, ItemIndex, Label, LabelId, LabelType, Shape, controls_paired};
use crate::store::{AttributeToolType, ItemState, State, TaskConfig, TaskStatus};

/// Rebuild a whole document. Items take their position in `items` as index.
pub fn import_state(
    config: TaskConfig,
    items: &[ItemExport],
    options: &ImportOptions,
) -> Result<ImportResult, FormatError> {
    let mut warnings = Vec::new();
    let mut imported = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if item.index != index {
            warnings.push(
                FormatWarning::info(format!(
                    "Item '{}' had index {}, imported at {}",
                    item.url, item.index, index
                ))
                .with_item(index),
            );
        }
        let (item_state, item_warnings) = convert_item_to_import(item, index, &config, options)?;
        warnings.extend(item_warnings);
        imported.push(item_state);
    }
    let max_order = assign_orders(&mut imported);

    let mut state = State {
        config: Arc::new(config),
        items: imported.into_iter().map(Arc::new).collect(),
        ..Default::default()
    };
    state.status = rebuild_status(&state, max_order);
    log::info!(
        "📥 Imported {} items with {} labels ({} warnings)",
        state.items.len(),
        state.label_count(),
        warnings.len()
    );
    Ok(ImportResult { state, warnings })
}

/// Rebuild one item from its export record.
pub fn convert_item_to_import(
    item: &ItemExport,
    index: ItemIndex,
    config: &TaskConfig,
    options: &ImportOptions,
) -> Result<(ItemState, Vec<FormatWarning>), FormatError> {
    let mut item_state = ItemState::new(index, item.url.clone());
    let mut warnings = Vec::new();

    for export in &item.labels {
        let Some((label_type, shape)) = label_shape(export, options, &mut warnings, index)? else {
            continue;
        };
        let category = match config.category_index(&export.category) {
            Some(category) => vec![category],
            None if export.category.is_empty() => Vec::new(),
            None if options.strict => {
                return Err(FormatError::UnknownCategory {
                    name: export.category.clone(),
                });
            }
            None => {
                warnings.push(
                    FormatWarning::warning(format!(
                        "Unknown category '{}' on label {}",
                        export.category, export.id
                    ))
                    .with_item(index),
                );
                Vec::new()
            }
        };
        let attributes = import_attributes(export, config, options, &mut warnings, index)?;

        let mut label = Label::new(index, label_type)
            .with_category(category)
            .with_attributes(attributes);
        label.id = export.id;
        label.manual = export.manual_shape;
        if let Some(shape) = shape {
            label.shapes = vec![export.id];
            item_state.shapes.insert(
                export.id,
                Arc::new(IndexedShape::new(export.id, vec![export.id], shape)),
            );
        }
        if item_state.labels.insert(export.id, Arc::new(label)).is_some() {
            return Err(FormatError::invalid_format(format!(
                "Duplicate label id {} in item {}",
                export.id, index
            )));
        }
    }
    Ok((item_state, warnings))
}

/// Label kind and shape from whichever shape field is set. `None` skips the label.
fn label_shape(
    export: &LabelExport,
    options: &ImportOptions,
    warnings: &mut Vec<FormatWarning>,
    index: ItemIndex,
) -> Result<Option<(LabelType, Option<Shape>)>, FormatError> {
    if let Some(rect) = export.box2d {
        return Ok(Some((LabelType::Box2d, Some(Shape::Rect(rect)))));
    }
    if let Some(polygon) = &export.poly2d {
        if !controls_paired(&polygon.points) {
            let message = format!("Unpaired bezier control in polygon of label {}", export.id);
            if options.strict {
                return Err(FormatError::invalid_format(message));
            }
            warnings.push(FormatWarning::warning(message).with_item(index));
            return Ok(None);
        }
        return Ok(Some((
            LabelType::Polygon2d,
            Some(Shape::Polygon2d(polygon.clone())),
        )));
    }
    if export.box3d.is_some() {
        if options.strict {
            return Err(FormatError::unsupported_shape("box3d", "bdd"));
        }
        warnings.push(
            FormatWarning::warning(format!("Skipped 3D box label {}", export.id)).with_item(index),
        );
        return Ok(None);
    }
    Ok(Some((LabelType::Empty, None)))
}

fn import_attributes(
    export: &LabelExport,
    config: &TaskConfig,
    options: &ImportOptions,
    warnings: &mut Vec<FormatWarning>,
    index: ItemIndex,
) -> Result<BTreeMap<usize, Vec<usize>>, FormatError> {
    let mut attributes = BTreeMap::new();
    for (name, value) in &export.attributes {
        let Some(attribute_index) = config.attribute_index(name) else {
            if options.strict {
                return Err(FormatError::UnknownAttribute { name: name.clone() });
            }
            warnings.push(
                FormatWarning::warning(format!("Unknown attribute '{}' on label {}", name, export.id))
                    .with_item(index),
            );
            continue;
        };
        let definition = &config.attributes[attribute_index];
        let values = match (definition.tool_type, value) {
            (AttributeToolType::Switch, AttributeValue::Switch(on)) => vec![usize::from(*on)],
            (AttributeToolType::List, AttributeValue::List(names)) => names
                .iter()
                .filter_map(|value| definition.values.iter().position(|v| v == value))
                .collect(),
            _ => {
                warnings.push(
                    FormatWarning::warning(format!(
                        "Attribute '{}' on label {} has the wrong kind of value",
                        name, export.id
                    ))
                    .with_item(index),
                );
                continue;
            }
        };
        attributes.insert(attribute_index, values);
    }
    Ok(attributes)
}

/// Give labels draw orders by ascending id across the document, starting
/// at 1. Returns the largest order handed out.
fn assign_orders(items: &mut [ItemState]) -> u64 {
    let mut ids: Vec<(LabelId, ItemIndex)> = items
        .iter()
        .flat_map(|item| item.labels.keys().map(move |id| (*id, item.index)))
        .collect();
    ids.sort_unstable();
    let mut order = 0;
    for (id, index) in ids {
        if let Some(label) = items[index].labels.get_mut(&id) {
            order += 1;
            Arc::make_mut(label).order = order;
        }
    }
    order
}

/// Counters that continue after the largest imported ids.
fn rebuild_status(state: &State, max_order: u64) -> TaskStatus {
    let next_id = state
        .items
        .iter()
        .flat_map(|item| item.labels.keys().chain(item.shapes.keys()))
        .max()
        .map_or(0, |id| id + 1);
    TaskStatus {
        next_label_id: next_id,
        next_shape_id: next_id,
        next_track_id: 0,
        max_order,
    }
}
