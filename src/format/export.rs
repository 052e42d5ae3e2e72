//! Conversion from the document to BDD export records.

use std::collections::BTreeMap;

use super::bdd::{AttributeValue, ItemExport, LabelExport};
use crate::model::{Label, Shape};
use crate::store::{Attribute, AttributeToolType, ItemState, State, TaskConfig};

/// Export every item of the document.
pub fn convert_state(state: &State) -> Vec<ItemExport> {
    state
        .items
        .iter()
        .map(|item| convert_item_to_export(&state.config, item))
        .collect()
}

/// Export one item with its labels in id order.
pub fn convert_item_to_export(config: &TaskConfig, item: &ItemState) -> ItemExport {
    let mut export = ItemExport::new(item.index, item.url.clone());
    export.timestamp = config.submit_time;
    if config.item_type == "video" {
        export.video_name = format!("{}{:06}", config.project_name, item.index);
    }
    export.labels = item
        .labels
        .values()
        .map(|label| convert_label(config, item, label))
        .collect();
    export
}

fn convert_label(config: &TaskConfig, item: &ItemState, label: &Label) -> LabelExport {
    let category = label
        .category
        .first()
        .and_then(|index| config.categories.get(*index))
        .cloned()
        .unwrap_or_default();
    let mut export = LabelExport::new(label.id, category);
    export.manual_shape = label.manual;
    export.attributes = export_attributes(&label.attributes, &config.attributes);

    if label.shapes.len() > 1 {
        log::debug!(
            "Label {} has {} shapes, exporting the first",
            label.id,
            label.shapes.len()
        );
    }
    match label.shapes.first().and_then(|id| item.shape(*id)) {
        Some(indexed) => match &indexed.shape {
            Shape::Rect(rect) => export.box2d = Some(*rect),
            Shape::Polygon2d(polygon) => export.poly2d = Some(polygon.clone()),
        },
        None if !label.shapes.is_empty() => {
            log::warn!("⚠️ Label {} references a missing shape", label.id);
        }
        None => {}
    }
    export
}

/// Resolve attribute and value indices to names. Unknown indices are skipped.
fn export_attributes(
    attributes: &BTreeMap<usize, Vec<usize>>,
    definitions: &[Attribute],
) -> BTreeMap<String, AttributeValue> {
    let mut exported = BTreeMap::new();
    for (index, values) in attributes {
        let Some(definition) = definitions.get(*index) else {
            log::warn!("⚠️ Skipping undefined attribute {}", index);
            continue;
        };
        let value = match definition.tool_type {
            AttributeToolType::List => AttributeValue::List(
                values
                    .iter()
                    .filter_map(|v| definition.values.get(*v).cloned())
                    .collect(),
            ),
            AttributeToolType::Switch => AttributeValue::Switch(values.first() == Some(&1)),
        };
        exported.insert(definition.name.clone(), value);
    }
    exported
}
