//! Labels: the annotation records that own shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ItemIndex, LabelId, ShapeId, TrackId};

/// Type tag of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelType {
    #[default]
    Empty,
    Tag,
    Box2d,
    Polygon2d,
}

/// A label attached to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: LabelId,
    pub item: ItemIndex,
    #[serde(rename = "type")]
    pub label_type: LabelType,
    /// Category indices into the task configuration
    #[serde(default)]
    pub category: Vec<usize>,
    /// Attribute index -> selected value indices
    #[serde(default)]
    pub attributes: BTreeMap<usize, Vec<usize>>,
    /// Owned shape ids, in order
    #[serde(default)]
    pub shapes: Vec<ShapeId>,
    #[serde(default)]
    pub track: Option<TrackId>,
    /// Whether the shape was drawn by hand rather than interpolated
    #[serde(default = "default_manual")]
    pub manual: bool,
    /// Draw order (z-order)
    #[serde(default)]
    pub order: u64,
}

fn default_manual() -> bool {
    true
}

impl Label {
    /// Create a label template. The id and shape list are assigned on insertion.
    pub fn new(item: ItemIndex, label_type: LabelType) -> Self {
        Self {
            id: 0,
            item,
            label_type,
            category: Vec::new(),
            attributes: BTreeMap::new(),
            shapes: Vec::new(),
            track: None,
            manual: true,
            order: 0,
        }
    }

    pub fn with_category(mut self, category: Vec<usize>) -> Self {
        self.category = category;
        self
    }

    pub fn with_attributes(mut self, attributes: BTreeMap<usize, Vec<usize>>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_order(mut self, order: u64) -> Self {
        self.order = order;
        self
    }
}

/// Partial update of label properties. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelUpdate {
    #[serde(default)]
    pub category: Option<Vec<usize>>,
    /// Merged per attribute key
    #[serde(default)]
    pub attributes: Option<BTreeMap<usize, Vec<usize>>>,
    #[serde(default)]
    pub manual: Option<bool>,
}

impl LabelUpdate {
    pub fn category(category: Vec<usize>) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn attributes(attributes: BTreeMap<usize, Vec<usize>>) -> Self {
        Self {
            attributes: Some(attributes),
            ..Default::default()
        }
    }

    /// Apply this update to a label, returning the merged label.
    pub fn apply(&self, label: &Label) -> Label {
        let mut merged = label.clone();
        if let Some(category) = &self.category {
            merged.category = category.clone();
        }
        if let Some(attributes) = &self.attributes {
            for (key, values) in attributes {
                merged.attributes.insert(*key, values.clone());
            }
        }
        if let Some(manual) = self.manual {
            merged.manual = manual;
        }
        merged
    }
}
