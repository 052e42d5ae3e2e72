//! Immutable document state.
//!
//! Items, labels, shapes and tracks live behind `Arc` so that a new version
//! produced by the reducer shares every untouched part with the previous one.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{IndexedShape, ItemIndex, Label, LabelId, LabelType, ShapeId, TrackId};

// ============================================================================
// Task configuration
// ============================================================================

/// How an attribute is edited and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeToolType {
    /// Boolean toggle; exported as `true`/`false`
    Switch,
    /// Choice among `values`; exported as the selected value names
    #[default]
    List,
}

/// An attribute definition from the task configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub tool_type: AttributeToolType,
    #[serde(default)]
    pub values: Vec<String>,
}

impl Attribute {
    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool_type: AttributeToolType::Switch,
            values: Vec::new(),
        }
    }

    pub fn list(name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            name: name.into(),
            tool_type: AttributeToolType::List,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Static configuration of a labeling task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub item_type: String,
    #[serde(default)]
    pub label_types: Vec<LabelType>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Submission time stamped on exported items
    #[serde(default)]
    pub submit_time: i64,
}

impl TaskConfig {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            item_type: "image".to_string(),
            label_types: vec![LabelType::Polygon2d],
            ..Default::default()
        }
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_submit_time(mut self, submit_time: i64) -> Self {
        self.submit_time = submit_time;
        self
    }

    /// Index of a category by name.
    pub fn category_index(&self, name: &str) -> Option<usize> {
        self.categories.iter().position(|c| c == name)
    }

    /// Index of an attribute by name.
    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}

// ============================================================================
// Items, tracks, status, selection
// ============================================================================

/// Labels and shapes of one item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemState {
    pub index: ItemIndex,
    pub url: String,
    pub labels: BTreeMap<LabelId, Arc<Label>>,
    pub shapes: BTreeMap<ShapeId, Arc<IndexedShape>>,
}

impl ItemState {
    pub fn new(index: ItemIndex, url: impl Into<String>) -> Self {
        Self {
            index,
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn label(&self, id: LabelId) -> Option<&Label> {
        self.labels.get(&id).map(Arc::as_ref)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&IndexedShape> {
        self.shapes.get(&id).map(Arc::as_ref)
    }

    /// Shapes owned by a label, in the label's order.
    pub fn label_shapes(&self, id: LabelId) -> Vec<&IndexedShape> {
        self.label(id)
            .map(|label| label.shapes.iter().filter_map(|s| self.shape(*s)).collect())
            .unwrap_or_default()
    }
}

/// A track links one label per item across a sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub labels: BTreeMap<ItemIndex, LabelId>,
}

/// Id counters of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStatus {
    pub next_label_id: LabelId,
    pub next_shape_id: ShapeId,
    pub next_track_id: TrackId,
    /// Highest draw order handed out so far
    pub max_order: u64,
}

/// Current selection and in-progress edits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Select {
    pub item: ItemIndex,
    /// Selected labels per item
    #[serde(default)]
    pub labels: BTreeMap<ItemIndex, Vec<LabelId>>,
    #[serde(default)]
    pub category: usize,
    #[serde(default)]
    pub handle: Option<usize>,
    /// Attribute values for the next label
    #[serde(default)]
    pub attributes: BTreeMap<usize, Vec<usize>>,
}

/// Partial update of the selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectUpdate {
    pub item: Option<ItemIndex>,
    pub labels: Option<BTreeMap<ItemIndex, Vec<LabelId>>>,
    pub category: Option<usize>,
    pub handle: Option<Option<usize>>,
    pub attributes: Option<BTreeMap<usize, Vec<usize>>>,
}

impl Select {
    /// Merge a partial update into a new selection.
    pub fn merged(&self, update: &SelectUpdate) -> Select {
        Select {
            item: update.item.unwrap_or(self.item),
            labels: update.labels.clone().unwrap_or_else(|| self.labels.clone()),
            category: update.category.unwrap_or(self.category),
            handle: update.handle.unwrap_or(self.handle),
            attributes: update
                .attributes
                .clone()
                .unwrap_or_else(|| self.attributes.clone()),
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// One immutable version of the document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct State {
    pub config: Arc<TaskConfig>,
    pub items: Vec<Arc<ItemState>>,
    pub tracks: BTreeMap<TrackId, Arc<Track>>,
    pub status: TaskStatus,
    pub select: Select,
}

impl State {
    /// Create an empty document with one item per url.
    pub fn new(config: TaskConfig, urls: &[&str]) -> Self {
        Self {
            config: Arc::new(config),
            items: urls
                .iter()
                .enumerate()
                .map(|(i, url)| Arc::new(ItemState::new(i, *url)))
                .collect(),
            ..Default::default()
        }
    }

    pub fn item(&self, index: ItemIndex) -> Option<&ItemState> {
        self.items.get(index).map(Arc::as_ref)
    }

    pub fn label(&self, item: ItemIndex, id: LabelId) -> Option<&Label> {
        self.item(item)?.label(id)
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id).map(Arc::as_ref)
    }

    /// Number of labels across all items.
    pub fn label_count(&self) -> usize {
        self.items.iter().map(|item| item.labels.len()).sum()
    }
}
