//! BDD-style export records.
//!
//! One [`ItemExport`] per item, each holding its labels with category and
//! attribute names resolved to strings. A label carries at most one shape,
//! in the field matching its kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{LabelId, Polygon, Rect};

/// Attribute value as exported: selected value names of a list attribute, or
/// the state of a switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Switch(bool),
    List(Vec<String>),
}

/// One exported label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelExport {
    pub id: LabelId,
    /// Category name; empty when the label has no category
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default = "default_manual")]
    pub manual_shape: bool,
    #[serde(default)]
    pub box2d: Option<Rect>,
    #[serde(default)]
    pub poly2d: Option<Polygon>,
    /// 3D boxes are not modelled and are skipped on import
    #[serde(default)]
    pub box3d: Option<serde_json::Value>,
}

fn default_manual() -> bool {
    true
}

impl LabelExport {
    pub fn new(id: LabelId, category: impl Into<String>) -> Self {
        Self {
            id,
            category: category.into(),
            attributes: BTreeMap::new(),
            manual_shape: true,
            box2d: None,
            poly2d: None,
            box3d: None,
        }
    }

    pub fn with_poly2d(mut self, polygon: Polygon) -> Self {
        self.poly2d = Some(polygon);
        self
    }

    pub fn with_box2d(mut self, rect: Rect) -> Self {
        self.box2d = Some(rect);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }
}

/// One exported item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemExport {
    pub name: String,
    pub url: String,
    /// Sequence name for video tasks; empty otherwise
    #[serde(default)]
    pub video_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeValue>,
    #[serde(default)]
    pub timestamp: i64,
    pub index: usize,
    #[serde(default)]
    pub labels: Vec<LabelExport>,
}

impl ItemExport {
    pub fn new(index: usize, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: url.clone(),
            url,
            video_name: String::new(),
            attributes: BTreeMap::new(),
            timestamp: 0,
            index,
            labels: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names() {
        let item = ItemExport::new(0, "a.jpg");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["videoName"], "");
        assert_eq!(json["name"], "a.jpg");

        let label = LabelExport::new(3, "car");
        let json = serde_json::to_value(&label).unwrap();
        assert_eq!(json["manualShape"], true);
        assert!(json["poly2d"].is_null());
    }

    #[test]
    fn test_attribute_values() {
        let switch: AttributeValue = serde_json::from_str("true").unwrap();
        assert_eq!(switch, AttributeValue::Switch(true));
        let list: AttributeValue = serde_json::from_str(r#"["red", "blue"]"#).unwrap();
        assert_eq!(
            list,
            AttributeValue::List(vec!["red".to_string(), "blue".to_string()])
        );
    }

    #[test]
    fn test_poly2d_points() {
        let json = r#"{
            "id": 1,
            "category": "car",
            "attributes": {},
            "manualShape": true,
            "box2d": null,
            "poly2d": {"points": [
                {"x": 0, "y": 0, "type": "vertex"},
                {"x": 5, "y": 1, "type": "bezier"},
                {"x": 6, "y": 1, "type": "bezier"},
                {"x": 10, "y": 0, "type": "vertex"},
                {"x": 5, "y": 9, "type": "vertex"}
            ]},
            "box3d": null
        }"#;
        let label: LabelExport = serde_json::from_str(json).unwrap();
        let polygon = label.poly2d.unwrap();
        assert_eq!(polygon.points.len(), 5);
        assert_eq!(polygon.vertex_count(), 3);
    }
}
