//! Tests for BDD import and export.
//!
//! These tests verify name resolution, counter rebuilding and that exporting
//! an imported document reproduces the input.


use crate::store::{Attribute, TaskConfig};

/// Task with two categories, a switch and a list attribute.
pub(super) fn task() -> TaskConfig {
    TaskConfig::new("test")
        .with_categories(&["car", "person"])
        .with_attributes(vec![
            Attribute::switch("occluded"),
            Attribute::list("color", &["red", "green", "blue"]),
        ])
}
