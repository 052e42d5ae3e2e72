//! Error types for document mutations.

use thiserror::Error;

use crate::model::{ItemIndex, LabelId, ShapeId, ShapeType};

/// Contract violations detected while reducing an action.
///
/// The document is left unchanged when any of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Item index out of range
    #[error("Item {item} does not exist")]
    ItemNotFound { item: ItemIndex },

    /// Label id unknown in the item
    #[error("Label {label} does not exist in item {item}")]
    LabelNotFound { item: ItemIndex, label: LabelId },

    /// Shape id unknown in the item
    #[error("Shape {shape} does not exist in item {item}")]
    ShapeNotFound { item: ItemIndex, shape: ShapeId },

    /// Declared shape type does not match its payload
    #[error("Shape type mismatch: declared {declared:?}, payload is {actual:?}")]
    ShapeTypeMismatch {
        declared: ShapeType,
        actual: ShapeType,
    },

    /// Parallel lists of an action have different lengths
    #[error("Mismatched lengths in {context}: {left} vs {right}")]
    LengthMismatch {
        context: &'static str,
        left: usize,
        right: usize,
    },
}

impl StoreError {
    pub fn length_mismatch(context: &'static str, left: usize, right: usize) -> Self {
        Self::LengthMismatch {
            context,
            left,
            right,
        }
    }
}
