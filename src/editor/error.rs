//! Error types for interactive editing.

use thiserror::Error;

use super::polygon::PolygonState;
use crate::store::StoreError;

/// Errors raised by the editor.
///
/// These signal misuse of the editing API. Invalid geometry is not an error:
/// it is rolled back or discarded on commit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// Operation called in a state that does not allow it
    #[error("Invalid operation '{operation}' in state {state:?}")]
    InvalidOperation {
        operation: &'static str,
        state: PolygonState,
    },

    /// Handle does not address a point of the polygon
    #[error("Handle {handle} out of range for {len} points")]
    InvalidHandle { handle: usize, len: usize },

    /// The store rejected an emitted action
    #[error("Store rejected edit: {0}")]
    Store(#[from] StoreError),
}

impl EditError {
    pub fn invalid_operation(operation: &'static str, state: PolygonState) -> Self {
        Self::InvalidOperation { operation, state }
    }
}
