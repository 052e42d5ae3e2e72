//! Interactive polygon editing.
//!
//! [`Polygon2d`] is the per-label state machine; [`Label2dList`] routes
//! pointer and key events across the editors of the current item and talks to
//! the store through a [`crate::store::Dispatcher`].

mod error;
mod input;
mod list;
mod polygon;
pub mod render;

#[cfg(test)]
mod tests;

pub use error::EditError;
pub use input::{KeyState, Pick};
pub use list::Label2dList;
pub use polygon::{EditOutcome, Polygon2d, PolygonState};
pub use render::{DrawCommand, DrawMode, RenderSnapshot, draw_commands};
