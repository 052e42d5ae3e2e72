//! polyedit - interactive 2D polygon label editing
//!
//! Polygon editors driven by pointer and key events, a list that routes
//! events between them, and an immutable label/shape document store with
//! undo history and BDD-style JSON interchange.

pub mod color_utils;
pub mod config;
pub mod constants;
pub mod editor;
pub mod format;
pub mod geometry;
pub mod keybindings;
pub mod model;
pub mod replay;
pub mod store;

pub use config::{AppConfig, EditorConfig};
pub use editor::{Label2dList, Polygon2d};
pub use store::{Dispatcher, State, Store};
