//! Label/shape document store.
//!
//! The document is an immutable [`State`]. Mutations are described by
//! [`Action`]s, applied by the pure [`reduce`] function and serialized
//! through a [`Store`], which also keeps undo/redo history.

pub mod action;
mod error;
mod history;
mod reducer;
mod session;
mod state;

pub use action::Action;
pub use error::StoreError;
pub use history::{History, HistoryConfig, HistoryEntry};
pub use reducer::reduce;
pub use session::{Dispatcher, Store, Subscriber};
pub use state::{
    Attribute, AttributeToolType, ItemState, Select, SelectUpdate, State, TaskConfig, TaskStatus,
    Track,
};
