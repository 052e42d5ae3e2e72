//! Label interchange.
//!
//! The document is exchanged as BDD-style JSON: one record per item, labels
//! carrying their category and attribute names and at most one shape.
//! Formats implement [`AnnotationFormat`]; [`BddJsonFormat`] is the one
//! provided.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use polyedit::format::{AnnotationFormat, BddJsonFormat, ExportOptions};
//!
//! let format = BddJsonFormat;
//! let result = format.export(&state, path, &ExportOptions::new().pretty(true))?;
//! ```
//!
//! Exporting a document that was imported from a file reproduces that file,
//! as long as its labels are listed in id order and use known names.

mod bdd;
mod bdd_json;
mod error;
mod export;
mod import;
mod traits;

#[cfg(test)]
mod tests;

pub use bdd::{AttributeValue, ItemExport, LabelExport};
pub use bdd_json::BddJsonFormat;
pub use error::FormatError;
pub use export::{convert_item_to_export, convert_state};
pub use import::{convert_item_to_import, import_state};
pub use traits::{
    AnnotationFormat, ExportOptions, ExportResult, FormatWarning, ImportOptions, ImportResult,
    WarningSeverity,
};
