//! Trait definitions for interchange format implementations.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::store::{State, TaskConfig};

/// Trait for interchange import/export implementations.
///
/// A format converts between the label document and an external file
/// layout. Category and attribute names in the file are resolved against the
/// task configuration supplied on import.
pub trait AnnotationFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "bdd").
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses.
    fn extensions(&self) -> &[&'static str];

    /// Export the document to the specified file.
    fn export(
        &self,
        state: &State,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError>;

    /// Export the document to an in-memory buffer.
    fn export_to_bytes(
        &self,
        state: &State,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError>;

    /// Import a document from the specified file.
    fn import(
        &self,
        path: &Path,
        config: &TaskConfig,
        options: &ImportOptions,
    ) -> Result<ImportResult, FormatError>;

    /// Import a document from an in-memory buffer.
    fn import_from_bytes(
        &self,
        bytes: &[u8],
        config: &TaskConfig,
        options: &ImportOptions,
    ) -> Result<ImportResult, FormatError>;
}

/// Options for export operations.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Whether to indent the output.
    pub pretty: bool,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pretty printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Options for import operations.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Reject unknown category and attribute names instead of dropping them.
    pub strict: bool,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set strict mode.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of items exported.
    pub items_exported: usize,

    /// Number of labels exported.
    pub labels_exported: usize,

    /// Warnings generated during export.
    pub warnings: Vec<FormatWarning>,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create a new export result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a warning to the result.
    pub fn add_warning(&mut self, warning: FormatWarning) {
        self.warnings.push(warning);
    }

    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Result of an import operation.
#[derive(Debug)]
pub struct ImportResult {
    /// The rebuilt document.
    pub state: State,

    /// Warnings generated during import (e.g., skipped labels).
    pub warnings: Vec<FormatWarning>,
}

impl ImportResult {
    /// Check if there were any warnings.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there were any errors (severe warnings).
    pub fn has_errors(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| matches!(w.severity, WarningSeverity::Error))
    }
}

/// Warning generated during format conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatWarning {
    /// Index of the item this warning relates to (if applicable).
    pub item: Option<usize>,

    /// Human-readable warning message.
    pub message: String,

    /// Severity level of the warning.
    pub severity: WarningSeverity,
}

impl FormatWarning {
    /// Create a new warning.
    pub fn new(message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            item: None,
            message: message.into(),
            severity,
        }
    }

    /// Create an info-level warning.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Info)
    }

    /// Create a warning-level warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Warning)
    }

    /// Create an error-level warning.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, WarningSeverity::Error)
    }

    /// Set the item this warning relates to.
    pub fn with_item(mut self, item: usize) -> Self {
        self.item = Some(item);
        self
    }
}

/// Severity level for format warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// Informational message, not a problem.
    Info,
    /// Warning that something was skipped or modified.
    Warning,
    /// Error that may affect data integrity.
    Error,
}
