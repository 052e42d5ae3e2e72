//! BDD JSON format: a JSON array with one record per item.

use std::path::Path;

use crate::format::bdd::ItemExport;
use crate::format::error::FormatError;
use crate::format::export::convert_state;
use crate::format::import::import_state;
use crate::format::traits::{
    AnnotationFormat, ExportOptions, ExportResult, FormatWarning, ImportOptions, ImportResult,
};
use crate::store::{State, TaskConfig};

/// BDD-style JSON interchange.
///
/// Labels keep their ids, category and attribute names. Polygons keep
/// vertices and bezier controls; midpoints never appear.
pub struct BddJsonFormat;

impl AnnotationFormat for BddJsonFormat {
    fn id(&self) -> &'static str {
        "bdd"
    }

    fn display_name(&self) -> &'static str {
        "BDD Labels (JSON)"
    }

    fn extensions(&self) -> &[&'static str] {
        &["json"]
    }

    fn export(
        &self,
        state: &State,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError> {
        log::info!("💾 Exporting BDD labels to {:?}", path);

        let (bytes, mut result) = self.export_to_bytes(state, options)?;
        std::fs::write(path, &bytes)?;
        result.files_created = vec![path.to_path_buf()];

        Ok(result)
    }

    fn export_to_bytes(
        &self,
        state: &State,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError> {
        let items = convert_state(state);
        let json = if options.pretty {
            serde_json::to_string_pretty(&items)?
        } else {
            serde_json::to_string(&items)?
        };

        let mut result = ExportResult::new();
        result.items_exported = items.len();
        result.labels_exported = items.iter().map(|item| item.labels.len()).sum();
        // Labels with more than one shape lose all but the first
        for item in state.items.iter() {
            for label in item.labels.values().filter(|label| label.shapes.len() > 1) {
                result.add_warning(
                    FormatWarning::warning(format!(
                        "Label {} has {} shapes, only the first was exported",
                        label.id,
                        label.shapes.len()
                    ))
                    .with_item(item.index),
                );
            }
        }

        log::info!(
            "Exported {} items with {} labels",
            result.items_exported,
            result.labels_exported
        );
        Ok((json.into_bytes(), result))
    }

    fn import(
        &self,
        path: &Path,
        config: &TaskConfig,
        options: &ImportOptions,
    ) -> Result<ImportResult, FormatError> {
        log::info!("📂 Importing BDD labels from {:?}", path);

        let bytes = std::fs::read(path)?;
        self.import_from_bytes(&bytes, config, options)
    }

    fn import_from_bytes(
        &self,
        bytes: &[u8],
        config: &TaskConfig,
        options: &ImportOptions,
    ) -> Result<ImportResult, FormatError> {
        let items: Vec<ItemExport> = serde_json::from_slice(bytes)?;
        let result = import_state(config.clone(), &items, options)?;
        for warning in &result.warnings {
            log::warn!("⚠️ {}", warning.message);
        }
        Ok(result)
    }
}
