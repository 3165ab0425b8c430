//! Side tables consumed by the ingestion jobs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use contractforge_core::{CanonicalTable, Direction, DEFAULT_SEPARATOR, STAGING_PREFIX};

use crate::layout::files_list as layout;
use crate::workbook::Sheet;

/// Layout code written for every file until the provider supplies one
pub const LAYOUT_CODE_PLACEHOLDER: &str = "TO_COMPLETED";

/// Layout positions written until the provider supplies them
pub const LAYOUT_POSITION_PLACEHOLDER: &str = "StartPosition:StopPosition";

/// File identifier to file code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileMapping {
    pub entries: BTreeMap<String, String>,
}

impl FileMapping {
    /// Read every files-list row; a repeated file id keeps its last code
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut entries = BTreeMap::new();

        for (_, row) in sheet.rows_from(layout::FIRST_ROW) {
            let Some(file_code) = row.text(layout::FILE_CODE) else {
                break;
            };
            entries.insert(row.text(layout::FILE_ID).unwrap_or_default(), file_code);
        }

        Self { entries }
    }

    /// File code of a file id
    pub fn file_code(&self, file_id: &str) -> Option<&str> {
        self.entries.get(file_id).map(String::as_str)
    }
}

/// Fixed-width layout template of one inbound file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub file_id: String,

    /// Table key, e.g. `CUSTOMER-INDIA-IN`
    pub table_key: String,

    pub layout_code: String,
    pub layout: String,
    pub delimiter: String,
}

/// Key of an inbound table in the layout side table
///
/// `STG_CREDIT_CARDS_TXN_IN` in project `credit-cards`, region `india`
/// becomes `TXN-INDIA-IN`.
pub fn layout_table_key(table_name: &str, project: &str, jv: &str) -> String {
    let prefix = format!("{}{}_", STAGING_PREFIX, project.to_uppercase().replace('-', "_"));
    let key = table_name.replace(&prefix, "").replace('_', "-");

    match key.strip_suffix("-IN") {
        Some(stem) => format!("{}-{}-IN", stem, jv.to_uppercase()),
        None => key,
    }
}

/// Layout entries of every inbound canonical table
pub fn layout_entries(tables: &[CanonicalTable], project: &str, jv: &str) -> Vec<LayoutEntry> {
    tables
        .iter()
        .filter(|t| t.direction() == Direction::In)
        .map(|t| LayoutEntry {
            file_id: t.file.file_id.clone(),
            table_key: layout_table_key(t.table_name(), project, jv),
            layout_code: LAYOUT_CODE_PLACEHOLDER.to_string(),
            layout: LAYOUT_POSITION_PLACEHOLDER.to_string(),
            delimiter: t
                .file
                .separator
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(DEFAULT_SEPARATOR)
                .to_string(),
        })
        .collect()
}
