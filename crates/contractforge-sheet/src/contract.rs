//! Whole-workbook extraction

use std::collections::{BTreeMap, BTreeSet};

use contractforge_core::{
    CanonicalTable, Diagnostic, DiagnosticCode, FileRecord, FormatRules, Location, Periodicity, Severity,
};

use crate::extractor::SchemaExtractor;
use crate::files_list::FileCatalogBuilder;
use crate::layout;
use crate::lov::ListOfValues;
use crate::merge::merge_tables;
use crate::rules::FormatRulesResolver;
use crate::side_tables::FileMapping;
use crate::workbook::{Workbook, WorkbookError};

/// Everything extracted from one contract workbook
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContract {
    /// One table per (table, direction) pair, in sheet order
    pub tables: Vec<CanonicalTable>,

    /// Every file record of the files list
    pub records: Vec<FileRecord>,

    pub format_rules: FormatRules,

    pub mapping: FileMapping,

    /// Number of sheets inspected as potential tables
    pub sheets_scanned: usize,
}

/// Extract canonical tables and side tables from a workbook
///
/// The files list is required. A missing rules sheet yields the default
/// format rules and a missing list of values yields no permitted values;
/// both are reported.
pub fn extract_contract(
    workbook: &Workbook,
    country: &str,
    periodicity_mapping: &BTreeMap<String, Periodicity>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<ExtractedContract, WorkbookError> {
    let files_sheet = workbook.require_sheet(layout::files_list::SHEET)?;

    let lov = match workbook.sheet(layout::list_of_values::SHEET) {
        Some(sheet) => ListOfValues::from_sheet(sheet),
        None => {
            diagnostics.push(missing_sheet(layout::list_of_values::SHEET));
            ListOfValues::default()
        }
    };

    let records = FileCatalogBuilder::new(periodicity_mapping).build(files_sheet, diagnostics);
    let mapping = FileMapping::from_sheet(files_sheet);

    let extractor = SchemaExtractor::new(&lov, country);
    let mut schemas = Vec::new();
    let mut sheets_scanned = 0;

    for sheet in workbook.sheets() {
        if layout::is_fixed_sheet(&sheet.name) {
            continue;
        }
        sheets_scanned += 1;
        if let Some(schema) = extractor.extract(sheet, diagnostics) {
            schemas.push(schema);
        }
    }

    let tables = merge_tables(schemas, &records, diagnostics);

    let file_ids: BTreeSet<String> = records.iter().map(|r| r.file_id.clone()).collect();
    let format_rules = match workbook.sheet(layout::rules::SHEET) {
        Some(sheet) => FormatRulesResolver::resolve(sheet, &file_ids, diagnostics),
        None => {
            diagnostics.push(missing_sheet(layout::rules::SHEET));
            FormatRules::default()
        }
    };

    tracing::info!(
        sheets = sheets_scanned,
        tables = tables.len(),
        records = records.len(),
        "Extracted contract"
    );

    Ok(ExtractedContract {
        tables,
        records,
        format_rules,
        mapping,
        sheets_scanned,
    })
}

fn missing_sheet(name: &str) -> Diagnostic {
    tracing::warn!(sheet = name, "Sheet missing from workbook");
    Diagnostic::new(
        DiagnosticCode::SheetMissing,
        Severity::Warn,
        format!("Sheet '{}' not found, defaults used", name),
    )
    .with_location(Location::new(name))
}
