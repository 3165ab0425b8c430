//! Merge of table schemas with file records

use contractforge_core::{
    CanonicalTable, Diagnostic, DiagnosticCode, Direction, FileRecord, Location, Severity, TableSchema,
};

/// Pair every schema with the file records of its table
///
/// A schema matches records whose table name without direction equals the
/// schema's table name (case-insensitive). A sheet named with a direction
/// suffix (`CUSTOMER_IN`) only matches records of that direction. Schemas
/// matching nothing are dropped and reported.
pub fn merge_tables(
    schemas: Vec<TableSchema>,
    records: &[FileRecord],
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<CanonicalTable> {
    let mut tables = Vec::new();

    for schema in schemas {
        let (_, sheet_direction) = Direction::strip_suffix(schema.source_sheet.trim());

        let matches: Vec<&FileRecord> = records
            .iter()
            .filter(|r| r.base_table_name().eq_ignore_ascii_case(&schema.table_name))
            .filter(|r| sheet_direction.map_or(true, |d| d == r.direction))
            .collect();

        if matches.is_empty() {
            tracing::warn!(table = %schema.table_name, sheet = %schema.source_sheet, "No file record for table, dropped");
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::TableUnmatched,
                    Severity::Warn,
                    format!(
                        "Table '{}' has no entry in the files list and was dropped",
                        schema.table_name
                    ),
                )
                .with_location(Location::new(&schema.source_sheet)),
            );
            continue;
        }

        for record in matches {
            tracing::debug!(table = %record.table_name, "Merged canonical table");
            tables.push(CanonicalTable::new(schema.clone(), record.clone()));
        }
    }

    tables
}
