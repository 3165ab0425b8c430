//! Schema extraction from per-table sheets

use std::collections::HashSet;

use contractforge_core::{
    staging_name, Column, Diagnostic, DiagnosticCode, Direction, Location, Severity, TableSchema,
};

use crate::layout::{self, table};
use crate::lov::ListOfValues;
use crate::workbook::{Row, Sheet};

/// Source type tokens and their canonical type
const TYPE_TABLE: [(&str, &str); 4] = [
    ("alphanumeric", "varchar"),
    ("numeric", "decimal"),
    ("date", "date"),
    ("timestamp", "timestamp"),
];

/// Type assumed for an empty type cell
const EMPTY_TYPE: &str = "varchar";

/// Normalize a contract field name into an identifier
///
/// Hyphens and non-breaking spaces become underscores, then every run of
/// whitespace collapses into one underscore. Normalizing twice is a no-op.
pub fn normalize_column_name(name: &str) -> String {
    name.replace(['-', '\u{a0}'], "_")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Map a source type token and declared precision to a type string
///
/// Precision is appended as `(p)` with `.` read as the scale separator.
/// Any result mentioning DATE or TIMESTAMP collapses to the bare temporal
/// type, dropping the precision.
pub fn map_source_type(token: &str, precision: &str) -> String {
    let token = token.trim().to_lowercase();
    let base = if token.is_empty() {
        EMPTY_TYPE.to_string()
    } else {
        TYPE_TABLE
            .iter()
            .find(|(source, _)| *source == token)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(token)
    };

    let precision = precision.trim().replace('.', ",");
    let mut mapped = if precision.is_empty() {
        base
    } else {
        format!("{}({})", base, precision)
    };

    if mapped.to_uppercase().contains("DATE") {
        mapped = "date".to_string();
    }
    if mapped.to_uppercase().contains("TIMESTAMP") {
        mapped = "timestamp".to_string();
    }

    mapped
}

fn is_mandatory(value: Option<String>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("oui") || v.eq_ignore_ascii_case("yes"))
}

fn is_primary_key(value: Option<String>) -> bool {
    value.is_some_and(|v| ["pk", "yes", "oui", "true"].iter().any(|t| v.eq_ignore_ascii_case(t)))
}

fn is_protected(value: Option<String>) -> bool {
    value.is_some_and(|v| ["oui", "yes", "true", "x", "y"].iter().any(|t| v.eq_ignore_ascii_case(t)))
}

/// Extracts [`TableSchema`]s from table sheets
pub struct SchemaExtractor<'a> {
    lov: &'a ListOfValues,
    country: String,
}

impl<'a> SchemaExtractor<'a> {
    /// Create an extractor resolving permitted values for one country
    pub fn new(lov: &'a ListOfValues, country: impl Into<String>) -> Self {
        Self {
            lov,
            country: country.into(),
        }
    }

    /// Whether a sheet may describe a table
    ///
    /// Fixed sheets, technical sheets (`_SF`, `TEMPLATE_`) and sheets
    /// without the `Field` header marker are not table sheets.
    pub fn is_schema_sheet(sheet: &Sheet) -> bool {
        if layout::is_fixed_sheet(&sheet.name) {
            return false;
        }

        let upper = sheet.name.to_uppercase();
        if table::EXCLUDED_FRAGMENTS.iter().any(|f| upper.contains(f)) {
            return false;
        }

        table::HEADER_ROWS
            .iter()
            .any(|&row| sheet.cell(row, table::FIELD).text().as_deref() == Some(table::HEADER_MARKER))
    }

    /// Table name of a sheet: `STG_<SHEET>` without direction suffix
    pub fn table_name(sheet_name: &str) -> String {
        staging_name(Direction::strip_suffix(sheet_name.trim()).0)
    }

    /// Extract the schema of one sheet
    ///
    /// Returns `None` when the sheet is not a schema sheet or its columns
    /// violate position/name uniqueness; the reason is pushed to
    /// `diagnostics` in both cases.
    pub fn extract(&self, sheet: &Sheet, diagnostics: &mut Vec<Diagnostic>) -> Option<TableSchema> {
        if !Self::is_schema_sheet(sheet) {
            tracing::debug!(sheet = %sheet.name, "Skipping sheet without schema header");
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::SheetNotASchema,
                    Severity::Info,
                    format!("Sheet '{}' is not a schema sheet, skipped", sheet.name),
                )
                .with_location(Location::new(&sheet.name)),
            );
            return None;
        }

        let mut columns = Vec::new();
        let mut positions = HashSet::new();
        let mut names = HashSet::new();

        for (index, row) in sheet.rows_from(table::FIRST_ROW) {
            let Some(raw_name) = row.text(table::FIELD) else {
                break;
            };
            if raw_name == table::PARTITION_MARKER {
                break;
            }
            if raw_name == table::HEADER_MARKER {
                continue;
            }

            let column = match self.read_column(sheet, index, row, &raw_name) {
                Ok(column) => column,
                Err(diagnostic) => {
                    diagnostics.push(diagnostic);
                    return None;
                }
            };

            if !positions.insert(column.position) {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::SchemaDuplicatePosition,
                        Severity::Error,
                        format!(
                            "Position {} is declared twice in sheet '{}', sheet skipped",
                            column.position, sheet.name
                        ),
                    )
                    .with_location(Location::with_cell(&sheet.name, index, table::POSITION)),
                );
                return None;
            }

            if !names.insert(column.name.to_uppercase()) {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::SchemaDuplicateColumn,
                        Severity::Error,
                        format!(
                            "Column '{}' is declared twice in sheet '{}', sheet skipped",
                            column.name, sheet.name
                        ),
                    )
                    .with_location(Location::with_cell(&sheet.name, index, table::FIELD)),
                );
                return None;
            }

            tracing::debug!(
                sheet = %sheet.name,
                column = %column.name,
                data_type = %column.data_type,
                "Extracted column"
            );
            columns.push(column);
        }

        let schema = TableSchema::new(Self::table_name(&sheet.name), &sheet.name, columns);
        tracing::debug!(
            sheet = %sheet.name,
            table = %schema.table_name,
            columns = schema.columns.len(),
            "Extracted schema"
        );

        Some(schema)
    }

    fn read_column(&self, sheet: &Sheet, index: usize, row: &Row, raw_name: &str) -> Result<Column, Diagnostic> {
        let position = row
            .get(table::POSITION)
            .as_integer()
            .and_then(|p| u32::try_from(p).ok())
            .ok_or_else(|| {
                Diagnostic::new(
                    DiagnosticCode::SchemaInvalidPosition,
                    Severity::Error,
                    format!(
                        "Column '{}' in sheet '{}' has no valid position, sheet skipped",
                        raw_name, sheet.name
                    ),
                )
                .with_location(Location::with_cell(&sheet.name, index, table::POSITION))
            })?;

        let name = normalize_column_name(raw_name);
        let precision = row.text(table::PRECISION).unwrap_or_default();
        let data_type = map_source_type(&row.text(table::TYPE).unwrap_or_default(), &precision);
        let allowed_values = self.lov.lookup(&name, &self.country).to_vec();

        Ok(Column::new(position, name, data_type)
            .with_precision(precision.replace('.', ","))
            .with_primary_key(is_primary_key(row.text(table::PRIMARY_KEY)))
            .with_mandatory(is_mandatory(row.text(table::MANDATORY)))
            .with_allowed_values(allowed_values)
            .with_protection(
                is_protected(row.text(table::PROTECTED)),
                row.text(table::ANONYMIZATION_RULE),
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractforge_core::LogicalType;
    use pretty_assertions::assert_eq;

    fn schema_sheet(name: &str, columns: &[[&str; 8]]) -> Sheet {
        let mut sheet = Sheet::new(name);
        for _ in 0..table::HEADER_ROWS[0] {
            sheet.push_row(Row::default());
        }
        sheet.push_row(["Field"].into_iter().collect());
        for c in columns {
            let mut row = Row::default();
            row.set(table::FIELD, c[0].into());
            row.set(table::TYPE, c[1].into());
            row.set(table::PROTECTED, c[2].into());
            row.set(table::PRECISION, c[3].into());
            row.set(table::POSITION, c[4].into());
            row.set(table::PRIMARY_KEY, c[5].into());
            row.set(table::MANDATORY, c[6].into());
            row.set(table::ANONYMIZATION_RULE, c[7].into());
            sheet.push_row(row);
        }
        sheet
    }

    #[test]
    fn name_normalization() {
        assert_eq!(normalize_column_name("DATE-OF BIRTH"), "DATE_OF_BIRTH");
        assert_eq!(normalize_column_name("A\u{a0}B  C"), "A_B_C");
        assert_eq!(normalize_column_name(" TRIMMED "), "TRIMMED");

        let once = normalize_column_name("CUST - ID");
        assert_eq!(normalize_column_name(&once), once);
    }

    #[test]
    fn type_mapping_is_total() {
        assert_eq!(map_source_type("alphanumeric", "50"), "varchar(50)");
        assert_eq!(map_source_type("Numeric", "18.2"), "decimal(18,2)");
        assert_eq!(map_source_type("date", "dd-MM-yyyy"), "date");
        assert_eq!(map_source_type("timestamp", "26"), "timestamp");
        assert_eq!(map_source_type("BLOB", ""), "blob");
        assert_eq!(map_source_type("", ""), "varchar");
        assert_eq!(map_source_type("varchar_date", "10"), "date");
    }

    #[test]
    fn extracts_sorted_columns() {
        let sheet = schema_sheet(
            "CUSTOMER_IN",
            &[
                ["NAME", "alphanumeric", "", "50", "1", "", "non", ""],
                ["CUST-ID", "numeric", "oui", "10", "0", "PK", "oui", "HASH"],
            ],
        );
        let lov = ListOfValues::default();
        let mut diagnostics = Vec::new();

        let schema = SchemaExtractor::new(&lov, "INDIA")
            .extract(&sheet, &mut diagnostics)
            .unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(schema.table_name, "STG_CUSTOMER");
        assert_eq!(schema.column_names(), vec!["CUST_ID", "NAME"]);

        let id = &schema.columns[0];
        assert!(id.primary_key && id.mandatory && id.protected);
        assert_eq!(id.anonymization_rule.as_deref(), Some("HASH"));
        assert_eq!(id.logical_type, LogicalType::Numeric);
        assert!(!schema.columns[1].mandatory);
    }

    #[test]
    fn stops_at_partition_marker() {
        let sheet = schema_sheet(
            "ORDERS",
            &[
                ["ORDER_ID", "numeric", "", "10", "0", "", "", ""],
                ["DATE_BATCH_PARTITION", "date", "", "", "1", "", "", ""],
                ["AFTER", "alphanumeric", "", "5", "2", "", "", ""],
            ],
        );
        let lov = ListOfValues::default();
        let schema = SchemaExtractor::new(&lov, "INDIA")
            .extract(&sheet, &mut Vec::new())
            .unwrap();
        assert_eq!(schema.column_names(), vec!["ORDER_ID"]);
    }

    #[test]
    fn sheets_without_header_are_skipped() {
        let sheet = Sheet::from_rows("Notes", vec![["Some notes"].into_iter().collect()]);
        let lov = ListOfValues::default();
        let mut diagnostics = Vec::new();

        assert!(SchemaExtractor::new(&lov, "INDIA").extract(&sheet, &mut diagnostics).is_none());
        assert_eq!(diagnostics[0].code, DiagnosticCode::SheetNotASchema);
    }

    #[test]
    fn technical_sheets_are_not_schemas() {
        let template = schema_sheet("TEMPLATE_TABLE", &[]);
        let sf = schema_sheet("CUSTOMER_SF", &[]);
        let files = schema_sheet(layout::files_list::SHEET, &[]);

        assert!(!SchemaExtractor::is_schema_sheet(&template));
        assert!(!SchemaExtractor::is_schema_sheet(&sf));
        assert!(!SchemaExtractor::is_schema_sheet(&files));
    }

    #[test]
    fn duplicate_positions_skip_the_sheet() {
        let sheet = schema_sheet(
            "CUSTOMER",
            &[
                ["A", "alphanumeric", "", "1", "0", "", "", ""],
                ["B", "alphanumeric", "", "1", "0", "", "", ""],
            ],
        );
        let lov = ListOfValues::default();
        let mut diagnostics = Vec::new();

        assert!(SchemaExtractor::new(&lov, "INDIA").extract(&sheet, &mut diagnostics).is_none());
        assert_eq!(diagnostics[0].code, DiagnosticCode::SchemaDuplicatePosition);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn duplicate_names_skip_the_sheet() {
        let sheet = schema_sheet(
            "CUSTOMER",
            &[
                ["Code", "alphanumeric", "", "1", "0", "", "", ""],
                ["CODE", "alphanumeric", "", "1", "1", "", "", ""],
            ],
        );
        let lov = ListOfValues::default();
        let mut diagnostics = Vec::new();

        assert!(SchemaExtractor::new(&lov, "INDIA").extract(&sheet, &mut diagnostics).is_none());
        assert_eq!(diagnostics[0].code, DiagnosticCode::SchemaDuplicateColumn);
    }

    #[test]
    fn invalid_position_skips_the_sheet() {
        let sheet = schema_sheet("CUSTOMER", &[["A", "alphanumeric", "", "1", "first", "", "", ""]]);
        let lov = ListOfValues::default();
        let mut diagnostics = Vec::new();

        assert!(SchemaExtractor::new(&lov, "INDIA").extract(&sheet, &mut diagnostics).is_none());
        assert_eq!(diagnostics[0].code, DiagnosticCode::SchemaInvalidPosition);
    }

    #[test]
    fn allowed_values_come_from_lov() {
        let sheet = schema_sheet("CUSTOMER", &[["STATUS", "alphanumeric", "", "1", "0", "", "", ""]]);
        let mut lov = ListOfValues::default();
        lov.insert("STATUS", "INDIA", "A");
        lov.insert("STATUS", "INDIA", "C");

        let schema = SchemaExtractor::new(&lov, "INDIA")
            .extract(&sheet, &mut Vec::new())
            .unwrap();
        assert_eq!(schema.columns[0].allowed_values, vec!["A", "C"]);
    }
}
