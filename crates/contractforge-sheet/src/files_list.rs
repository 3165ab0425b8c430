//! File records from the files-list sheet

use std::collections::{BTreeMap, BTreeSet, HashSet};

use contractforge_core::{
    staging_name, Diagnostic, DiagnosticCode, Direction, FileRecord, Location, Periodicity, Severity,
};
use contractforge_core::record::DEFAULT_SEPARATOR;

use crate::layout::files_list as layout;
use crate::workbook::{Row, Sheet};

/// Container format forced on every OUT record
pub const OUT_CONTAINER_FORMAT: &str = "PARQUET";

/// Builds IN/OUT [`FileRecord`] pairs from the files list
pub struct FileCatalogBuilder<'a> {
    mapping: &'a BTreeMap<String, Periodicity>,
}

impl<'a> FileCatalogBuilder<'a> {
    /// Create a builder with a periodicity token mapping
    pub fn new(mapping: &'a BTreeMap<String, Periodicity>) -> Self {
        Self { mapping }
    }

    /// Base table name of a file code: the code without a trailing `_IN`
    pub fn base_name(file_code: &str) -> &str {
        file_code.strip_suffix(Direction::In.suffix()).unwrap_or(file_code)
    }

    /// Map a periodicity token
    ///
    /// Tokens are looked up in the mapping (exact, then case-insensitive),
    /// then read as canonical names.
    pub fn map_periodicity(&self, token: &str) -> Option<Periodicity> {
        self.mapping
            .get(token)
            .or_else(|| {
                self.mapping
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(token))
                    .map(|(_, v)| v)
            })
            .copied()
            .or_else(|| Periodicity::parse(token))
    }

    /// Read every file row
    ///
    /// The first row of a file code creates its OUT and IN records; later
    /// rows with the same code only contribute periodicity. Periodicity is
    /// the union over every row sharing the same base table name.
    pub fn build(&self, sheet: &Sheet, diagnostics: &mut Vec<Diagnostic>) -> Vec<FileRecord> {
        let mut records = Vec::new();
        let mut seen_codes = HashSet::new();
        let mut periodicities: BTreeMap<String, BTreeSet<Periodicity>> = BTreeMap::new();

        for (index, row) in sheet.rows_from(layout::FIRST_ROW) {
            let Some(file_code) = row.text(layout::FILE_CODE) else {
                break;
            };
            let base = Self::base_name(&file_code).to_uppercase();

            let period = self.row_periodicity(sheet, index, row, diagnostics);
            periodicities.entry(base.clone()).or_default().insert(period);

            if !seen_codes.insert(file_code.clone()) {
                tracing::debug!(file_code = %file_code, period = %period, "Repeated file code, periodicity merged");
                continue;
            }

            let separator = row.get(layout::SEPARATOR).raw_text();
            if separator.is_none() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::SeparatorDefaulted,
                        Severity::Warn,
                        format!("File '{}' declares no separator", file_code),
                    )
                    .with_location(Location::with_cell(&sheet.name, index, layout::SEPARATOR))
                    .with_substitution(DEFAULT_SEPARATOR),
                );
            }

            let out = FileRecord {
                file_id: row.text(layout::FILE_ID).unwrap_or_default(),
                file_code: file_code.clone(),
                table_name: format!("{}{}", staging_name(&base), Direction::Out.suffix()),
                direction: Direction::Out,
                periodicity: BTreeSet::new(),
                data_type: row.text(layout::DATA_TYPE),
                container_format: OUT_CONTAINER_FORMAT.to_string(),
                separator,
                header: row.get(layout::HEADER).to_field_value(),
                footer: row.get(layout::FOOTER).to_field_value(),
                quote: row.get(layout::QUOTE).to_field_value(),
            };

            let inbound = FileRecord {
                table_name: format!("{}{}", staging_name(&base), Direction::In.suffix()),
                direction: Direction::In,
                container_format: row.text(layout::FORMAT).unwrap_or_default(),
                ..out.clone()
            };

            records.push(out);
            records.push(inbound);
        }

        for record in &mut records {
            let base = Self::base_name(&record.file_code).to_uppercase();
            record.periodicity = periodicities.get(&base).cloned().unwrap_or_default();
        }

        tracing::info!(records = records.len(), "Built file records");

        records
    }

    fn row_periodicity(
        &self,
        sheet: &Sheet,
        index: usize,
        row: &Row,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Periodicity {
        let Some(token) = row.text(layout::PERIODICITY) else {
            return Periodicity::Daily;
        };

        self.map_periodicity(&token).unwrap_or_else(|| {
            tracing::warn!(token = %token, "Unknown periodicity, defaulting to daily");
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::PeriodicityUnknown,
                    Severity::Warn,
                    format!("Unknown periodicity '{}'", token),
                )
                .with_location(Location::with_cell(&sheet.name, index, layout::PERIODICITY))
                .with_substitution(Periodicity::Daily.as_str()),
            );
            Periodicity::Daily
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractforge_core::config::default_periodicity_mapping;
    use contractforge_core::FieldValue;
    use pretty_assertions::assert_eq;

    fn file_row(file_id: &str, file_code: &str, periodicity: &str, separator: &str) -> Row {
        let mut row = Row::default();
        row.set(layout::FILE_ID, file_id.into());
        row.set(layout::FILE_CODE, file_code.into());
        row.set(layout::PERIODICITY, periodicity.into());
        row.set(layout::DATA_TYPE, "csv".into());
        row.set(layout::FORMAT, "TEXT".into());
        row.set(layout::SEPARATOR, separator.into());
        row.set(layout::HEADER, true.into());
        row.set(layout::FOOTER, 0i64.into());
        row
    }

    fn files_sheet(rows: Vec<Row>) -> Sheet {
        let mut sheet = Sheet::new(layout::SHEET);
        for _ in 0..layout::FIRST_ROW {
            sheet.push_row(Row::default());
        }
        for row in rows {
            sheet.push_row(row);
        }
        sheet
    }

    #[test]
    fn first_row_creates_out_and_in() {
        let mapping = default_periodicity_mapping();
        let sheet = files_sheet(vec![file_row("F1", "CUST_001", "Quotidien", ";")]);

        let records = FileCatalogBuilder::new(&mapping).build(&sheet, &mut Vec::new());
        assert_eq!(records.len(), 2);

        let (out, inbound) = (&records[0], &records[1]);
        assert_eq!(out.table_name, "STG_CUST_001_OUT");
        assert_eq!(out.container_format, "PARQUET");
        assert_eq!(inbound.table_name, "STG_CUST_001_IN");
        assert_eq!(inbound.container_format, "TEXT");
        assert_eq!(inbound.separator.as_deref(), Some(";"));
        assert_eq!(inbound.header, Some(FieldValue::Bool(true)));
        assert_eq!(inbound.footer, Some(FieldValue::Number(0.0)));
        assert_eq!(inbound.quote, None);
    }

    #[test]
    fn trailing_in_marker_is_stripped() {
        assert_eq!(FileCatalogBuilder::base_name("CUST_001_IN"), "CUST_001");
        assert_eq!(FileCatalogBuilder::base_name("CUST_INT"), "CUST_INT");
    }

    #[test]
    fn empty_periodicity_defaults_to_daily() {
        let mapping = default_periodicity_mapping();
        let sheet = files_sheet(vec![file_row("F1", "CUST_001", "", "|")]);
        let mut diagnostics = Vec::new();

        let records = FileCatalogBuilder::new(&mapping).build(&sheet, &mut diagnostics);
        assert_eq!(records[0].periodicity, BTreeSet::from([Periodicity::Daily]));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn unknown_periodicity_warns() {
        let mapping = default_periodicity_mapping();
        let sheet = files_sheet(vec![file_row("F1", "CUST_001", "Bimensuel", "|")]);
        let mut diagnostics = Vec::new();

        let records = FileCatalogBuilder::new(&mapping).build(&sheet, &mut diagnostics);
        assert_eq!(records[0].periodicity, BTreeSet::from([Periodicity::Daily]));
        assert_eq!(diagnostics[0].code, DiagnosticCode::PeriodicityUnknown);
        assert_eq!(diagnostics[0].substituted.as_deref(), Some("daily"));
    }

    #[test]
    fn missing_separator_is_reported() {
        let mapping = default_periodicity_mapping();
        let sheet = files_sheet(vec![file_row("F1", "CUST_001", "d", "")]);
        let mut diagnostics = Vec::new();

        let records = FileCatalogBuilder::new(&mapping).build(&sheet, &mut diagnostics);
        assert_eq!(records[1].separator_or_default(), "|");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, DiagnosticCode::SeparatorDefaulted);
    }

    #[test]
    fn canonical_and_case_insensitive_tokens() {
        let mapping = default_periodicity_mapping();
        let builder = FileCatalogBuilder::new(&mapping);
        assert_eq!(builder.map_periodicity("hebdo"), Some(Periodicity::Weekly));
        assert_eq!(builder.map_periodicity("Monthly"), Some(Periodicity::Monthly));
        assert_eq!(builder.map_periodicity("sometimes"), None);
    }
}
