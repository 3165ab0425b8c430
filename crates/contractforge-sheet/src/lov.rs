//! List of values (LOV) lookup

use std::collections::BTreeMap;

use crate::extractor::normalize_column_name;
use crate::layout::list_of_values as layout;
use crate::workbook::Sheet;

/// Permitted values grouped by (field, country)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOfValues {
    entries: BTreeMap<(String, String), Vec<String>>,
}

impl ListOfValues {
    /// Read the list-of-values sheet
    ///
    /// Rows without a field name or value are ignored. Field names are
    /// normalized the same way column names are.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut lov = Self::default();

        for (_, row) in sheet.rows_from(layout::FIRST_ROW) {
            let (Some(field), Some(value)) = (row.text(layout::FIELD), row.text(layout::VALUE)) else {
                continue;
            };
            let country = row
                .text(layout::COUNTRY)
                .unwrap_or_else(|| layout::ALL_COUNTRIES.to_string());

            lov.insert(&field, &country, value);
        }

        lov
    }

    /// Add a value for a field in a country scope
    pub fn insert(&mut self, field: &str, country: &str, value: impl Into<String>) {
        self.entries
            .entry((normalize_column_name(field), country.to_uppercase()))
            .or_default()
            .push(value.into());
    }

    /// Values for a field in one country scope
    pub fn get(&self, field: &str, country: &str) -> &[String] {
        self.entries
            .get(&(field.to_string(), country.to_uppercase()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Values permitted for a field in the target country
    ///
    /// The wildcard scope wins; the country scope is consulted only when
    /// the wildcard scope has no values for the field.
    pub fn lookup(&self, field: &str, country: &str) -> &[String] {
        let all = self.get(field, layout::ALL_COUNTRIES);
        if all.is_empty() {
            self.get(field, country)
        } else {
            all
        }
    }

    /// Whether no values were loaded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::Row;

    fn lov_sheet() -> Sheet {
        Sheet::from_rows(
            layout::SHEET,
            vec![
                ["FIELD", "LOV", "COUNTRY"].into_iter().collect(),
                ["STATUS", "A", "ALL"].into_iter().collect(),
                ["STATUS", "C", "ALL"].into_iter().collect(),
                ["SEGMENT", "RETAIL", "INDIA"].into_iter().collect(),
                ["SEGMENT", "CORP", "FRANCE"].into_iter().collect(),
                ["", "ORPHAN", "ALL"].into_iter().collect(),
                Row::default(),
            ],
        )
    }

    #[test]
    fn wildcard_scope_first() {
        let lov = ListOfValues::from_sheet(&lov_sheet());
        assert_eq!(lov.lookup("STATUS", "INDIA"), ["A", "C"]);
    }

    #[test]
    fn country_scope_when_wildcard_empty() {
        let lov = ListOfValues::from_sheet(&lov_sheet());
        assert_eq!(lov.lookup("SEGMENT", "india"), ["RETAIL"]);
        assert!(lov.lookup("SEGMENT", "SPAIN").is_empty());
        assert!(lov.lookup("UNKNOWN", "INDIA").is_empty());
    }
}
