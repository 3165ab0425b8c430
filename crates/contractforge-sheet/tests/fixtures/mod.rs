//! In-memory contract workbooks for extraction tests
//!
//! Sheets are laid out exactly as contract workbooks are: fixed sheets
//! addressed by column index plus one sheet per table with the `Field`
//! header marker in A7.

#![allow(dead_code)]

use contractforge_sheet::layout::{files_list, list_of_values, rules, table};
use contractforge_sheet::{Row, Sheet, Workbook};

/// One column row of a table sheet
pub struct ColumnSpec<'a> {
    pub name: &'a str,
    pub source_type: &'a str,
    pub precision: &'a str,
    pub position: i64,
    pub primary_key: bool,
    pub mandatory: bool,
}

impl<'a> ColumnSpec<'a> {
    pub fn new(name: &'a str, source_type: &'a str, precision: &'a str, position: i64) -> Self {
        Self {
            name,
            source_type,
            precision,
            position,
            primary_key: false,
            mandatory: false,
        }
    }

    pub fn pk(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

/// Build a table sheet
pub fn table_sheet(name: &str, columns: &[ColumnSpec]) -> Sheet {
    let mut sheet = Sheet::new(name);
    sheet.push_row(["Data contract"].into_iter().collect());
    for _ in 1..table::HEADER_ROWS[0] {
        sheet.push_row(Row::default());
    }
    sheet.push_row(["Field", "Description", "Type"].into_iter().collect());

    for column in columns {
        let mut row = Row::default();
        row.set(table::FIELD, column.name.into());
        row.set(table::TYPE, column.source_type.into());
        row.set(table::PRECISION, column.precision.into());
        row.set(table::POSITION, column.position.into());
        if column.primary_key {
            row.set(table::PRIMARY_KEY, "PK".into());
        }
        let mandatory = if column.mandatory { "Oui" } else { "Non" };
        row.set(table::MANDATORY, mandatory.into());
        sheet.push_row(row);
    }

    sheet.push_row(["DATE_BATCH_PARTITION", "", "date"].into_iter().collect());
    sheet
}

/// One files-list row
pub struct FileSpec<'a> {
    pub file_id: &'a str,
    pub file_code: &'a str,
    pub periodicity: &'a str,
    pub separator: &'a str,
}

/// Build the files-list sheet
pub fn files_list_sheet(files: &[FileSpec]) -> Sheet {
    let mut sheet = Sheet::new(files_list::SHEET);
    for _ in 0..files_list::FIRST_ROW {
        sheet.push_row(Row::default());
    }

    for file in files {
        let mut row = Row::default();
        row.set(files_list::FILE_ID, file.file_id.into());
        row.set(files_list::FILE_CODE, file.file_code.into());
        row.set(files_list::PERIODICITY, file.periodicity.into());
        row.set(files_list::DATA_TYPE, "csv".into());
        row.set(files_list::FORMAT, "TEXT".into());
        row.set(files_list::SEPARATOR, file.separator.into());
        row.set(files_list::HEADER, true.into());
        row.set(files_list::FOOTER, false.into());
        row.set(files_list::QUOTE, "\"".into());
        sheet.push_row(row);
    }

    sheet
}

/// Build the rules sheet from (file, field, rule) triples
pub fn rules_sheet(entries: &[(&str, &str, &str)]) -> Sheet {
    let mut sheet = Sheet::new(rules::SHEET);
    for (file, field, rule) in entries {
        let mut row = Row::default();
        row.set(rules::FILE, (*file).into());
        row.set(rules::FIELD, (*field).into());
        row.set(rules::RULE, (*rule).into());
        sheet.push_row(row);
    }
    sheet
}

/// Build the list-of-values sheet from (field, value, country) triples
pub fn lov_sheet(entries: &[(&str, &str, &str)]) -> Sheet {
    let mut sheet = Sheet::new(list_of_values::SHEET);
    sheet.push_row(["FIELD", "LOV", "COUNTRY"].into_iter().collect());
    for (field, value, country) in entries {
        sheet.push_row([*field, *value, *country].into_iter().collect());
    }
    sheet
}

/// A customer/orders contract with every sheet kind
pub fn customer_contract() -> Workbook {
    Workbook::from_sheets(vec![
        files_list_sheet(&[
            FileSpec { file_id: "F1", file_code: "CUSTOMER", periodicity: "Quotidien", separator: ";" },
            FileSpec { file_id: "F2", file_code: "ORDERS_IN", periodicity: "Mensuel", separator: "" },
        ]),
        rules_sheet(&[("ALL", "*date*", "\"dd/MM/yyyy\"")]),
        lov_sheet(&[("STATUS", "A", "ALL"), ("STATUS", "C", "ALL")]),
        table_sheet(
            "CUSTOMER",
            &[
                ColumnSpec::new("CUSTOMER ID", "numeric", "10", 0).pk().mandatory(),
                ColumnSpec::new("STATUS", "alphanumeric", "1", 2),
                ColumnSpec::new("BIRTH-DATE", "date", "dd-MM-yyyy", 1),
            ],
        ),
        table_sheet(
            "ORDERS_IN",
            &[
                ColumnSpec::new("ORDER_ID", "numeric", "12", 0).pk().mandatory(),
                ColumnSpec::new("MONTANT", "numeric", "18.2", 1),
            ],
        ),
        table_sheet("TEMPLATE_TABLE", &[ColumnSpec::new("X", "alphanumeric", "1", 0)]),
        Sheet::from_rows("Notes", vec![["free text"].into_iter().collect()]),
    ])
}
