//! Contract workbooks and project roots for pipeline tests

#![allow(dead_code)]

use std::path::Path;

use contractforge_core::{ContractConfig, ContractFingerprint};
use contractforge_sheet::layout::{files_list, list_of_values, rules, table};
use contractforge_sheet::{Row, Sheet, Workbook};

pub const WORKBOOK: &str = "EKIP_CREDIT_CARDS.xlsm";

/// Config of the test contract rooted at `root`
pub fn config(root: &Path) -> ContractConfig {
    let mut config = ContractConfig::for_workbook(WORKBOOK, "EKIP", "INDIA").unwrap();
    config.project_root = root.to_path_buf();
    config
}

pub fn fingerprint() -> ContractFingerprint {
    ContractFingerprint::from_bytes(format!("datacontract/{}", WORKBOOK), b"contract revision 1")
}

/// (name, type, precision, position, primary key, mandatory)
type ColumnRow<'a> = (&'a str, &'a str, &'a str, i64, bool, bool);

fn table_sheet(name: &str, columns: &[ColumnRow]) -> Sheet {
    let mut sheet = Sheet::new(name);
    for _ in 0..table::HEADER_ROWS[0] {
        sheet.push_row(Row::default());
    }
    sheet.push_row([table::HEADER_MARKER, "Description", "Type"].into_iter().collect());

    for (field, source_type, precision, position, pk, mandatory) in columns {
        let mut row = Row::default();
        row.set(table::FIELD, (*field).into());
        row.set(table::TYPE, (*source_type).into());
        row.set(table::PRECISION, (*precision).into());
        row.set(table::POSITION, (*position).into());
        if *pk {
            row.set(table::PRIMARY_KEY, "PK".into());
        }
        let mandatory = if *mandatory { "Oui" } else { "Non" };
        row.set(table::MANDATORY, mandatory.into());
        sheet.push_row(row);
    }

    sheet.push_row([table::PARTITION_MARKER, "", "date"].into_iter().collect());
    sheet
}

/// (file id, file code, periodicity, separator)
fn files_sheet(files: &[(&str, &str, &str, &str)]) -> Sheet {
    let mut sheet = Sheet::new(files_list::SHEET);
    for _ in 0..files_list::FIRST_ROW {
        sheet.push_row(Row::default());
    }

    for (file_id, file_code, periodicity, separator) in files {
        let mut row = Row::default();
        row.set(files_list::FILE_ID, (*file_id).into());
        row.set(files_list::FILE_CODE, (*file_code).into());
        row.set(files_list::PERIODICITY, (*periodicity).into());
        row.set(files_list::DATA_TYPE, "csv".into());
        row.set(files_list::SEPARATOR, (*separator).into());
        row.set(files_list::HEADER, true.into());
        sheet.push_row(row);
    }

    sheet
}

/// (file, field, rule)
fn rules_sheet(entries: &[(&str, &str, &str)]) -> Sheet {
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

fn lov_sheet() -> Sheet {
    let mut sheet = Sheet::new(list_of_values::SHEET);
    sheet.push_row(["FIELD", "LOV", "COUNTRY"].into_iter().collect());
    sheet.push_row(["CARD_TYPE", "VISA", "ALL"].into_iter().collect());
    sheet.push_row(["CARD_TYPE", "MC", "ALL"].into_iter().collect());
    sheet
}

fn contract_with_rules(rules: &[(&str, &str, &str)]) -> Workbook {
    Workbook::from_sheets(vec![
        files_sheet(&[
            ("F1", "CUSTOMER", "Quotidien", ";"),
            ("F2", "ORDERS", "Mensuel", ""),
            ("F2", "ORDERS", "Hebdo", ""),
        ]),
        rules_sheet(rules),
        lov_sheet(),
        table_sheet(
            "CUSTOMER",
            &[
                ("CUSTOMER_ID", "numeric", "10", 0, true, true),
                ("BIRTH_DATE", "date", "", 1, false, false),
                ("CARD_TYPE", "alphanumeric", "4", 2, false, false),
            ],
        ),
        table_sheet(
            "ORDERS",
            &[
                ("ORDER_ID", "numeric", "12", 0, true, true),
                ("CUSTOMER_ID", "numeric", "10", 1, true, false),
                ("MONTANT", "numeric", "18.2", 2, false, false),
                ("ORDERED_AT", "timestamp", "", 3, false, true),
            ],
        ),
    ])
}

/// Customer and orders contract with one global date rule
pub fn cards_contract() -> Workbook {
    contract_with_rules(&[("ALL", "*date*", "\"dd/MM/yyyy\"")])
}

/// Same contract with a date rule for the customer file only
pub fn customer_only_rules_contract() -> Workbook {
    contract_with_rules(&[("F1", "F1 *date*", "\"yyyyMMdd\"")])
}
