//! Shared schemas for dbt tests

use contractforge_core::{Column, Naming, TableSchema};

pub fn naming() -> Naming {
    Naming::new("credit-cards", "india", "ekip")
}

/// Account table keyed by a mandatory account id and an optional sub-account
pub fn accounts_schema() -> TableSchema {
    TableSchema::new(
        "STG_ACCOUNTS",
        "ACCOUNTS_OUT",
        vec![
            Column::new(0, "ACCOUNT_ID", "decimal(12)").with_primary_key(true).with_mandatory(true),
            Column::new(1, "SUB_ACCOUNT", "varchar(4)").with_primary_key(true),
            Column::new(2, "ACCOUNT_TYPE", "varchar(2)")
                .with_allowed_values(vec!["CC".into(), "DC".into(), "null".into()]),
            Column::new(3, "OPENED_ON", "date").with_mandatory(true),
            Column::new(4, "LABEL", "varchar(80)"),
        ],
    )
}
