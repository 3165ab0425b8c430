//! Canonical tables for catalog tests

#![allow(dead_code)]

use std::collections::BTreeSet;

use contractforge_core::{CanonicalTable, Column, Direction, FieldValue, FileRecord, Periodicity, TableSchema};

/// Orders table with a composite key, a date and an amount
pub fn orders_schema() -> TableSchema {
    TableSchema::new(
        "STG_ORDERS",
        "ORDERS",
        vec![
            Column::new(0, "ORDER_ID", "decimal(12)").with_primary_key(true).with_mandatory(true),
            Column::new(1, "LINE_NO", "decimal(4)").with_primary_key(true),
            Column::new(2, "ORDER_DATE", "date").with_mandatory(true),
            Column::new(3, "MONTANT", "decimal(18,2)"),
            Column::new(4, "STATUS", "varchar(1)").with_allowed_values(vec!["A".into(), "C".into()]),
        ],
    )
}

/// File record of the orders file in one direction
pub fn orders_record(direction: Direction, periodicity: &[Periodicity]) -> FileRecord {
    FileRecord {
        file_id: "F2".into(),
        file_code: "ORDERS_IN".into(),
        table_name: format!("STG_ORDERS{}", direction.suffix()),
        direction,
        periodicity: periodicity.iter().copied().collect::<BTreeSet<_>>(),
        data_type: Some("csv".into()),
        container_format: match direction {
            Direction::Out => "PARQUET".into(),
            Direction::In => "TEXT".into(),
        },
        separator: None,
        header: Some(FieldValue::Number(1.0)),
        footer: Some(FieldValue::Bool(false)),
        quote: Some(FieldValue::Text("\"".into())),
    }
}

/// Orders canonical table
pub fn orders_table(direction: Direction, periodicity: &[Periodicity]) -> CanonicalTable {
    CanonicalTable::new(orders_schema(), orders_record(direction, periodicity))
}
