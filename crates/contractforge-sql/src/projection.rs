//! Column projections of an external table
//!
//! External tables expose each row as one semi-structured `$1` value; every
//! column is projected out of it with a typed expression.

use crate::types::{warehouse_type, WarehouseType};

/// Partition column derived from the file path
pub const PARTITION_COLUMN: &str = "DATE_BATCH_PARTITION";

/// Name fragment of the partition column as it appears in contracts
const PARTITION_FRAGMENT: &str = "date_batch";

/// Name fragment of technical filler columns
const FILLER_FRAGMENT: &str = "filler_tech";

/// Time part appended to the date format for timestamps
const TIME_SUFFIX: &str = "HH:MI:SS";

/// Projection of one contract column, if it gets one
///
/// Dates parse the raw text with the date format (the partition column
/// excepted), timestamps with the date format plus a time part. Every
/// other column except partition and filler columns is cast directly.
pub fn column_projection(name: &str, data_type: &str, date_format: &str) -> Option<String> {
    let column = name.to_uppercase();
    let lower = name.to_lowercase();
    let is_partition = lower.contains(PARTITION_FRAGMENT);
    let is_filler = lower.contains(FILLER_FRAGMENT);

    match warehouse_type(data_type) {
        WarehouseType::Date if is_partition => None,
        WarehouseType::Date => Some(format!(
            "{col} DATE as (to_date(NULLIF($1:{col}::TEXT,''),'{fmt}'))",
            col = column,
            fmt = date_format
        )),
        WarehouseType::TimestampNtz => Some(format!(
            "{col} TIMESTAMP_NTZ as (to_timestamp(NULLIF($1:{col}::TEXT,''),'{fmt} {time}'))",
            col = column,
            fmt = date_format,
            time = TIME_SUFFIX
        )),
        _ if is_partition || is_filler => None,
        other => Some(format!("{col} {ty} as ($1:{col}::{ty})", col = column, ty = other)),
    }
}

/// Partition column projection for a table stored under `location`
///
/// The batch date is the `key=value` directory at the position of the
/// location's last-but-one segment.
pub fn partition_projection(location: &str) -> String {
    let segments = location.split('/').count();
    let index = segments.saturating_sub(2);

    format!(
        "{} DATE as (TRY_CAST(split_part(split_part(metadata$filename, '/', {}), '=', 2) AS DATE))",
        PARTITION_COLUMN, index
    )
}

/// Projections computed from file metadata
pub fn technical_projections() -> [&'static str; 2] {
    [
        "ROW_NUMBER NUMBER as (metadata$file_row_number)",
        "DATE_LAST_MODIFIED TIMESTAMP_NTZ as (metadata$file_last_modified)",
    ]
}
