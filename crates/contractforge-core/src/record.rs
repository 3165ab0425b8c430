//! File-level metadata and the canonical table record

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::schema::TableSchema;

/// Prefix shared by every staging table name
pub const STAGING_PREFIX: &str = "STG_";

/// Delimiter assumed when a file declares no separator
pub const DEFAULT_SEPARATOR: &str = "|";

/// Whether a record describes the raw inbound file or the converted output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Raw delimited file as delivered
    In,

    /// Columnar copy produced by ingestion
    Out,
}

impl Direction {
    /// Upper-case token used in table names
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Name suffix, e.g. `_OUT`
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::In => "_IN",
            Self::Out => "_OUT",
        }
    }

    /// Split a direction suffix off a name, if present (case-insensitive)
    pub fn strip_suffix(name: &str) -> (&str, Option<Direction>) {
        let upper = name.to_ascii_uppercase();
        for direction in [Self::Out, Self::In] {
            if upper.ends_with(direction.suffix()) {
                return (&name[..name.len() - direction.suffix().len()], Some(direction));
            }
        }
        (name, None)
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ingestion cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Periodicity {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Periodicity {
    /// All cadences, in canonical order
    pub const ALL: [Periodicity; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Yearly];

    /// Lower-case canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parse a canonical name (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scalar cell value kept verbatim (header/footer/quote flags)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Format and scheduling metadata for one file in one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Provider file identifier
    pub file_id: String,

    /// File code as written in the files list
    pub file_code: String,

    /// Staging table name including direction, e.g. `STG_CUST_001_OUT`
    pub table_name: String,

    /// IN or OUT
    pub direction: Direction,

    /// Every cadence seen for this logical table
    pub periodicity: BTreeSet<Periodicity>,

    /// Declared data type of the file (csv, fixed width, ...)
    #[serde(default)]
    pub data_type: Option<String>,

    /// Container format (`PARQUET` for OUT records)
    pub container_format: String,

    /// Field separator
    #[serde(default)]
    pub separator: Option<String>,

    /// Header flag or line count
    #[serde(default)]
    pub header: Option<FieldValue>,

    /// Footer flag or line count
    #[serde(default)]
    pub footer: Option<FieldValue>,

    /// Quote character or flag
    #[serde(default)]
    pub quote: Option<FieldValue>,
}

impl FileRecord {
    /// Staging table name without direction suffix, e.g. `STG_CUST_001`
    pub fn base_table_name(&self) -> &str {
        Direction::strip_suffix(&self.table_name).0
    }

    /// Declared separator, or [`DEFAULT_SEPARATOR`]
    pub fn separator_or_default(&self) -> &str {
        self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }
}

/// Merged schema and file metadata for one (table, direction) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTable {
    /// Columns read from the table sheet
    pub schema: TableSchema,

    /// File metadata read from the files list
    pub file: FileRecord,
}

impl CanonicalTable {
    /// Merge a schema with its file record
    pub fn new(schema: TableSchema, file: FileRecord) -> Self {
        Self { schema, file }
    }

    /// Staging table name including direction
    pub fn table_name(&self) -> &str {
        &self.file.table_name
    }

    /// Staging table name without direction
    pub fn base_table_name(&self) -> &str {
        self.file.base_table_name()
    }

    /// IN or OUT
    pub fn direction(&self) -> Direction {
        self.file.direction
    }
}

/// Build a staging name: `STG_<BASE>`
pub fn staging_name(base: &str) -> String {
    format!("{}{}", STAGING_PREFIX, base.to_uppercase())
}
