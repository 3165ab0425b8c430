//! Schema types extracted from data-contract sheets

use serde::{Deserialize, Serialize};

/// Logical type family of a contract column
///
/// The exact mapped type (with precision) lives in [`Column::data_type`];
/// this enum only records which family the column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalType {
    /// Free text (`varchar`)
    Alphanumeric,

    /// Fixed-point number (`decimal`)
    Numeric,

    /// Calendar date
    Date,

    /// Date with a time component
    Timestamp,

    /// A source token the contract vocabulary does not know
    Other,
}

impl LogicalType {
    /// Classify a mapped type string such as `decimal(18,2)` or `date`
    pub fn classify(data_type: &str) -> Self {
        let lower = data_type.to_lowercase();

        if lower.starts_with("timestamp") {
            Self::Timestamp
        } else if lower.starts_with("date") {
            Self::Date
        } else if lower.starts_with("decimal")
            || lower.starts_with("numeric")
            || lower.starts_with("number")
            || lower.starts_with("int")
        {
            Self::Numeric
        } else if lower.starts_with("varchar")
            || lower.starts_with("char")
            || lower.starts_with("string")
            || lower.starts_with("text")
        {
            Self::Alphanumeric
        } else {
            Self::Other
        }
    }

    /// Whether values carry a calendar component
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::Timestamp)
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alphanumeric => write!(f, "alphanumeric"),
            Self::Numeric => write!(f, "numeric"),
            Self::Date => write!(f, "date"),
            Self::Timestamp => write!(f, "timestamp"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A column declared in a data contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Declared position; defines output order
    pub position: u32,

    /// Normalized identifier
    pub name: String,

    /// Type family
    pub logical_type: LogicalType,

    /// Mapped type string, e.g. `varchar(50)`, `decimal(18,2)`, `date`
    pub data_type: String,

    /// Declared precision as written in the contract (`.` replaced by `,`)
    #[serde(default)]
    pub precision: String,

    /// Part of the table's primary key
    #[serde(default)]
    pub primary_key: bool,

    /// Value is required on every row
    #[serde(default)]
    pub mandatory: bool,

    /// Permitted values (list of values) for the target country
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,

    /// Personal or otherwise protected data
    #[serde(default)]
    pub protected: bool,

    /// Anonymization rule applied downstream, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymization_rule: Option<String>,
}

impl Column {
    /// Create a non-key, optional column; the logical type is derived from `data_type`
    pub fn new(position: u32, name: impl Into<String>, data_type: impl Into<String>) -> Self {
        let data_type = data_type.into();
        Self {
            position,
            name: name.into(),
            logical_type: LogicalType::classify(&data_type),
            data_type,
            precision: String::new(),
            primary_key: false,
            mandatory: false,
            allowed_values: Vec::new(),
            protected: false,
            anonymization_rule: None,
        }
    }

    /// Set declared precision
    pub fn with_precision(mut self, precision: impl Into<String>) -> Self {
        self.precision = precision.into();
        self
    }

    /// Mark as primary key member
    pub fn with_primary_key(mut self, primary_key: bool) -> Self {
        self.primary_key = primary_key;
        self
    }

    /// Mark as mandatory
    pub fn with_mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Set the list of permitted values
    pub fn with_allowed_values(mut self, values: Vec<String>) -> Self {
        self.allowed_values = values;
        self
    }

    /// Set protection flag and anonymization rule
    pub fn with_protection(mut self, protected: bool, rule: Option<String>) -> Self {
        self.protected = protected;
        self.anonymization_rule = rule;
        self
    }
}

/// Ordered columns of one logical table, as read from one sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Staging table name (`STG_<BASE>`), direction suffix stripped
    pub table_name: String,

    /// Name of the sheet the schema was read from
    pub source_sheet: String,

    /// Columns sorted by position
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Create a schema; columns are sorted by declared position
    pub fn new(table_name: impl Into<String>, source_sheet: impl Into<String>, mut columns: Vec<Column>) -> Self {
        columns.sort_by_key(|c| c.position);
        Self {
            table_name: table_name.into(),
            source_sheet: source_sheet.into(),
            columns,
        }
    }

    /// Find a column by name (case-insensitive)
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Get column names in output order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Columns that belong to the primary key
    pub fn primary_key(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.primary_key)
    }
}
