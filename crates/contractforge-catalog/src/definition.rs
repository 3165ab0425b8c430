//! Catalog table definition (Glue table input shape)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Parquet input format class
pub const PARQUET_INPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.parquet.MapredParquetInputFormat";

/// Parquet output format class
pub const PARQUET_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.parquet.MapredParquetOutputFormat";

/// Parquet serde
pub const PARQUET_SERDE: &str = "org.apache.hadoop.hive.ql.io.parquet.serde.ParquetHiveSerDe";

/// Delimited text input format class
pub const TEXT_INPUT_FORMAT: &str = "org.apache.hadoop.mapred.TextInputFormat";

/// Delimited text output format class
pub const TEXT_OUTPUT_FORMAT: &str = "org.apache.hadoop.hive.ql.io.HiveIgnoreKeyTextOutputFormat";

/// Delimited text serde
pub const TEXT_SERDE: &str = "org.apache.hadoop.hive.serde2.lazy.LazySimpleSerDe";

/// Governance flags of a column, passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnParameters {
    pub protected: String,
    pub anonymization_rule: String,
    /// `PK` or `None`
    pub primary_key: String,
    /// `mandatory` or `non`
    pub mandatory: String,
}

/// A catalog column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogColumn {
    /// Lower-cased column name
    pub name: String,

    /// Mapped type, e.g. `decimal(18,2)`
    #[serde(rename = "Type")]
    pub data_type: String,

    pub parameters: ColumnParameters,
}

/// Serialization library and its parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SerdeInfo {
    pub serialization_library: String,
    pub parameters: BTreeMap<String, String>,
}

/// Physical layout of a catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageDescriptor {
    pub columns: Vec<CatalogColumn>,

    /// Storage URI (may carry environment markers)
    pub location: String,

    pub input_format: String,
    pub output_format: String,
    pub serde_info: SerdeInfo,
}

/// One external table registered per (table, direction, periodicity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogTableDefinition {
    pub name: String,
    pub description: String,
    pub storage_descriptor: StorageDescriptor,

    /// Present (and empty) on IN definitions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_keys: Option<Vec<String>>,

    /// Table parameters; IN definitions carry header/footer/quote as-is
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl CatalogTableDefinition {
    /// Columns in declared order
    pub fn columns(&self) -> &[CatalogColumn] {
        &self.storage_descriptor.columns
    }

    /// Storage location
    pub fn location(&self) -> &str {
        &self.storage_descriptor.location
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::SerializeError(e.to_string()))
    }

    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_json(&contents)
    }

    /// Save to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        std::fs::write(path, self.to_json()?)
            .map_err(|e| CatalogError::IoError(format!("{}: {}", path.display(), e)))
    }
}

/// Catalog artifact errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
