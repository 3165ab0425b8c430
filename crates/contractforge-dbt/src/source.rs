//! The dbt `sources` document of a contract

use serde::Serialize;
use std::path::Path;

use contractforge_core::Naming;

use crate::quality::SourceTable;

/// Source document file name inside the models directory
pub const SOURCE_FILE: &str = "source.yml";

const LOADED_AT_FIELD: &str = "DATE_BATCH_PARTITION::timestamp";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreshnessThreshold {
    pub count: u32,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Freshness {
    pub warn_after: FreshnessThreshold,
    pub error_after: FreshnessThreshold,
}

impl Default for Freshness {
    /// Warn after one day, fail after two
    fn default() -> Self {
        Self {
            warn_after: FreshnessThreshold { count: 1, period: "day".into() },
            error_after: FreshnessThreshold { count: 2, period: "day".into() },
        }
    }
}

/// One named source: a warehouse schema and its tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroup {
    pub name: String,
    pub database: String,
    pub schema: String,
    pub freshness: Freshness,
    pub loaded_at_field: String,
    pub tables: Vec<SourceTable>,
}

/// dbt properties file declaring the contract's sources
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDocument {
    pub version: u32,
    pub sources: Vec<SourceGroup>,
}

impl SourceDocument {
    /// Wrap the tables of one contract
    ///
    /// The source is named after the project path with dashes turned into
    /// underscores.
    pub fn new(naming: &Naming, project_path: &str, tables: Vec<SourceTable>) -> Self {
        Self {
            version: 2,
            sources: vec![SourceGroup {
                name: project_path.replace('-', "_"),
                database: naming.dbt_database(),
                schema: naming.schema(),
                freshness: Freshness::default(),
                loaded_at_field: LOADED_AT_FIELD.to_string(),
                tables,
            }],
        }
    }

    /// Tables across all sources
    pub fn tables(&self) -> impl Iterator<Item = &SourceTable> {
        self.sources.iter().flat_map(|s| s.tables.iter())
    }

    pub fn to_yaml(&self) -> Result<String, DbtError> {
        serde_yaml::to_string(self).map_err(|e| DbtError::SerializeError(e.to_string()))
    }

    /// Write the document, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), DbtError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbtError::IoError(format!("{}: {}", parent.display(), e)))?;
        }

        std::fs::write(path, self.to_yaml()?)
            .map_err(|e| DbtError::IoError(format!("{}: {}", path.display(), e)))
    }
}

/// dbt artifact errors
#[derive(Debug, thiserror::Error)]
pub enum DbtError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_group_naming() {
        let naming = Naming::new("credit-cards", "india", "ekip");
        let doc = SourceDocument::new(&naming, "ekip-credit-cards", Vec::new());
        let source = &doc.sources[0];

        assert_eq!(doc.version, 2);
        assert_eq!(source.name, "ekip_credit_cards");
        assert_eq!(source.database, "DB_BNK_INDIA_{{env_var('ENV_DBT')}}");
        assert_eq!(source.schema, "SCH_EKIP_SL");
        assert_eq!(source.freshness.error_after.count, 2);
    }

    #[test]
    fn yaml_keeps_field_order() {
        let naming = Naming::new("cards", "india", "ekip");
        let yaml = SourceDocument::new(&naming, "ekip-cards", Vec::new()).to_yaml().unwrap();

        let version = yaml.find("version").unwrap();
        let sources = yaml.find("sources").unwrap();
        assert!(version < sources);
        assert!(yaml.contains("loaded_at_field: DATE_BATCH_PARTITION::timestamp"));
    }
}
