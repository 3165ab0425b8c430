//! External table, view and stage statements

use std::fmt;
use std::path::{Path, PathBuf};

use contractforge_catalog::{CatalogTableDefinition, ManifestEntry};
use contractforge_core::naming::KMS_KEY_PLACEHOLDER;
use contractforge_core::{Direction, FormatLookupError, FormatRules, Naming};

use crate::projection::{column_projection, partition_projection, technical_projections, PARTITION_COLUMN};

/// A fully qualified warehouse object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    pub database: String,
    pub schema: String,
    pub name: String,
}

impl ObjectName {
    pub fn new(database: impl Into<String>, schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Get fully qualified name
    pub fn fqn(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.name)
    }

    /// Sibling object in the same schema
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self::new(&self.database, &self.schema, name)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}

/// The three statements generated for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDdl {
    pub table: ObjectName,
    pub view: ObjectName,
    pub stage: ObjectName,

    pub external_table_sql: String,
    pub view_sql: String,
    pub stage_sql: String,
}

impl TableDdl {
    /// Relative file paths and contents, in deployment order
    pub fn files(&self) -> [(PathBuf, &str); 3] {
        [
            (
                Path::new("stages").join(format!("A__01_{}.sql", self.stage.name)),
                self.stage_sql.as_str(),
            ),
            (
                Path::new("tables").join(format!("A__02_{}.{}.sql", self.table.schema, self.table.name)),
                self.external_table_sql.as_str(),
            ),
            (
                Path::new("views").join(format!("A__03_{}.{}.sql", self.view.schema, self.view.name)),
                self.view_sql.as_str(),
            ),
        ]
    }

    /// Write every statement under `dir`; returns the written paths
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, DdlError> {
        let mut written = Vec::with_capacity(3);

        for (relative, sql) in self.files() {
            let path = dir.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DdlError::IoError(format!("{}: {}", parent.display(), e)))?;
            }
            std::fs::write(&path, sql)
                .map_err(|e| DdlError::IoError(format!("{}: {}", path.display(), e)))?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Generates warehouse DDL from OUT catalog definitions
pub struct DdlGenerator {
    naming: Naming,
}

impl DdlGenerator {
    pub fn new(naming: Naming) -> Self {
        Self { naming }
    }

    /// Generate the statements of one definition
    ///
    /// Fails when the definition is not an OUT definition or when no
    /// format rule applies to its file; nothing is produced in that case.
    pub fn generate(
        &self,
        entry: &ManifestEntry,
        definition: &CatalogTableDefinition,
        rules: &FormatRules,
    ) -> Result<TableDdl, DdlError> {
        if entry.direction != Direction::Out {
            return Err(DdlError::NotColumnar(definition.name.clone()));
        }

        let format = rules.resolve(&entry.file_id)?;
        let period = entry.periodicity.as_str();

        let table = ObjectName::new(
            self.naming.database(),
            self.naming.schema(),
            self.naming.compiled_table_name(&definition.name),
        );
        let view = table.sibling(format!("VW_{}", table.name));
        let stage = table.sibling(self.naming.stage());

        let location = self.naming.parameterize_location(definition.location());

        let mut projections: Vec<String> = definition
            .columns()
            .iter()
            .filter_map(|c| column_projection(&c.name, &c.data_type, &format.date_format))
            .collect();
        projections.push(partition_projection(&location));
        projections.extend(technical_projections().iter().map(|p| p.to_string()));

        let external_table_sql = format!(
            "CREATE OR REPLACE EXTERNAL TABLE {table} (\n  {columns}\n)\n\
             PARTITION BY ({partition})\n\
             LOCATION = @{stage}/{project}/{period}/{folder}/\n\
             FILE_FORMAT = (TYPE = 'PARQUET');\n\
             COMMENT ON TABLE {table} IS '{comment}';\n",
            table = table,
            columns = projections.join(",\n  "),
            partition = PARTITION_COLUMN,
            stage = stage,
            project = self.naming.project.to_lowercase(),
            period = period,
            folder = entry.table.to_lowercase(),
            comment = definition.description.replace('\'', "''"),
        );

        let view_sql = format!(
            "CREATE OR REPLACE VIEW {view}\nAS SELECT * EXCLUDE VALUE FROM {table};\n",
            view = view,
            table = table,
        );

        let stage_sql = format!(
            "CREATE STAGE IF NOT EXISTS {stage}\n\
             STORAGE_INTEGRATION = {integration}\n\
             URL = '{url}'\n\
             DIRECTORY = ( ENABLE = true )\n\
             ENCRYPTION = (TYPE = 'AWS_SSE_KMS' KMS_KEY_ID = '{kms}');\n",
            stage = stage,
            integration = self.naming.storage_integration(),
            url = storage_root(&location),
            kms = KMS_KEY_PLACEHOLDER,
        );

        tracing::debug!(table = %table, date_format = %format.date_format, "Generated DDL");

        Ok(TableDdl {
            table,
            view,
            stage,
            external_table_sql,
            view_sql,
            stage_sql,
        })
    }
}

/// Bucket root of a storage URI: `s3://bucket/`
fn storage_root(location: &str) -> String {
    let root: Vec<&str> = location.split('/').take(3).collect();
    format!("{}/", root.join("/"))
}

/// DDL generation errors
#[derive(Debug, thiserror::Error)]
pub enum DdlError {
    #[error(transparent)]
    MissingFormat(#[from] FormatLookupError),

    #[error("Definition '{0}' is not a columnar (OUT) definition")]
    NotColumnar(String),

    #[error("IO error: {0}")]
    IoError(String),
}
