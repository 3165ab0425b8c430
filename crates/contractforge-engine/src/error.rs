//! Engine errors

use contractforge_catalog::CatalogError;
use contractforge_dbt::DbtError;
use contractforge_sheet::WorkbookError;
use contractforge_sql::DdlError;
use contractforge_workflow::WorkflowError;

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Workbook(#[from] WorkbookError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Ddl(#[from] DdlError),

    #[error(transparent)]
    Dbt(#[from] DbtError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("No canonical table '{table}' for catalog definition '{artifact}'")]
    MissingCanonical { table: String, artifact: String },

    #[error("Catalog definition '{0}' is listed in the manifest but was not found")]
    MissingDefinition(String),
}
