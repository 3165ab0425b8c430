//! Ingestion job descriptors and orchestration workflows
//!
//! Every contract is ingested by two jobs (structure check, then
//! conversion to Parquet) chained by one workflow per periodicity.

pub mod job;
pub mod dag;

pub use job::{GlueCommand, GlueJob, JobDescriptor, JobKind, JobManifest, JobManifestEntry, JOB_MANIFEST_FILE};
pub use dag::{DagContext, DagRenderer, RenderedDag};

/// Workflow artifact errors
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializeError(String),

    #[error("Template error: {0}")]
    TemplateError(String),
}

impl From<minijinja::Error> for WorkflowError {
    fn from(e: minijinja::Error) -> Self {
        WorkflowError::TemplateError(e.to_string())
    }
}
