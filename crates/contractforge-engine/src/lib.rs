//! contractforge engine - stage orchestration
//!
//! Runs the compiler stages of one contract in order. Every stage reads the
//! previous stage's output back from disk, so any suffix of the pipeline
//! can be re-run on its own:
//! - extract: workbook to canonical tables and side tables
//! - catalog: canonical tables to catalog definitions and manifest
//! - ddl: OUT catalog definitions to warehouse DDL
//! - tests: dbt sources document and refresh macro
//! - jobs: ingestion job descriptors
//! - dags: one workflow per periodicity

pub mod artifacts;
pub mod context;
pub mod error;
pub mod stage;

pub use context::RunContext;
pub use error::EngineError;
pub use stage::Stage;
