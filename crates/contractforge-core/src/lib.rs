//! contractforge core
//!
//! Canonical data-contract model shared by every compiler stage.
//! Diagnostic codes are part of the public API - never rename them.

pub mod diagnostic;
pub mod schema;
pub mod record;
pub mod format;
pub mod naming;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use schema::{LogicalType, Column, TableSchema};
pub use record::{Direction, Periodicity, FieldValue, FileRecord, CanonicalTable, staging_name, STAGING_PREFIX, DEFAULT_SEPARATOR};
pub use format::{FormatOverride, FormatRules, FormatLookupError};
pub use naming::Naming;
pub use report::{Report, ReportSummary, ReportVersion, ContractFingerprint};
pub use config::{ContractConfig, ArtifactPaths, ContractIndex, ConfigError};
