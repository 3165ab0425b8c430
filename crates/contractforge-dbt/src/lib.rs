//! dbt artifacts for compiled contracts
//!
//! Data-quality test declarations, the `sources` document that carries them,
//! and the macro refreshing the external tables they point at.

pub mod quality;
pub mod source;
pub mod macros;

pub use quality::{ColumnTest, SourceColumn, SourceTable, TableTest, TestMeta, TestSpecGenerator, UniqueCombination};
pub use source::{DbtError, Freshness, SourceDocument, SourceGroup, SOURCE_FILE};
pub use macros::RefreshMacro;
