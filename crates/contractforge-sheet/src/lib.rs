//! Data-contract workbook parsing
//!
//! This crate handles:
//! - Loading contract workbooks into position-addressed sheets
//! - Extracting table schemas from per-table sheets
//! - Building file records from the files list
//! - Resolving per-file format rules
//! - Merging schemas and file records into canonical tables
//! - Building the file mapping and layout side tables

pub mod workbook;
pub mod layout;
pub mod lov;
pub mod extractor;
pub mod files_list;
pub mod rules;
pub mod merge;
pub mod side_tables;
pub mod contract;

pub use workbook::{Cell, Row, Sheet, Workbook, WorkbookError};
pub use lov::ListOfValues;
pub use extractor::{SchemaExtractor, normalize_column_name, map_source_type};
pub use files_list::{FileCatalogBuilder, OUT_CONTAINER_FORMAT};
pub use rules::FormatRulesResolver;
pub use merge::merge_tables;
pub use contract::{ExtractedContract, extract_contract};
pub use side_tables::{FileMapping, LayoutEntry, layout_entries, layout_table_key};
