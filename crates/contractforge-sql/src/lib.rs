//! Warehouse DDL generation
//!
//! This crate handles:
//! - Mapping catalog column types to warehouse types
//! - Synthesizing typed column projections over semi-structured rows
//! - Generating external table, view and stage statements
//! - Writing one SQL file per statement

pub mod types;
pub mod projection;
pub mod ddl;

pub use types::{warehouse_type, WarehouseType};
pub use projection::{column_projection, partition_projection, technical_projections, PARTITION_COLUMN};
pub use ddl::{DdlError, DdlGenerator, ObjectName, TableDdl};
