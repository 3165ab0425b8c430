//! External-table catalog definitions
//!
//! Every canonical table is fanned out into one catalog definition per
//! periodicity. OUT definitions describe the columnar copy, IN definitions
//! the raw delimited files. Definitions are Glue-shaped JSON documents and
//! are listed in a manifest that later stages use to discover them.

pub mod definition;
pub mod emitter;
pub mod manifest;

pub use definition::{
    CatalogColumn, CatalogError, CatalogTableDefinition, ColumnParameters, SerdeInfo, StorageDescriptor,
};
pub use emitter::{CatalogEmitter, EmittedDefinition};
pub use manifest::{CatalogManifest, ManifestEntry, DEFINITION_PREFIX, MANIFEST_FILE};
