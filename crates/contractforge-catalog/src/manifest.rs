//! Manifest of the catalog definitions produced by a run

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use contractforge_core::{Direction, Periodicity};

use crate::definition::CatalogError;

/// Manifest file name inside the catalog directory
pub const MANIFEST_FILE: &str = "catalog_manifest.json";

/// File name prefix of every catalog definition
pub const DEFINITION_PREFIX: &str = "gdc_";

/// One generated catalog definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Artifact identifier, e.g. `STG_CUST_DAILY_OUT`
    pub artifact: String,

    /// Staging table name without direction, e.g. `STG_CUST`
    pub table: String,

    pub direction: Direction,
    pub periodicity: Periodicity,
    pub file_id: String,
}

impl ManifestEntry {
    /// Definition file name: `gdc_<artifact>.json`
    pub fn file_name(&self) -> String {
        format!("{}{}.json", DEFINITION_PREFIX, self.artifact)
    }
}

/// Every definition generated in one run, in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogManifest {
    pub entries: Vec<ManifestEntry>,
}

impl CatalogManifest {
    /// Create an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a generated definition
    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    /// Entries of one direction
    pub fn by_direction(&self, direction: Direction) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.iter().filter(move |e| e.direction == direction)
    }

    /// Distinct periodicities, in canonical order
    pub fn periodicities(&self) -> BTreeSet<Periodicity> {
        self.entries.iter().map(|e| e.periodicity).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::IoError(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Save to a JSON file, replacing any previous manifest
    pub fn save_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::SerializeError(e.to_string()))?;

        std::fs::write(path, json)
            .map_err(|e| CatalogError::IoError(format!("{}: {}", path.display(), e)))
    }
}
