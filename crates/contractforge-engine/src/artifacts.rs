//! Reading and writing intermediate artifacts

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use contractforge_catalog::DEFINITION_PREFIX;
use contractforge_core::{CanonicalTable, Direction, STAGING_PREFIX};

use crate::error::EngineError;

const YAML_EXTENSION: &str = "yaml";
const JSON_EXTENSION: &str = "json";

/// Canonical record file of a table, e.g. `STG_CUST_OUT.yaml`
pub fn canonical_path(dir: &Path, table_name: &str) -> PathBuf {
    dir.join(format!("{}.{}", table_name, YAML_EXTENSION))
}

/// Canonical record file of a base table in one direction
pub fn canonical_path_for(dir: &Path, base_table: &str, direction: Direction) -> PathBuf {
    canonical_path(dir, &format!("{}{}", base_table, direction.suffix()))
}

pub fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<(), EngineError> {
    let yaml = serde_yaml::to_string(value).map_err(|e| EngineError::SerializeError(e.to_string()))?;
    write_text(path, &yaml)
}

pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| EngineError::IoError(format!("{}: {}", path.display(), e)))?;

    serde_yaml::from_str(&contents).map_err(|e| EngineError::ParseError(format!("{}: {}", path.display(), e)))
}

/// Write a text file, creating parent directories as needed
pub fn write_text(path: &Path, contents: &str) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }

    std::fs::write(path, contents).map_err(|e| EngineError::IoError(format!("{}: {}", path.display(), e)))
}

pub fn create_dir(dir: &Path) -> Result<(), EngineError> {
    std::fs::create_dir_all(dir).map_err(|e| EngineError::IoError(format!("{}: {}", dir.display(), e)))
}

/// Files of a directory with the given prefix and extension, sorted by name
fn artifact_files(dir: &Path, prefix: &str, extension: &str) -> Result<Vec<PathBuf>, EngineError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| EngineError::IoError(format!("{}: {}", dir.display(), e)))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == extension)
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(prefix))
        })
        .collect();
    files.sort();

    Ok(files)
}

fn canonical_files(dir: &Path) -> Result<Vec<PathBuf>, EngineError> {
    artifact_files(dir, STAGING_PREFIX, YAML_EXTENSION)
}

fn remove_files(files: &[PathBuf]) -> Result<usize, EngineError> {
    for file in files {
        std::fs::remove_file(file).map_err(|e| EngineError::IoError(format!("{}: {}", file.display(), e)))?;
    }
    Ok(files.len())
}

/// Remove the canonical records of a previous extraction
pub fn clear_canonical(dir: &Path) -> Result<usize, EngineError> {
    remove_files(&canonical_files(dir)?)
}

/// Remove the catalog definitions of a previous run; the manifest is kept
pub fn clear_definitions(dir: &Path) -> Result<usize, EngineError> {
    remove_files(&artifact_files(dir, DEFINITION_PREFIX, JSON_EXTENSION)?)
}

/// Load every canonical record of a directory
pub fn load_canonical_tables(dir: &Path) -> Result<Vec<CanonicalTable>, EngineError> {
    canonical_files(dir)?.iter().map(|path| read_yaml(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contractforge_core::{Column, FileRecord, Periodicity, TableSchema};
    use std::collections::BTreeSet;

    fn table(name: &str) -> CanonicalTable {
        let schema = TableSchema::new(name, name, vec![Column::new(0, "ID", "decimal(4)")]);
        let file = FileRecord {
            file_id: "F1".into(),
            file_code: "X".into(),
            table_name: format!("{}_OUT", name),
            direction: Direction::Out,
            periodicity: BTreeSet::from([Periodicity::Daily]),
            data_type: None,
            container_format: "PARQUET".into(),
            separator: None,
            header: None,
            footer: None,
            quote: None,
        };
        CanonicalTable::new(schema, file)
    }

    #[test]
    fn canonical_records_roundtrip_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["STG_B", "STG_A"] {
            let table = table(name);
            write_yaml(&canonical_path(dir.path(), table.table_name()), &table).unwrap();
        }
        write_text(&dir.path().join("cfg_other.yaml"), "{}").unwrap();

        let loaded = load_canonical_tables(dir.path()).unwrap();
        let names: Vec<_> = loaded.iter().map(|t| t.table_name()).collect();
        assert_eq!(names, vec!["STG_A_OUT", "STG_B_OUT"]);
        assert_eq!(loaded[0], table("STG_A"));

        assert_eq!(clear_canonical(dir.path()).unwrap(), 2);
        assert!(load_canonical_tables(dir.path()).unwrap().is_empty());
        assert!(dir.path().join("cfg_other.yaml").exists());
    }

    #[test]
    fn clearing_definitions_keeps_manifest() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["gdc_STG_A_DAILY_OUT.json", "gdc_STG_A_DAILY_IN.json", "catalog_manifest.json"] {
            write_text(&dir.path().join(name), "{}").unwrap();
        }

        assert_eq!(clear_definitions(dir.path()).unwrap(), 2);
        assert!(!dir.path().join("gdc_STG_A_DAILY_OUT.json").exists());
        assert!(dir.path().join("catalog_manifest.json").exists());
        assert_eq!(clear_definitions(&dir.path().join("missing")).unwrap(), 0);
    }

    #[test]
    fn canonical_file_names() {
        let dir = Path::new("out");
        assert_eq!(
            canonical_path_for(dir, "STG_CUST", Direction::In),
            PathBuf::from("out/STG_CUST_IN.yaml")
        );
    }
}
