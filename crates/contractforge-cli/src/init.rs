//! Contract config generation from the workbook folder

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use contractforge_core::config::{CONFIG_DIR, INDEX_FILE};
use contractforge_core::{ContractConfig, ContractIndex};

/// Folder holding the contract workbooks, relative to the project root
pub const CONTRACT_DIR: &str = "datacontract";

const WORKBOOK_EXTENSIONS: [&str; 2] = ["xlsm", "xlsx"];

#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Source code; taken from the workbook name when unset
    pub source: Option<String>,
    pub jv: String,
    pub multi_layout: bool,
}

/// Write one config per workbook of `<root>/datacontract` plus the index
///
/// Returns the written config paths.
pub fn init_contracts(root: &Path, options: &InitOptions) -> Result<Vec<PathBuf>> {
    let contract_dir = root.join(CONTRACT_DIR);
    if !contract_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Data contract folder {} does not exist",
            contract_dir.display()
        ));
    }

    let config_dir = root.join(CONFIG_DIR);
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create {}", config_dir.display()))?;

    let mut index = ContractIndex::default();
    let mut written = Vec::new();

    for file_name in workbook_files(&contract_dir)? {
        let source = match &options.source {
            Some(source) => source.clone(),
            None => source_of(&file_name),
        };

        let Some(mut config) = ContractConfig::for_workbook(&file_name, &source, &options.jv) else {
            tracing::warn!(file = %file_name, "Workbook name has no project part, skipped");
            continue;
        };
        config.multi_layout = options.multi_layout;

        let path = config_dir.join(config.file_name());
        config.save_to_file(&path)?;
        tracing::info!(path = %path.display(), "Wrote contract config");

        index.contracts.push(PathBuf::from(config.file_name()));
        written.push(path);
    }

    index.save_to_file(&config_dir.join(INDEX_FILE))?;

    Ok(written)
}

/// Workbook file names directly under `dir`, sorted
fn workbook_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_workbook = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| WORKBOOK_EXTENSIONS.contains(&e.to_lowercase().as_str()));

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        // Office lock files
        if is_workbook && !name.starts_with("~$") {
            files.push(name.to_string());
        }
    }

    Ok(files)
}

/// `EKIP_CREDIT_CARDS.xlsm` -> `EKIP`
fn source_of(file_name: &str) -> String {
    file_name
        .split(['_', '.'])
        .next()
        .unwrap_or_default()
        .to_uppercase()
}
