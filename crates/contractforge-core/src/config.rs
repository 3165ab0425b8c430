//! Contract configuration (config/contract_<SOURCE>_<PROJECT>.toml)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::naming::Naming;
use crate::record::Periodicity;

/// Name of the directory holding contract configs
pub const CONFIG_DIR: &str = "config";

/// Name of the index listing every contract config
pub const INDEX_FILE: &str = "contracts.toml";

/// Output directories of every stage, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Canonical table records (one YAML per table and direction)
    pub canonical: PathBuf,

    /// Side tables: format rules, file mapping, layouts
    pub glue_config: PathBuf,

    /// Catalog definitions and their manifest
    pub catalog: PathBuf,

    /// Warehouse DDL (tables/, views/, stages/)
    pub ddl: PathBuf,

    /// Job descriptors and their manifest
    pub jobs: PathBuf,

    /// dbt project (models/, macros/)
    pub dbt: PathBuf,

    /// Rendered workflow DAGs
    pub dags: PathBuf,
}

impl ArtifactPaths {
    /// Conventional layout for a project
    pub fn for_project(project: &str) -> Self {
        let project = project.to_lowercase();
        Self {
            canonical: PathBuf::from(format!("glue/config/{}", project)),
            glue_config: PathBuf::from("glue/config"),
            catalog: PathBuf::from(format!("glue/ddl/{}", project)),
            ddl: PathBuf::from(format!("ddls-snowflake/{}", project)),
            jobs: PathBuf::from(format!("glue/jobs/{}", project)),
            dbt: PathBuf::from("dbt"),
            dags: PathBuf::from("dags"),
        }
    }
}

/// Default mapping of files-list periodicity tokens
pub fn default_periodicity_mapping() -> BTreeMap<String, Periodicity> {
    [
        ("Quotidien", Periodicity::Daily),
        ("Hebdomadaire", Periodicity::Weekly),
        ("Hebdo", Periodicity::Weekly),
        ("Mensuel", Periodicity::Monthly),
        ("Annuel", Periodicity::Yearly),
        ("d", Periodicity::Daily),
        ("w", Periodicity::Weekly),
        ("m", Periodicity::Monthly),
        ("y", Periodicity::Yearly),
    ]
    .into_iter()
    .map(|(token, period)| (token.to_string(), period))
    .collect()
}

/// Configuration of one data-contract workbook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    /// Workbook path, relative to the project root
    pub excel_file_path: PathBuf,

    /// Source system code
    pub source: String,

    /// Region / joint-venture code
    pub jv: String,

    /// Project code, e.g. `credit-cards`
    pub project: String,

    /// Source-qualified project code, e.g. `ekip-credit-cards`
    pub project_path: String,

    /// Files arrive in several fixed-width layouts
    #[serde(default)]
    pub multi_layout: bool,

    /// Output directories
    pub paths: ArtifactPaths,

    /// Files-list periodicity token mapping
    #[serde(default = "default_periodicity_mapping")]
    pub periodicity_mapping: BTreeMap<String, Periodicity>,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl ContractConfig {
    /// Derive a config from a workbook file name such as `EKIP_CREDIT_CARDS.xlsm`
    ///
    /// Returns `None` when the stem has no `_`-separated project part.
    pub fn for_workbook(file_name: &str, source: &str, jv: &str) -> Option<Self> {
        let stem = Path::new(file_name).file_stem()?.to_str()?;
        let (_, project_part) = stem.split_once('_')?;
        if project_part.is_empty() {
            return None;
        }

        let project = project_part.to_lowercase().replace('_', "-");
        let project_path = stem.to_lowercase().replace('_', "-");

        Some(Self {
            excel_file_path: Path::new("datacontract").join(file_name),
            source: source.to_string(),
            jv: jv.to_string(),
            paths: ArtifactPaths::for_project(&project),
            project,
            project_path,
            multi_layout: false,
            periodicity_mapping: default_periodicity_mapping(),
            project_root: PathBuf::new(),
        })
    }

    /// File name this config is stored under
    pub fn file_name(&self) -> String {
        format!("contract_{}_{}.toml", self.source.to_uppercase(), self.project.to_uppercase())
    }

    /// Naming parameters of this contract
    pub fn naming(&self) -> Naming {
        Naming::new(&self.project, &self.jv, &self.source)
    }

    /// Resolve a path relative to the project root
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.project_root.join(relative)
    }

    /// Absolute workbook path
    pub fn workbook_path(&self) -> PathBuf {
        self.resolve(&self.excel_file_path)
    }

    /// Format rules side table
    pub fn format_rules_path(&self) -> PathBuf {
        self.resolve(&self.paths.glue_config)
            .join(format!("cfg_glue_{}.yaml", self.project_path.to_lowercase()))
    }

    /// File id to file code side table
    pub fn mapping_path(&self) -> PathBuf {
        self.resolve(&self.paths.glue_config)
            .join(format!("cfg_glue_{}_mapping.yaml", self.project_path.to_lowercase()))
    }

    /// Multi-layout side table
    pub fn layout_path(&self) -> PathBuf {
        self.resolve(&self.paths.glue_config)
            .join(format!("cfg_glue_{}_layout-template.yaml", self.project_path.to_lowercase()))
    }

    /// Load config from TOML file
    ///
    /// Files under a `config/` directory resolve paths against that
    /// directory's parent; any other file against its own directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::from_toml(&contents)?;
        config.project_root = project_root_of(path);

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }
}

/// Index of contract configs (config/contracts.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractIndex {
    /// Config file names, relative to the index directory
    #[serde(default)]
    pub contracts: Vec<PathBuf>,
}

impl ContractIndex {
    /// Load index from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save index to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))
    }

    /// Load every config listed in the index
    pub fn load_contracts(&self, index_path: &Path) -> Result<Vec<ContractConfig>, ConfigError> {
        let dir = index_path.parent().unwrap_or_else(|| Path::new("."));
        self.contracts
            .iter()
            .map(|file| ContractConfig::from_file(&dir.join(file)))
            .collect()
    }
}

fn project_root_of(config_path: &Path) -> PathBuf {
    let Some(parent) = config_path.parent() else {
        return PathBuf::new();
    };

    if parent.file_name().is_some_and(|name| name == CONFIG_DIR) {
        parent.parent().map(Path::to_path_buf).unwrap_or_default()
    } else {
        parent.to_path_buf()
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_for_workbook_derives_project_names() {
        let config = ContractConfig::for_workbook("EKIP_CREDIT_CARDS.xlsm", "EKIP", "INDIA").unwrap();

        assert_eq!(config.project, "credit-cards");
        assert_eq!(config.project_path, "ekip-credit-cards");
        assert_eq!(config.excel_file_path, PathBuf::from("datacontract/EKIP_CREDIT_CARDS.xlsm"));
        assert_eq!(config.file_name(), "contract_EKIP_CREDIT-CARDS.toml");
        assert_eq!(config.paths.ddl, PathBuf::from("ddls-snowflake/credit-cards"));
    }

    #[test]
    fn workbook_without_project_part_is_ignored() {
        assert!(ContractConfig::for_workbook("CONTRACT.xlsm", "EKIP", "INDIA").is_none());
    }

    #[test]
    fn periodicity_mapping_defaults_when_absent() {
        let toml = r#"
            excel_file_path = "datacontract/EKIP_CARDS.xlsm"
            source = "EKIP"
            jv = "INDIA"
            project = "cards"
            project_path = "ekip-cards"

            [paths]
            canonical = "glue/config/cards"
            glue_config = "glue/config"
            catalog = "glue/ddl/cards"
            ddl = "ddls-snowflake/cards"
            jobs = "glue/jobs/cards"
            dbt = "dbt"
            dags = "dags"
        "#;

        let config = ContractConfig::from_toml(toml).unwrap();
        assert!(!config.multi_layout);
        assert_eq!(config.periodicity_mapping.get("Hebdo"), Some(&Periodicity::Weekly));
    }

    #[test]
    fn config_file_roundtrip_resolves_root() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();

        let config = ContractConfig::for_workbook("EKIP_CARDS.xlsm", "EKIP", "INDIA").unwrap();
        let path = config_dir.join(config.file_name());
        config.save_to_file(&path).unwrap();

        let loaded = ContractConfig::from_file(&path).unwrap();
        assert_eq!(loaded.project, "cards");
        assert_eq!(loaded.project_root, dir.path());
        assert_eq!(
            loaded.format_rules_path(),
            dir.path().join("glue/config/cfg_glue_ekip-cards.yaml")
        );
    }
}
