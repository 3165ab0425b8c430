//! Macro refreshing the external tables of a contract

use std::path::{Path, PathBuf};

use crate::source::DbtError;

/// `refresh_external_tables_model_<project_path>` macro
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshMacro {
    /// Macro name, project path in snake case
    pub name: String,

    /// Tables as `<schema>.<table>`
    pub tables: Vec<String>,
}

impl RefreshMacro {
    pub fn new(project_path: &str, tables: Vec<String>) -> Self {
        Self {
            name: format!("refresh_external_tables_model_{}", project_path.replace('-', "_")),
            tables,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.sql", self.name)
    }

    /// Render the macro body
    pub fn render(&self) -> String {
        let list = self
            .tables
            .iter()
            .map(|t| format!("'{}'", t))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "{{% macro {name}() %}}\n\n\
             {{% set table_list = [{list}] %}}\n\n\
             {{{{ refresh_external_tables(table_list) }}}}\n\n\
             {{% endmacro %}}",
            name = self.name,
            list = list,
        )
    }

    /// Write the macro into `dir`; returns the written path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, DbtError> {
        std::fs::create_dir_all(dir).map_err(|e| DbtError::IoError(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(self.file_name());
        std::fs::write(&path, self.render())
            .map_err(|e| DbtError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(path)
    }
}
