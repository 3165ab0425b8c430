//! Workflow DAG rendering
//!
//! The DAG file is a Python module rendered from an embedded minijinja
//! template. Airflow's own runtime templates inside it are kept verbatim
//! through `raw` blocks.

use minijinja::Environment;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use contractforge_core::{ContractConfig, Periodicity};

use crate::WorkflowError;

const TEMPLATE_NAME: &str = "ingestion_dag.py";
const TEMPLATE: &str = include_str!("../templates/ingestion_dag.py.j2");

/// Values substituted into the template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DagContext {
    pub project: String,

    /// `l` for multi-layout contracts, empty otherwise
    pub layout: String,

    /// Source code, first segment of the project path
    pub source_split: String,

    /// Project path as is, e.g. `ekip-credit-cards`
    pub source_file: String,

    /// Project path in snake case, e.g. `ekip_credit_cards`
    pub source: String,

    pub jv: String,
    pub period: String,
    pub dag_id: String,
}

impl DagContext {
    pub fn new(config: &ContractConfig, period: Periodicity) -> Self {
        let source_file = config.project_path.to_lowercase();
        let source = source_file.replace('-', "_");
        let jv = config.jv.to_lowercase();
        let layout = if config.multi_layout { "l" } else { "" };

        Self {
            project: config.project.to_lowercase(),
            layout: layout.to_string(),
            source_split: source_file.split('-').next().unwrap_or_default().to_string(),
            dag_id: format!("{}_el_{}_{}", jv, source, period.as_str()),
            source_file,
            source,
            jv,
            period: period.as_str().to_string(),
        }
    }

    /// `<jv>_el_<source>_<period>.py`
    pub fn file_name(&self) -> String {
        format!("{}.py", self.dag_id)
    }
}

/// A rendered DAG module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDag {
    pub file_name: String,
    pub contents: String,
}

impl RenderedDag {
    /// Write into `dir`; returns the written path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, WorkflowError> {
        std::fs::create_dir_all(dir).map_err(|e| WorkflowError::IoError(format!("{}: {}", dir.display(), e)))?;

        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)
            .map_err(|e| WorkflowError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(path)
    }
}

/// Renders ingestion DAGs
pub struct DagRenderer {
    env: Environment<'static>,
}

impl DagRenderer {
    pub fn new() -> Result<Self, WorkflowError> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template(TEMPLATE_NAME, TEMPLATE)?;

        Ok(Self { env })
    }

    /// Render the DAG of one periodicity
    pub fn render(&self, context: &DagContext) -> Result<RenderedDag, WorkflowError> {
        let contents = self.env.get_template(TEMPLATE_NAME)?.render(context)?;

        tracing::debug!(dag_id = %context.dag_id, "Rendered DAG");

        Ok(RenderedDag {
            file_name: context.file_name(),
            contents,
        })
    }

    /// One DAG per periodicity, in canonical order
    pub fn render_all(
        &self,
        config: &ContractConfig,
        periods: &BTreeSet<Periodicity>,
    ) -> Result<Vec<RenderedDag>, WorkflowError> {
        periods
            .iter()
            .map(|&period| self.render(&DagContext::new(config, period)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> ContractConfig {
        ContractConfig::for_workbook("EKIP_CREDIT_CARDS.xlsm", "EKIP", "INDIA").unwrap()
    }

    #[test]
    fn context_forms() {
        let context = DagContext::new(&config(), Periodicity::Weekly);

        assert_eq!(context.source_split, "ekip");
        assert_eq!(context.source_file, "ekip-credit-cards");
        assert_eq!(context.source, "ekip_credit_cards");
        assert_eq!(context.layout, "");
        assert_eq!(context.file_name(), "india_el_ekip_credit_cards_weekly.py");
    }

    #[test]
    fn renders_names_and_keeps_runtime_templates() {
        let renderer = DagRenderer::new().unwrap();
        let dag = renderer.render(&DagContext::new(&config(), Periodicity::Daily)).unwrap();

        assert!(dag.contents.contains("dag_id=\"india_el_ekip_credit_cards_daily\""));
        assert!(dag.contents.contains("glue-job-dlz-ENVIRONMENT-credit-cards-ekip-india-s3sc\""));
        assert!(dag.contents.contains("refresh_external_tables_model_ekip_credit_cards"));
        assert!(dag.contents.contains("{{ ti.xcom_pull(task_ids='wait_for_sqs_message', key='messages') }}"));
        assert!(!dag.contents.contains("{% raw %}"));
    }

    #[test]
    fn multi_layout_structure_check_job() {
        let mut config = config();
        config.multi_layout = true;

        let dag = DagRenderer::new()
            .unwrap()
            .render(&DagContext::new(&config, Periodicity::Monthly))
            .unwrap();

        assert!(dag.contents.contains("credit-cards-ekip-india-s3scl\""));
    }
}
