//! Run context of one contract

use std::path::{Path, PathBuf};

use contractforge_catalog::{CatalogManifest, MANIFEST_FILE};
use contractforge_core::{ContractConfig, ContractFingerprint, Diagnostic, Report};

use crate::error::EngineError;
use crate::stage::Stage;

/// State carried across the stages of one contract
///
/// Diagnostics go straight into the shared run report. The catalog
/// manifest is collected in memory and written once, by [`RunContext::finish`].
pub struct RunContext<'a> {
    pub config: &'a ContractConfig,
    report: &'a mut Report,
    manifest: Option<CatalogManifest>,
    manifest_changed: bool,
    written: Vec<PathBuf>,
}

impl<'a> RunContext<'a> {
    pub fn new(config: &'a ContractConfig, report: &'a mut Report) -> Self {
        Self {
            config,
            report,
            manifest: None,
            manifest_changed: false,
            written: Vec::new(),
        }
    }

    /// Run stages in order, then write the collected manifest
    pub fn run(mut self, stages: &[Stage]) -> Result<Vec<PathBuf>, EngineError> {
        for stage in stages {
            tracing::info!(stage = %stage, project = %self.config.project, "Running stage");
            stage.run(&mut self)?;
        }
        self.finish()
    }

    /// Record stage diagnostics
    pub fn diagnostics(&mut self, diagnostics: Vec<Diagnostic>) {
        self.report.extend(diagnostics);
    }

    pub fn add_contract(&mut self, fingerprint: ContractFingerprint, sheets_scanned: usize, tables: usize) {
        self.report.add_contract(fingerprint);
        self.report.summary.sheets_scanned += sheets_scanned;
        self.report.summary.tables_compiled += tables;
    }

    /// Record a written artifact
    pub fn record_artifact(&mut self, path: PathBuf) {
        tracing::debug!(path = %path.display(), "Wrote artifact");
        self.report.summary.artifacts_written += 1;
        self.written.push(path);
    }

    /// Replace the catalog manifest of this run
    pub fn set_manifest(&mut self, manifest: CatalogManifest) {
        self.manifest = Some(manifest);
        self.manifest_changed = true;
    }

    /// Catalog manifest of this run, or the one on disk from a previous run
    pub fn manifest(&mut self) -> Result<&CatalogManifest, EngineError> {
        let manifest = match self.manifest.take() {
            Some(manifest) => manifest,
            None => CatalogManifest::from_file(&self.manifest_path())?,
        };
        Ok(self.manifest.insert(manifest))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path(&self.config.paths.catalog).join(MANIFEST_FILE)
    }

    /// Resolve a configured path against the project root
    pub fn path(&self, relative: &Path) -> PathBuf {
        self.config.resolve(relative)
    }

    /// Write the manifest collected by the catalog stage, if it ran
    pub fn finish(mut self) -> Result<Vec<PathBuf>, EngineError> {
        if self.manifest_changed {
            if let Some(manifest) = self.manifest.take() {
                let path = self.manifest_path();
                manifest.save_to_file(&path)?;
                tracing::info!(entries = manifest.len(), path = %path.display(), "Wrote catalog manifest");
                self.record_artifact(path);
            }
        }

        Ok(self.written)
    }
}
