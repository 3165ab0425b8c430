//! Compiler stages
//!
//! Stages run strictly in order and each reads its input back from the
//! artifacts of the previous one. A stage either completes or aborts the
//! run; recoverable events are reported as diagnostics instead.

use std::fmt;
use std::path::Path;

use contractforge_catalog::{CatalogEmitter, CatalogManifest, CatalogTableDefinition, ManifestEntry};
use contractforge_core::{
    CanonicalTable, ContractFingerprint, Diagnostic, DiagnosticCode, Direction, FormatRules, Severity,
};
use contractforge_dbt::{RefreshMacro, SourceDocument, TestSpecGenerator, SOURCE_FILE};
use contractforge_sheet::{extract_contract, layout_entries, Workbook};
use contractforge_sql::DdlGenerator;
use contractforge_workflow::{DagRenderer, JobDescriptor, JobManifest, JOB_MANIFEST_FILE};

use crate::artifacts::{
    canonical_path, clear_canonical, clear_definitions, create_dir, load_canonical_tables, read_yaml, write_yaml,
};
use crate::context::RunContext;
use crate::error::EngineError;

/// One step of the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Extract,
    Catalog,
    Ddl,
    Tests,
    Jobs,
    Dags,
}

impl Stage {
    /// Every stage, in execution order
    pub const ALL: [Stage; 6] = [Self::Extract, Self::Catalog, Self::Ddl, Self::Tests, Self::Jobs, Self::Dags];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Catalog => "catalog",
            Self::Ddl => "ddl",
            Self::Tests => "tests",
            Self::Jobs => "jobs",
            Self::Dags => "dags",
        }
    }

    pub(crate) fn run(&self, ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
        match self {
            Self::Extract => extract(ctx),
            Self::Catalog => catalog(ctx),
            Self::Ddl => ddl(ctx),
            Self::Tests => test_specs(ctx),
            Self::Jobs => jobs(ctx),
            Self::Dags => dags(ctx),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Open the configured workbook and extract it
pub fn extract(ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
    let config = ctx.config;
    let path = config.workbook_path();

    let bytes = std::fs::read(&path).map_err(|e| EngineError::IoError(format!("{}: {}", path.display(), e)))?;
    let workbook = Workbook::open(&path)?;
    let fingerprint = ContractFingerprint::from_bytes(config.excel_file_path.display().to_string(), &bytes);

    extract_workbook(ctx, &workbook, fingerprint)
}

/// Extract a loaded workbook into canonical records and side tables
///
/// Canonical records of a previous extraction are removed first.
pub fn extract_workbook(
    ctx: &mut RunContext<'_>,
    workbook: &Workbook,
    fingerprint: ContractFingerprint,
) -> Result<(), EngineError> {
    let config = ctx.config;

    let mut diagnostics = Vec::new();
    let contract = extract_contract(workbook, &config.jv, &config.periodicity_mapping, &mut diagnostics)?;
    ctx.diagnostics(diagnostics);
    ctx.add_contract(fingerprint, contract.sheets_scanned, contract.tables.len());

    let dir = ctx.path(&config.paths.canonical);
    create_dir(&dir)?;
    let removed = clear_canonical(&dir)?;
    if removed > 0 {
        tracing::debug!(removed, "Removed previous canonical records");
        ctx.diagnostics(vec![removed_info(removed, "canonical records", &dir)]);
    }

    for table in &contract.tables {
        let path = canonical_path(&dir, table.table_name());
        write_yaml(&path, table)?;
        ctx.record_artifact(path);
    }

    let rules_path = config.format_rules_path();
    write_yaml(&rules_path, &contract.format_rules)?;
    ctx.record_artifact(rules_path);

    let mapping_path = config.mapping_path();
    write_yaml(&mapping_path, &contract.mapping)?;
    ctx.record_artifact(mapping_path);

    if config.multi_layout {
        let layout_path = config.layout_path();
        write_yaml(&layout_path, &layout_entries(&contract.tables, &config.project, &config.jv))?;
        ctx.record_artifact(layout_path);
    }

    tracing::info!(tables = contract.tables.len(), "Wrote canonical records");
    Ok(())
}

/// Emit catalog definitions for every canonical record
pub fn catalog(ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
    let config = ctx.config;
    let tables = load_canonical_tables(&ctx.path(&config.paths.canonical))?;

    let dir = ctx.path(&config.paths.catalog);
    create_dir(&dir)?;

    let removed = clear_definitions(&dir)?;
    if removed > 0 {
        tracing::debug!(removed, "Removed previous catalog definitions");
        ctx.diagnostics(vec![removed_info(removed, "catalog definitions", &dir)]);
    }

    if tables.is_empty() {
        tracing::warn!(dir = %config.paths.canonical.display(), "No canonical records to catalog");
        ctx.diagnostics(vec![Diagnostic::new(
            DiagnosticCode::Warning,
            Severity::Warn,
            format!("No canonical records found in {}", config.paths.canonical.display()),
        )]);
    }

    let emitter = CatalogEmitter::new(config.naming());
    let mut manifest = CatalogManifest::new();

    for table in &tables {
        for emitted in emitter.emit(table) {
            let path = dir.join(emitted.entry.file_name());
            emitted.definition.save_to_file(&path)?;
            ctx.record_artifact(path);
            manifest.push(emitted.entry);
        }
    }

    tracing::info!(definitions = manifest.len(), "Emitted catalog definitions");
    ctx.set_manifest(manifest);
    Ok(())
}

/// Generate warehouse DDL for every OUT definition of the manifest
pub fn ddl(ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
    let config = ctx.config;
    let rules: FormatRules = read_yaml(&config.format_rules_path())?;
    let catalog_dir = ctx.path(&config.paths.catalog);
    let ddl_dir = ctx.path(&config.paths.ddl);

    let generator = DdlGenerator::new(config.naming());

    for entry in out_entries(ctx)? {
        let definition = load_definition(&catalog_dir, &entry)?;
        let statements = generator.generate(&entry, &definition, &rules)?;

        for path in statements.write_to(&ddl_dir)? {
            ctx.record_artifact(path);
        }
    }

    Ok(())
}

/// Write the dbt sources document and refresh macro
pub fn test_specs(ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
    let config = ctx.config;
    let naming = config.naming();
    let catalog_dir = ctx.path(&config.paths.catalog);
    let canonical = load_canonical_tables(&ctx.path(&config.paths.canonical))?;

    let mut tables = Vec::new();
    let mut refreshed = Vec::new();

    for entry in out_entries(ctx)? {
        let definition = load_definition(&catalog_dir, &entry)?;
        let table = find_canonical(&canonical, &entry)?;

        let name = naming.compiled_table_name(&definition.name);
        refreshed.push(format!("{}.{}", naming.schema(), name));
        tables.push(TestSpecGenerator::generate(&name, &table.schema));
    }

    let dbt_dir = ctx.path(&config.paths.dbt);

    let source_path = dbt_dir.join("models").join(&config.project_path).join(SOURCE_FILE);
    SourceDocument::new(&naming, &config.project_path, tables).save_to_file(&source_path)?;
    ctx.record_artifact(source_path);

    let macro_path = RefreshMacro::new(&config.project_path, refreshed).write_to(&dbt_dir.join("macros"))?;
    ctx.record_artifact(macro_path);

    Ok(())
}

/// Write the ingestion job descriptors and their manifest
pub fn jobs(ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
    let config = ctx.config;
    let dir = ctx.path(&config.paths.jobs);
    create_dir(&dir)?;

    let descriptors = JobDescriptor::for_contract(config);
    for descriptor in &descriptors {
        let path = descriptor.write_to(&dir)?;
        ctx.record_artifact(path);
    }

    let manifest_path = dir.join(JOB_MANIFEST_FILE);
    JobManifest::from_descriptors(&descriptors).save_to_file(&manifest_path)?;
    ctx.record_artifact(manifest_path);

    Ok(())
}

/// Render one workflow per periodicity of the catalog manifest
pub fn dags(ctx: &mut RunContext<'_>) -> Result<(), EngineError> {
    let config = ctx.config;
    let periods = ctx.manifest()?.periodicities();
    let dir = ctx.path(&config.paths.dags);

    for dag in DagRenderer::new()?.render_all(config, &periods)? {
        let path = dag.write_to(&dir)?;
        ctx.record_artifact(path);
    }

    Ok(())
}

fn removed_info(removed: usize, kind: &str, dir: &Path) -> Diagnostic {
    Diagnostic::new(
        DiagnosticCode::Info,
        Severity::Info,
        format!("Removed {} previous {} from {}", removed, kind, dir.display()),
    )
}

fn out_entries(ctx: &mut RunContext<'_>) -> Result<Vec<ManifestEntry>, EngineError> {
    Ok(ctx.manifest()?.by_direction(Direction::Out).cloned().collect())
}

fn load_definition(dir: &Path, entry: &ManifestEntry) -> Result<CatalogTableDefinition, EngineError> {
    let path = dir.join(entry.file_name());
    if !path.exists() {
        return Err(EngineError::MissingDefinition(entry.artifact.clone()));
    }

    Ok(CatalogTableDefinition::from_file(&path)?)
}

fn find_canonical<'t>(tables: &'t [CanonicalTable], entry: &ManifestEntry) -> Result<&'t CanonicalTable, EngineError> {
    tables
        .iter()
        .find(|t| t.direction() == entry.direction && t.base_table_name() == entry.table)
        .ok_or_else(|| EngineError::MissingCanonical {
            table: entry.table.clone(),
            artifact: entry.artifact.clone(),
        })
}
