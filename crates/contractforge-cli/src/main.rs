use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contractforge_core::{ContractConfig, ContractIndex, Report, Severity};
use contractforge_engine::{RunContext, Stage};

mod init;

use init::{init_contracts, InitOptions};

/// contractforge - Data contract compiler
#[derive(Parser)]
#[command(name = "contractforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Compile a single contract config instead of every indexed contract
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Contract index
    #[arg(short, long, global = true, default_value = "config/contracts.toml")]
    index: PathBuf,

    /// Output path for the JSON run report
    #[arg(short, long, global = true, default_value = "report.json")]
    report: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate contract configs for the workbooks of datacontract/
    Init {
        /// Region / joint-venture code
        #[arg(short, long)]
        jv: String,

        /// Source system code (default: first segment of the workbook name)
        #[arg(short, long)]
        source: Option<String>,

        /// Files arrive in several fixed-width layouts
        #[arg(long)]
        multi_layout: bool,

        /// Project root holding datacontract/
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },

    /// Extract canonical records from the contract workbooks
    Extract,

    /// Emit catalog definitions and the catalog manifest
    Catalog,

    /// Generate warehouse DDL for the OUT definitions
    Ddl,

    /// Generate the dbt sources document and refresh macro
    Tests,

    /// Write the ingestion job descriptors
    Jobs,

    /// Render the workflow DAGs
    Dags,

    /// Run every stage in order
    Run,
}

impl Commands {
    /// Stages run by a compile command, `None` for `init`
    fn stages(&self) -> Option<Vec<Stage>> {
        let stage = match self {
            Self::Init { .. } => return None,
            Self::Run => return Some(Stage::ALL.to_vec()),
            Self::Extract => Stage::Extract,
            Self::Catalog => Stage::Catalog,
            Self::Ddl => Stage::Ddl,
            Self::Tests => Stage::Tests,
            Self::Jobs => Stage::Jobs,
            Self::Dags => Stage::Dags,
        };
        Some(vec![stage])
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    if let Commands::Init { jv, source, multi_layout, root } = &cli.command {
        let options = InitOptions {
            source: source.clone(),
            jv: jv.clone(),
            multi_layout: *multi_layout,
        };
        return init_command(root, &options);
    }

    let stages = cli.command.stages().unwrap_or_default();
    compile_command(&cli, &stages)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Init command - write one config per workbook plus the index
fn init_command(root: &Path, options: &InitOptions) -> Result<()> {
    let written = init_contracts(root, options)?;

    if written.is_empty() {
        eprintln!("{}", "No contract workbook found".yellow());
    }
    for path in &written {
        eprintln!("{} {}", "Generated".green(), path.display());
    }

    Ok(())
}

/// Compile command - run `stages` for every selected contract
fn compile_command(cli: &Cli, stages: &[Stage]) -> Result<()> {
    let configs = load_configs(cli)?;
    let mut report = Report::new();
    let mut outcome: Result<()> = Ok(());

    for config in &configs {
        if cli.verbose {
            eprintln!("{} {}", "Compiling".cyan(), config.excel_file_path.display());
        }

        match RunContext::new(config, &mut report).run(stages) {
            Ok(written) => {
                if cli.verbose {
                    eprintln!("    {} artifacts written", written.len().to_string().green());
                }
            }
            Err(e) => {
                outcome = Err(anyhow::anyhow!("{}: {}", config.excel_file_path.display(), e));
                break;
            }
        }
    }

    report
        .save_to_file(&cli.report)
        .with_context(|| format!("Failed to write report {}", cli.report.display()))?;

    if cli.verbose {
        eprintln!("{} {}", "Report saved to:".green(), cli.report.display());
    }

    print_report_summary(&report);

    outcome?;

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// The `--config` contract, or every contract of the index
fn load_configs(cli: &Cli) -> Result<Vec<ContractConfig>> {
    if let Some(path) = &cli.config {
        let config = ContractConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))?;
        return Ok(vec![config]);
    }

    if !cli.index.exists() {
        return Err(anyhow::anyhow!(
            "Contract index not found at {}. Run 'contractforge init' first.",
            cli.index.display()
        ));
    }

    let index = ContractIndex::from_file(&cli.index)
        .map_err(|e| anyhow::anyhow!("Failed to load index: {}", e))?;

    Ok(index.load_contracts(&cli.index)?)
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Data Contract Compile Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    for contract in &report.contracts {
        println!("Contract: {} ({})", contract.workbook, &contract.sha256[..12.min(contract.sha256.len())]);
    }
    println!();

    println!("{}", "Summary:".bold());
    println!("  Sheets scanned:    {}", report.summary.sheets_scanned);
    println!("  Tables compiled:   {}", report.summary.tables_compiled);
    println!("  Artifacts written: {}", report.summary.artifacts_written);
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", report.summary.errors.to_string().red().bold());
    } else {
        println!("  Errors:   {}", report.summary.errors.to_string().green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", report.summary.warnings.to_string().yellow());
    } else {
        println!("  Warnings: {}", report.summary.warnings.to_string().green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(loc) = &diag.location {
                match loc.row {
                    Some(row) => println!("    at {}!{}", loc.sheet, row),
                    None => println!("    at {}", loc.sheet),
                }
            }
            if let Some(value) = &diag.substituted {
                println!("    using {}", value.dimmed());
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
