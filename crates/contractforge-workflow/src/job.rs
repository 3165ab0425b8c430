//! Ingestion job descriptors
//!
//! Descriptors are JSON resource documents picked up by the deployment
//! tooling; one file per job plus a manifest listing them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use contractforge_core::ContractConfig;

use crate::WorkflowError;

/// Manifest file name inside the jobs directory
pub const JOB_MANIFEST_FILE: &str = "job_manifest.json";

const SCRIPT_BUCKET: &str = "s3://s3b-dlz-environment-src-core-el/scripts";
const RESOURCE_KEY: &str = "my_glue_job";

/// The two ingestion steps of a contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Validates delivered files against the declared structure
    StructureCheck { multi_layout: bool },

    /// Converts delimited files to Parquet
    CsvToParquet,
}

impl JobKind {
    /// Both steps in execution order
    pub fn for_contract(multi_layout: bool) -> [JobKind; 2] {
        [Self::StructureCheck { multi_layout }, Self::CsvToParquet]
    }

    /// Script run by the job
    pub fn script(&self) -> &'static str {
        match self {
            Self::StructureCheck { multi_layout: false } => "int-s3-structure-check",
            Self::StructureCheck { multi_layout: true } => "int-s3-structure-check-layout",
            Self::CsvToParquet => "int-s3-csv-to-parquet",
        }
    }

    /// Job name suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::StructureCheck { multi_layout: false } => "s3sc",
            Self::StructureCheck { multi_layout: true } => "s3scl",
            Self::CsvToParquet => "ctop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlueCommand {
    pub name: String,
    pub script_location: String,
    pub python_version: String,
}

/// Job resource settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlueJob {
    pub name: String,
    pub role_arn: String,
    pub command: GlueCommand,
    pub default_arguments: BTreeMap<String, String>,
    pub max_retries: u32,
    pub timeout: u32,
    pub number_of_workers: u32,
    pub worker_type: String,
    pub glue_version: String,
    pub max_concurrent_runs: u32,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResources {
    pub aws_glue_job: BTreeMap<String, GlueJob>,
}

/// A deployable job document: `{"resource": {"aws_glue_job": {..}}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    pub resource: JobResources,
}

impl JobDescriptor {
    /// Descriptor of one ingestion step of a contract
    ///
    /// Jobs are named `<project>-<source>-<jv>-<suffix>`, the source being
    /// the first segment of the project path.
    pub fn new(config: &ContractConfig, kind: JobKind) -> Self {
        let source_split = config.project_path.split('-').next().unwrap_or_default();
        let name = format!(
            "{}-{}-{}-{}",
            config.project.to_lowercase(),
            source_split,
            config.jv.to_lowercase(),
            kind.suffix()
        );

        let job = GlueJob {
            name,
            role_arn: "iam_role_arn".to_string(),
            command: GlueCommand {
                name: "glueetl".to_string(),
                script_location: format!("{}/{}.py", SCRIPT_BUCKET, kind.script()),
                python_version: "3".to_string(),
            },
            default_arguments: BTreeMap::from([
                ("--job-language".to_string(), "python".to_string()),
                ("--notification".to_string(), String::new()),
                ("--additional-python-modules".to_string(), "pandas,faker".to_string()),
            ]),
            max_retries: 0,
            timeout: 2880,
            number_of_workers: 5,
            worker_type: "G.1X".to_string(),
            glue_version: "4.0".to_string(),
            max_concurrent_runs: 1,
            tags: BTreeMap::from([("source".to_string(), config.source.clone())]),
        };

        Self {
            resource: JobResources {
                aws_glue_job: BTreeMap::from([(RESOURCE_KEY.to_string(), job)]),
            },
        }
    }

    /// Both descriptors of a contract
    pub fn for_contract(config: &ContractConfig) -> Vec<Self> {
        JobKind::for_contract(config.multi_layout)
            .into_iter()
            .map(|kind| Self::new(config, kind))
            .collect()
    }

    /// The job carried by this descriptor
    pub fn job(&self) -> Option<&GlueJob> {
        self.resource.aws_glue_job.values().next()
    }

    /// Job name, empty for a descriptor without job
    pub fn name(&self) -> &str {
        self.job().map(|j| j.name.as_str()).unwrap_or_default()
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Write into `dir`; returns the written path
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, WorkflowError> {
        let path = dir.join(self.file_name());
        write_json(&path, self)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobManifestEntry {
    pub name: String,
    pub file: String,
    pub script: String,
}

/// Every job descriptor written for a contract
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobManifest {
    pub jobs: Vec<JobManifestEntry>,
}

impl JobManifest {
    pub fn from_descriptors(descriptors: &[JobDescriptor]) -> Self {
        let jobs = descriptors
            .iter()
            .filter_map(|d| {
                let job = d.job()?;
                Some(JobManifestEntry {
                    name: job.name.clone(),
                    file: d.file_name(),
                    script: job.command.script_location.clone(),
                })
            })
            .collect();

        Self { jobs }
    }

    pub fn from_file(path: &Path) -> Result<Self, WorkflowError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WorkflowError::IoError(format!("{}: {}", path.display(), e)))?;

        serde_json::from_str(&contents).map_err(|e| WorkflowError::SerializeError(e.to_string()))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), WorkflowError> {
        write_json(path, self)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), WorkflowError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| WorkflowError::SerializeError(e.to_string()))?;

    std::fs::write(path, json).map_err(|e| WorkflowError::IoError(format!("{}: {}", path.display(), e)))
}
