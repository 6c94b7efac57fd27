use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::builder::ToolchainConfig;
use crate::extract::ExtractionStrategy;

/// Host-supplied pipeline configuration. Everything here is external
/// input (the presentation layer collects it); nothing is derived.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Schema compiler binary.
    pub protoc: PathBuf,
    /// Native toolchain settings for the module build.
    pub toolchain: ToolchainConfig,
    /// Working directory for all on-disk artifacts. When absent, a
    /// temporary directory is created and lives as long as the pipeline.
    pub work_dir: Option<PathBuf>,
    /// Field extraction strategy applied to the generated artifact.
    pub strategy: ExtractionStrategy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            protoc: PathBuf::from("protoc"),
            toolchain: ToolchainConfig::default(),
            work_dir: None,
            strategy: ExtractionStrategy::default(),
        }
    }
}
