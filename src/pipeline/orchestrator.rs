//! Pipeline Orchestrator.
//!
//! Sequences extraction, build, load and invocation over one schema at a
//! time, owns the loaded module handle, and maps every failure to a
//! stage-tagged diagnostic. Single-threaded and synchronous: each stage
//! blocks until completion, and there is no cancellation mid-stage.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::builder::{CcModuleBuilder, ModuleBuilder};
use crate::compiler::{ProtocCompiler, SchemaCompiler};
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::extract::{extract_fields, ExtractionStrategy};
use crate::module::{serialize_message, LoadedModule};
use crate::schema::{message_full_name, FieldValueMap, SchemaFieldSet};

use super::config::PipelineConfig;

/// State machine over one pipeline run. Strictly forward; `Failed` is
/// reachable from every non-terminal state, and `Ready → Serialized` is
/// re-enterable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineStage {
    Idle,
    SchemaAcquired,
    FieldsExtracted,
    ModuleBuilt,
    ModuleLoaded,
    Ready,
    Serialized,
    Failed { stage: Stage, reason: String },
}

enum WorkDir {
    Fixed(std::path::PathBuf),
    Temp(TempDir),
}

impl WorkDir {
    fn path(&self) -> &Path {
        match self {
            WorkDir::Fixed(path) => path,
            WorkDir::Temp(dir) => dir.path(),
        }
    }
}

/// Drives one schema at a time through compile → extract → build → load,
/// then serves repeated serialization requests against the loaded module.
///
/// Owns the only [`LoadedModule`] slot: supplying a new schema always
/// unloads the previous module first (replace, never stack).
pub struct Pipeline {
    compiler: Box<dyn SchemaCompiler>,
    builder: Box<dyn ModuleBuilder>,
    strategy: ExtractionStrategy,
    workdir: WorkDir,
    fields: SchemaFieldSet,
    module: Option<LoadedModule>,
    stage: PipelineStage,
}

impl Pipeline {
    /// Create a pipeline with the default collaborators (`protoc`, the
    /// configured C++ toolchain).
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        let compiler = Box::new(ProtocCompiler::new(config.protoc.clone()));
        let builder = Box::new(CcModuleBuilder::new(config.toolchain.clone()));
        Self::with_components(compiler, builder, config)
    }

    /// Create a pipeline with injected collaborators.
    pub fn with_components(
        compiler: Box<dyn SchemaCompiler>,
        builder: Box<dyn ModuleBuilder>,
        config: PipelineConfig,
    ) -> PipelineResult<Self> {
        let workdir = match &config.work_dir {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(|e| {
                    PipelineError::AcquisitionFailed(format!(
                        "cannot create working directory {}: {e}",
                        dir.display()
                    ))
                })?;
                WorkDir::Fixed(dir.clone())
            }
            None => WorkDir::Temp(TempDir::new().map_err(|e| {
                PipelineError::AcquisitionFailed(format!(
                    "cannot create temporary working directory: {e}"
                ))
            })?),
        };
        Ok(Self {
            compiler,
            builder,
            strategy: config.strategy,
            workdir,
            fields: SchemaFieldSet::new(),
            module: None,
            stage: PipelineStage::Idle,
        })
    }

    /// Run the full front half of the pipeline on a new schema: tear down
    /// any loaded module, invoke the schema compiler, recover the field
    /// set, build the native module, load it and resolve its entry
    /// points. On success the pipeline is `Ready` and the recovered
    /// fields are returned for input rendering.
    pub fn compile_schema(&mut self, schema_text: &str) -> PipelineResult<&SchemaFieldSet> {
        // Replace, never stack: the previous module and its field set go
        // away before the new schema is acquired.
        if let Some(previous) = self.module.take() {
            tracing::info!("replacing module {}", previous.path().display());
            drop(previous);
        }
        self.fields = SchemaFieldSet::new();
        self.stage = PipelineStage::Idle;

        if schema_text.trim().is_empty() {
            return Err(self.fail(PipelineError::AcquisitionFailed(
                "schema text is empty".into(),
            )));
        }
        let message_name = match message_full_name(schema_text) {
            Some(name) => name,
            None => {
                return Err(self.fail(PipelineError::AcquisitionFailed(
                    "no message declaration found in schema".into(),
                )))
            }
        };
        self.stage = PipelineStage::SchemaAcquired;
        tracing::info!("schema acquired, message type '{message_name}'");

        let artifact = self
            .compiler
            .compile(schema_text, self.workdir.path())
            .map_err(|e| self.fail(e))?;

        let report = extract_fields(&artifact.text, self.strategy);
        if report.fields.is_empty() {
            // Not fatal: the pipeline halts here and awaits a
            // differently-shaped artifact.
            return Err(self.fail(PipelineError::ExtractionEmpty));
        }
        self.fields = report.fields;
        self.stage = PipelineStage::FieldsExtracted;
        tracing::info!("{} fields recovered from generated artifact", self.fields.len());

        let module_path = self
            .builder
            .build(self.workdir.path(), &artifact, &message_name)
            .map_err(|e| self.fail(e))?;
        self.stage = PipelineStage::ModuleBuilt;

        let module = LoadedModule::load(&module_path).map_err(|e| self.fail(e))?;
        self.stage = PipelineStage::ModuleLoaded;
        self.module = Some(module);

        self.stage = PipelineStage::Ready;
        Ok(&self.fields)
    }

    /// Serialize one message with the supplied field values. Re-enterable:
    /// repeated calls with different values are allowed without
    /// rebuilding, including after a failed attempt (the module stays
    /// loaded; only a new schema unloads it).
    pub fn serialize(&mut self, values: &FieldValueMap) -> PipelineResult<Vec<u8>> {
        let Some(module) = self.module.as_ref() else {
            return Err(PipelineError::NotReady(
                "no compiled module is loaded".into(),
            ));
        };
        for key in values.keys() {
            if !self.fields.contains(key) {
                tracing::debug!("ignoring value for unknown field '{key}'");
            }
        }

        match serialize_message(module, &self.fields, values) {
            Ok(bytes) => {
                if bytes.is_empty() {
                    tracing::info!("serialized message is empty");
                } else {
                    tracing::info!("serialized {} bytes", bytes.len());
                }
                self.stage = PipelineStage::Serialized;
                Ok(bytes)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Field set recovered from the current schema. Empty before the
    /// first successful extraction.
    pub fn fields(&self) -> &SchemaFieldSet {
        &self.fields
    }

    pub fn stage(&self) -> &PipelineStage {
        &self.stage
    }

    pub fn module_loaded(&self) -> bool {
        self.module.is_some()
    }

    /// Directory holding the schema, generated artifact and built module.
    pub fn work_dir(&self) -> &Path {
        self.workdir.path()
    }

    fn fail(&mut self, err: PipelineError) -> PipelineError {
        tracing::warn!("pipeline failed at {:?}: {err}", err.stage());
        self.stage = PipelineStage::Failed {
            stage: err.stage(),
            reason: err.to_string(),
        };
        err
    }
}
