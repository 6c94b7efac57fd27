//! Schema compiler adapter.
//!
//! The external schema compiler is an opaque collaborator: it receives the
//! schema text as a file, runs with a fixed output flag, and reports
//! failure through its exit code and stderr. [`SchemaCompiler`] is the
//! seam; [`ProtocCompiler`] is the default subprocess implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{PipelineError, PipelineResult};

/// File name the schema text is written to inside the working directory.
pub const SCHEMA_FILE: &str = "schema.proto";
/// Generated header file name, derived from [`SCHEMA_FILE`].
pub const GENERATED_HEADER: &str = "schema.pb.h";
/// Generated source file name, derived from [`SCHEMA_FILE`].
pub const GENERATED_SOURCE: &str = "schema.pb.cc";

/// The compiler's output: generated text for extraction plus the path of
/// the generated source the module build compiles.
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    /// Header and source concatenated, in that order.
    pub text: String,
    /// Absolute path of the generated source file.
    pub source_file: PathBuf,
}

/// Turns schema text into a generated artifact inside the working
/// directory.
pub trait SchemaCompiler {
    fn compile(&self, schema: &str, workdir: &Path) -> PipelineResult<GeneratedArtifact>;
}

/// Default implementation: invoke the configured `protoc` binary with
/// `--cpp_out=.`, blocking until it exits.
pub struct ProtocCompiler {
    protoc: PathBuf,
}

impl ProtocCompiler {
    pub fn new(protoc: impl Into<PathBuf>) -> Self {
        Self {
            protoc: protoc.into(),
        }
    }
}

impl SchemaCompiler for ProtocCompiler {
    fn compile(&self, schema: &str, workdir: &Path) -> PipelineResult<GeneratedArtifact> {
        let schema_path = workdir.join(SCHEMA_FILE);
        fs::write(&schema_path, schema).map_err(|e| {
            PipelineError::AcquisitionFailed(format!(
                "cannot write {}: {e}",
                schema_path.display()
            ))
        })?;

        tracing::info!("invoking {} --cpp_out=. {SCHEMA_FILE}", self.protoc.display());
        let output = Command::new(&self.protoc)
            .arg("--cpp_out=.")
            .arg(SCHEMA_FILE)
            .current_dir(workdir)
            .output()
            .map_err(|e| PipelineError::CompilationFailed {
                exit_code: None,
                stderr: format!("failed to launch {}: {e}", self.protoc.display()),
            })?;
        if !output.status.success() {
            return Err(PipelineError::CompilationFailed {
                exit_code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let header_path = workdir.join(GENERATED_HEADER);
        let source_path = workdir.join(GENERATED_SOURCE);
        let header = read_generated(&header_path)?;
        let source = read_generated(&source_path)?;
        tracing::debug!(
            "read {} + {} ({} bytes)",
            header_path.display(),
            source_path.display(),
            header.len() + source.len()
        );

        Ok(GeneratedArtifact {
            text: format!("{header}\n\n{source}"),
            source_file: source_path,
        })
    }
}

fn read_generated(path: &Path) -> PipelineResult<String> {
    fs::read_to_string(path).map_err(|e| {
        PipelineError::AcquisitionFailed(format!(
            "cannot read generated file {}: {e}",
            path.display()
        ))
    })
}
