//! Pipeline error taxonomy.

use thiserror::Error;

/// The pipeline stage a failure belongs to.
///
/// Load covers both the OS-level load and symbol resolution: a module
/// whose entry points cannot be resolved is unloaded immediately and the
/// two failures are indistinguishable to the caller's recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquisition,
    Compilation,
    Extraction,
    Build,
    Load,
    Serialization,
}

/// Errors raised while compiling a schema into a native module and
/// invoking it.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Schema acquisition failed: {0}")]
    AcquisitionFailed(String),
    #[error("Schema compiler failed{}: {stderr}", fmt_exit_code(.exit_code))]
    CompilationFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("No fields recognized in the generated artifact")]
    ExtractionEmpty,
    #[error("Module build failed{}: {stdout}{stderr}", fmt_exit_code(.exit_code))]
    BuildFailed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    #[error("Module load failed: {0}")]
    LoadFailed(String),
    #[error("Missing module entry points: {}", .missing.join(", "))]
    SymbolResolutionFailed { missing: Vec<String> },
    #[error("Module construct() returned no instance")]
    ConstructionFailed,
    #[error("Module rejected value for field '{field}'")]
    FieldAssignmentFailed { field: String },
    #[error("Module failed to serialize the message")]
    SerializationFailed,
    #[error("Pipeline is not ready: {0}")]
    NotReady(String),
}

impl PipelineError {
    /// The stage this failure belongs to, for the orchestrator's
    /// `Failed { stage, .. }` state.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::AcquisitionFailed(_) => Stage::Acquisition,
            PipelineError::CompilationFailed { .. } => Stage::Compilation,
            PipelineError::ExtractionEmpty => Stage::Extraction,
            PipelineError::BuildFailed { .. } => Stage::Build,
            PipelineError::LoadFailed(_) | PipelineError::SymbolResolutionFailed { .. } => {
                Stage::Load
            }
            PipelineError::ConstructionFailed
            | PipelineError::FieldAssignmentFailed { .. }
            | PipelineError::SerializationFailed
            | PipelineError::NotReady(_) => Stage::Serialization,
        }
    }
}

fn fmt_exit_code(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!(" (exit code {code})"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_display() {
        assert_eq!(
            PipelineError::AcquisitionFailed("schema text is empty".into()).to_string(),
            "Schema acquisition failed: schema text is empty"
        );
        assert_eq!(
            PipelineError::ExtractionEmpty.to_string(),
            "No fields recognized in the generated artifact"
        );
        assert_eq!(
            PipelineError::LoadFailed("bad ELF header".into()).to_string(),
            "Module load failed: bad ELF header"
        );
        assert_eq!(
            PipelineError::ConstructionFailed.to_string(),
            "Module construct() returned no instance"
        );
        assert_eq!(
            PipelineError::FieldAssignmentFailed { field: "age".into() }.to_string(),
            "Module rejected value for field 'age'"
        );
        assert_eq!(
            PipelineError::SerializationFailed.to_string(),
            "Module failed to serialize the message"
        );
    }

    #[test]
    fn test_compilation_failed_carries_exit_code_and_stderr() {
        let err = PipelineError::CompilationFailed {
            exit_code: Some(1),
            stderr: "schema.proto:3:1: Expected top-level statement".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Expected top-level statement"));
    }

    #[test]
    fn test_compilation_failed_without_exit_code() {
        let err = PipelineError::CompilationFailed {
            exit_code: None,
            stderr: "No such file or directory".into(),
        };
        let msg = err.to_string();
        assert!(!msg.contains("exit code"));
        assert!(msg.contains("No such file or directory"));
    }

    #[test]
    fn test_build_failed_carries_toolchain_text() {
        let err = PipelineError::BuildFailed {
            exit_code: Some(2),
            stdout: String::new(),
            stderr: "fatal error: google/protobuf/message.h: No such file or directory".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("exit code 2"));
        assert!(msg.contains("google/protobuf/message.h"));
    }

    #[test]
    fn test_symbol_resolution_failed_lists_missing() {
        let err = PipelineError::SymbolResolutionFailed {
            missing: vec!["protoforge_construct".into(), "protoforge_serialize".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing module entry points: protoforge_construct, protoforge_serialize"
        );
    }

    #[test]
    fn test_stage_mapping() {
        assert_eq!(
            PipelineError::AcquisitionFailed("x".into()).stage(),
            Stage::Acquisition
        );
        assert_eq!(
            PipelineError::CompilationFailed {
                exit_code: Some(1),
                stderr: String::new()
            }
            .stage(),
            Stage::Compilation
        );
        assert_eq!(PipelineError::ExtractionEmpty.stage(), Stage::Extraction);
        assert_eq!(
            PipelineError::BuildFailed {
                exit_code: None,
                stdout: String::new(),
                stderr: String::new()
            }
            .stage(),
            Stage::Build
        );
        assert_eq!(PipelineError::LoadFailed("x".into()).stage(), Stage::Load);
        assert_eq!(
            PipelineError::SymbolResolutionFailed { missing: vec![] }.stage(),
            Stage::Load
        );
        assert_eq!(
            PipelineError::FieldAssignmentFailed { field: "f".into() }.stage(),
            Stage::Serialization
        );
    }
}
