//! Module Builder.
//!
//! Compiles the generated artifact (plus the emitted shim) into a single
//! loadable native module with the fixed three-entry-point ABI. The
//! toolchain and the schema-compiler runtime's include/link paths are
//! external configuration, never derived; a misconfigured path surfaces as
//! a build failure carrying the toolchain's literal diagnostic text.

pub mod shim;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::compiler::GeneratedArtifact;
use crate::error::{PipelineError, PipelineResult};

/// Shim source file name inside the working directory.
pub const SHIM_FILE: &str = "protoforge_shim.cpp";

/// Deterministic module file name for the current platform. Rebuilds
/// overwrite it; prior artifacts are never deleted.
pub fn module_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "schema_module.dll"
    } else if cfg!(target_os = "macos") {
        "libschema_module.dylib"
    } else {
        "libschema_module.so"
    }
}

/// Native toolchain configuration, supplied by the host.
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct ToolchainConfig {
    /// C++ compiler driver used to produce the module.
    pub cxx: PathBuf,
    /// Include directory of the schema compiler's runtime headers.
    pub protobuf_include: Option<PathBuf>,
    /// Link directory of the schema compiler's runtime library.
    pub protobuf_libdir: Option<PathBuf>,
    /// Extra arguments appended verbatim before the output flag.
    pub extra_args: Vec<String>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cxx: PathBuf::from("c++"),
            protobuf_include: None,
            protobuf_libdir: None,
            extra_args: Vec::new(),
        }
    }
}

/// Builds the generated artifact into a loadable module.
pub trait ModuleBuilder {
    /// Produce the module in `workdir` and return its path. Failure is
    /// terminal for the current pipeline run.
    fn build(
        &self,
        workdir: &Path,
        artifact: &GeneratedArtifact,
        message_full_name: &str,
    ) -> PipelineResult<PathBuf>;
}

/// Default implementation driving the configured C++ compiler.
pub struct CcModuleBuilder {
    toolchain: ToolchainConfig,
}

impl CcModuleBuilder {
    pub fn new(toolchain: ToolchainConfig) -> Self {
        Self { toolchain }
    }

    fn command_args(&self, artifact: &GeneratedArtifact, out: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-shared".into(),
            "-fPIC".into(),
            "-std=c++17".into(),
            "-I.".into(),
        ];
        if let Some(include) = &self.toolchain.protobuf_include {
            args.push("-I".into());
            args.push(include.clone().into());
        }
        args.push(SHIM_FILE.into());
        args.push(artifact.source_file.clone().into());
        if let Some(libdir) = &self.toolchain.protobuf_libdir {
            args.push("-L".into());
            args.push(libdir.clone().into());
        }
        args.push("-lprotobuf".into());
        for extra in &self.toolchain.extra_args {
            args.push(extra.into());
        }
        args.push("-o".into());
        args.push(out.into());
        args
    }
}

impl ModuleBuilder for CcModuleBuilder {
    fn build(
        &self,
        workdir: &Path,
        artifact: &GeneratedArtifact,
        message_full_name: &str,
    ) -> PipelineResult<PathBuf> {
        let shim_path = workdir.join(SHIM_FILE);
        fs::write(&shim_path, shim::shim_source(message_full_name)).map_err(|e| {
            PipelineError::BuildFailed {
                exit_code: None,
                stdout: String::new(),
                stderr: format!("cannot write {}: {e}", shim_path.display()),
            }
        })?;

        let out = workdir.join(module_file_name());
        let args = self.command_args(artifact, &out);
        tracing::info!(
            "building module: {} {}",
            self.toolchain.cxx.display(),
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let output = Command::new(&self.toolchain.cxx)
            .args(&args)
            .current_dir(workdir)
            .output()
            .map_err(|e| PipelineError::BuildFailed {
                exit_code: None,
                stdout: String::new(),
                stderr: format!("failed to launch {}: {e}", self.toolchain.cxx.display()),
            })?;
        if !output.status.success() {
            return Err(PipelineError::BuildFailed {
                exit_code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        tracing::info!("module built at {}", out.display());
        Ok(out)
    }
}
