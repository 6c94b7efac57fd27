//! # Protoforge — Dynamic Schema Compile-and-Serialize Pipeline
//!
//! `protoforge` lets a host compile a user-authored protobuf schema and
//! serialize message instances described by it, without any compile-time
//! knowledge of the schema's fields. The pipeline:
//!
//! - **Field extraction**: Recovers a field-level schema from the schema
//!   compiler's generated C++ text (no structured metadata exists), via
//!   two named, swappable line-scanning strategies.
//! - **Module build**: Emits a reflection-based C++ shim and compiles it
//!   together with the generated code into one loadable native module
//!   exporting a fixed three-entry-point C ABI.
//! - **Load & resolve**: Loads the module via `libloading` and resolves
//!   all three entry points atomically — a partially resolvable module is
//!   unloaded immediately and never exposed.
//! - **Generic invocation**: Drives construct → populate → serialize
//!   through type-erased, string-keyed calls, yielding serialized bytes.
//!
//! At most one module is live per [`Pipeline`]; supplying a new schema
//! unloads the previous module before anything else happens. Everything
//! is synchronous and single-threaded — the external compiler and
//! toolchain invocations are the only long-running stages, and each
//! blocks until completion.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use protoforge::{FieldValueMap, Pipeline, PipelineConfig};
//!
//! let schema = r#"
//! syntax = "proto3";
//! package example;
//! message Person {
//!   string name = 1;
//!   int32 age = 2;
//! }
//! "#;
//!
//! let mut pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let fields = pipeline.compile_schema(schema).unwrap();
//! println!("{} fields", fields.len());
//!
//! let mut values = FieldValueMap::new();
//! values.insert("name".into(), "Ann".into());
//! values.insert("age".into(), "30".into());
//! let bytes = pipeline.serialize(&values).unwrap();
//! println!("{} bytes", bytes.len());
//! ```
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `toolchain-tests` | Integration tests that compile fixture modules with the system C toolchain |

pub mod builder;
pub mod compiler;
pub mod error;
pub mod extract;
pub mod module;
pub mod pipeline;
pub mod schema;

pub use crate::builder::{CcModuleBuilder, ModuleBuilder, ToolchainConfig};
pub use crate::compiler::{GeneratedArtifact, ProtocCompiler, SchemaCompiler};
pub use crate::error::{PipelineError, PipelineResult, Stage};
pub use crate::extract::{extract_fields, ExtractionReport, ExtractionStrategy};
pub use crate::module::{serialize_message, LoadedModule, MessageInstance, MessageModule};
pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineStage};
pub use crate::schema::{
    message_full_name, FieldDescriptor, FieldKind, FieldValueMap, SchemaFieldSet,
};
