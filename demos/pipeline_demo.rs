//! End-to-end demo: compile a schema, render its fields, serialize one
//! message.
//!
//! Requires `protoc`, a C++ toolchain and the libprotobuf development
//! files. Point the pipeline at a non-default installation with the
//! `PROTOBUF_INCLUDE` / `PROTOBUF_LIBDIR` environment variables.

use protoforge::{FieldValueMap, Pipeline, PipelineConfig};

const SCHEMA: &str = r#"
syntax = "proto3";
package example;

message Person {
  string name = 1;
  int32 age = 2;
  bool active = 3;
}
"#;

fn main() {
    let mut config = PipelineConfig::default();
    if let Ok(include) = std::env::var("PROTOBUF_INCLUDE") {
        config.toolchain.protobuf_include = Some(include.into());
    }
    if let Ok(libdir) = std::env::var("PROTOBUF_LIBDIR") {
        config.toolchain.protobuf_libdir = Some(libdir.into());
    }

    let mut pipeline = Pipeline::new(config).expect("pipeline setup");
    let fields = pipeline.compile_schema(SCHEMA).expect("schema compilation");
    println!(
        "recovered fields:\n{}",
        serde_json::to_string_pretty(fields).expect("field list is serializable")
    );

    let mut values = FieldValueMap::new();
    values.insert("name".to_string(), "Ann".to_string());
    values.insert("age".to_string(), "30".to_string());
    values.insert("active".to_string(), "true".to_string());

    let bytes = pipeline.serialize(&values).expect("serialization");
    if bytes.is_empty() {
        println!("serialized message is empty");
    } else {
        println!("serialized {} bytes: {:02x?}", bytes.len(), bytes);
    }
}
