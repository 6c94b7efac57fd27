//! Generic Invocation Bridge.
//!
//! Drives the strict construct → populate → serialize protocol through a
//! loaded module's entry points. All values cross the module boundary as
//! text; coercion is the receiving module's responsibility, and the bridge
//! rejects nothing the module itself accepts.

use std::ffi::c_void;

use crate::error::{PipelineError, PipelineResult};
use crate::schema::{FieldValueMap, SchemaFieldSet};

/// Opaque, module-owned value representing one message under
/// construction. Valid only while the owning module stays loaded; never
/// cloned, never persisted across reloads.
#[derive(Debug)]
pub struct MessageInstance {
    raw: *mut c_void,
}

impl MessageInstance {
    pub(crate) fn from_raw(raw: *mut c_void) -> Self {
        Self { raw }
    }

    pub(crate) fn as_ptr(&self) -> *mut c_void {
        self.raw
    }
}

/// The callable surface of a loaded module. Implemented over FFI by
/// [`LoadedModule`](super::LoadedModule); test doubles implement it
/// directly.
pub trait MessageModule {
    /// Create (or reset) the module's message instance. `None` when the
    /// module could not produce one.
    fn construct(&self) -> Option<MessageInstance>;

    /// Assign a field by name from its textual value. `false` means the
    /// module rejected the assignment.
    fn set_field(&self, instance: &MessageInstance, name: &str, value: &str) -> bool;

    /// Serialize the instance. `None` means failure; an empty vector is a
    /// valid, successful result.
    fn serialize(&self, instance: &MessageInstance) -> Option<Vec<u8>>;
}

/// Run the serialization protocol once. Strictly ordered, not
/// interruptible once started:
///
/// 1. construct — a null instance fails with `ConstructionFailed`;
/// 2. for each schema field with an entry in `values` (schema order,
///    unset fields silently skipped): set_field — a rejection aborts with
///    `FieldAssignmentFailed` and the instance is discarded, fields
///    already set are not rolled back;
/// 3. serialize — failure yields `SerializationFailed`; empty output is
///    success and stays distinguishable from failure.
///
/// The returned bytes are owned by the caller, independent of the
/// instance.
pub fn serialize_message(
    module: &dyn MessageModule,
    fields: &SchemaFieldSet,
    values: &FieldValueMap,
) -> PipelineResult<Vec<u8>> {
    let instance = module
        .construct()
        .ok_or(PipelineError::ConstructionFailed)?;

    for field in fields.iter() {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        tracing::debug!("assigning field '{}'", field.name);
        if !module.set_field(&instance, &field.name, value) {
            return Err(PipelineError::FieldAssignmentFailed {
                field: field.name.clone(),
            });
        }
    }

    module
        .serialize(&instance)
        .ok_or(PipelineError::SerializationFailed)
}
