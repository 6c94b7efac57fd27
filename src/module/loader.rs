//! Module Loader/Resolver.
//!
//! The most safety-sensitive boundary in the pipeline: every symbol
//! resolved from a module is valid only while the module stays loaded.
//! [`LoadedModule`] makes that lifetime non-bypassable — it is a move-only
//! handle owning both the OS library and the resolved entry points, the
//! raw pointers never leave this module, and dropping the handle is the
//! only way to unload.

use std::ffi::{c_char, c_void, CString};
use std::path::{Path, PathBuf};

use libloading::Library;

use super::bridge::{MessageInstance, MessageModule};
use crate::error::{PipelineError, PipelineResult};

const CONSTRUCT_SYMBOL: &[u8] = b"protoforge_construct\0";
const SET_FIELD_SYMBOL: &[u8] = b"protoforge_set_field\0";
const SERIALIZE_SYMBOL: &[u8] = b"protoforge_serialize\0";

type ConstructFn = unsafe extern "C" fn() -> *mut c_void;
type SetFieldFn = unsafe extern "C" fn(*mut c_void, *const c_char, *const c_char) -> bool;
type SerializeFn = unsafe extern "C" fn(*mut c_void, *mut *const u8, *mut usize) -> bool;

/// The three resolved entry points. Never exposed outside this module:
/// the function pointers are only reachable through [`LoadedModule`],
/// whose `Library` keeps them valid.
#[derive(Debug)]
struct EntryPointTable {
    construct: ConstructFn,
    set_field: SetFieldFn,
    serialize: SerializeFn,
}

/// Owning handle to a loaded module with a fully resolved entry-point
/// table. At most one is live per pipeline; replacing it drops (and
/// thereby unloads) the previous one.
#[derive(Debug)]
pub struct LoadedModule {
    entry_points: EntryPointTable,
    // Declared after the table so the fn pointers are conceptually dead
    // before the library unloads on drop.
    _library: Library,
    path: PathBuf,
}

impl LoadedModule {
    /// Load the module at `path` and resolve all three entry points
    /// atomically. If any symbol is missing the library is unloaded
    /// before returning; no partial table ever escapes.
    pub fn load(path: &Path) -> PipelineResult<Self> {
        let library = unsafe { Library::new(path) }
            .map_err(|e| PipelineError::LoadFailed(e.to_string()))?;
        tracing::debug!("loaded module {}", path.display());

        let construct = unsafe { library.get::<ConstructFn>(CONSTRUCT_SYMBOL) }.map(|s| *s);
        let set_field = unsafe { library.get::<SetFieldFn>(SET_FIELD_SYMBOL) }.map(|s| *s);
        let serialize = unsafe { library.get::<SerializeFn>(SERIALIZE_SYMBOL) }.map(|s| *s);

        let mut missing = Vec::new();
        if construct.is_err() {
            missing.push("protoforge_construct".to_string());
        }
        if set_field.is_err() {
            missing.push("protoforge_set_field".to_string());
        }
        if serialize.is_err() {
            missing.push("protoforge_serialize".to_string());
        }

        match (construct, set_field, serialize) {
            (Ok(construct), Ok(set_field), Ok(serialize)) => Ok(Self {
                entry_points: EntryPointTable {
                    construct,
                    set_field,
                    serialize,
                },
                _library: library,
                path: path.to_path_buf(),
            }),
            _ => {
                tracing::warn!(
                    "unloading {}: missing entry points {}",
                    path.display(),
                    missing.join(", ")
                );
                drop(library);
                Err(PipelineError::SymbolResolutionFailed { missing })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LoadedModule {
    fn drop(&mut self) {
        tracing::debug!("unloading module {}", self.path.display());
    }
}

impl MessageModule for LoadedModule {
    fn construct(&self) -> Option<MessageInstance> {
        let raw = unsafe { (self.entry_points.construct)() };
        if raw.is_null() {
            None
        } else {
            Some(MessageInstance::from_raw(raw))
        }
    }

    fn set_field(&self, instance: &MessageInstance, name: &str, value: &str) -> bool {
        // An interior NUL can never reach the module; treat it as a
        // rejected assignment, same as the module would.
        let Ok(name) = CString::new(name) else {
            return false;
        };
        let Ok(value) = CString::new(value) else {
            return false;
        };
        unsafe { (self.entry_points.set_field)(instance.as_ptr(), name.as_ptr(), value.as_ptr()) }
    }

    fn serialize(&self, instance: &MessageInstance) -> Option<Vec<u8>> {
        let mut data: *const u8 = std::ptr::null();
        let mut len: usize = 0;
        let ok = unsafe { (self.entry_points.serialize)(instance.as_ptr(), &mut data, &mut len) };
        if !ok {
            return None;
        }
        if data.is_null() || len == 0 {
            return Some(Vec::new());
        }
        // The module's buffer is only valid until its next serialize call
        // or unload; copy out immediately.
        Some(unsafe { std::slice::from_raw_parts(data, len) }.to_vec())
    }
}
