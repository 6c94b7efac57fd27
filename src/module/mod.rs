//! Loaded-module handling: the ownership-typed module handle with atomic
//! entry-point resolution, and the generic invocation bridge that drives
//! it.

pub mod bridge;
pub mod loader;

pub use bridge::{serialize_message, MessageInstance, MessageModule};
pub use loader::LoadedModule;
