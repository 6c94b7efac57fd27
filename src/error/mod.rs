//! Error types for the serialization pipeline.
//!
//! - [`PipelineError`] — Every failure a pipeline run can surface, one
//!   variant per stage-level cause, carrying the richest diagnostic text
//!   available (subprocess stderr/stdout, OS error strings, missing symbol
//!   names). Nothing is retried or swallowed.
//! - [`Stage`] — The coordinate of a failure inside the pipeline state
//!   machine.

pub mod pipeline_error;

pub use pipeline_error::{PipelineError, Stage};

/// Convenience alias for pipeline-level results.
pub type PipelineResult<T> = Result<T, PipelineError>;
