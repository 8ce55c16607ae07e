//! Human-readable renderings of inferred plans.
pub mod trace;

pub use trace::format_schema_trace;
