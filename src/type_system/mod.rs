//! Static schema inference for the tensor algebra.
//!
//! `SchemaBuilder` derives the output schema of a single operator from its
//! input schemas. `SchemaChecker` drives the builder over a whole query plan,
//! bottom-up, so every operator sees the already-inferred schemas of its
//! inputs before anything is executed.

pub use self::builder::SchemaBuilder;
pub use self::checker::{infer_plans, InferredPlan, SchemaChecker};
pub use self::conformance::{propagate_type, Conformance};
pub use self::error::{PlanError, SchemaError};

// --- MODULE DECLARATIONS ---
mod builder;
mod checker;
pub mod conformance;
mod error;
mod rules {
    pub mod aggregate;
    pub mod arithmetic;
    pub mod join;
    pub mod predicate;
    pub mod promotion;
    pub mod structural;
}
