// Crate root: static schema inference for tensor algebra plans.
//
// A query compiler hands over operator applications whose inputs already
// carry schemas; this crate derives each output schema (elements, bounds,
// nominal type) before any data is touched.

pub mod display;
pub mod operation;
pub mod plan;
pub mod schema;
pub mod services;
pub mod type_system;

pub use operation::{names, Operation, OperatorKind, Parameter, ParameterValue};
pub use plan::{NodeId, PlanParameter, QueryPlan};
pub use schema::{
    Attribute, DataElement, DataType, Dimension, DimensionType, Role, SchemaClone, Tar, TypeDef,
};
pub use services::{
    ConfigurationManager, EngineConfig, GridStorage, NamingConventions, StorageManager,
};
pub use type_system::{
    infer_plans, InferredPlan, PlanError, SchemaBuilder, SchemaChecker, SchemaError,
};
