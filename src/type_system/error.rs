//! Defines the error types for the type system module.
use crate::operation::OperatorKind;
use crate::plan::NodeId;
use thiserror::Error;

/// Failure of a single schema inference call. Every variant is terminal for
/// the enclosing `infer_schema` call; no partial schema is ever returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// A parameter the operator rule needs is absent.
    #[error("{operator} requires parameter '{parameter}'")]
    MissingRequiredParameter { operator: OperatorKind, parameter: String },

    /// A parameter is present but holds the wrong kind of value.
    #[error("parameter '{parameter}' of {operator} must be a {expected}, found a {found}")]
    ParameterKindMismatch {
        operator: OperatorKind,
        parameter: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A parameter names an element the input schema does not have.
    #[error("'{element}' does not name {expected} of the input TAR")]
    UnresolvedReference { element: String, expected: &'static str },

    /// The operator has no static inference rule.
    #[error("schema inference is not supported for operator '{operator}'")]
    UnsupportedOperator { operator: String },

    /// A bound or type computation that has no deterministic answer.
    #[error("invalid bound or type: {0}")]
    AmbiguousOrInvalidBound(String),

    /// A role binding that the TAR's type or elements cannot support.
    #[error("cannot bind role '{role}' to element '{element}'")]
    InvalidRoleBinding { role: String, element: String },
}

/// Failure while inferring a whole query plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("{0}")]
    Cycle(String),

    /// An operator parameter refers to a node with no inferred schema.
    #[error("node {node_id:?} refers to node {input:?}, which has no schema")]
    UnresolvedInput { node_id: NodeId, input: NodeId },

    /// `replace_source` was called on an operator node.
    #[error("node {0:?} is not a source")]
    NotASource(NodeId),

    #[error("inference failed at node '{node_name}': {source}")]
    Inference {
        node_id: NodeId,
        node_name: String,
        #[source]
        source: SchemaError,
    },
}

impl SchemaError {
    /// Tags this error with the plan node it was raised for.
    pub fn at_node(self, node_id: NodeId, node_name: String) -> PlanError {
        PlanError::Inference { node_id, node_name, source: self }
    }
}
