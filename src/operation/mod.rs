//! Operator applications as handed over by the query compiler.
//!
//! An `Operation` is the raw form: a kind tag plus named parameters.
//! `OperatorArgs::bind` turns it into a typed record per operator kind,
//! which is what the schema builder consumes.

pub mod args;
pub mod kind;
pub mod parameter;

pub use args::{
    AggregateArgs, AggregateCall, ArithmeticArgs, BinaryArgs, DimJoinArgs, Operand, OperatorArgs,
    SelectArgs, SubsetArgs, SubsetBound, UnaryArgs, UserDefinedArgs,
};
pub use kind::OperatorKind;
pub use parameter::{names, Parameter, ParameterValue};

use crate::schema::Tar;
use std::sync::Arc;

/// One operator application. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    kind: OperatorKind,
    /// Operator name; the kind tag unless the operator is user-defined.
    name: String,
    parameters: Vec<Parameter>,
}

impl Operation {
    pub fn new(kind: OperatorKind) -> Self {
        Self { kind, name: kind.tag().to_string(), parameters: Vec::new() }
    }

    pub fn user_defined(name: impl Into<String>) -> Self {
        Self { kind: OperatorKind::UserDefined, name: name.into(), parameters: Vec::new() }
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_tar(self, name: impl Into<String>, tar: Arc<Tar>) -> Self {
        self.with_parameter(Parameter::new(name, ParameterValue::TarReference(tar)))
    }

    pub fn with_str(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_parameter(Parameter::new(name, ParameterValue::LiteralString(value.into())))
    }

    pub fn with_number(self, name: impl Into<String>, value: f64) -> Self {
        self.with_parameter(Parameter::new(name, ParameterValue::LiteralDouble(value)))
    }

    pub fn kind(&self) -> OperatorKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// First parameter with the given name.
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}
