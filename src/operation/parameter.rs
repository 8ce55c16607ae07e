//! Operator parameters: literals or references to already-inferred TARs.
use crate::schema::Tar;
use std::sync::Arc;

/// Conventional parameter names. Indexed names are built with the helpers
/// below (`dim(0)` is `"dim0"`).
pub mod names {
    pub const INPUT_TAR: &str = "inputTar";
    pub const OP: &str = "op";
    pub const NEW_MEMBER: &str = "newMember";

    pub fn operand(i: usize) -> String {
        format!("operand{}", i)
    }

    pub fn dim(i: usize) -> String {
        format!("dim{}", i)
    }

    pub fn lb(i: usize) -> String {
        format!("lb{}", i)
    }

    pub fn ub(i: usize) -> String {
        format!("ub{}", i)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    LiteralString(String),
    LiteralDouble(f64),
    TarReference(Arc<Tar>),
}

impl ParameterValue {
    /// Human-readable tag used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParameterValue::LiteralString(_) => "string literal",
            ParameterValue::LiteralDouble(_) => "numeric literal",
            ParameterValue::TarReference(_) => "TAR reference",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParameterValue,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: ParameterValue) -> Self {
        Self { name: name.into(), value }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ParameterValue::LiteralString(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            ParameterValue::LiteralDouble(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_tar(&self) -> Option<&Arc<Tar>> {
        match &self.value {
            ParameterValue::TarReference(t) => Some(t),
            _ => None,
        }
    }
}
