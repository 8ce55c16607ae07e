//! Typed argument records, bound once from an `Operation`'s named parameters.
use super::kind::OperatorKind;
use super::parameter::{names, Parameter, ParameterValue};
use super::Operation;
use crate::schema::Tar;
use crate::type_system::SchemaError;
use smallvec::SmallVec;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryArgs {
    pub input: Arc<Tar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectArgs {
    pub input: Arc<Tar>,
    /// Element names to keep, in output order.
    pub kept: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsetBound {
    pub dimension: String,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubsetArgs {
    pub input: Arc<Tar>,
    pub bounds: SmallVec<[SubsetBound; 4]>,
}

/// One side of an arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(f64),
    Element(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArithmeticArgs {
    pub input: Arc<Tar>,
    pub op: String,
    pub operands: [Operand; 2],
    pub new_member: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryArgs {
    pub left: Arc<Tar>,
    pub right: Arc<Tar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimJoinArgs {
    pub left: Arc<Tar>,
    pub right: Arc<Tar>,
    /// (left dimension, right dimension) pairs to intersect.
    pub pairs: SmallVec<[(String, String); 4]>,
}

/// An aggregate `(function, source, output)` triple.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateCall {
    pub function: Option<String>,
    pub source: Option<String>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateArgs {
    pub input: Arc<Tar>,
    pub group_by: Vec<String>,
    pub calls: Vec<AggregateCall>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDefinedArgs {
    pub operator: String,
}

/// The typed form of an `Operation`, one variant per operator kind.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorArgs {
    Scan(UnaryArgs),
    Select(SelectArgs),
    Filter(UnaryArgs),
    Subset(SubsetArgs),
    Logical(UnaryArgs),
    Comparison(UnaryArgs),
    Arithmetic(ArithmeticArgs),
    Cross(BinaryArgs),
    DimJoin(DimJoinArgs),
    Aggregate(AggregateArgs),
    Split(UnaryArgs),
    UserDefined(UserDefinedArgs),
}

impl OperatorArgs {
    /// Resolves the conventional parameter names of `operation` into the
    /// record for its kind.
    pub fn bind(operation: &Operation) -> Result<Self, SchemaError> {
        let b = Binder { operation };
        let args = match operation.kind() {
            OperatorKind::Scan => OperatorArgs::Scan(b.unary()?),
            OperatorKind::Filter => OperatorArgs::Filter(b.unary()?),
            OperatorKind::Split => OperatorArgs::Split(b.unary()?),
            OperatorKind::Logical => OperatorArgs::Logical(b.unary()?),
            OperatorKind::Comparison => OperatorArgs::Comparison(b.unary()?),
            OperatorKind::Select => OperatorArgs::Select(SelectArgs {
                input: b.input_tar()?,
                kept: operation
                    .parameters()
                    .iter()
                    .filter_map(|p| p.as_str().map(str::to_string))
                    .collect(),
            }),
            OperatorKind::Subset => OperatorArgs::Subset(b.subset()?),
            OperatorKind::Arithmetic => OperatorArgs::Arithmetic(b.arithmetic()?),
            OperatorKind::Cross => OperatorArgs::Cross(b.cross()?),
            OperatorKind::DimJoin => OperatorArgs::DimJoin(b.dim_join()?),
            OperatorKind::Aggregate => OperatorArgs::Aggregate(b.aggregate()?),
            OperatorKind::UserDefined => OperatorArgs::UserDefined(UserDefinedArgs {
                operator: operation.name().to_string(),
            }),
        };
        Ok(args)
    }

    pub fn kind(&self) -> OperatorKind {
        match self {
            OperatorArgs::Scan(_) => OperatorKind::Scan,
            OperatorArgs::Select(_) => OperatorKind::Select,
            OperatorArgs::Filter(_) => OperatorKind::Filter,
            OperatorArgs::Subset(_) => OperatorKind::Subset,
            OperatorArgs::Logical(_) => OperatorKind::Logical,
            OperatorArgs::Comparison(_) => OperatorKind::Comparison,
            OperatorArgs::Arithmetic(_) => OperatorKind::Arithmetic,
            OperatorArgs::Cross(_) => OperatorKind::Cross,
            OperatorArgs::DimJoin(_) => OperatorKind::DimJoin,
            OperatorArgs::Aggregate(_) => OperatorKind::Aggregate,
            OperatorArgs::Split(_) => OperatorKind::Split,
            OperatorArgs::UserDefined(_) => OperatorKind::UserDefined,
        }
    }
}

struct Binder<'a> {
    operation: &'a Operation,
}

impl<'a> Binder<'a> {
    fn missing(&self, parameter: impl Into<String>) -> SchemaError {
        SchemaError::MissingRequiredParameter {
            operator: self.operation.kind(),
            parameter: parameter.into(),
        }
    }

    fn mismatch(&self, parameter: &Parameter, expected: &'static str) -> SchemaError {
        SchemaError::ParameterKindMismatch {
            operator: self.operation.kind(),
            parameter: parameter.name.clone(),
            expected,
            found: parameter.value.kind_name(),
        }
    }

    fn tar_of(&self, parameter: &Parameter) -> Result<Arc<Tar>, SchemaError> {
        parameter
            .as_tar()
            .cloned()
            .ok_or_else(|| self.mismatch(parameter, "TAR reference"))
    }

    fn required_tar(&self, name: &str) -> Result<Arc<Tar>, SchemaError> {
        let parameter = self.operation.parameter(name).ok_or_else(|| self.missing(name))?;
        self.tar_of(parameter)
    }

    fn required_str(&self, name: &str) -> Result<String, SchemaError> {
        self.optional_str(name)?.ok_or_else(|| self.missing(name))
    }

    fn optional_str(&self, name: &str) -> Result<Option<String>, SchemaError> {
        match self.operation.parameter(name) {
            None => Ok(None),
            Some(p) => p
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| self.mismatch(p, "string literal")),
        }
    }

    fn required_f64(&self, name: &str) -> Result<f64, SchemaError> {
        let parameter = self.operation.parameter(name).ok_or_else(|| self.missing(name))?;
        parameter.as_f64().ok_or_else(|| self.mismatch(parameter, "numeric literal"))
    }

    /// The named input TAR, or the first parameter when it is a TAR reference.
    fn input_tar(&self) -> Result<Arc<Tar>, SchemaError> {
        if let Some(parameter) = self.operation.parameter(names::INPUT_TAR) {
            return self.tar_of(parameter);
        }
        self.operation
            .parameters()
            .first()
            .and_then(Parameter::as_tar)
            .cloned()
            .ok_or_else(|| self.missing(names::INPUT_TAR))
    }

    fn unary(&self) -> Result<UnaryArgs, SchemaError> {
        Ok(UnaryArgs { input: self.input_tar()? })
    }

    fn subset(&self) -> Result<SubsetArgs, SchemaError> {
        let input = self.input_tar()?;
        let mut bounds = SmallVec::new();
        for i in 0.. {
            let Some(dimension) = self.optional_str(&names::dim(i))? else { break };
            bounds.push(SubsetBound {
                dimension,
                lower: self.required_f64(&names::lb(i))?,
                upper: self.required_f64(&names::ub(i))?,
            });
        }
        Ok(SubsetArgs { input, bounds })
    }

    fn operand(&self, name: &str) -> Result<Option<Operand>, SchemaError> {
        let Some(parameter) = self.operation.parameter(name) else { return Ok(None) };
        match &parameter.value {
            ParameterValue::LiteralDouble(v) => Ok(Some(Operand::Literal(*v))),
            ParameterValue::LiteralString(s) => Ok(Some(Operand::Element(s.clone()))),
            ParameterValue::TarReference(_) => {
                Err(self.mismatch(parameter, "numeric literal or element name"))
            }
        }
    }

    fn arithmetic(&self) -> Result<ArithmeticArgs, SchemaError> {
        let first = names::operand(0);
        let lhs = self.operand(&first)?.ok_or_else(|| self.missing(first))?;
        // Unary functions carry a single operand; the second defaults to 0.
        let rhs = self.operand(&names::operand(1))?.unwrap_or(Operand::Literal(0.0));
        Ok(ArithmeticArgs {
            input: self.input_tar()?,
            op: self.required_str(names::OP)?,
            operands: [lhs, rhs],
            new_member: self.optional_str(names::NEW_MEMBER)?,
        })
    }

    fn cross(&self) -> Result<BinaryArgs, SchemaError> {
        let parameters = self.operation.parameters();
        if parameters.len() < 2 {
            return Err(self.missing(names::operand(parameters.len())));
        }
        Ok(BinaryArgs {
            left: self.tar_of(&parameters[0])?,
            right: self.tar_of(&parameters[parameters.len() - 1])?,
        })
    }

    fn dim_join(&self) -> Result<DimJoinArgs, SchemaError> {
        let left = self.required_tar(&names::operand(0))?;
        let right = self.required_tar(&names::operand(1))?;
        let mut pairs = SmallVec::new();
        for k in 0.. {
            let Some(left_dim) = self.optional_str(&names::dim(2 * k))? else { break };
            let right_dim = self.required_str(&names::dim(2 * k + 1))?;
            pairs.push((left_dim, right_dim));
        }
        Ok(DimJoinArgs { left, right, pairs })
    }

    fn aggregate(&self) -> Result<AggregateArgs, SchemaError> {
        let input = self.input_tar()?;

        let mut group_by = Vec::new();
        for i in 0.. {
            let Some(dimension) = self.optional_str(&names::dim(i))? else { break };
            group_by.push(dimension);
        }

        let mut calls = Vec::new();
        for k in 0.. {
            let Some(output) = self.optional_str(&names::operand(3 * k + 2))? else { break };
            calls.push(AggregateCall {
                function: self.optional_str(&names::operand(3 * k))?,
                source: self.optional_str(&names::operand(3 * k + 1))?,
                output,
            });
        }
        Ok(AggregateArgs { input, group_by, calls })
    }
}
