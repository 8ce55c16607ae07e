//! The closed set of tensor algebra operators.
use crate::type_system::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorKind {
    Scan,
    Select,
    Filter,
    Subset,
    Logical,
    Comparison,
    Arithmetic,
    Cross,
    DimJoin,
    Aggregate,
    Split,
    /// An operator whose schema comes from external configuration.
    UserDefined,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 12] = [
        OperatorKind::Scan,
        OperatorKind::Select,
        OperatorKind::Filter,
        OperatorKind::Subset,
        OperatorKind::Logical,
        OperatorKind::Comparison,
        OperatorKind::Arithmetic,
        OperatorKind::Cross,
        OperatorKind::DimJoin,
        OperatorKind::Aggregate,
        OperatorKind::Split,
        OperatorKind::UserDefined,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            OperatorKind::Scan => "scan",
            OperatorKind::Select => "select",
            OperatorKind::Filter => "filter",
            OperatorKind::Subset => "subset",
            OperatorKind::Logical => "logical",
            OperatorKind::Comparison => "comparison",
            OperatorKind::Arithmetic => "arithmetic",
            OperatorKind::Cross => "cross",
            OperatorKind::DimJoin => "dimjoin",
            OperatorKind::Aggregate => "aggregate",
            OperatorKind::Split => "split",
            OperatorKind::UserDefined => "user_defined",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for OperatorKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorKind::ALL
            .iter()
            .copied()
            .find(|k| k.tag() == s)
            .ok_or_else(|| SchemaError::UnsupportedOperator { operator: s.to_string() })
    }
}
