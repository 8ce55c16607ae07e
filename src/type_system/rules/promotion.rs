//! Numeric type promotion for arithmetic expressions.
use crate::schema::DataType;
use crate::type_system::error::SchemaError;

/// Operators whose result always needs floating point.
const DOUBLE_VALUED: &[&str] = &[
    "/", "pow", "sqrt", "exp", "log", "log10", "sin", "cos", "tan", "asin", "acos", "atan",
    "atan2", "sinh", "cosh", "tanh",
];

/// Operators whose result has the wider of the operand types.
const WIDENING: &[&str] = &["+", "-", "*", "%", "min", "max", "abs", "ceil", "floor", "round"];

/// Result type of `lhs <op> rhs`.
pub(crate) fn promote(lhs: DataType, rhs: DataType, op: &str) -> Result<DataType, SchemaError> {
    let (Some(l), Some(r)) = (lhs.numeric_rank(), rhs.numeric_rank()) else {
        return Err(SchemaError::AmbiguousOrInvalidBound(format!(
            "operator '{}' is not defined for {} and {}",
            op, lhs, rhs
        )));
    };

    if DOUBLE_VALUED.contains(&op) {
        Ok(DataType::Double)
    } else if WIDENING.contains(&op) {
        Ok(if l >= r { lhs } else { rhs })
    } else {
        Err(SchemaError::AmbiguousOrInvalidBound(format!("unknown arithmetic operator '{}'", op)))
    }
}
