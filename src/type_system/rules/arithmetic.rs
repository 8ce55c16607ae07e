//! Arithmetic appends one computed attribute to the input schema.
use super::promotion::promote;
use crate::operation::{ArithmeticArgs, Operand};
use crate::schema::{Attribute, DataType, SchemaClone, Tar};
use crate::services::NamingConventions;
use crate::type_system::conformance::propagate_type;
use crate::type_system::error::SchemaError;
use tracing::trace;

pub(crate) fn infer_arithmetic(
    args: &ArithmeticArgs,
    conventions: &NamingConventions,
) -> Result<Tar, SchemaError> {
    let input = &args.input;
    let lhs = operand_type(input, &args.operands[0])?;
    let rhs = operand_type(input, &args.operands[1])?;
    let computed = promote(lhs, rhs, &args.op)?;

    let mut result = input.clone_schema(SchemaClone::STRUCTURAL);
    match &args.new_member {
        Some(name) => {
            result.push(Attribute::new(name.clone(), computed));
        }
        // Unnamed results are always stored as double, whatever was computed.
        None => {
            trace!(computed = %computed, "unnamed arithmetic result stored as double");
            result.push(Attribute::new(conventions.arithmetic_result.clone(), DataType::Double));
        }
    }

    Ok(propagate_type(input, result))
}

fn operand_type(input: &Tar, operand: &Operand) -> Result<DataType, SchemaError> {
    match operand {
        Operand::Literal(value) => Ok(DataType::natural_type_of(*value)),
        Operand::Element(name) => input.element(name).map(|e| e.data_type()).ok_or_else(|| {
            SchemaError::UnresolvedReference { element: name.clone(), expected: "an element" }
        }),
    }
}
