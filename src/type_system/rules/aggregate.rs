//! Aggregation keeps the group-by dimensions and emits one double attribute
//! per aggregate call.
use crate::operation::AggregateArgs;
use crate::schema::{Attribute, DataType, Dimension, Tar};
use crate::services::NamingConventions;
use crate::type_system::conformance::propagate_type;
use crate::type_system::error::SchemaError;

pub(crate) fn infer_aggregate(
    args: &AggregateArgs,
    conventions: &NamingConventions,
) -> Result<Tar, SchemaError> {
    let input = &args.input;
    let mut result = Tar::default();

    for name in &args.group_by {
        let dim = input.dimension(name).ok_or_else(|| SchemaError::UnresolvedReference {
            element: name.clone(),
            expected: "a dimension",
        })?;
        result.push(dim.clone());
    }

    // Fully reduced: a single scalar position.
    if args.group_by.is_empty() {
        result.push(Dimension::implicit(
            conventions.synthetic_dimension.clone(),
            DataType::Integer,
            0.0,
            0.0,
            1.0,
        ));
    }

    for call in &args.calls {
        result.push(Attribute::new(call.output.clone(), DataType::Double));
    }

    Ok(propagate_type(input, result))
}
