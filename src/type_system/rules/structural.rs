//! Rules for operators that keep or reshape the input's own elements:
//! scan, filter, split, select and subset.
use crate::operation::{SelectArgs, SubsetArgs, UnaryArgs};
use crate::schema::{Attribute, DataType, Dimension, SchemaClone, Tar};
use crate::services::NamingConventions;
use crate::type_system::conformance::propagate_type;
use crate::type_system::error::SchemaError;
use tracing::trace;

/// Scan, filter and split remove cells or partition them; the schema is
/// unchanged.
pub(crate) fn infer_passthrough(args: &UnaryArgs) -> Tar {
    let result = args.input.clone_schema(SchemaClone::STRUCTURAL);
    propagate_type(&args.input, result)
}

/// Projection. When some input dimension is not kept, the result loses its
/// dimensionality: kept elements become attributes over one synthetic
/// dimension spanning every input cell.
pub(crate) fn infer_select(
    args: &SelectArgs,
    conventions: &NamingConventions,
) -> Result<Tar, SchemaError> {
    let input = &args.input;
    let kept = args
        .kept
        .iter()
        .map(|name| {
            input.element(name).ok_or_else(|| SchemaError::UnresolvedReference {
                element: name.clone(),
                expected: "an element",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let keeps_all_dimensions = input.dimensions().all(|d| args.kept.contains(&d.name));

    let mut result = Tar::default();
    if keeps_all_dimensions {
        for element in kept {
            result.push(element.clone());
        }
    } else {
        let cells = input.cell_count().ok_or_else(|| {
            SchemaError::AmbiguousOrInvalidBound(format!(
                "cell count of '{}' overflows a 64-bit length",
                input.name()
            ))
        })?;
        result.push(Dimension::implicit(
            conventions.synthetic_dimension.clone(),
            DataType::Long,
            1.0,
            cells as f64,
            1.0,
        ));
        for element in kept {
            result.push(Attribute::new(element.name(), element.data_type()));
        }
    }

    Ok(propagate_type(input, result))
}

/// Narrows implicit dimensions to the requested bounds, snapped to the grid.
///
/// The lower bound adds its remainder while the upper bound subtracts it, so
/// `[12, 38]` on a spacing of 5 becomes `[14, 35]`. Explicit dimensions are
/// left as they are.
pub(crate) fn infer_subset(args: &SubsetArgs) -> Result<Tar, SchemaError> {
    let mut result = args.input.clone_schema(SchemaClone::STRUCTURAL);

    for bound in &args.bounds {
        let dim = result.dimension_mut(&bound.dimension).ok_or_else(|| {
            SchemaError::UnresolvedReference {
                element: bound.dimension.clone(),
                expected: "a dimension",
            }
        })?;

        if !dim.is_implicit() {
            trace!(dimension = %dim.name, "explicit dimension left untouched by subset");
            continue;
        }

        if !bound.lower.is_finite() || !bound.upper.is_finite() {
            return Err(SchemaError::AmbiguousOrInvalidBound(format!(
                "non-finite subset bounds [{}, {}] on '{}'",
                bound.lower, bound.upper, dim.name
            )));
        }
        if !(dim.spacing.is_finite() && dim.spacing > 0.0) {
            return Err(SchemaError::AmbiguousOrInvalidBound(format!(
                "dimension '{}' has spacing {}",
                dim.name, dim.spacing
            )));
        }

        let lower = bound.lower + remainder(bound.lower, dim.spacing);
        let upper = bound.upper - remainder(bound.upper, dim.spacing);
        if lower > upper {
            return Err(SchemaError::AmbiguousOrInvalidBound(format!(
                "subset [{}, {}] on '{}' is empty once snapped to spacing {}",
                bound.lower, bound.upper, dim.name, dim.spacing
            )));
        }

        let length = Dimension::length_between(lower, upper, dim.spacing).ok_or_else(|| {
            SchemaError::AmbiguousOrInvalidBound(format!(
                "subset [{}, {}] on '{}' has more points than a 64-bit length holds",
                bound.lower, bound.upper, dim.name
            ))
        })?;

        trace!(dimension = %dim.name, lower, upper, "subset bounds snapped");
        dim.lower_bound = lower;
        dim.upper_bound = upper;
        dim.real_lower_bound = 0;
        dim.real_upper_bound = length - 1;
    }

    Ok(propagate_type(&args.input, result))
}

/// Truncating remainder, `v - trunc(v / s) * s`.
fn remainder(value: f64, spacing: f64) -> f64 {
    value - (value / spacing).trunc() * spacing
}
