//! Cross product and dimension join: schemas built from two operands.
use crate::operation::{BinaryArgs, DimJoinArgs};
use crate::schema::{Dimension, Tar};
use crate::services::{NamingConventions, StorageManager};
use crate::type_system::conformance::{self, Conformance};
use crate::type_system::error::SchemaError;
use std::collections::HashMap;
use tracing::{trace, warn};

/// Right operand first (prefixed), then the left operand (unprefixed); each
/// side emits its dimensions before its attributes.
pub(crate) fn infer_cross(args: &BinaryArgs, conventions: &NamingConventions) -> Tar {
    let mut result = Tar::default();
    let prefix = &conventions.right_prefix;

    for dim in args.right.dimensions() {
        result.push(dim.clone().renamed(format!("{}{}", prefix, dim.name)));
    }
    for att in args.right.attributes() {
        result.push(att.clone().renamed(format!("{}{}", prefix, att.name)));
    }
    for dim in args.left.dimensions() {
        result.push(dim.clone());
    }
    for att in args.left.attributes() {
        result.push(att.clone());
    }

    check_left_against_result(&result, &args.left);
    result
}

/// Paired dimensions collapse into their intersection (named from the left
/// side); unpaired dimensions and all attributes pass through prefixed with
/// their side. Attributes are emitted right side first.
pub(crate) fn infer_dim_join(
    args: &DimJoinArgs,
    storage: &dyn StorageManager,
    conventions: &NamingConventions,
) -> Result<Tar, SchemaError> {
    let (left, right) = (&args.left, &args.right);
    let left_prefix = &conventions.left_prefix;
    let right_prefix = &conventions.right_prefix;

    let mut left_to_right: HashMap<&str, &str> = HashMap::new();
    let mut paired_right: HashMap<&str, &str> = HashMap::new();
    for (l, r) in &args.pairs {
        require_dimension(left, l)?;
        require_dimension(right, r)?;
        left_to_right.insert(l, r);
        paired_right.insert(r, l);
    }

    let mut result = Tar::default();
    for dim in left.dimensions() {
        let name = format!("{}{}", left_prefix, dim.name);
        match left_to_right.get(dim.name.as_str()) {
            None => {
                result.push(dim.clone().renamed(name));
            }
            Some(right_name) => {
                let right_dim = require_dimension(right, right_name)?;
                let joined = storage.intersect_dimensions(dim, right_dim)?;
                trace!(
                    left = %dim.name,
                    right = %right_name,
                    length = joined.length(),
                    "dimensions intersected"
                );
                result.push(joined.renamed(name));
            }
        }
    }
    for dim in right.dimensions() {
        if !paired_right.contains_key(dim.name.as_str()) {
            result.push(dim.clone().renamed(format!("{}{}", right_prefix, dim.name)));
        }
    }

    for att in right.attributes() {
        result.push(att.clone().renamed(format!("{}{}", right_prefix, att.name)));
    }
    for att in left.attributes() {
        result.push(att.clone().renamed(format!("{}{}", left_prefix, att.name)));
    }

    check_left_against_result(&result, left);
    Ok(result)
}

/// The conformance check for the two-operand operators takes the freshly built
/// result as the type source and the left operand as the target. The result
/// has no type yet, and the left operand is immutable, so the output stays
/// structural.
fn check_left_against_result(result: &Tar, left: &Tar) {
    match conformance::check(result, left) {
        Conformance::Untyped => {
            if left.nominal_type().is_some() {
                warn!(left = %left.name(), "left operand type not carried into join result");
            }
        }
        verdict => trace!(?verdict, "join conformance verdict ignored for immutable operand"),
    }
}

fn require_dimension<'t>(tar: &'t Tar, name: &str) -> Result<&'t Dimension, SchemaError> {
    tar.dimension(name).ok_or_else(|| SchemaError::UnresolvedReference {
        element: name.to_string(),
        expected: "a dimension",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DataType, TypeDef};
    use crate::services::GridStorage;
    use smallvec::smallvec;
    use std::sync::Arc;

    fn left() -> Arc<Tar> {
        let mut tar = Tar::new("l")
            .with_dimension(Dimension::implicit("dimA", DataType::Integer, 0.0, 2.0, 1.0))
            .with_attribute("attrX", DataType::Double)
            .with_type(TypeDef::new("lt").with_role("a", true));
        tar.bind_role("a", "dimA").unwrap();
        Arc::new(tar)
    }

    fn right() -> Arc<Tar> {
        Arc::new(
            Tar::new("r")
                .with_dimension(Dimension::implicit("dimB", DataType::Integer, 0.0, 3.0, 1.0))
                .with_attribute("attrY", DataType::Float),
        )
    }

    #[test]
    fn test_cross_order_right_first() {
        let args = BinaryArgs { left: left(), right: right() };
        let result = infer_cross(&args, &NamingConventions::default());
        let names: Vec<_> = result.elements().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["right_dimB", "right_attrY", "dimA", "attrX"]);
        assert_eq!(result.dimension("right_dimB").map(Dimension::length), Some(4));
        assert_eq!(result.dimension("dimA").map(Dimension::length), Some(3));
    }

    #[test]
    fn test_cross_result_is_structural() {
        let left = left();
        let args = BinaryArgs { left: Arc::clone(&left), right: right() };
        let result = infer_cross(&args, &NamingConventions::default());
        assert!(result.nominal_type().is_none());
        assert!(left.nominal_type().is_some());
    }

    #[test]
    fn test_cross_self_product_keeps_names_unique() {
        let args = BinaryArgs { left: right(), right: right() };
        let result = infer_cross(&args, &NamingConventions::default());
        assert_eq!(
            result.signature(),
            "#right_dimB,d,int|right_attrY,a,float|dimB,d,int|attrY,a,float"
        );
    }

    fn time(name: &str, lower: f64, upper: f64) -> Dimension {
        Dimension::implicit(name, DataType::Long, lower, upper, 1.0)
    }

    #[test]
    fn test_dim_join_layout() {
        let left = Arc::new(
            Tar::new("l")
                .with_dimension(time("t", 0.0, 10.0))
                .with_dimension(time("x", 0.0, 3.0))
                .with_attribute("a", DataType::Double),
        );
        let right = Arc::new(
            Tar::new("r")
                .with_dimension(time("time", 5.0, 20.0))
                .with_dimension(time("z", 0.0, 1.0))
                .with_attribute("b", DataType::Integer),
        );
        let args = DimJoinArgs { left, right, pairs: smallvec![("t".into(), "time".into())] };
        let result = infer_dim_join(&args, &GridStorage, &NamingConventions::default()).unwrap();

        let names: Vec<_> = result.elements().iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["left_t", "left_x", "right_z", "right_b", "left_a"]);

        let joined = result.dimension("left_t").unwrap();
        assert_eq!((joined.lower_bound, joined.upper_bound), (5.0, 10.0));
        assert_eq!(joined.length(), 6);
        assert!(result.nominal_type().is_none());
    }

    #[test]
    fn test_dim_join_without_pairs_prefixes_everything() {
        let args = DimJoinArgs { left: left(), right: right(), pairs: smallvec![] };
        let result = infer_dim_join(&args, &GridStorage, &NamingConventions::default()).unwrap();
        assert_eq!(
            result.signature(),
            "#left_dimA,d,int|right_dimB,d,int|right_attrY,a,float|left_attrX,a,double"
        );
    }

    #[test]
    fn test_dim_join_unknown_dimension() {
        let args = DimJoinArgs {
            left: left(),
            right: right(),
            pairs: smallvec![("dimA".into(), "attrY".into())],
        };
        assert_eq!(
            infer_dim_join(&args, &GridStorage, &NamingConventions::default()).unwrap_err(),
            SchemaError::UnresolvedReference { element: "attrY".into(), expected: "a dimension" }
        );
    }
}
