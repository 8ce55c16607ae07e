//! Universal properties of schema inference.


use generators::{arb_tar, arb_typed_tar, names_without_a0};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tal_schema_core::{names, DataType, Operation, OperatorKind, SchemaBuilder, Tar};

fn select(input: Arc<Tar>, kept: &[String]) -> Operation {
    let op = Operation::new(OperatorKind::Select).with_tar(names::INPUT_TAR, input);
    kept.iter()
        .enumerate()
        .fold(op, |op, (i, name)| op.with_str(names::operand(i), name.clone()))
}

/// `(name, is_dimension, data_type)` of every element.
fn element_set(tar: &Tar) -> HashSet<(String, bool, DataType)> {
    tar.elements()
        .iter()
        .map(|e| (e.name().to_string(), e.is_dimension(), e.data_type()))
        .collect()
}

proptest! {
    /// Inferring the same Select twice yields equal schemas and leaves the
    /// input untouched.
    #[test]
    fn select_is_deterministic_and_pure(
        tar in arb_tar(),
        keep_mask in prop::collection::vec(any::<bool>(), 8),
    ) {
        let input = Arc::new(tar);
        let snapshot = Tar::clone(&input);
        let kept: Vec<String> = input
            .elements()
            .iter()
            .zip(keep_mask.iter().cycle())
            .filter(|(_, keep)| **keep)
            .map(|(e, _)| e.name().to_string())
            .collect();

        let builder = SchemaBuilder::default();
        let op = select(input.clone(), &kept);
        let first = builder.infer_schema(&op);
        let second = builder.infer_schema(&op);
        prop_assert_eq!(first, second);
        prop_assert_eq!(&*input, &snapshot);
    }

    /// Scan, filter and split keep every element's name, kind and type.
    #[test]
    fn passthrough_preserves_elements(
        tar in prop_oneof![arb_tar().prop_map(Arc::new), arb_typed_tar()],
        kind in prop_oneof![
            Just(OperatorKind::Scan),
            Just(OperatorKind::Filter),
            Just(OperatorKind::Split),
        ],
    ) {
        let op = Operation::new(kind).with_tar(names::INPUT_TAR, tar.clone());
        let out = SchemaBuilder::default().infer_schema(&op).unwrap();

        prop_assert_eq!(element_set(&out), element_set(&tar));
        prop_assert_eq!(out.nominal_type(), tar.nominal_type());
        prop_assert_eq!(out.roles(), tar.roles());
    }

    /// Logical and comparison append exactly two attributes and drop the type.
    #[test]
    fn predicates_append_two(tar in arb_typed_tar(), logical in any::<bool>()) {
        let kind = if logical { OperatorKind::Logical } else { OperatorKind::Comparison };
        let op = Operation::new(kind).with_tar(names::INPUT_TAR, tar.clone());
        let out = SchemaBuilder::default().infer_schema(&op).unwrap();

        prop_assert_eq!(out.elements().len(), tar.elements().len() + 2);
        prop_assert_eq!(out.element("mask").map(|e| e.data_type()), Some(DataType::Boolean));
        prop_assert_eq!(out.element("offset").map(|e| e.data_type()), Some(DataType::Long));
        prop_assert!(out.nominal_type().is_none());
    }

    /// Without `newMember` the arithmetic result is a double named `op_result`.
    #[test]
    fn unnamed_arithmetic_is_double(
        tar in arb_typed_tar(),
        lhs in -1.0e6f64..1.0e6,
        op in prop_oneof![Just("+"), Just("-"), Just("*"), Just("/"), Just("max")],
    ) {
        let operation = Operation::new(OperatorKind::Arithmetic)
            .with_tar(names::INPUT_TAR, tar.clone())
            .with_str(names::OP, op)
            .with_number(names::operand(0), lhs)
            .with_str(names::operand(1), "a0");
        let out = SchemaBuilder::default().infer_schema(&operation).unwrap();

        prop_assert_eq!(out.element("op_result").map(|e| e.data_type()), Some(DataType::Double));
        prop_assert_eq!(out.elements().len(), tar.elements().len() + 1);
        prop_assert_eq!(out.nominal_type().map(|t| t.name.clone()), Some("Measure".to_string()));
    }

    /// Dropping the element behind a mandatory role drops the type entirely.
    #[test]
    fn missing_mandatory_role_drops_type(tar in arb_typed_tar()) {
        let builder = SchemaBuilder::default();

        let everything: Vec<String> = tar.elements().iter().map(|e| e.name().to_string()).collect();
        let kept_all = builder.infer_schema(&select(tar.clone(), &everything)).unwrap();
        prop_assert!(kept_all.nominal_type().is_some());
        prop_assert_eq!(kept_all.roles(), tar.roles());

        let without = builder.infer_schema(&select(tar.clone(), &names_without_a0(&tar))).unwrap();
        prop_assert!(without.nominal_type().is_none());
        prop_assert!(without.roles().is_empty());
    }

    /// Unit-spaced subsets inside the input range keep the requested bounds.
    #[test]
    fn subset_stays_within_input(tar in arb_tar(), start in 0i64..20, width in 0i64..20) {
        let input = Arc::new(tar);
        let (lower, upper) = {
            let d0 = input.dimension("d0").unwrap();
            let lower = (d0.lower_bound as i64 + start).min(d0.upper_bound as i64);
            (lower, (lower + width).min(d0.upper_bound as i64))
        };
        let op = Operation::new(OperatorKind::Subset)
            .with_tar(names::INPUT_TAR, input.clone())
            .with_str(names::dim(0), "d0")
            .with_number(names::lb(0), lower as f64)
            .with_number(names::ub(0), upper as f64);
        let out = SchemaBuilder::default().infer_schema(&op).unwrap();

        let d0 = out.dimension("d0").unwrap();
        prop_assert_eq!((d0.lower_bound, d0.upper_bound), (lower as f64, upper as f64));
        prop_assert_eq!(d0.real_lower_bound, 0);
        prop_assert_eq!(d0.real_upper_bound, upper - lower);
        prop_assert_eq!(out.elements().len(), input.elements().len());
    }
}
