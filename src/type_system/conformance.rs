//! Nominal-type conformance: decides whether a derived schema still "is of"
//! the type of the TAR it was derived from.
use crate::schema::{Tar, TypeDef};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::trace;

/// Outcome of checking a target schema against a source TAR's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Conformance {
    /// The source has no type; there is nothing to carry over.
    Untyped,
    /// Every mandatory role still resolves. `roles` holds the bindings whose
    /// elements exist in the target.
    Holds { nominal_type: Arc<TypeDef>, roles: BTreeMap<String, String> },
    /// A mandatory role lost its implementing element.
    Broken { role: String, element: String },
}

/// Checks `target` against the type of `source`.
///
/// A single missing mandatory role breaks conformance for the whole TAR.
/// Optional roles whose element is gone are dropped from the result.
pub fn check(source: &Tar, target: &Tar) -> Conformance {
    let Some(nominal_type) = source.nominal_type_arc() else {
        return Conformance::Untyped;
    };

    let mut roles = BTreeMap::new();
    for (role, element) in source.roles() {
        if target.has_element(element) {
            roles.insert(role.clone(), element.clone());
        } else if nominal_type.is_mandatory(role) {
            trace!(role = %role, element = %element, "mandatory role lost, type dropped");
            return Conformance::Broken { role: role.clone(), element: element.clone() };
        } else {
            trace!(role = %role, element = %element, "optional role dropped");
        }
    }
    Conformance::Holds { nominal_type: Arc::clone(nominal_type), roles }
}

/// Attaches the type of `source` and its surviving bindings to `target` when
/// `target` conforms; otherwise returns `target` unchanged (structural).
pub fn propagate_type(source: &Tar, mut target: Tar) -> Tar {
    if let Conformance::Holds { nominal_type, roles } = check(source, &target) {
        target.attach_type(nominal_type, roles);
    }
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DataType, Dimension, SchemaClone};

    fn typed_source() -> Tar {
        let ty = TypeDef::new("field")
            .with_role("position", true)
            .with_role("value", true)
            .with_role("error", false);
        let mut tar = Tar::new("source")
            .with_dimension(Dimension::implicit("x", DataType::Integer, 0.0, 9.0, 1.0))
            .with_attribute("v", DataType::Double)
            .with_attribute("e", DataType::Float)
            .with_type(ty);
        tar.bind_role("position", "x").unwrap();
        tar.bind_role("value", "v").unwrap();
        tar.bind_role("error", "e").unwrap();
        tar
    }

    #[test]
    fn test_untyped_source_is_noop() {
        let source = Tar::new("plain").with_attribute("v", DataType::Double);
        let target = source.clone_schema(SchemaClone::STRUCTURAL);
        assert_eq!(check(&source, &target), Conformance::Untyped);
        assert!(propagate_type(&source, target).nominal_type().is_none());
    }

    #[test]
    fn test_full_copy_keeps_type_and_roles() {
        let source = typed_source();
        let result = propagate_type(&source, source.clone_schema(SchemaClone::STRUCTURAL));
        assert_eq!(result.nominal_type().map(|t| t.name.as_str()), Some("field"));
        assert_eq!(result.roles(), source.roles());
    }

    #[test]
    fn test_missing_optional_role_is_dropped() {
        let source = typed_source();
        let target = Tar::new("")
            .with_dimension(Dimension::implicit("x", DataType::Integer, 0.0, 9.0, 1.0))
            .with_attribute("v", DataType::Double);
        let result = propagate_type(&source, target);
        assert!(result.nominal_type().is_some());
        assert_eq!(result.roles().len(), 2);
        assert!(result.role_implementation("error").is_none());
    }

    #[test]
    fn test_missing_mandatory_role_disqualifies() {
        let source = typed_source();
        let target = Tar::new("")
            .with_dimension(Dimension::implicit("x", DataType::Integer, 0.0, 9.0, 1.0))
            .with_attribute("e", DataType::Float);
        assert_eq!(
            check(&source, &target),
            Conformance::Broken { role: "value".into(), element: "v".into() }
        );
        let result = propagate_type(&source, target);
        assert!(result.nominal_type().is_none());
        assert!(result.roles().is_empty());
    }

    #[test]
    fn test_role_survives_when_element_changes_kind() {
        // A dimension demoted to an attribute still implements its role.
        let source = typed_source();
        let target = Tar::new("")
            .with_attribute("x", DataType::Integer)
            .with_attribute("v", DataType::Double);
        let result = propagate_type(&source, target);
        assert_eq!(result.role_implementation("position").map(|e| e.is_dimension()), Some(false));
    }
}
