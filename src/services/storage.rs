//! Dimension intersection, the only storage service schema inference needs.
use crate::schema::Dimension;
use crate::type_system::SchemaError;

/// Tolerance when deciding whether a value lies on a floating-point grid.
const GRID_EPSILON: f64 = 1e-9;

pub trait StorageManager: Send + Sync {
    /// The dimension covering the values present in both `left` and `right`.
    fn intersect_dimensions(
        &self,
        left: &Dimension,
        right: &Dimension,
    ) -> Result<Dimension, SchemaError>;
}

/// Intersects implicit dimensions geometrically, from bounds and spacing
/// alone. The result takes the left dimension's name and data type.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridStorage;

impl StorageManager for GridStorage {
    fn intersect_dimensions(
        &self,
        left: &Dimension,
        right: &Dimension,
    ) -> Result<Dimension, SchemaError> {
        if !left.is_implicit() || !right.is_implicit() {
            return Err(invalid(format!(
                "cannot intersect '{}' and '{}' without materialized values",
                left.name, right.name
            )));
        }
        for dim in [left, right] {
            if !(dim.spacing.is_finite() && dim.spacing > 0.0) {
                return Err(invalid(format!(
                    "dimension '{}' has spacing {}",
                    dim.name, dim.spacing
                )));
            }
        }

        let spacing = common_spacing(left, right)?;
        let start = left.lower_bound.max(right.lower_bound);
        let end = left.upper_bound.min(right.upper_bound);

        // Within one common period there is at most one shared grid point.
        let first_step = ((start - left.lower_bound) / left.spacing - GRID_EPSILON).ceil();
        let period = (spacing / left.spacing).round() as i64;
        let lower = (0..period.max(1))
            .map(|k| left.lower_bound + (first_step + k as f64) * left.spacing)
            .take_while(|v| *v <= end + GRID_EPSILON)
            .find(|v| on_grid(*v, right))
            .ok_or_else(|| {
                invalid(format!("dimensions '{}' and '{}' do not overlap", left.name, right.name))
            })?;

        let upper = lower + ((end - lower) / spacing + GRID_EPSILON).trunc() * spacing;
        if Dimension::length_between(lower, upper, spacing).is_none() {
            return Err(invalid(format!(
                "intersection of '{}' and '{}' has more points than a 64-bit length holds",
                left.name, right.name
            )));
        }
        Ok(Dimension::implicit(left.name.clone(), left.data_type, lower, upper, spacing))
    }
}

fn on_grid(value: f64, dim: &Dimension) -> bool {
    let steps = (value - dim.lower_bound) / dim.spacing;
    (steps - steps.round()).abs() < GRID_EPSILON
}

fn common_spacing(left: &Dimension, right: &Dimension) -> Result<f64, SchemaError> {
    let (a, b) = (left.spacing, right.spacing);
    if (a - b).abs() < GRID_EPSILON {
        return Ok(a);
    }
    let no_common_grid = || {
        invalid(format!(
            "spacings {} of '{}' and {} of '{}' have no common grid",
            a, left.name, b, right.name
        ))
    };
    if a.fract() != 0.0 || b.fract() != 0.0 || a >= i64::MAX as f64 || b >= i64::MAX as f64 {
        return Err(no_common_grid());
    }
    let (a, b) = (a as i64, b as i64);
    (a / gcd(a, b)).checked_mul(b).map(|lcm| lcm as f64).ok_or_else(no_common_grid)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn invalid(msg: String) -> SchemaError {
    SchemaError::AmbiguousOrInvalidBound(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;
    use rstest::rstest;

    fn dim(name: &str, lower: f64, upper: f64, spacing: f64) -> Dimension {
        Dimension::implicit(name, DataType::Long, lower, upper, spacing)
    }

    #[rstest]
    #[case(dim("a", 0.0, 10.0, 1.0), dim("b", 5.0, 20.0, 1.0), 5.0, 10.0, 1.0)]
    #[case(dim("a", 0.0, 100.0, 2.0), dim("b", 1.0, 100.0, 3.0), 4.0, 100.0, 6.0)]
    #[case(dim("a", 0.0, 1.0, 0.25), dim("b", 0.5, 3.0, 0.25), 0.5, 1.0, 0.25)]
    #[case(dim("a", 3.0, 3.0, 1.0), dim("b", 0.0, 9.0, 1.0), 3.0, 3.0, 1.0)]
    fn test_grid_intersection(
        #[case] left: Dimension,
        #[case] right: Dimension,
        #[case] lower: f64,
        #[case] upper: f64,
        #[case] spacing: f64,
    ) {
        let joined = GridStorage.intersect_dimensions(&left, &right).unwrap();
        assert_eq!(joined.name, "a");
        assert_eq!(
            (joined.lower_bound, joined.upper_bound, joined.spacing),
            (lower, upper, spacing)
        );
        assert_eq!(joined.real_upper_bound, joined.length() - 1);
    }

    #[test]
    fn test_disjoint_ranges() {
        let err = GridStorage
            .intersect_dimensions(&dim("a", 0.0, 5.0, 1.0), &dim("b", 10.0, 20.0, 1.0))
            .unwrap_err();
        assert!(err.to_string().contains("do not overlap"), "{}", err);
    }

    #[test]
    fn test_offset_grids_never_meet() {
        // Even numbers against odd numbers.
        let result = GridStorage
            .intersect_dimensions(&dim("a", 0.0, 20.0, 2.0), &dim("b", 1.0, 21.0, 2.0));
        assert!(result.is_err());
    }

    #[test]
    fn test_spacing_lcm_overflow_rejected() {
        // Coprime spacings whose product exceeds i64.
        let left = dim("a", 0.0, 1e10, 4_294_967_311.0);
        let right = dim("b", 0.0, 1e10, 4_294_967_357.0);
        let err = GridStorage.intersect_dimensions(&left, &right).unwrap_err();
        assert!(err.to_string().contains("no common grid"), "{}", err);

        let huge = dim("h", 0.0, 1e20, 1e19);
        assert!(GridStorage.intersect_dimensions(&huge, &dim("b", 0.0, 1e20, 3.0)).is_err());
    }

    #[test]
    fn test_oversized_intersection_rejected() {
        let err = GridStorage
            .intersect_dimensions(&dim("a", 0.0, 1e19, 1.0), &dim("b", 0.0, 2e19, 1.0))
            .unwrap_err();
        assert!(err.to_string().contains("64-bit length"), "{}", err);
    }

    #[test]
    fn test_explicit_and_fractional_mismatch_rejected() {
        let explicit = Dimension::explicit("e", DataType::Double, 0.0, 9.0);
        assert!(GridStorage.intersect_dimensions(&explicit, &dim("b", 0.0, 9.0, 1.0)).is_err());
        assert!(GridStorage
            .intersect_dimensions(&dim("a", 0.0, 9.0, 0.5), &dim("b", 0.0, 9.0, 0.3))
            .is_err());
    }
}
