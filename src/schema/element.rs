//! Dimensions, attributes and the `DataElement` sum over both.
use super::data_type::DataType;
use serde::{Deserialize, Serialize};

/// How the values of a dimension are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionType {
    /// Values are materialized as an explicit list.
    Explicit,
    /// Values form a regular grid computable from bounds and spacing.
    Implicit,
}

/// An axis of a TAR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub data_type: DataType,
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Grid step between consecutive values.
    pub spacing: f64,
    pub dimension_type: DimensionType,
    /// 0-based logical index range after any bound narrowing.
    pub real_lower_bound: i64,
    pub real_upper_bound: i64,
}

impl Dimension {
    /// A regularly spaced dimension whose logical range covers all of its grid.
    pub fn implicit(
        name: impl Into<String>,
        data_type: DataType,
        lower_bound: f64,
        upper_bound: f64,
        spacing: f64,
    ) -> Self {
        let length = Self::length_between(lower_bound, upper_bound, spacing).unwrap_or(i64::MAX);
        Self {
            name: name.into(),
            data_type,
            lower_bound,
            upper_bound,
            spacing,
            dimension_type: DimensionType::Implicit,
            real_lower_bound: 0,
            real_upper_bound: length.saturating_sub(1),
        }
    }

    /// A dimension backed by a materialized value list (unit spacing).
    pub fn explicit(
        name: impl Into<String>,
        data_type: DataType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Self {
        Self {
            dimension_type: DimensionType::Explicit,
            ..Self::implicit(name, data_type, lower_bound, upper_bound, 1.0)
        }
    }

    /// Number of grid points between the bounds, inclusive. Saturates at
    /// `i64::MAX`; use `checked_length` where that matters.
    pub fn length(&self) -> i64 {
        self.checked_length().unwrap_or(i64::MAX)
    }

    pub fn checked_length(&self) -> Option<i64> {
        Self::length_between(self.lower_bound, self.upper_bound, self.spacing)
    }

    /// `trunc((upper - lower) / spacing) + 1`, or `None` when the step count
    /// is not finite or does not fit in an `i64`.
    pub fn length_between(lower_bound: f64, upper_bound: f64, spacing: f64) -> Option<i64> {
        let steps = ((upper_bound - lower_bound) / spacing).trunc();
        if !steps.is_finite() || steps >= i64::MAX as f64 || steps < i64::MIN as f64 {
            return None;
        }
        (steps as i64).checked_add(1)
    }

    pub fn is_implicit(&self) -> bool {
        self.dimension_type == DimensionType::Implicit
    }

    pub(crate) fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

/// A named, typed value carried by every cell of a TAR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub data_type: DataType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self { name: name.into(), data_type }
    }

    pub(crate) fn renamed(mut self, name: String) -> Self {
        self.name = name;
        self
    }
}

/// A member of a TAR schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataElement {
    Dimension(Dimension),
    Attribute(Attribute),
}

impl DataElement {
    pub fn name(&self) -> &str {
        match self {
            DataElement::Dimension(d) => &d.name,
            DataElement::Attribute(a) => &a.name,
        }
    }

    pub fn data_type(&self) -> DataType {
        match self {
            DataElement::Dimension(d) => d.data_type,
            DataElement::Attribute(a) => a.data_type,
        }
    }

    pub fn is_dimension(&self) -> bool {
        matches!(self, DataElement::Dimension(_))
    }

    pub fn as_dimension(&self) -> Option<&Dimension> {
        match self {
            DataElement::Dimension(d) => Some(d),
            DataElement::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            DataElement::Attribute(a) => Some(a),
            DataElement::Dimension(_) => None,
        }
    }

    pub(crate) fn set_name(&mut self, name: String) {
        match self {
            DataElement::Dimension(d) => d.name = name,
            DataElement::Attribute(a) => a.name = name,
        }
    }
}

impl From<Dimension> for DataElement {
    fn from(d: Dimension) -> Self {
        DataElement::Dimension(d)
    }
}

impl From<Attribute> for DataElement {
    fn from(a: Attribute) -> Self {
        DataElement::Attribute(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 3.0, 1.0, 4)]
    #[case(14.0, 35.0, 5.0, 5)]
    #[case(0.0, 1.0, 0.25, 5)]
    #[case(5.0, 5.0, 1.0, 1)]
    #[case(10.0, 19.0, 10.0, 1)]
    fn test_dimension_length(
        #[case] lower: f64,
        #[case] upper: f64,
        #[case] spacing: f64,
        #[case] expected: i64,
    ) {
        let dim = Dimension::implicit("x", DataType::Long, lower, upper, spacing);
        assert_eq!(dim.length(), expected);
        assert_eq!(dim.real_lower_bound, 0);
        assert_eq!(dim.real_upper_bound, expected - 1);
    }

    #[rstest]
    #[case(0.0, 1e19, 1.0)]
    #[case(-1e19, 1e19, 1.0)]
    #[case(0.0, 10.0, 0.0)]
    #[case(0.0, f64::INFINITY, 1.0)]
    fn test_length_out_of_range(#[case] lower: f64, #[case] upper: f64, #[case] spacing: f64) {
        assert_eq!(Dimension::length_between(lower, upper, spacing), None);
        let dim = Dimension::implicit("x", DataType::Long, lower, upper, spacing);
        assert_eq!(dim.checked_length(), None);
        assert_eq!(dim.length(), i64::MAX);
        assert_eq!(dim.real_upper_bound, i64::MAX - 1);
    }

    #[test]
    fn test_explicit_dimension_uses_unit_spacing() {
        let dim = Dimension::explicit("t", DataType::Double, 0.0, 9.0);
        assert_eq!(dim.dimension_type, DimensionType::Explicit);
        assert_eq!(dim.spacing, 1.0);
        assert_eq!(dim.length(), 10);
        assert!(!dim.is_implicit());
    }

    #[test]
    fn test_element_accessors() {
        let mut elem = DataElement::from(Attribute::new("v", DataType::Float));
        assert_eq!(elem.name(), "v");
        assert_eq!(elem.data_type(), DataType::Float);
        assert!(!elem.is_dimension());
        assert!(elem.as_dimension().is_none());

        elem.set_name("w".into());
        assert_eq!(elem.as_attribute().map(|a| a.name.as_str()), Some("w"));
    }
}
