//! Primitive data types of dimensions and attributes.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
}

impl DataType {
    /// Canonical lowercase name, as used in catalog listings and signatures.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
            DataType::String => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// Position in the numeric widening order `Integer < Long < Float < Double`.
    pub fn numeric_rank(&self) -> Option<u8> {
        match self {
            DataType::Integer => Some(0),
            DataType::Long => Some(1),
            DataType::Float => Some(2),
            DataType::Double => Some(3),
            DataType::Boolean | DataType::String => None,
        }
    }

    /// The narrowest numeric type that represents `value` exactly.
    ///
    /// Candidates are tried in widening order, so `3.0` is an `Integer`,
    /// `2^40` a `Long`, `0.5` a `Float` and `0.1` a `Double`.
    pub fn natural_type_of(value: f64) -> DataType {
        if value == (value as i32) as f64 {
            DataType::Integer
        } else if value == (value as i64) as f64 {
            DataType::Long
        } else if value == (value as f32) as f64 {
            DataType::Float
        } else {
            DataType::Double
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown data type '{0}'")]
pub struct UnknownDataType(pub String);

impl FromStr for DataType {
    type Err = UnknownDataType;

    /// Dispatches on the first letter, so both `int` and `integer` parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().chars().next() {
            Some('i') => Ok(DataType::Integer),
            Some('l') => Ok(DataType::Long),
            Some('f') => Ok(DataType::Float),
            Some('d') => Ok(DataType::Double),
            Some('b') => Ok(DataType::Boolean),
            Some('s') => Ok(DataType::String),
            _ => Err(UnknownDataType(s.to_string())),
        }
    }
}
