//! The schema data model for Tensor Algebra Relations (TARs).
//!
//! A TAR is an ordered list of data elements (dimensions and attributes),
//! optionally conforming to a nominal `TypeDef` through role bindings. These
//! types carry no inference logic; the `type_system` module derives new
//! schemas from them.

pub mod data_type;
pub mod element;
pub mod nominal;
pub mod tar;

// Re-export key types for convenient access
pub use data_type::DataType;
pub use element::{Attribute, DataElement, Dimension, DimensionType};
pub use nominal::{Role, TypeDef};
pub use tar::{SchemaClone, Tar};
