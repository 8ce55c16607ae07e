//! Logical and comparison operators produce a sparse predicate result: the
//! input schema plus a boolean mask and a long offset attribute.
use crate::operation::UnaryArgs;
use crate::schema::{Attribute, DataType, SchemaClone, Tar};
use crate::services::NamingConventions;

/// The result carries no nominal type: a predicate result is a new kind of
/// relation, whatever its input was.
pub(crate) fn infer_predicate(args: &UnaryArgs, conventions: &NamingConventions) -> Tar {
    let mut result = args.input.clone_schema(SchemaClone::STRUCTURAL);
    result.push(Attribute::new(conventions.mask_attribute.clone(), DataType::Boolean));
    result.push(Attribute::new(conventions.offset_attribute.clone(), DataType::Long));
    result
}
