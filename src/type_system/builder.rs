//! Single-operator schema inference: binds an operation's parameters and
//! dispatches to the rule for its kind.
use super::error::SchemaError;
use super::rules::{aggregate, arithmetic, join, predicate, structural};
use crate::operation::{Operation, OperatorArgs};
use crate::schema::Tar;
use crate::services::{
    operator_schema_key, ConfigurationManager, EngineConfig, GridStorage, NamingConventions,
    StorageManager,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Derives output schemas. Holds no per-call state, so one builder can
/// serve many threads at once.
pub struct SchemaBuilder {
    storage: Arc<dyn StorageManager>,
    config: Arc<dyn ConfigurationManager>,
    conventions: NamingConventions,
}

impl SchemaBuilder {
    pub fn new(
        storage: Arc<dyn StorageManager>,
        config: Arc<dyn ConfigurationManager>,
        conventions: NamingConventions,
    ) -> Self {
        Self { storage, config, conventions }
    }

    /// A builder over in-process grid storage, using the conventions and
    /// values of `config`.
    pub fn from_config(config: EngineConfig) -> Self {
        let conventions = config.conventions.clone();
        Self::new(Arc::new(GridStorage), Arc::new(config), conventions)
    }

    pub fn conventions(&self) -> &NamingConventions {
        &self.conventions
    }

    /// The output schema of `operation`. Pure in its inputs: the same
    /// operation always yields an equal schema, and no input TAR is touched.
    pub fn infer_schema(&self, operation: &Operation) -> Result<Tar, SchemaError> {
        let args = OperatorArgs::bind(operation)?;
        let conventions = &self.conventions;

        let result = match &args {
            OperatorArgs::Scan(a) | OperatorArgs::Filter(a) | OperatorArgs::Split(a) => {
                structural::infer_passthrough(a)
            }
            OperatorArgs::Select(a) => structural::infer_select(a, conventions)?,
            OperatorArgs::Subset(a) => structural::infer_subset(a)?,
            OperatorArgs::Logical(a) | OperatorArgs::Comparison(a) => {
                predicate::infer_predicate(a, conventions)
            }
            OperatorArgs::Arithmetic(a) => arithmetic::infer_arithmetic(a, conventions)?,
            OperatorArgs::Cross(a) => join::infer_cross(a, conventions),
            OperatorArgs::DimJoin(a) => {
                join::infer_dim_join(a, self.storage.as_ref(), conventions)?
            }
            OperatorArgs::Aggregate(a) => aggregate::infer_aggregate(a, conventions)?,
            OperatorArgs::UserDefined(a) => {
                let key = operator_schema_key(&a.operator);
                let registered = self.config.get_string_value(&key);
                warn!(
                    operator = %a.operator,
                    registered = registered.is_some(),
                    "no static schema rule for user-defined operator"
                );
                return Err(SchemaError::UnsupportedOperator { operator: a.operator.clone() });
            }
        };

        debug!(
            operator = %args.kind(),
            elements = result.elements().len(),
            typed = result.nominal_type().is_some(),
            "inferred schema"
        );
        Ok(result)
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::from_config(EngineConfig::default())
    }
}
