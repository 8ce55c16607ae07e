//! Walks a query plan bottom-up and infers the schema of every node.
use super::builder::SchemaBuilder;
use super::error::PlanError;
use crate::operation::{Operation, OperatorKind, Parameter, ParameterValue};
use crate::plan::{topology, NodeId, PlanNodeKind, PlanParameter, PlanValue, QueryPlan};
use crate::schema::Tar;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Per-node schemas of a checked plan, indexed by `NodeId`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InferredPlan {
    schemas: Vec<Option<Arc<Tar>>>,
}

impl InferredPlan {
    pub fn get(&self, id: NodeId) -> Option<&Arc<Tar>> {
        self.schemas.get(id.index()).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.schemas.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Arc<Tar>)> {
        self.schemas
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (NodeId::new(i), s)))
    }
}

/// Orchestrates schema inference over a plan.
pub struct SchemaChecker<'a> {
    plan: &'a QueryPlan,
    builder: &'a SchemaBuilder,
    inferred: Vec<Option<Arc<Tar>>>,
}

impl<'a> SchemaChecker<'a> {
    pub fn new(plan: &'a QueryPlan, builder: &'a SchemaBuilder) -> Self {
        Self { plan, builder, inferred: vec![None; plan.node_count()] }
    }

    /// Reuses the schemas of `previous` for every node not in `stale`, so
    /// only the nodes affected by a change are inferred again.
    pub fn with_previous(mut self, previous: &InferredPlan, stale: &HashSet<NodeId>) -> Self {
        for (id, schema) in previous.iter() {
            if id.index() < self.inferred.len() && !stale.contains(&id) {
                self.inferred[id.index()] = Some(Arc::clone(schema));
            }
        }
        self
    }

    /// Infers every node in topological order. The first failing node
    /// aborts the walk.
    pub fn check_and_infer(mut self) -> Result<InferredPlan, PlanError> {
        let order = topology::sort(self.plan.registry())?;

        for node_id in order {
            if self.inferred[node_id.index()].is_some() {
                continue;
            }
            let schema = self.check_node(node_id)?;
            self.inferred[node_id.index()] = Some(schema);
        }

        Ok(InferredPlan { schemas: self.inferred })
    }

    fn check_node(&self, node_id: NodeId) -> Result<Arc<Tar>, PlanError> {
        let registry = self.plan.registry();
        let name = &registry.names[node_id.index()];

        match &registry.kinds[node_id.index()] {
            PlanNodeKind::Source(tar) => Ok(Arc::clone(tar)),
            PlanNodeKind::Operator { kind, operator, params } => {
                let operation = self.to_operation(node_id, *kind, operator, params)?;
                let mut schema = self
                    .builder
                    .infer_schema(&operation)
                    .map_err(|e| e.at_node(node_id, name.clone()))?;
                schema.set_name(name.clone());
                debug!(
                    node = %name,
                    operator = %operator,
                    schema = %schema.signature(),
                    "checked plan node"
                );
                Ok(Arc::new(schema))
            }
        }
    }

    /// Substitutes already-inferred input schemas for node references.
    fn to_operation(
        &self,
        node_id: NodeId,
        kind: OperatorKind,
        operator: &str,
        params: &[PlanParameter],
    ) -> Result<Operation, PlanError> {
        let mut operation = match kind {
            OperatorKind::UserDefined => Operation::user_defined(operator),
            _ => Operation::new(kind),
        };
        for param in params {
            let value = match &param.value {
                PlanValue::Input(input) => {
                    let schema = self
                        .inferred
                        .get(input.index())
                        .and_then(Option::as_ref)
                        .ok_or(PlanError::UnresolvedInput { node_id, input: *input })?;
                    ParameterValue::TarReference(Arc::clone(schema))
                }
                PlanValue::LiteralString(s) => ParameterValue::LiteralString(s.clone()),
                PlanValue::LiteralDouble(v) => ParameterValue::LiteralDouble(*v),
            };
            operation = operation.with_parameter(Parameter::new(param.name.clone(), value));
        }
        Ok(operation)
    }
}

/// Checks independent plans in parallel with one shared builder.
pub fn infer_plans(
    plans: &[QueryPlan],
    builder: &SchemaBuilder,
) -> Vec<Result<InferredPlan, PlanError>> {
    plans
        .par_iter()
        .map(|plan| SchemaChecker::new(plan, builder).check_and_infer())
        .collect()
}
