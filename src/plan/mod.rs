//! Query plans: source TARs and operator applications wired into a DAG.
//!
//! Nodes live in a dense columnar `Registry`. Inputs must exist before the
//! node that reads them is added, so a plan built through `QueryPlan` is
//! acyclic by construction; `topology::sort` still checks.

pub mod registry;
pub mod topology;
pub mod types;

pub use registry::Registry;
pub use types::{NodeId, PlanNodeKind, PlanParameter, PlanValue};

use crate::operation::OperatorKind;
use crate::schema::Tar;
use crate::type_system::PlanError;
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct QueryPlan {
    registry: Registry,
}

impl QueryPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a deserialized registry, rebuilding its name cache.
    pub fn from_registry(mut registry: Registry) -> Self {
        registry.rebuild_name_cache();
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn node_count(&self) -> usize {
        self.registry.count()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.registry.names.get(id.index()).map(String::as_str)
    }

    pub fn kind(&self, id: NodeId) -> Option<&PlanNodeKind> {
        self.registry.kinds.get(id.index())
    }

    /// The node registered under exactly `name`.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.registry.names.iter().position(|n| n == name).map(NodeId::new)
    }

    pub fn add_source(&mut self, name: &str, tar: impl Into<Arc<Tar>>) -> NodeId {
        self.registry.add_node(PlanNodeKind::Source(tar.into()), name)
    }

    pub fn add_operator(
        &mut self,
        name: &str,
        kind: OperatorKind,
        params: Vec<PlanParameter>,
    ) -> Result<NodeId, PlanError> {
        self.add_checked(
            name,
            PlanNodeKind::Operator { kind, operator: kind.tag().to_string(), params },
        )
    }

    pub fn add_user_defined(
        &mut self,
        name: &str,
        operator: &str,
        params: Vec<PlanParameter>,
    ) -> Result<NodeId, PlanError> {
        self.add_checked(
            name,
            PlanNodeKind::Operator {
                kind: OperatorKind::UserDefined,
                operator: operator.to_string(),
                params,
            },
        )
    }

    fn add_checked(&mut self, name: &str, kind: PlanNodeKind) -> Result<NodeId, PlanError> {
        let node_id = NodeId::new(self.registry.count());
        if let Some(input) = kind.inputs().into_iter().find(|&i| !self.registry.contains(i)) {
            return Err(PlanError::UnresolvedInput { node_id, input });
        }
        Ok(self.registry.add_node(kind, name))
    }

    /// Swaps the TAR behind a source node and returns every node whose
    /// schema is now stale, the source included.
    pub fn replace_source(
        &mut self,
        id: NodeId,
        tar: impl Into<Arc<Tar>>,
    ) -> Result<HashSet<NodeId>, PlanError> {
        match self.registry.kinds.get_mut(id.index()) {
            Some(PlanNodeKind::Source(current)) => *current = tar.into(),
            _ => return Err(PlanError::NotASource(id)),
        }
        Ok(topology::downstream_from(&self.registry, &[id]))
    }
}
