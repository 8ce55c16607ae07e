use crate::operation::OperatorKind;
use crate::schema::Tar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
    pub fn new(idx: usize) -> Self {
        Self(idx as u32)
    }
}

/// A plan-level parameter value. `Input` refers to another node, whose
/// inferred schema is substituted when the operator is inferred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanValue {
    Input(NodeId),
    LiteralString(String),
    LiteralDouble(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanParameter {
    pub name: String,
    pub value: PlanValue,
}

impl PlanParameter {
    pub fn input(name: impl Into<String>, node: NodeId) -> Self {
        Self { name: name.into(), value: PlanValue::Input(node) }
    }

    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: PlanValue::LiteralString(value.into()) }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self { name: name.into(), value: PlanValue::LiteralDouble(value) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlanNodeKind {
    /// A catalog TAR; its schema is known up front.
    Source(Arc<Tar>),
    Operator {
        kind: OperatorKind,
        /// The kind tag, or the registered name of a user-defined operator.
        operator: String,
        params: Vec<PlanParameter>,
    },
}

impl PlanNodeKind {
    /// Nodes this one reads from, in parameter order.
    pub fn inputs(&self) -> Vec<NodeId> {
        match self {
            PlanNodeKind::Source(_) => Vec::new(),
            PlanNodeKind::Operator { params, .. } => params
                .iter()
                .filter_map(|p| match p.value {
                    PlanValue::Input(id) => Some(id),
                    _ => None,
                })
                .collect(),
        }
    }
}
