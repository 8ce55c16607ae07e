use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    // Columnar Arrays
    pub kinds: Vec<PlanNodeKind>,
    pub names: Vec<String>,

    // Topology (CSR-ish + Adjacency)
    pub parents_flat: Vec<NodeId>,
    pub parents_ranges: Vec<(u32, u32)>, // (start, count)

    // Downstream traversal helpers
    pub first_child: Vec<u32>,
    pub child_targets: Vec<NodeId>,
    pub next_child: Vec<u32>,

    // Ephemeral state for uniqueness checks (Not serialized, rebuilt on load)
    #[serde(skip)]
    pub used_names: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.kinds.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.count()
    }

    /// Rebuilds the `used_names` set after deserialization.
    pub fn rebuild_name_cache(&mut self) {
        self.used_names = self.names.iter().cloned().collect();
    }

    /// Appends a node. Every input must already be registered; the caller
    /// checks this, so an input can never point forward.
    pub fn add_node(&mut self, kind: PlanNodeKind, name: &str) -> NodeId {
        let id = NodeId(self.kinds.len() as u32);

        // --- Unique Name Enforcement ---
        let mut candidate_name = name.to_string();
        let mut counter = 1;
        while self.used_names.contains(&candidate_name) {
            candidate_name = format!("{}_{}", name, counter);
            counter += 1;
        }
        self.used_names.insert(candidate_name.clone());

        // 1. Register Parents
        let parents = kind.inputs();
        let start = self.parents_flat.len() as u32;
        self.parents_flat.extend_from_slice(&parents);
        self.parents_ranges.push((start, parents.len() as u32));

        // 2. Register Children (Adjacency list for downstream lookups)
        for &parent in &parents {
            let p_idx = parent.index();
            let head = self.first_child[p_idx];
            let new_edge = self.child_targets.len() as u32;
            self.child_targets.push(id);
            self.next_child.push(head);
            self.first_child[p_idx] = new_edge;
        }

        // 3. Metadata
        self.kinds.push(kind);
        self.names.push(candidate_name);
        self.first_child.push(u32::MAX);

        id
    }

    #[inline(always)]
    pub fn get_parents(&self, id: NodeId) -> &[NodeId] {
        let (start, count) = self.parents_ranges[id.index()];
        &self.parents_flat[start as usize..(start + count) as usize]
    }

    /// Direct consumers of `id`, most recently added first.
    pub fn get_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = Vec::new();
        let mut edge_idx = self.first_child[id.index()];
        while edge_idx != u32::MAX {
            children.push(self.child_targets[edge_idx as usize]);
            edge_idx = self.next_child[edge_idx as usize];
        }
        children
    }
}
