use super::registry::Registry;
use super::types::NodeId;
use crate::type_system::PlanError;
use std::collections::{HashSet, VecDeque};

/// Performs a Topological Sort using Depth-First Search (DFS).
///
/// Returns a list of NodeIds where every input appears before its consumer.
/// Disconnected nodes are included, in registration order.
pub fn sort(registry: &Registry) -> Result<Vec<NodeId>, PlanError> {
    let count = registry.count();
    let mut order = Vec::with_capacity(count);
    let mut state = vec![VisitState::None; count];

    for i in 0..count {
        if state[i] == VisitState::None {
            visit(NodeId::new(i), registry, &mut state, &mut order)?;
        }
    }

    Ok(order)
}

#[derive(Clone, PartialEq, Eq)]
enum VisitState {
    None,
    Visiting, // Used for cycle detection
    Visited,
}

fn visit(
    node: NodeId,
    registry: &Registry,
    state: &mut Vec<VisitState>,
    order: &mut Vec<NodeId>,
) -> Result<(), PlanError> {
    let idx = node.index();

    match state[idx] {
        VisitState::Visited => return Ok(()),
        VisitState::Visiting => {
            return Err(PlanError::Cycle(format!(
                "Cycle detected involving node '{}'",
                registry.names[idx]
            )))
        }
        VisitState::None => state[idx] = VisitState::Visiting,
    }

    for &parent in registry.get_parents(node) {
        visit(parent, registry, state, order)?;
    }

    state[idx] = VisitState::Visited;
    order.push(node);
    Ok(())
}

/// Identifies all nodes downstream from the given start nodes (inclusive).
/// These are the schemas that go stale when a start node changes.
pub fn downstream_from(registry: &Registry, start_nodes: &[NodeId]) -> HashSet<NodeId> {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from(start_nodes.to_vec());

    while let Some(node) = queue.pop_front() {
        if visited.insert(node) {
            let mut edge_idx = registry.first_child[node.index()];
            while edge_idx != u32::MAX {
                queue.push_back(registry.child_targets[edge_idx as usize]);
                edge_idx = registry.next_child[edge_idx as usize];
            }
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::OperatorKind;
    use crate::plan::types::{PlanNodeKind, PlanParameter};
    use crate::schema::Tar;
    use std::sync::Arc;

    fn source() -> PlanNodeKind {
        PlanNodeKind::Source(Arc::new(Tar::new("t")))
    }

    fn cross(left: NodeId, right: NodeId) -> PlanNodeKind {
        PlanNodeKind::Operator {
            kind: OperatorKind::Cross,
            operator: "cross".into(),
            params: vec![PlanParameter::input("left", left), PlanParameter::input("right", right)],
        }
    }

    #[test]
    fn test_sort_diamond_dependency() {
        // Shape: A -> B, A -> C, B+C -> D
        let mut reg = Registry::new();
        let a = reg.add_node(source(), "A");
        let b = reg.add_node(cross(a, a), "B");
        let c = reg.add_node(cross(a, a), "C");
        let d = reg.add_node(cross(b, c), "D");

        let res = sort(&reg).expect("Sort failed");

        let pos = |id: NodeId| res.iter().position(|&x| x == id).unwrap();
        assert!(pos(a) < pos(b));
        assert!(pos(a) < pos(c));
        assert!(pos(b) < pos(d));
        assert!(pos(c) < pos(d));
        assert_eq!(res.len(), 4);
    }

    #[test]
    fn test_cycle_detection_explicit() {
        let mut reg = Registry::new();
        let a = reg.add_node(source(), "A");
        let b = reg.add_node(cross(a, a), "B");

        // Inject the edge A <- B directly; the public API cannot build one.
        assert_eq!(reg.parents_ranges[0].1, 0);
        reg.parents_flat.push(b);
        let new_start = (reg.parents_flat.len() - 1) as u32;
        reg.parents_ranges[0] = (new_start, 1);

        let err = sort(&reg).unwrap_err();
        assert!(err.to_string().contains("Cycle detected"), "Msg: {}", err);
    }

    #[test]
    fn test_downstream_from_source() {
        let mut reg = Registry::new();
        let a = reg.add_node(source(), "A");
        let other = reg.add_node(source(), "other");
        let b = reg.add_node(cross(a, other), "B");
        let c = reg.add_node(cross(other, other), "C");
        let d = reg.add_node(cross(b, c), "D");

        let stale = downstream_from(&reg, &[a]);
        assert_eq!(stale, HashSet::from([a, b, d]));
        assert!(!stale.contains(&c));
    }
}
