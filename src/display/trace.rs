use crate::plan::{NodeId, PlanNodeKind, PlanParameter, PlanValue, QueryPlan};
use crate::type_system::InferredPlan;
use std::collections::HashMap;
use std::fmt::Write;

/// Renders the dependency tree of `target`, one line per node with its
/// operator and inferred schema. A node reached twice is printed once and
/// referenced by level afterwards.
pub fn format_schema_trace(plan: &QueryPlan, inferred: &InferredPlan, target: NodeId) -> String {
    let mut tracer = Tracer {
        plan,
        inferred,
        visited_at_level: HashMap::new(),
        output: String::new(),
    };

    match plan.name(target) {
        Some(name) => {
            let _ = writeln!(tracer.output, "SCHEMA TRACE for node '{}':", name);
            let _ = writeln!(tracer.output, "--------------------------------------------------");
            tracer.trace_node(target, 1, "");
        }
        None => {
            let _ = writeln!(tracer.output, "Error: Invalid Node ID {:?}", target);
        }
    }
    tracer.output
}

struct Tracer<'a> {
    plan: &'a QueryPlan,
    inferred: &'a InferredPlan,
    visited_at_level: HashMap<NodeId, usize>,
    output: String,
}

impl<'a> Tracer<'a> {
    fn trace_node(&mut self, node_id: NodeId, level: usize, prefix: &str) {
        if let Some(&first_seen) = self.visited_at_level.get(&node_id) {
            let _ = writeln!(self.output, "{}-> (Ref to L{})", prefix, first_seen);
            return;
        }
        self.visited_at_level.insert(node_id, level);

        let registry = self.plan.registry();
        let name = &registry.names[node_id.index()];
        let line_header = format!("[L{}] {} {}", level, name, self.format_schema(node_id));

        match &registry.kinds[node_id.index()] {
            PlanNodeKind::Source(tar) => {
                let _ = writeln!(
                    self.output,
                    "{}{} -> Source({})",
                    prefix,
                    line_header,
                    tar.name()
                );
            }
            PlanNodeKind::Operator { operator, params, .. } => {
                let call = self.format_call(operator, params);
                let _ = writeln!(self.output, "{}{} = {}", prefix, line_header, call);
                let parents = registry.get_parents(node_id).to_vec();
                self.recurse_children(prefix, &parents, level);
            }
        }
    }

    fn recurse_children(&mut self, prefix: &str, children: &[NodeId], level: usize) {
        let stem = build_child_stem(prefix);
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`--" } else { "|--" };
            let full_prefix = format!("{}{}", stem, connector);
            self.trace_node(child, level + 1, &full_prefix);
        }
    }

    fn format_call(&self, operator: &str, params: &[PlanParameter]) -> String {
        let args: Vec<String> = params
            .iter()
            .map(|p| match &p.value {
                PlanValue::Input(id) => {
                    format!("{}={}", p.name, self.plan.name(*id).unwrap_or("?"))
                }
                PlanValue::LiteralString(s) => format!("{}='{}'", p.name, s),
                PlanValue::LiteralDouble(v) => format!("{}={}", p.name, v),
            })
            .collect();
        format!("{}({})", operator, args.join(", "))
    }

    fn format_schema(&self, id: NodeId) -> String {
        match self.inferred.get(id) {
            Some(tar) => {
                let typed =
                    tar.nominal_type().map(|t| format!(" : {}", t.name)).unwrap_or_default();
                format!("[{}{}]", tar.signature(), typed)
            }
            None => "[?]".to_string(),
        }
    }
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}
