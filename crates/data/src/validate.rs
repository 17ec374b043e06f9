use crate::{Edge, Node, NodeId};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Outcome of a validation pass, rendered verbatim by the status panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_valid: bool,
    pub message: String,
}

impl Verdict {
    fn valid(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Decide whether the snapshot is a well-formed pipeline DAG
///
/// Rules are checked in order and the first match wins: an empty graph is
/// fine, a single step is not enough, every step must touch at least one
/// edge, and the edge set must be acyclic. Edges referencing unknown ids
/// are ignored rather than treated as errors.
pub fn validate(nodes: &[Node], edges: &[Edge]) -> Verdict {
    if nodes.is_empty() {
        return Verdict::valid("Add your first node");
    }

    if nodes.len() < 2 {
        return Verdict::invalid("Add at least 2 nodes");
    }

    // Every node must appear on at least one edge. Weaker than requiring a
    // single connected component: disjoint islands pass.
    let connected: HashSet<&NodeId> = edges
        .iter()
        .flat_map(|edge| [&edge.source, &edge.target])
        .collect();
    if let Some(node) = nodes.iter().find(|node| !connected.contains(&node.id)) {
        return Verdict::invalid(format!(
            "Node \"{}\" is not connected, every node must be connected.",
            node.label
        ));
    }

    if has_cycle(nodes, edges) {
        return Verdict::invalid("Cycle detected! cycles are not allowed in a DAG.");
    }

    Verdict::valid("DAG is valid")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Three-color depth-first search with an explicit stack
///
/// A back edge into a node on the active path signals a cycle; reconverging
/// paths and parallel edges do not, since their target is already `Done`.
fn has_cycle(nodes: &[Node], edges: &[Edge]) -> bool {
    let index_of: HashMap<&NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (&node.id, index))
        .collect();

    // Adjacency in edge insertion order, dropping dangling edges
    let mut adjacency = vec![Vec::new(); nodes.len()];
    for edge in edges {
        let (Some(&source), Some(&target)) =
            (index_of.get(&edge.source), index_of.get(&edge.target))
        else {
            trace!("Ignoring dangling edge {} -> {}", edge.source, edge.target);
            continue;
        };
        adjacency[source].push(target);
    }

    let mut marks = vec![Mark::Unvisited; nodes.len()];

    for root in 0..nodes.len() {
        if marks[root] != Mark::Unvisited {
            continue;
        }

        // Each frame is (node, index of the next successor to look at)
        let mut stack = vec![(root, 0)];
        marks[root] = Mark::OnPath;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let next = frame.1;
            frame.1 += 1;

            if let Some(&succ) = adjacency[node].get(next) {
                match marks[succ] {
                    Mark::OnPath => return true,
                    Mark::Unvisited => {
                        marks[succ] = Mark::OnPath;
                        stack.push((succ, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
                stack.pop();
            }
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;
    use test_log::test;

    fn node(id: &str) -> Node {
        Node::new(NodeId(id.to_string()), id, Pos2::ZERO)
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: NodeId(source.to_string()),
            target: NodeId(target.to_string()),
        }
    }

    #[test]
    fn empty_graph_is_valid() {
        let verdict = validate(&[], &[]);
        assert!(verdict.is_valid);
        assert_eq!(verdict.message, "Add your first node");
    }

    #[test]
    fn a_single_node_is_not_enough() {
        let verdict = validate(&[node("a")], &[]);
        assert!(!verdict.is_valid);
        assert_eq!(verdict.message, "Add at least 2 nodes");
    }

    #[test]
    fn two_nodes_without_edges_are_disconnected() {
        let verdict = validate(&[node("a"), node("b")], &[]);
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.message,
            "Node \"a\" is not connected, every node must be connected."
        );
    }

    #[test]
    fn first_disconnected_node_is_named() {
        let nodes = [node("a"), node("b"), node("c")];
        let verdict = validate(&nodes, &[edge("a", "b")]);
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.message,
            "Node \"c\" is not connected, every node must be connected."
        );
    }

    #[test]
    fn linear_chain_is_valid() {
        let nodes = [node("a"), node("b"), node("c")];
        let verdict = validate(&nodes, &[edge("a", "b"), edge("b", "c")]);
        assert!(verdict.is_valid);
        assert_eq!(verdict.message, "DAG is valid");
    }

    #[test]
    fn two_node_cycle_is_rejected() {
        let nodes = [node("a"), node("b")];
        let verdict = validate(&nodes, &[edge("a", "b"), edge("b", "a")]);
        assert!(!verdict.is_valid);
        assert_eq!(
            verdict.message,
            "Cycle detected! cycles are not allowed in a DAG."
        );
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let nodes = [node("a"), node("b"), node("c"), node("d")];
        let edges = [
            edge("a", "b"),
            edge("a", "c"),
            edge("b", "d"),
            edge("c", "d"),
        ];
        assert!(validate(&nodes, &edges).is_valid);
    }

    #[test]
    fn parallel_edges_are_not_a_cycle() {
        let nodes = [node("a"), node("b")];
        let verdict = validate(&nodes, &[edge("a", "b"), edge("a", "b")]);
        assert!(verdict.is_valid);
    }

    #[test]
    fn longer_cycle_is_found_from_any_root() {
        let nodes = [node("a"), node("b"), node("c"), node("d")];
        // "a" is a dead end; the cycle lives in b -> c -> d -> b
        let edges = [
            edge("b", "a"),
            edge("b", "c"),
            edge("c", "d"),
            edge("d", "b"),
        ];
        assert!(!validate(&nodes, &edges).is_valid);
    }

    #[test]
    fn disjoint_islands_pass() {
        let nodes = [node("a"), node("b"), node("c"), node("d")];
        let verdict = validate(&nodes, &[edge("a", "b"), edge("c", "d")]);
        assert!(verdict.is_valid);
    }

    #[test]
    fn dangling_edges_are_ignored() {
        let nodes = [node("a"), node("b")];
        let edges = [edge("a", "b"), edge("a", "ghost"), edge("ghost", "b")];
        assert!(validate(&nodes, &edges).is_valid);
    }
}
