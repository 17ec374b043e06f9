pub mod layout;
pub mod ser;
pub mod validate;

pub use layout::{arrange, Arranged};
pub use validate::{validate, Verdict};

use derive_more::From;
use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Fixed footprint shared by every step on the canvas. The layout engine
/// sizes its vertices with this as well, so the two always agree.
pub const NODE_SIZE: egui::Vec2 = egui::Vec2 { x: 180.0, y: 50.0 };

/// Opaque step identifier, unique for the lifetime of a session and never
/// reused after deletion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, From)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The face of a step's rectangle where edges visually attach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorSide {
    Left,
    Right,
}

/// A pipeline step: identity, display label, and a top-left position owned
/// by the shell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub pos: Pos2,
    /// Face where incoming edges attach
    pub input_side: AnchorSide,
    /// Face where outgoing edges attach
    pub output_side: AnchorSide,
}

impl Node {
    pub fn new(id: NodeId, label: impl Into<String>, pos: Pos2) -> Self {
        Self {
            id,
            label: label.into(),
            pos,
            input_side: AnchorSide::Left,
            output_side: AnchorSide::Right,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.pos, NODE_SIZE)
    }
}

/// A directed connection between two steps. Parallel edges between the same
/// ordered pair are permitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

/// The mutable graph state owned by the shell
///
/// The validator and the layout engine never see this type; they receive
/// `&[Node]` / `&[Edge]` snapshots and return fresh derived data.
#[derive(Debug, Default)]
pub struct PipelineGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    next_id: u64,
}

impl PipelineGraph {
    /// Add a step at the given canvas position and return its id
    pub fn add_node(&mut self, pos: Pos2) -> NodeId {
        self.next_id += 1;
        let id = NodeId(format!("step-{}", self.next_id));
        debug!("Adding node {id}");
        self.nodes
            .push(Node::new(id.clone(), format!("Step {}", self.next_id), pos));
        id
    }

    /// Connect two steps. Self-loops are refused here so they never reach
    /// the validator.
    pub fn connect(&mut self, source: &NodeId, target: &NodeId) -> bool {
        if source == target {
            warn!("Refusing self-loop on {source}");
            return false;
        }
        debug!("Connecting {source} -> {target}");
        self.edges.push(Edge {
            source: source.clone(),
            target: target.clone(),
        });
        true
    }

    /// Remove a step and cascade-delete every edge referencing it
    pub fn remove_node(&mut self, id: &NodeId) {
        debug!("Removing node {id}");
        self.nodes.retain(|node| &node.id != id);
        self.edges
            .retain(|edge| &edge.source != id && &edge.target != id);
    }

    pub fn remove_edge(&mut self, index: usize) {
        if index < self.edges.len() {
            self.edges.remove(index);
        }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// Replace positions wholesale with a freshly arranged snapshot
    pub fn apply(&mut self, arranged: Arranged) {
        self.nodes = arranged.nodes;
        self.edges = arranged.edges;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn removing_a_node_cascades_to_its_edges() {
        let mut graph = PipelineGraph::default();
        let a = graph.add_node(Pos2::ZERO);
        let b = graph.add_node(Pos2::ZERO);
        let c = graph.add_node(Pos2::ZERO);
        graph.connect(&a, &b);
        graph.connect(&b, &c);
        graph.connect(&a, &c);

        graph.remove_node(&b);

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges, vec![Edge { source: a, target: c }]);
    }

    #[test]
    fn self_loops_are_refused() {
        let mut graph = PipelineGraph::default();
        let a = graph.add_node(Pos2::ZERO);

        assert!(!graph.connect(&a, &a));
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut graph = PipelineGraph::default();
        let a = graph.add_node(Pos2::ZERO);
        let b = graph.add_node(Pos2::ZERO);

        assert!(graph.connect(&a, &b));
        assert!(graph.connect(&a, &b));
        assert_eq!(graph.edges.len(), 2);
    }

    #[test]
    fn deleted_ids_are_never_reused() {
        let mut graph = PipelineGraph::default();
        let a = graph.add_node(Pos2::ZERO);
        graph.remove_node(&a);

        let b = graph.add_node(Pos2::ZERO);
        assert_ne!(a, b);
    }
}
