//! Shortened, human-readable projection of the graph for the debug panel
//!
//! Cosmetic only: nothing reads this back, it is not a persistence format.

use crate::{Edge, Node};
use serde::Serialize;

#[derive(Serialize)]
struct NodeView<'a> {
    id: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct EdgeView<'a> {
    source: &'a str,
    target: &'a str,
}

#[derive(Serialize)]
struct GraphView<'a> {
    nodes: Vec<NodeView<'a>>,
    edges: Vec<EdgeView<'a>>,
}

/// Render the {id, label} / {source, target} projection as pretty JSON
pub fn debug_json(nodes: &[Node], edges: &[Edge]) -> String {
    let view = GraphView {
        nodes: nodes
            .iter()
            .map(|node| NodeView {
                id: &node.id.0,
                label: &node.label,
            })
            .collect(),
        edges: edges
            .iter()
            .map(|edge| EdgeView {
                source: &edge.source.0,
                target: &edge.target.0,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&view).unwrap_or_else(|e| format!("serialization error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeId;
    use egui::Pos2;

    #[test]
    fn projection_keeps_ids_and_labels_only() {
        let nodes = [Node::new(NodeId("step-1".into()), "Fetch", Pos2::ZERO)];
        let edges = [Edge {
            source: NodeId("step-1".into()),
            target: NodeId("step-2".into()),
        }];

        let json = debug_json(&nodes, &edges);
        assert!(json.contains("\"id\": \"step-1\""));
        assert!(json.contains("\"label\": \"Fetch\""));
        assert!(json.contains("\"target\": \"step-2\""));
        assert!(!json.contains("pos"));
    }
}
