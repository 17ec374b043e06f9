use crate::{AnchorSide, Edge, Node, NodeId, NODE_SIZE};
use dagpad_graph_layout::{
    LayeredLayout, LayeredLayoutError, LayoutEngine, Point, Vec2 as LayoutVec2,
};
use petgraph::graphmap::DiGraphMap;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Gap between ranks (x) and between rows within a rank (y)
const MARGIN: LayoutVec2 = LayoutVec2 { x: 60.0, y: 30.0 };

/// Result of an auto-layout pass: same topology, new positions
#[derive(Debug, Clone, PartialEq)]
pub struct Arranged {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Compute fresh positions for every step, flowing left-to-right
///
/// Pure with respect to its inputs: a new node sequence is returned and the
/// edges pass through value-unchanged. A cyclic snapshot falls back to the
/// positions it came with and a dangling edge is skipped for placement
/// purposes; neither is fatal.
pub fn arrange(nodes: &[Node], edges: &[Edge]) -> Arranged {
    // One layout vertex per step, identified by its index in the sequence
    let index_of: HashMap<&NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| (&node.id, index))
        .collect();

    let mut graph = DiGraphMap::<usize, ()>::new();
    for index in 0..nodes.len() {
        graph.add_node(index);
    }
    for edge in edges {
        let (Some(&source), Some(&target)) =
            (index_of.get(&edge.source), index_of.get(&edge.target))
        else {
            warn!("Dropping dangling edge {} -> {}", edge.source, edge.target);
            continue;
        };
        graph.add_edge(source, target, ());
    }

    // Every step shares the same fixed footprint
    let sizes = |_index: usize| LayoutVec2::new(NODE_SIZE.x, NODE_SIZE.y);

    let engine = LayeredLayout::new(MARGIN);
    let centers = match engine.layout(&graph, &sizes) {
        Ok(centers) => centers,
        Err(LayeredLayoutError::GraphHasCycle(index)) => {
            warn!(
                "Graph is cyclic (through {:?}), keeping current positions",
                nodes.get(index).map(|node| node.label.as_str())
            );
            nodes
                .iter()
                .enumerate()
                .map(|(index, node)| (index, center_of(node)))
                .collect()
        }
    };
    debug!("Arranged {} steps", centers.len());

    let nodes = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let mut node = node.clone();
            if let Some(center) = centers.get(&index) {
                // The engine reasons in centers, the canvas places rectangles
                // by their top-left corner
                node.pos = egui::pos2(
                    center.x - NODE_SIZE.x / 2.0,
                    center.y - NODE_SIZE.y / 2.0,
                );
            }
            // Incoming edges attach on the left face, outgoing on the right,
            // consistent with the left-to-right flow
            node.input_side = AnchorSide::Left;
            node.output_side = AnchorSide::Right;
            node
        })
        .collect();

    Arranged {
        nodes,
        edges: edges.to_vec(),
    }
}

fn center_of(node: &Node) -> Point {
    Point::new(
        node.pos.x + NODE_SIZE.x / 2.0,
        node.pos.y + NODE_SIZE.y / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Pos2};
    use test_log::test;

    fn node(id: &str) -> Node {
        Node::new(NodeId(id.to_string()), id, Pos2::ZERO)
    }

    fn node_at(id: &str, pos: Pos2) -> Node {
        Node::new(NodeId(id.to_string()), id, pos)
    }

    fn edge(source: &str, target: &str) -> Edge {
        Edge {
            source: NodeId(source.to_string()),
            target: NodeId(target.to_string()),
        }
    }

    fn position_of<'a>(arranged: &'a Arranged, id: &str) -> Pos2 {
        arranged
            .nodes
            .iter()
            .find(|node| node.id.0 == id)
            .unwrap()
            .pos
    }

    #[test]
    fn same_snapshot_same_arrangement() {
        let nodes = [node("a"), node("b"), node("c"), node("d")];
        let edges = [
            edge("a", "b"),
            edge("a", "c"),
            edge("b", "d"),
            edge("c", "d"),
        ];

        let first = arrange(&nodes, &edges);
        let second = arrange(&nodes, &edges);
        assert_eq!(first, second);
    }

    #[test]
    fn edges_pass_through_unchanged() {
        let nodes = [node("a"), node("b")];
        let edges = [edge("a", "b"), edge("a", "b")];

        let arranged = arrange(&nodes, &edges);
        assert_eq!(arranged.edges, edges.to_vec());
    }

    #[test]
    fn anchors_follow_the_left_to_right_flow() {
        let nodes = [node("a"), node("b")];
        let arranged = arrange(&nodes, &[edge("a", "b")]);

        for node in &arranged.nodes {
            assert_eq!(node.input_side, AnchorSide::Left);
            assert_eq!(node.output_side, AnchorSide::Right);
        }
    }

    #[test]
    fn sources_are_placed_left_of_their_targets() {
        let nodes = [node("a"), node("b"), node("c")];
        let arranged = arrange(&nodes, &[edge("a", "b"), edge("b", "c")]);

        let a = position_of(&arranged, "a");
        let b = position_of(&arranged, "b");
        let c = position_of(&arranged, "c");
        assert!(a.x + NODE_SIZE.x <= b.x);
        assert!(b.x + NODE_SIZE.x <= c.x);
    }

    #[test]
    fn centers_are_converted_to_top_left() {
        // A single step ends up with its center at half the footprint, so
        // its top-left corner lands on the origin
        let arranged = arrange(&[node_at("a", pos2(321.0, 123.0))], &[]);
        assert_eq!(position_of(&arranged, "a"), pos2(0.0, 0.0));
    }

    #[test]
    fn cyclic_input_keeps_positions() {
        let nodes = [
            node_at("a", pos2(10.0, 20.0)),
            node_at("b", pos2(30.0, 40.0)),
        ];
        let edges = [edge("a", "b"), edge("b", "a")];

        let arranged = arrange(&nodes, &edges);
        assert_eq!(position_of(&arranged, "a"), pos2(10.0, 20.0));
        assert_eq!(position_of(&arranged, "b"), pos2(30.0, 40.0));
        assert_eq!(arranged.edges, edges.to_vec());
    }

    #[test]
    fn dangling_edges_are_dropped_for_placement() {
        let nodes = [node("a"), node("b")];
        let edges = [edge("a", "b"), edge("b", "ghost")];

        let arranged = arrange(&nodes, &edges);
        let a = position_of(&arranged, "a");
        let b = position_of(&arranged, "b");
        assert!(a.x < b.x);
        // The dangling edge is still returned untouched
        assert_eq!(arranged.edges, edges.to_vec());
    }
}
