mod crossings;
mod layers;
mod positions;

use crate::{LayoutEngine, NodeSizes, Point, Vec2};
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::{IntoNeighborsDirected, IntoNodeIdentifiers};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

use crossings::minimize_crossings;
use layers::assign_layers;
use positions::assign_coordinates;

/// Errors that can occur during layered layout computation
#[derive(Debug, Error)]
pub enum LayeredLayoutError<N>
where
    N: fmt::Debug,
{
    /// The graph contains a cycle at the given node
    #[error("graph contains a cycle at node {0:?}")]
    GraphHasCycle(N),
}

/// Configuration for the layered (Sugiyama-style) DAG layout
///
/// Layers advance along +x, so edges flow left-to-right. Nodes within a
/// layer are spread along y.
#[derive(Debug, Clone)]
pub struct LayeredLayout {
    /// Horizontal and vertical margins between nodes
    pub margin: Vec2,

    /// Maximum iterations for crossing minimization
    pub max_crossing_iterations: usize,

    /// Maximum iterations for vertical position optimization
    pub max_position_iterations: usize,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        Self {
            margin: Vec2::new(20.0, 20.0),
            max_crossing_iterations: 10,
            max_position_iterations: 50,
        }
    }
}

impl LayeredLayout {
    /// Create a new layered layout with the given margin
    pub fn new(margin: Vec2) -> Self {
        Self {
            margin,
            ..Default::default()
        }
    }
}

/// Layer structure that can be cached and reused
#[derive(Debug, Clone)]
pub struct Layers<N>
where
    N: Copy + Ord + Hash + fmt::Debug,
{
    /// Internal graph representation for efficient edge lookups
    pub(crate) graph: DiGraphMap<N, ()>,

    /// Nodes organized into topological layers
    pub nodes: Vec<Vec<N>>,

    /// Number of edge crossings (quality metric)
    pub crossings: usize,
}

impl LayeredLayout {
    /// Compute layer structure (expensive, cache this)
    ///
    /// This phase assigns nodes to layers and minimizes edge crossings.
    /// It only depends on the graph structure, not on node sizes.
    ///
    /// # Errors
    /// Returns an error if the graph contains cycles
    pub fn compute_layers<G>(
        &self,
        graph: G,
    ) -> Result<Layers<G::NodeId>, LayeredLayoutError<G::NodeId>>
    where
        G: IntoNodeIdentifiers + IntoNeighborsDirected,
        G::NodeId: Copy + Ord + Hash + fmt::Debug,
    {
        let layers = assign_layers(&graph)?;
        let (layers, crossings) = minimize_crossings(&graph, layers, self.max_crossing_iterations);

        // Convert graph to DiGraphMap for efficient lookups during positioning
        let mut internal_graph = DiGraphMap::new();
        for node in graph.node_identifiers() {
            internal_graph.add_node(node);
        }
        for node in graph.node_identifiers() {
            for succ in graph.neighbors_directed(node, Direction::Outgoing) {
                internal_graph.add_edge(node, succ, ());
            }
        }

        Ok(Layers {
            graph: internal_graph,
            nodes: layers,
            crossings,
        })
    }

    /// Compute center positions from cached layers (cheap, rerun when sizes change)
    ///
    /// This phase assigns coordinates to nodes based on their layer structure
    /// and current sizes. It can be called repeatedly as node sizes change.
    pub fn compute_positions<N, S>(&self, layers: &Layers<N>, sizes: &S) -> HashMap<N, Point>
    where
        N: Copy + Ord + Hash + fmt::Debug,
        S: NodeSizes<N>,
    {
        assign_coordinates(
            &layers.nodes,
            &layers.graph,
            sizes,
            self.margin,
            self.max_position_iterations,
        )
    }
}

// Implement LayoutEngine for any graph with the required capabilities
impl<G> LayoutEngine<G> for LayeredLayout
where
    G: IntoNodeIdentifiers + IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash + fmt::Debug,
{
    type NodeId = G::NodeId;
    type Error = LayeredLayoutError<G::NodeId>;

    fn layout<S>(&self, graph: G, sizes: &S) -> Result<HashMap<Self::NodeId, Point>, Self::Error>
    where
        S: NodeSizes<Self::NodeId>,
    {
        let layers = self.compute_layers(graph)?;
        Ok(self.compute_positions(&layers, sizes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE: Vec2 = Vec2 { x: 100.0, y: 40.0 };

    fn sizes(_node: u32) -> Vec2 {
        NODE
    }

    fn layer_of(layers: &Layers<u32>, node: u32) -> usize {
        layers
            .nodes
            .iter()
            .position(|layer| layer.contains(&node))
            .unwrap()
    }

    #[test]
    fn chain_is_ranked_in_edge_order() {
        let mut graph = DiGraphMap::new();
        graph.add_edge(1, 2, ());
        graph.add_edge(2, 3, ());

        let layers = LayeredLayout::default().compute_layers(&graph).unwrap();
        assert_eq!(layer_of(&layers, 1), 0);
        assert_eq!(layer_of(&layers, 2), 1);
        assert_eq!(layer_of(&layers, 3), 2);
    }

    #[test]
    fn diamond_reconverges_without_extra_layers() {
        let mut graph = DiGraphMap::new();
        graph.add_edge(1, 2, ());
        graph.add_edge(1, 3, ());
        graph.add_edge(2, 4, ());
        graph.add_edge(3, 4, ());

        let layers = LayeredLayout::default().compute_layers(&graph).unwrap();
        assert_eq!(layers.nodes.len(), 3);
        assert_eq!(layer_of(&layers, 2), 1);
        assert_eq!(layer_of(&layers, 3), 1);
        assert_eq!(layer_of(&layers, 4), 2);
    }

    #[test]
    fn cycle_is_reported() {
        let mut graph = DiGraphMap::new();
        graph.add_edge(1, 2, ());
        graph.add_edge(2, 1, ());

        let result = LayeredLayout::default().compute_layers(&graph);
        assert!(matches!(result, Err(LayeredLayoutError::GraphHasCycle(_))));
    }

    #[test]
    fn positions_are_centers_advancing_left_to_right() {
        let mut graph = DiGraphMap::new();
        graph.add_edge(1, 2, ());

        let engine = LayeredLayout::new(Vec2::new(20.0, 20.0));
        let positions = engine.layout(&graph, &sizes).unwrap();

        // A single node in the first layer is centered in its band
        assert_eq!(positions[&1].x, NODE.x / 2.0);
        assert_eq!(positions[&1].y, NODE.y / 2.0);

        // The successor sits one full layer further right
        assert_eq!(positions[&2].x, NODE.x + 20.0 + NODE.x / 2.0);
    }

    #[test]
    fn nodes_in_a_layer_do_not_overlap() {
        let mut graph = DiGraphMap::new();
        graph.add_edge(1, 2, ());
        graph.add_edge(1, 3, ());
        graph.add_edge(1, 4, ());

        let engine = LayeredLayout::new(Vec2::new(20.0, 20.0));
        let positions = engine.layout(&graph, &sizes).unwrap();

        for (a, b) in [(2u32, 3u32), (2, 4), (3, 4)] {
            assert!(
                (positions[&a].y - positions[&b].y).abs() >= NODE.y,
                "nodes {a} and {b} overlap vertically"
            );
        }
    }

    #[test]
    fn isolated_node_is_still_positioned() {
        let mut graph: DiGraphMap<u32, ()> = DiGraphMap::new();
        graph.add_node(7);

        let positions = LayeredLayout::default().layout(&graph, &sizes).unwrap();
        assert!(positions.contains_key(&7));
    }

    #[test]
    fn same_graph_same_positions() {
        let build = || {
            let mut graph = DiGraphMap::new();
            graph.add_edge(1, 2, ());
            graph.add_edge(1, 3, ());
            graph.add_edge(3, 4, ());
            graph.add_edge(2, 4, ());
            graph.add_edge(1, 5, ());
            graph
        };

        let engine = LayeredLayout::default();
        let first = engine.layout(&build(), &sizes).unwrap();
        let second = engine.layout(&build(), &sizes).unwrap();
        assert_eq!(first, second);
    }
}
