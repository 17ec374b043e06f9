use crate::{NodeSizes, Point};
use std::collections::HashMap;
use std::hash::Hash;

/// A layout engine that can compute positions for graph nodes
///
/// This trait is generic over the graph type `G`, allowing different layout
/// engines to work with different graph types:
/// - Layered layouts implement `LayoutEngine<G>` for directed graphs
/// - Force-directed layouts could implement it for undirected graphs
/// - Other layouts can specify their own graph requirements
///
/// Any compliant layered-drawing implementation can be swapped in behind
/// this interface; the returned positions are node centers.
pub trait LayoutEngine<G> {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash;

    /// The error type returned when the layout computation fails
    type Error;

    /// Compute center positions for the given graph
    ///
    /// # Errors
    /// Returns an error if the layout computation fails (e.g., graph contains
    /// cycles for DAG layouts, or other layout-specific constraints are violated)
    fn layout<S>(&self, graph: G, sizes: &S) -> Result<HashMap<Self::NodeId, Point>, Self::Error>
    where
        S: NodeSizes<Self::NodeId>;
}
