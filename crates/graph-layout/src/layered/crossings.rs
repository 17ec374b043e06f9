use petgraph::visit::IntoNeighborsDirected;
use petgraph::Direction;
use std::collections::HashMap;
use std::hash::Hash;

/// Minimize edge crossings by swapping adjacent nodes in layers
///
/// Uses a greedy local search approach with multiple iterations. Ties are
/// broken by node order, which keeps the result deterministic.
pub(crate) fn minimize_crossings<G>(
    graph: &G,
    mut layers: Vec<Vec<G::NodeId>>,
    max_iterations: usize,
) -> (Vec<Vec<G::NodeId>>, usize)
where
    G: IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash,
{
    for _ in 0..max_iterations {
        let mut improved = false;

        for layer_index in 0..layers.len() {
            let layer_len = layers[layer_index].len();
            for i in 0..layer_len.saturating_sub(1) {
                let crossings_before = count_crossings(graph, &layers);
                layers[layer_index].swap(i, i + 1);
                let crossings_after = count_crossings(graph, &layers);

                if crossings_after > crossings_before
                    || (crossings_after == crossings_before
                        && layers[layer_index][i] > layers[layer_index][i + 1])
                {
                    // Swap back if no improvement
                    layers[layer_index].swap(i, i + 1);
                } else {
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }

    let crossings = count_crossings(graph, &layers);
    (layers, crossings)
}

/// Count the number of edge crossings between adjacent layers
fn count_crossings<G>(graph: &G, layers: &[Vec<G::NodeId>]) -> usize
where
    G: IntoNeighborsDirected,
    G::NodeId: Copy + Ord + Hash,
{
    let mut crossings = 0;

    for pair in layers.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        let index_in_lower: HashMap<G::NodeId, usize> = lower
            .iter()
            .enumerate()
            .map(|(index, &node)| (node, index))
            .collect();

        // Endpoint index pairs of the edges spanning these two layers
        let mut spans = Vec::new();
        for (upper_index, &node) in upper.iter().enumerate() {
            for succ in graph.neighbors_directed(node, Direction::Outgoing) {
                if let Some(&lower_index) = index_in_lower.get(&succ) {
                    spans.push((upper_index, lower_index));
                }
            }
        }

        // Two spans cross when their endpoints are in opposite order
        for (n, &(i1, j1)) in spans.iter().enumerate() {
            for &(i2, j2) in spans.iter().skip(n + 1) {
                if i1 != i2 && (i1 < i2) != (j1 < j2) {
                    crossings += 1;
                }
            }
        }
    }

    crossings
}
