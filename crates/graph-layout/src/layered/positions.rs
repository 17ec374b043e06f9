use crate::{NodeSizes, Point, Vec2};
use petgraph::graphmap::DiGraphMap;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Assign center coordinates to nodes based on their layer structure and sizes
///
/// Layers advance along +x; nodes within a layer are spread along y. The
/// returned positions are node centers.
pub(crate) fn assign_coordinates<N, S>(
    layers: &[Vec<N>],
    graph: &DiGraphMap<N, ()>,
    sizes: &S,
    margin: Vec2,
    max_position_iterations: usize,
) -> HashMap<N, Point>
where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let mut positions = HashMap::new();

    // First pass: one x per layer
    assign_layer_positions(layers, sizes, &mut positions, margin);

    // Second pass: spread nodes within each layer
    assign_in_layer_positions(
        layers,
        graph,
        &mut positions,
        sizes,
        margin,
        max_position_iterations,
    );

    positions
}

/// Walk the layers along +x, centering every node within its layer band
fn assign_layer_positions<N, S>(
    layers: &[Vec<N>],
    sizes: &S,
    positions: &mut HashMap<N, Point>,
    margin: Vec2,
) where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let layer_widths: Vec<f32> = layers
        .iter()
        .map(|layer| {
            layer
                .iter()
                .map(|&node| sizes.size(node).x)
                .fold(0.0, f32::max)
        })
        .collect();

    let mut x = 0.0;
    for (layer, &width) in layers.iter().zip(&layer_widths) {
        for &node in layer {
            positions.insert(node, Point::new(x + width / 2.0, 0.0));
        }
        x += width + margin.x;
    }
}

/// Assign vertical positions with barycenter smoothing
fn assign_in_layer_positions<N, S>(
    layers: &[Vec<N>],
    graph: &DiGraphMap<N, ()>,
    positions: &mut HashMap<N, Point>,
    sizes: &S,
    margin: Vec2,
    max_iterations: usize,
) where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    // Initial stacking from the top
    for layer in layers {
        let mut y = 0.0;
        for &node in layer {
            let height = sizes.size(node).y;
            if let Some(pos) = positions.get_mut(&node) {
                pos.y = y + height / 2.0;
            }
            y += height + margin.y;
        }
    }

    // Iterative optimization: pull nodes towards the barycenter of their
    // successors, then re-enforce the minimum vertical distance
    for _ in 0..max_iterations {
        let mut changed = false;

        for layer_idx in (0..layers.len().saturating_sub(1)).rev() {
            let layer = &layers[layer_idx];
            for &node in layer {
                let Some(new_y) = barycenter(node, &layers[layer_idx + 1], graph, positions)
                else {
                    continue;
                };

                let Some(pos) = positions.get_mut(&node) else {
                    continue;
                };

                if (new_y - pos.y).abs() > 0.1 {
                    pos.y = new_y;
                    changed = true;
                }
            }

            let mut sorted_nodes: Vec<_> = layer.to_vec();
            sorted_nodes.sort_by(|&a, &b| {
                positions[&a]
                    .y
                    .partial_cmp(&positions[&b].y)
                    .unwrap_or(Ordering::Equal)
            });

            for i in 1..sorted_nodes.len() {
                let prev_node = sorted_nodes[i - 1];
                let curr_node = sorted_nodes[i];
                let min_center = positions[&prev_node].y
                    + sizes.size(prev_node).y / 2.0
                    + margin.y
                    + sizes.size(curr_node).y / 2.0;
                let curr_center = &mut positions.get_mut(&curr_node).unwrap().y;

                if *curr_center < min_center {
                    *curr_center = min_center;
                    changed = true;
                }
            }
        }

        if !changed {
            break;
        }
    }

    normalize_vertical_positions(positions, sizes);
}

/// Average center of the successors found in the next layer
fn barycenter<N>(
    node: N,
    next_layer: &[N],
    graph: &DiGraphMap<N, ()>,
    positions: &HashMap<N, Point>,
) -> Option<f32>
where
    N: Copy + Ord + Hash,
{
    let mut sum_y = 0.0;
    let mut count = 0;

    for &next_node in next_layer {
        if graph.contains_edge(node, next_node) {
            if let Some(pos) = positions.get(&next_node) {
                sum_y += pos.y;
                count += 1;
            }
        }
    }

    if count > 0 {
        Some(sum_y / count as f32)
    } else {
        None
    }
}

/// Shift everything so the topmost node edge sits at y = 0
fn normalize_vertical_positions<N, S>(positions: &mut HashMap<N, Point>, sizes: &S)
where
    N: Copy + Ord + Hash,
    S: NodeSizes<N>,
{
    let min_y = positions
        .iter()
        .map(|(&node, pos)| pos.y - sizes.size(node).y / 2.0)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(0.0);

    for pos in positions.values_mut() {
        pos.y -= min_y;
    }
}
