//! Derived metrics of a finished drawing: crossings, bends, area and edge
//! lengths.
//!
//! All metrics are measured on an *index grid*: the distinct coordinates of
//! each axis are clustered, and a gap of at least
//! [`CLUSTER_THRESHOLD`](crate::orthogonal::CLUSTER_THRESHOLD) starts a new
//! grid line. Helper nodes displaced by a few units during overlap
//! resolution therefore still count as sitting on their original grid line.

use std::collections::HashMap;

use itertools::Itertools;

use crate::attributes::{Color, GraphAttributes};
use crate::graph::{NodeId, UndirectedGraph};
use crate::orthogonal::builder::other_neighbor;
use crate::orthogonal::drawing::OrthogonalDrawing;
use crate::orthogonal::CLUSTER_THRESHOLD;

/// Aggregate drawing metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrthogonalStats {
    pub crossings: usize,
    pub bends: usize,
    pub area: i64,
    pub total_edge_length: i64,
    pub max_edge_length: i64,
    pub edge_length_stddev: f64,
    pub max_bends_per_edge: usize,
    pub bends_stddev: f64,
}

fn cluster_axis(mut coordinates: Vec<i32>) -> HashMap<i32, i32> {
    coordinates.sort_unstable();
    coordinates.dedup();
    let mut index_of = HashMap::new();
    let mut index = 0;
    let mut previous: Option<i32> = None;
    for coordinate in coordinates {
        if let Some(previous) = previous {
            if coordinate - previous >= CLUSTER_THRESHOLD {
                index += 1;
            }
        }
        index_of.insert(coordinate, index);
        previous = Some(coordinate);
    }
    index_of
}

/// Cluster real coordinates into grid indices per axis.
pub fn node_index_positions(
    graph: &UndirectedGraph,
    attributes: &GraphAttributes,
) -> (HashMap<NodeId, i32>, HashMap<NodeId, i32>) {
    let x_index = cluster_axis(graph.nodes().map(|n| attributes.x(n)).collect());
    let y_index = cluster_axis(graph.nodes().map(|n| attributes.y(n)).collect());
    let xs = graph.nodes().map(|n| (n, x_index[&attributes.x(n)])).collect();
    let ys = graph.nodes().map(|n| (n, y_index[&attributes.y(n)])).collect();
    (xs, ys)
}

/// The node chains realizing original edges: every chain starts and ends
/// at a black node, with only corners and helpers in between. Each chain
/// is reported once.
fn black_chains(graph: &UndirectedGraph, attributes: &GraphAttributes) -> Vec<Vec<NodeId>> {
    let mut chains = Vec::new();
    for start in graph.nodes() {
        if attributes.color(start) != Color::Black {
            continue;
        }
        for first in graph.neighbors(start) {
            let mut chain = vec![start];
            let mut previous = start;
            let mut current = first;
            while attributes.color(current) != Color::Black {
                chain.push(current);
                let next = other_neighbor(graph, current, previous);
                previous = current;
                current = next;
            }
            chain.push(current);
            if start < current {
                chains.push(chain);
            }
        }
    }
    chains
}

fn chain_grid_points(
    chain: &[NodeId],
    xs: &HashMap<NodeId, i32>,
    ys: &HashMap<NodeId, i32>,
) -> Vec<(i32, i32)> {
    let mut points: Vec<(i32, i32)> = Vec::with_capacity(chain.len());
    for node in chain {
        let point = (xs[node], ys[node]);
        // nodes clustered onto the same grid point contribute no segment
        if points.last() != Some(&point) {
            points.push(point);
        }
    }
    points
}

fn chain_length(points: &[(i32, i32)]) -> i64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| (i64::from(a.0 - b.0)).abs() + (i64::from(a.1 - b.1)).abs())
        .sum()
}

fn chain_bends(points: &[(i32, i32)]) -> usize {
    points
        .iter()
        .tuple_windows()
        .filter(|(a, b, c)| {
            let first = ((b.0 - a.0).signum(), (b.1 - a.1).signum());
            let second = ((c.0 - b.0).signum(), (c.1 - b.1).signum());
            first != second
        })
        .count()
}

fn sample_stddev(values: &[i64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean) * (v as f64 - mean))
        .sum::<f64>()
        / (count - 1.0);
    variance.sqrt()
}

fn overlap(a1: i32, a2: i32, b1: i32, b2: i32) -> i32 {
    a1.max(a2).min(b1.max(b2)) - a1.min(a2).max(b1.min(b2))
}

fn perpendicular_cross(
    horizontal: ((i32, i32), (i32, i32)),
    vertical: ((i32, i32), (i32, i32)),
) -> bool {
    let (h1, h2) = horizontal;
    let (v1, v2) = vertical;
    let x = v1.0;
    let y = h1.1;
    h1.0.min(h2.0) < x && x < h1.0.max(h2.0) && v1.1.min(v2.1) < y && y < v1.1.max(v2.1)
}

fn segments_cross(a: ((i32, i32), (i32, i32)), b: ((i32, i32), (i32, i32))) -> bool {
    let a_horizontal = a.0 .1 == a.1 .1;
    let b_horizontal = b.0 .1 == b.1 .1;
    match (a_horizontal, b_horizontal) {
        // collinear overlaps of parallel segments count as crossings
        (true, true) => a.0 .1 == b.0 .1 && overlap(a.0 .0, a.1 .0, b.0 .0, b.1 .0) >= 1,
        (false, false) => a.0 .0 == b.0 .0 && overlap(a.0 .1, a.1 .1, b.0 .1, b.1 .1) >= 1,
        (true, false) => perpendicular_cross(a, b),
        (false, true) => perpendicular_cross(b, a),
    }
}

/// Count crossing segment pairs by a quadratic scan over all edges of the
/// augmented graph. Pairs sharing an endpoint never count.
fn count_crossings(graph: &UndirectedGraph, attributes: &GraphAttributes) -> usize {
    let edges: Vec<(NodeId, NodeId)> = graph.edges().collect();
    let mut crossings = 0;
    for (i, &(u1, v1)) in edges.iter().enumerate() {
        for &(u2, v2) in &edges[i + 1..] {
            if u1 == u2 || u1 == v2 || v1 == u2 || v1 == v2 {
                continue;
            }
            let first = (attributes.position(u1), attributes.position(v1));
            let second = (attributes.position(u2), attributes.position(v2));
            if segments_cross(first, second) {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Compute every aggregate metric of a drawing.
pub fn compute_stats(drawing: &OrthogonalDrawing) -> OrthogonalStats {
    let graph = &drawing.graph;
    let attributes = &drawing.attributes;
    let (xs, ys) = node_index_positions(graph, attributes);

    let mut lengths = Vec::new();
    let mut bend_counts = Vec::new();
    for chain in black_chains(graph, attributes) {
        let points = chain_grid_points(&chain, &xs, &ys);
        lengths.push(chain_length(&points));
        bend_counts.push(chain_bends(&points));
    }

    let min_x = xs.values().copied().min().unwrap_or(0);
    let max_x = xs.values().copied().max().unwrap_or(0);
    let min_y = ys.values().copied().min().unwrap_or(0);
    let max_y = ys.values().copied().max().unwrap_or(0);
    let area = i64::from(max_x - min_x + 1) * i64::from(max_y - min_y + 1);

    let bends_as_i64: Vec<i64> = bend_counts.iter().map(|&b| b as i64).collect();
    OrthogonalStats {
        crossings: count_crossings(graph, attributes),
        bends: bend_counts.iter().sum(),
        area,
        total_edge_length: lengths.iter().sum(),
        max_edge_length: lengths.iter().copied().max().unwrap_or(0),
        edge_length_stddev: sample_stddev(&lengths),
        max_bends_per_edge: bend_counts.iter().copied().max().unwrap_or(0),
        bends_stddev: sample_stddev(&bends_as_i64),
    }
}

#[cfg(test)]
mod tests {
    use crate::shape::Shape;

    use super::*;

    fn drawing(
        edges: &[(NodeId, NodeId)],
        colors: &[(NodeId, Color)],
        positions: &[(NodeId, i32, i32)],
    ) -> OrthogonalDrawing {
        let mut graph = UndirectedGraph::new();
        for &(node, _) in colors {
            graph.add_node_with_id(node).unwrap();
        }
        for &(u, v) in edges {
            graph.add_edge(u, v).unwrap();
        }
        let mut attributes = GraphAttributes::new();
        for &(node, color) in colors {
            attributes.set_color(node, color);
        }
        for &(node, x, y) in positions {
            attributes.set_position(node, x, y);
        }
        OrthogonalDrawing {
            graph,
            attributes,
            shape: Shape::new(),
            initial_cycle_count: 0,
            added_cycle_count: 0,
            removed_bend_count: 0,
        }
    }

    #[test]
    fn rectangle_metrics() {
        let drawing = drawing(
            &[(0, 1), (1, 2), (2, 3), (3, 0)],
            &[
                (0, Color::Black),
                (1, Color::Black),
                (2, Color::Black),
                (3, Color::Black),
            ],
            &[(0, 0, 0), (1, 100, 0), (2, 100, 100), (3, 0, 100)],
        );
        let stats = compute_stats(&drawing);
        assert_eq!(stats.crossings, 0);
        assert_eq!(stats.bends, 0);
        assert_eq!(stats.area, 4);
        assert_eq!(stats.total_edge_length, 4);
        assert_eq!(stats.max_edge_length, 1);
        assert_eq!(stats.max_bends_per_edge, 0);
    }

    #[test]
    fn corner_chain_counts_one_bend() {
        let drawing = drawing(
            &[(0, 1), (1, 2)],
            &[(0, Color::Black), (1, Color::Red), (2, Color::Black)],
            &[(0, 0, 0), (1, 100, 0), (2, 100, 100)],
        );
        let stats = compute_stats(&drawing);
        assert_eq!(stats.bends, 1);
        assert_eq!(stats.max_bends_per_edge, 1);
        assert_eq!(stats.total_edge_length, 2);
        assert_eq!(stats.area, 4);
    }

    #[test]
    fn clustered_helper_adds_no_bend() {
        // the middle node is displaced by less than the cluster threshold,
        // so the chain stays straight on the index grid
        let drawing = drawing(
            &[(0, 1), (1, 2)],
            &[(0, Color::Black), (1, Color::Green), (2, Color::Black)],
            &[(0, 0, 0), (1, 100, 5), (2, 200, 0)],
        );
        let stats = compute_stats(&drawing);
        assert_eq!(stats.bends, 0);
        assert_eq!(stats.total_edge_length, 2);
        assert_eq!(stats.area, 3);
    }

    #[test]
    fn proper_crossing_is_counted() {
        let drawing = drawing(
            &[(0, 1), (2, 3)],
            &[
                (0, Color::Black),
                (1, Color::Black),
                (2, Color::Black),
                (3, Color::Black),
            ],
            &[(0, 0, 100), (1, 200, 100), (2, 100, 0), (3, 100, 200)],
        );
        assert_eq!(compute_stats(&drawing).crossings, 1);
    }

    #[test]
    fn touching_segments_do_not_cross() {
        // vertical segment ends exactly on the horizontal line
        let drawing = drawing(
            &[(0, 1), (2, 3)],
            &[
                (0, Color::Black),
                (1, Color::Black),
                (2, Color::Black),
                (3, Color::Black),
            ],
            &[(0, 0, 100), (1, 200, 100), (2, 100, 100), (3, 100, 200)],
        );
        assert_eq!(compute_stats(&drawing).crossings, 0);
    }

    #[test]
    fn collinear_overlap_counts_as_crossing() {
        let drawing = drawing(
            &[(0, 1), (2, 3)],
            &[
                (0, Color::Black),
                (1, Color::Black),
                (2, Color::Black),
                (3, Color::Black),
            ],
            &[(0, 0, 0), (1, 300, 0), (2, 100, 0), (3, 400, 0)],
        );
        assert_eq!(compute_stats(&drawing).crossings, 1);
    }
}
