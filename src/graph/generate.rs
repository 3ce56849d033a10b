//! Graph generators, mostly for benchmarks and tests.

use rand::Rng;

use crate::error::LayoutError;
use crate::graph::algo::is_connected;
use crate::graph::{NodeId, UndirectedGraph};

fn nodes_0_to(n: usize) -> UndirectedGraph {
    let mut graph = UndirectedGraph::new();
    for id in 0..n as NodeId {
        graph.add_node_with_id(id).expect("fresh graph");
    }
    graph
}

/// Random connected graph with `nodes` nodes and `edges` edges.
///
/// Edge endpoints are sampled uniformly; the sampling is repeated from
/// scratch until the result is connected, so `edges + 1 >= nodes` is
/// required.
pub fn random_connected_graph(
    nodes: usize,
    edges: usize,
    rng: &mut impl Rng,
) -> Result<UndirectedGraph, LayoutError> {
    if edges + 1 < nodes {
        return Err(LayoutError::InvalidInput(format!(
            "{edges} edges cannot connect {nodes} nodes"
        )));
    }
    if edges > nodes * (nodes.saturating_sub(1)) / 2 {
        return Err(LayoutError::InvalidInput(format!(
            "{edges} edges do not fit a simple graph on {nodes} nodes"
        )));
    }
    loop {
        let mut graph = nodes_0_to(nodes);
        let mut added = 0;
        while added < edges {
            let u = rng.gen_range(0..nodes) as NodeId;
            let v = rng.gen_range(0..nodes) as NodeId;
            if u == v || graph.has_edge(u, v) {
                continue;
            }
            graph.add_edge(u, v)?;
            added += 1;
        }
        if is_connected(&graph) {
            return Ok(graph);
        }
    }
}

/// Like [`random_connected_graph`], additionally capping every degree at 4
/// (which bounds `edges` by `2 * nodes`).
pub fn random_connected_graph_max_degree_4(
    nodes: usize,
    edges: usize,
    rng: &mut impl Rng,
) -> Result<UndirectedGraph, LayoutError> {
    if edges > 2 * nodes || edges > nodes * (nodes.saturating_sub(1)) / 2 {
        return Err(LayoutError::InvalidInput(format!(
            "{edges} edges exceed the degree-4 budget of {nodes} nodes"
        )));
    }
    if edges + 1 < nodes {
        return Err(LayoutError::InvalidInput(format!(
            "{edges} edges cannot connect {nodes} nodes"
        )));
    }
    'attempt: loop {
        let mut graph = nodes_0_to(nodes);
        let mut added = 0;
        let mut rejected = 0;
        while added < edges {
            let u = rng.gen_range(0..nodes) as NodeId;
            let v = rng.gen_range(0..nodes) as NodeId;
            let blocked = u == v
                || graph.has_edge(u, v)
                || graph.degree(u) >= 4
                || graph.degree(v) >= 4;
            if blocked {
                // the greedy fill can paint itself into a corner where
                // every remaining slot sits between saturated nodes
                rejected += 1;
                if rejected > 100 * nodes * nodes {
                    continue 'attempt;
                }
                continue;
            }
            graph.add_edge(u, v)?;
            added += 1;
        }
        if is_connected(&graph) {
            return Ok(graph);
        }
    }
}

/// The outline of an `n` by `m` grid: a ring of `2n + 2m - 4` nodes with a
/// chord between every pair of opposite ring nodes. Requires `n, m > 1`.
pub fn grid_graph(n: usize, m: usize) -> UndirectedGraph {
    assert!(n > 1 && m > 1, "grid sides must be at least 2");
    let count = 2 * n + 2 * m - 4;
    let mut graph = nodes_0_to(count);
    for id in 0..count as NodeId - 1 {
        graph.add_edge(id, id + 1).expect("ring edge");
    }
    graph.add_edge(0, count as NodeId - 1).expect("ring closure");
    for i in 1..n - 1 {
        let opposite = 2 * n + m - i - 3;
        graph.add_edge(i as NodeId, opposite as NodeId).expect("chord");
    }
    let inner = m - 2;
    for i in 0..inner {
        let opposite = 2 * n + 2 * inner - i - 1;
        graph.add_edge((n + i) as NodeId, opposite as NodeId).expect("chord");
    }
    graph
}

/// A chain of `k` stacked triangles on `3k` nodes. Requires `k > 1`.
pub fn triangle_chain_graph(k: usize) -> UndirectedGraph {
    assert!(k > 1, "chain needs at least two triangles");
    let count = 3 * k;
    let mut graph = nodes_0_to(count);
    for i in 0..count as NodeId - 3 {
        if i % 3 == 2 {
            graph.add_edge(i, i + 3).expect("chain edge");
            graph.add_edge(i + 3, i - 2).expect("chain edge");
        } else {
            graph.add_edge(i, i + 3).expect("chain edge");
            graph.add_edge(i + 1, i + 3).expect("chain edge");
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn random_graph_is_connected_and_sized() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = random_connected_graph(8, 10, &mut rng).unwrap();
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 10);
        assert!(is_connected(&graph));
    }

    #[test]
    fn degree_capped_random_graph() {
        let mut rng = StdRng::seed_from_u64(7);
        let graph = random_connected_graph_max_degree_4(10, 14, &mut rng).unwrap();
        assert!(is_connected(&graph));
        assert!(graph.nodes().all(|n| graph.degree(n) <= 4));
    }

    #[test]
    fn random_graph_rejects_bad_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_connected_graph(5, 3, &mut rng).is_err());
        assert!(random_connected_graph_max_degree_4(4, 9, &mut rng).is_err());
    }

    #[test]
    fn grid_3_by_3_shape() {
        let graph = grid_graph(3, 3);
        assert_eq!(graph.node_count(), 8);
        assert_eq!(graph.edge_count(), 10);
        assert!(graph.has_edge(1, 5));
        assert!(graph.has_edge(3, 7));
        assert!(graph.nodes().all(|n| graph.degree(n) <= 3));
    }

    #[test]
    fn triangle_chain_is_connected() {
        let graph = triangle_chain_graph(3);
        assert_eq!(graph.node_count(), 9);
        assert!(is_connected(&graph));
    }
}
