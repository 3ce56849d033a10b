//! End-to-end drawing scenarios.

mod util;

use orthograph::graph::generate::grid_graph;
use orthograph::sat::VarisatOracle;
use orthograph::{
    compute_stats, make_orthogonal_drawing, DrawingConfig, LayoutError, OrthogonalDrawing,
    UndirectedGraph,
};
use util::{
    assert_drawing_invariants, assert_geometry_matches_shape, assert_ports_capped, red_nodes,
};

fn graph_with_edges(nodes: u32, edges: &[(u32, u32)]) -> UndirectedGraph {
    let mut graph = UndirectedGraph::new();
    for id in 0..nodes {
        graph.add_node_with_id(id).unwrap();
    }
    for &(u, v) in edges {
        graph.add_edge(u, v).unwrap();
    }
    graph
}

fn draw(graph: &UndirectedGraph) -> OrthogonalDrawing {
    make_orthogonal_drawing(
        graph,
        &VarisatOracle::new(),
        &DrawingConfig::default(),
        None,
    )
    .unwrap()
}

#[test]
fn triangle_needs_a_bend() {
    let graph = graph_with_edges(3, &[(0, 1), (1, 2), (0, 2)]);
    let drawing = draw(&graph);
    assert_drawing_invariants(&graph, &drawing);
    assert_ports_capped(&drawing);
    assert_geometry_matches_shape(&drawing);

    // three mutually adjacent nodes cannot close rectilinearly without
    // turning somewhere off-node
    assert!(!red_nodes(&drawing).is_empty());
    let stats = compute_stats(&drawing);
    assert!(stats.bends >= 1);
    assert_eq!(stats.crossings, 0);
    assert!(stats.area >= 4);
}

#[test]
fn square_draws_as_rectangle() {
    let graph = graph_with_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);
    let drawing = draw(&graph);
    assert_drawing_invariants(&graph, &drawing);
    assert_ports_capped(&drawing);
    assert_geometry_matches_shape(&drawing);

    assert!(red_nodes(&drawing).is_empty());
    assert_eq!(drawing.graph.node_count(), 4);
    let stats = compute_stats(&drawing);
    assert_eq!(stats.bends, 0);
    assert_eq!(stats.crossings, 0);
    assert_eq!(stats.area, 4);
    assert_eq!(stats.total_edge_length, 4);
}

#[test]
fn complete_graph_on_four_nodes_terminates() {
    let graph = graph_with_edges(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)]);
    let drawing = draw(&graph);
    assert_drawing_invariants(&graph, &drawing);
    assert_ports_capped(&drawing);
    assert_geometry_matches_shape(&drawing);

    // K4 is planar but not rectilinear-planar without detours
    let stats = compute_stats(&drawing);
    assert!(stats.crossings + stats.bends >= 2);
}

#[test]
fn grid_outline_stays_planar() {
    let graph = grid_graph(3, 3);
    let drawing = draw(&graph);
    assert_drawing_invariants(&graph, &drawing);
    assert_ports_capped(&drawing);
    assert_geometry_matches_shape(&drawing);

    let stats = compute_stats(&drawing);
    assert_eq!(stats.crossings, 0);
    assert!(red_nodes(&drawing).len() <= 6);
}

#[test]
fn path_draws_without_bends() {
    let graph = graph_with_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let drawing = draw(&graph);
    assert_drawing_invariants(&graph, &drawing);
    assert_ports_capped(&drawing);
    assert_geometry_matches_shape(&drawing);

    assert!(red_nodes(&drawing).is_empty());
    let stats = compute_stats(&drawing);
    assert_eq!(stats.bends, 0);
    assert_eq!(stats.crossings, 0);
    // four segments span at most a 3x3 grid
    assert!(stats.area <= 9);
}

#[test]
fn disconnected_input_is_rejected() {
    let graph = graph_with_edges(4, &[(0, 1), (2, 3)]);
    let result = make_orthogonal_drawing(
        &graph,
        &VarisatOracle::new(),
        &DrawingConfig::default(),
        None,
    );
    assert!(matches!(result, Err(LayoutError::NotConnected)));
}

#[test]
fn high_degree_node_is_fanned_out() {
    let graph = graph_with_edges(6, &[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]);
    let drawing = draw(&graph);
    assert_drawing_invariants(&graph, &drawing);
    assert_ports_capped(&drawing);

    // the hub keeps its five edges, routed through at least one helper
    assert_eq!(drawing.graph.degree(0), 5);
    assert!(drawing.graph.node_count() > 6);
    let stats = compute_stats(&drawing);
    assert_eq!(stats.crossings, 0);
}

#[test]
fn metric_counters_are_reported() {
    let graph = graph_with_edges(3, &[(0, 1), (1, 2), (0, 2)]);
    let drawing = draw(&graph);
    assert_eq!(drawing.initial_cycle_count, 1);
    assert!(drawing.graph.node_count() >= 3 + red_nodes(&drawing).len());
}
