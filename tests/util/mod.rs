//! Shared assertions over finished drawings.
#![allow(dead_code)]

use orthograph::{Color, Direction, NodeId, OrthogonalDrawing, UndirectedGraph};

/// Structural invariants every drawing must satisfy, whatever the input:
/// original nodes survive as black nodes, the shape is complete and
/// symmetric, every node has a non-negative integer position, and no red
/// corner is flat.
pub fn assert_drawing_invariants(input: &UndirectedGraph, drawing: &OrthogonalDrawing) {
    for node in input.nodes() {
        assert!(drawing.graph.has_node(node), "input node {node} vanished");
        assert_eq!(
            drawing.attributes.try_color(node),
            Some(Color::Black),
            "input node {node} must stay black"
        );
    }
    for (u, v) in drawing.graph.edges() {
        let forward = drawing
            .shape
            .direction(u, v)
            .unwrap_or_else(|| panic!("no direction for edge ({u}, {v})"));
        assert_eq!(
            drawing.shape.direction(v, u),
            Some(forward.opposite()),
            "asymmetric shape on edge ({u}, {v})"
        );
    }
    for node in drawing.graph.nodes() {
        let (x, y) = drawing.attributes.position(node);
        assert!(x >= 0 && y >= 0, "node {node} at negative position ({x}, {y})");
    }
    for node in drawing.graph.nodes() {
        if drawing.attributes.try_color(node) != Some(Color::Red) {
            continue;
        }
        let neighbors: Vec<NodeId> = drawing.graph.neighbors(node).collect();
        assert_eq!(neighbors.len(), 2, "red corner {node} must have degree 2");
        assert_ne!(
            drawing.shape.is_horizontal(node, neighbors[0]),
            drawing.shape.is_horizontal(node, neighbors[1]),
            "red corner {node} is flat"
        );
    }
}

/// Every black node uses each of its ports at most once: no two incident
/// edges leave in the same direction on the same lane (the perpendicular
/// coordinate they depart at). A node of degree at most 4 has every edge
/// on its own row or column, so there the check is exactly "at most one
/// incident edge per direction"; a fanned-out high-degree node spreads
/// same-direction edges over distinct lanes instead.
pub fn assert_ports_capped(drawing: &OrthogonalDrawing) {
    for node in drawing.graph.nodes() {
        if drawing.attributes.try_color(node) != Some(Color::Black) {
            continue;
        }
        let mut used_ports = std::collections::HashSet::new();
        for neighbor in drawing.graph.neighbors(node) {
            let direction = drawing
                .shape
                .direction(node, neighbor)
                .unwrap_or_else(|| panic!("no direction for edge ({node}, {neighbor})"));
            let lane = if direction.is_horizontal() {
                drawing.attributes.y(neighbor)
            } else {
                drawing.attributes.x(neighbor)
            };
            assert!(
                used_ports.insert((direction, lane)),
                "node {node} sends two edges {direction} on lane {lane}"
            );
        }
        if drawing.graph.degree(node) <= 4 {
            for direction in Direction::ALL {
                let uses = drawing
                    .graph
                    .neighbors(node)
                    .filter(|&n| drawing.shape.direction(node, n) == Some(direction))
                    .count();
                assert!(uses <= 1, "node {node} uses direction {direction} {uses} times");
            }
        }
    }
}

/// Coordinates realize the shape: horizontal edges share a y coordinate
/// and increase x towards `right`, vertical edges dually. Only meaningful
/// for drawings without overlap shifts, i.e. inputs of maximum degree 4.
pub fn assert_geometry_matches_shape(drawing: &OrthogonalDrawing) {
    for (u, v) in drawing.graph.edges() {
        let direction = drawing.shape.direction(u, v).expect("complete shape");
        let (ux, uy) = drawing.attributes.position(u);
        let (vx, vy) = drawing.attributes.position(v);
        match direction {
            Direction::Right => assert!(uy == vy && ux < vx, "edge ({u}, {v}) is not rightward"),
            Direction::Left => assert!(uy == vy && ux > vx, "edge ({u}, {v}) is not leftward"),
            Direction::Up => assert!(ux == vx && uy < vy, "edge ({u}, {v}) is not upward"),
            Direction::Down => assert!(ux == vx && uy > vy, "edge ({u}, {v}) is not downward"),
        }
    }
}

/// Ids of red corner nodes.
pub fn red_nodes(drawing: &OrthogonalDrawing) -> Vec<NodeId> {
    drawing
        .graph
        .nodes()
        .filter(|&n| drawing.attributes.try_color(n) == Some(Color::Red))
        .collect()
}
