//! Drawing orchestration: from an input graph to a complete orthogonal
//! drawing.
//!
//! The stages run in a fixed order. A shape is searched over the cycle
//! basis; while the shape admits no consistent metric (some ordering DAG
//! has a cycle) the offending cycle is translated back into graph nodes and
//! added to the basis for another shape round. Cosmetic corners are then
//! contracted, nodes of degree above four are expanded into helper fans,
//! coordinates are assigned by walking the class orderings, overlapped
//! fan edges are separated by small perpendicular shifts, and the area is
//! compacted.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::attributes::{Color, GraphAttributes};
use crate::error::LayoutError;
use crate::graph::algo::{cycle_basis, find_cycle_directed, is_connected, kahn_order, topological_order};
use crate::graph::cycle::Cycle;
use crate::graph::{DirectedGraph, NodeId, UndirectedGraph};
use crate::orthogonal::classes::{
    build_equivalence_classes, equivalence_classes_to_orderings, EquivalenceClasses, WitnessMap,
};
use crate::orthogonal::drawing::OrthogonalDrawing;
use crate::orthogonal::shape_builder::{build_shape, ShapeConfig, ShapeLogs};
use crate::orthogonal::{CLASS_SPACING, SHIFT_STEP};
use crate::sat::SatOracle;
use crate::shape::{Direction, Shape};

/// Knobs of the whole pipeline.
#[derive(Clone, Copy, Debug)]
pub struct DrawingConfig {
    pub shape: ShapeConfig,
    /// Upper bound on metric-cycle repair rounds.
    pub max_metric_cycles: usize,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            shape: ShapeConfig::default(),
            max_metric_cycles: 256,
        }
    }
}

/// Compute an orthogonal drawing of a connected simple graph.
pub fn make_orthogonal_drawing(
    graph: &UndirectedGraph,
    oracle: &dyn SatOracle,
    config: &DrawingConfig,
    logs: Option<&ShapeLogs>,
) -> Result<OrthogonalDrawing, LayoutError> {
    let mut cycles = cycle_basis(graph)?;
    make_orthogonal_drawing_incremental(graph, &mut cycles, oracle, config, logs)
}

/// Like [`make_orthogonal_drawing`] but over a caller-supplied cycle basis,
/// which is rewritten in place by corner insertions and metric repairs.
pub fn make_orthogonal_drawing_incremental(
    graph: &UndirectedGraph,
    cycles: &mut Vec<Cycle>,
    oracle: &dyn SatOracle,
    config: &DrawingConfig,
    logs: Option<&ShapeLogs>,
) -> Result<OrthogonalDrawing, LayoutError> {
    if !is_connected(graph) {
        return Err(LayoutError::NotConnected);
    }
    let initial_cycle_count = cycles.len();
    let mut augmented = graph.clone();
    let mut attributes = GraphAttributes::new();
    for node in augmented.nodes() {
        attributes.set_color(node, Color::Black);
    }

    let mut shape = build_shape(&mut augmented, &mut attributes, cycles, oracle, &config.shape, logs)?;
    let mut added_cycle_count = 0;
    while let Some(cycle) = find_metric_obstruction(&shape, &augmented) {
        if added_cycle_count >= config.max_metric_cycles {
            return Err(LayoutError::PipelineDivergence {
                stage: "metric cycle repair",
                limit: config.max_metric_cycles,
            });
        }
        debug!(cycle = %cycle, "shape admits no metric, constraining cycle");
        cycles.push(cycle);
        added_cycle_count += 1;
        shape = build_shape(&mut augmented, &mut attributes, cycles, oracle, &config.shape, logs)?;
    }

    let size_before = augmented.node_count();
    remove_useless_bends(&mut augmented, &mut attributes, &mut shape)?;
    let removed_bend_count = size_before - augmented.node_count();
    // corner contraction invalidates the basis
    cycles.clear();

    if augmented.max_degree() > 4 {
        expand_high_degree_nodes(&mut augmented, &mut attributes, &mut shape)?;
        assign_positions(&augmented, &mut attributes, &mut shape)?;
        shift_overlapped_edges(&mut augmented, &mut attributes, &mut shape)?;
        fix_negative_positions(&augmented, &mut attributes);
    } else {
        assign_positions(&augmented, &mut attributes, &mut shape)?;
    }
    compact_area(&augmented, &mut attributes);

    Ok(OrthogonalDrawing {
        graph: augmented,
        attributes,
        shape,
        initial_cycle_count,
        added_cycle_count,
        removed_bend_count,
    })
}

pub(crate) fn other_neighbor(graph: &UndirectedGraph, node: NodeId, than: NodeId) -> NodeId {
    graph
        .neighbors(node)
        .find(|&n| n != than)
        .unwrap_or_else(|| panic!("node {node} has no neighbor besides {than}"))
}

/// Shortest walk from `from` to `to` using only edges of one axis.
/// Both endpoints are inclusive. The endpoints must share the class the
/// walk stays inside of, so a path always exists.
fn path_in_class(
    graph: &UndirectedGraph,
    shape: &Shape,
    from: NodeId,
    to: NodeId,
    walk_horizontal: bool,
) -> Vec<NodeId> {
    if from == to {
        return vec![from];
    }
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited = HashSet::from([from]);
    let mut queue = VecDeque::from([from]);
    while let Some(node) = queue.pop_front() {
        for neighbor in graph.neighbors(node) {
            if visited.contains(&neighbor)
                || shape.is_horizontal(node, neighbor) != walk_horizontal
            {
                continue;
            }
            visited.insert(neighbor);
            parent.insert(neighbor, node);
            if neighbor == to {
                let mut path = vec![to];
                let mut current = to;
                while current != from {
                    current = parent[&current];
                    path.push(current);
                }
                path.reverse();
                return path;
            }
            queue.push_back(neighbor);
        }
    }
    panic!("nodes {from} and {to} are not connected inside their class");
}

/// Translate a cycle over ordering classes back into a cycle over graph
/// nodes, stitching witness edges together with same-axis walks.
fn cycle_from_ordering_cycle(
    graph: &UndirectedGraph,
    shape: &Shape,
    ordering_cycle: &Cycle,
    witness: &WitnessMap,
    walk_horizontal: bool,
) -> Cycle {
    let mut nodes = Vec::new();
    for i in 0..ordering_cycle.len() {
        let a = ordering_cycle.at(i);
        let b = ordering_cycle.at(i + 1);
        let c = ordering_cycle.at(i + 2);
        let (from, to) = witness[&(a, b)];
        nodes.push(from);
        let (next_from, _) = witness[&(b, c)];
        if to != next_from {
            let path = path_in_class(graph, shape, to, next_from, walk_horizontal);
            nodes.extend_from_slice(&path[..path.len() - 1]);
        }
    }
    Cycle::new(nodes)
}

/// A degenerate ordering arc: both endpoints of a separating edge fell
/// into the same class. Closing the edge through its class yields the
/// obstruction cycle directly.
fn close_degenerate_cycle(
    graph: &UndirectedGraph,
    shape: &Shape,
    u: NodeId,
    v: NodeId,
    walk_horizontal: bool,
) -> Cycle {
    let path = path_in_class(graph, shape, v, u, walk_horizontal);
    let mut nodes = vec![u];
    nodes.extend_from_slice(&path[..path.len() - 1]);
    Cycle::new(nodes)
}

/// A graph cycle witnessing that the current shape has no consistent
/// metric, or `None` when both ordering DAGs are acyclic.
fn find_metric_obstruction(shape: &Shape, graph: &UndirectedGraph) -> Option<Cycle> {
    let (classes_x, classes_y) = build_equivalence_classes(shape, graph);
    let orderings = equivalence_classes_to_orderings(&classes_x, &classes_y, graph, shape);
    if let Some(&(u, v)) = orderings.degenerate_x.first() {
        return Some(close_degenerate_cycle(graph, shape, u, v, false));
    }
    if let Some(cycle) = find_cycle_directed(&orderings.ordering_x) {
        return Some(cycle_from_ordering_cycle(graph, shape, &cycle, &orderings.witness_x, false));
    }
    if let Some(&(u, v)) = orderings.degenerate_y.first() {
        return Some(close_degenerate_cycle(graph, shape, u, v, true));
    }
    if let Some(cycle) = find_cycle_directed(&orderings.ordering_y) {
        return Some(cycle_from_ordering_cycle(graph, shape, &cycle, &orderings.witness_y, true));
    }
    None
}

/// Contract red corners whose two edges lie on one axis: they bend
/// nothing and only stretch the drawing.
fn remove_useless_bends(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
) -> Result<(), LayoutError> {
    let mut flat_corners = Vec::new();
    for node in graph.nodes() {
        if attributes.color(node) != Color::Red {
            continue;
        }
        let neighbors: Vec<NodeId> = graph.neighbors(node).collect();
        assert_eq!(neighbors.len(), 2, "corner node {node} must have degree 2");
        if shape.is_horizontal(node, neighbors[0]) == shape.is_horizontal(node, neighbors[1]) {
            flat_corners.push(node);
        }
    }
    for corner in flat_corners {
        let neighbors: Vec<NodeId> = graph.neighbors(corner).collect();
        let (a, b) = (neighbors[0], neighbors[1]);
        let direction = shape.direction(a, corner).expect("complete shape");
        graph.remove_node(corner)?;
        attributes.remove_node(corner);
        shape.remove_direction(corner, a)?;
        shape.remove_direction(a, corner)?;
        shape.remove_direction(corner, b)?;
        shape.remove_direction(b, corner)?;
        graph.add_edge(a, b)?;
        shape.set_direction(a, b, direction)?;
        shape.set_direction(b, a, direction.opposite())?;
    }
    Ok(())
}

/// Split every incidence of a degree>4 node onto a helper node, so the
/// node itself keeps at most two used sides (up and right) until its
/// ports are recycled.
fn expand_high_degree_nodes(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
) -> Result<(), LayoutError> {
    let high_nodes: Vec<NodeId> = graph.nodes().filter(|&n| graph.degree(n) > 4).collect();
    for node in high_nodes {
        let neighbors: Vec<NodeId> = graph.neighbors(node).collect();
        let mut edges_to_add = Vec::new();
        let mut edges_to_remove = Vec::new();
        for v in neighbors {
            let helper = graph.add_node();
            shape.set_direction(helper, v, shape.direction(node, v).expect("complete shape"))?;
            shape.set_direction(v, helper, shape.direction(v, node).expect("complete shape"))?;
            if shape.is_horizontal(node, v) {
                attributes.set_color(helper, Color::Green);
                shape.set_direction(node, helper, Direction::Up)?;
                shape.set_direction(helper, node, Direction::Down)?;
            } else {
                attributes.set_color(helper, Color::Blue);
                shape.set_direction(node, helper, Direction::Right)?;
                shape.set_direction(helper, node, Direction::Left)?;
            }
            shape.remove_direction(node, v)?;
            shape.remove_direction(v, node)?;
            edges_to_add.push((helper, node));
            edges_to_add.push((helper, v));
            edges_to_remove.push((node, v));
        }
        for (from, to) in edges_to_add {
            graph.add_edge(from, to)?;
        }
        for (from, to) in edges_to_remove {
            graph.remove_edge(from, to)?;
        }
    }
    provisional_positions(graph, attributes, shape);
    recycle_helper_ports(graph, attributes, shape)?;
    attributes.clear_positions();
    Ok(())
}

fn ranked_classes(ordering: &DirectedGraph) -> Vec<u32> {
    let (mut order, complete) = kahn_order(ordering);
    if !complete {
        let seen: HashSet<u32> = order.iter().copied().collect();
        order.extend(ordering.nodes().filter(|n| !seen.contains(n)));
    }
    order
}

/// Rough coordinates before port recycling: plain class ranks, tolerant
/// of ordering cycles that will be repaired later.
fn provisional_positions(graph: &UndirectedGraph, attributes: &mut GraphAttributes, shape: &Shape) {
    let (classes_x, classes_y) = build_equivalence_classes(shape, graph);
    let orderings = equivalence_classes_to_orderings(&classes_x, &classes_y, graph, shape);
    let mut xs: HashMap<NodeId, i32> = HashMap::new();
    for (rank, class) in ranked_classes(&orderings.ordering_x).into_iter().enumerate() {
        for &node in classes_x.members(class) {
            xs.insert(node, CLASS_SPACING * rank as i32);
        }
    }
    let mut ys: HashMap<NodeId, i32> = HashMap::new();
    for (rank, class) in ranked_classes(&orderings.ordering_y).into_iter().enumerate() {
        for &node in classes_y.members(class) {
            ys.insert(node, CLASS_SPACING * rank as i32);
        }
    }
    for node in graph.nodes() {
        attributes.set_position(node, xs[&node], ys[&node]);
    }
}

/// After expansion every side of a high-degree node holds only helpers.
/// Give the node back one direct edge per cardinal direction: the leftmost
/// up- and down-bound helpers and the bottommost left- and right-bound
/// helpers collapse into plain ports.
fn recycle_helper_ports(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
) -> Result<(), LayoutError> {
    let mut fixes: Vec<(NodeId, NodeId, Direction)> = Vec::new();
    for node in graph.nodes() {
        if graph.degree(node) <= 4 {
            continue;
        }
        let mut leftmost_up: Option<NodeId> = None;
        let mut leftmost_down: Option<NodeId> = None;
        let mut bottommost_left: Option<NodeId> = None;
        let mut bottommost_right: Option<NodeId> = None;
        for helper in graph.neighbors(node) {
            let far = other_neighbor(graph, helper, node);
            if shape.is_horizontal(node, helper) {
                debug_assert!(shape.is_right(node, helper));
                let slot = if shape.is_up(helper, far) {
                    &mut leftmost_up
                } else {
                    &mut leftmost_down
                };
                if slot.map_or(true, |best| attributes.x(helper) < attributes.x(best)) {
                    *slot = Some(helper);
                }
            } else {
                debug_assert!(shape.is_up(node, helper));
                let slot = if shape.is_left(helper, far) {
                    &mut bottommost_left
                } else {
                    &mut bottommost_right
                };
                if slot.map_or(true, |best| attributes.y(helper) < attributes.y(best)) {
                    *slot = Some(helper);
                }
            }
        }
        for (chosen, direction) in [
            (leftmost_up, Direction::Up),
            (leftmost_down, Direction::Down),
            (bottommost_left, Direction::Left),
            (bottommost_right, Direction::Right),
        ] {
            if let Some(helper) = chosen {
                fixes.push((node, helper, direction));
            }
        }
    }
    for (node, helper, direction) in fixes {
        let far = other_neighbor(graph, helper, node);
        graph.remove_node(helper)?;
        attributes.remove_node(helper);
        graph.add_edge(node, far)?;
        shape.remove_direction(node, helper)?;
        shape.remove_direction(helper, node)?;
        shape.remove_direction(helper, far)?;
        shape.remove_direction(far, helper)?;
        shape.set_direction(node, far, direction)?;
        shape.set_direction(far, node, direction.opposite())?;
    }
    Ok(())
}

/// Flip one still-bright helper on an inconsistent ordering cycle from its
/// fan axis onto the other axis, marking it dark, until both orderings are
/// acyclic.
fn resolve_ordering_inconsistencies(
    graph: &UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
) -> Result<(), LayoutError> {
    loop {
        let (classes_x, classes_y) = build_equivalence_classes(shape, graph);
        let orderings = equivalence_classes_to_orderings(&classes_x, &classes_y, graph, shape);
        let obstruction_x = orderings
            .degenerate_x
            .first()
            .map(|&(u, v)| close_degenerate_cycle(graph, shape, u, v, false))
            .or_else(|| {
                find_cycle_directed(&orderings.ordering_x).map(|cycle| {
                    cycle_from_ordering_cycle(graph, shape, &cycle, &orderings.witness_x, false)
                })
            });
        if let Some(cycle) = obstruction_x {
            flip_helper_on_cycle(graph, attributes, shape, &cycle, Color::Blue)?;
            continue;
        }
        let obstruction_y = orderings
            .degenerate_y
            .first()
            .map(|&(u, v)| close_degenerate_cycle(graph, shape, u, v, true))
            .or_else(|| {
                find_cycle_directed(&orderings.ordering_y).map(|cycle| {
                    cycle_from_ordering_cycle(graph, shape, &cycle, &orderings.witness_y, true)
                })
            });
        if let Some(cycle) = obstruction_y {
            flip_helper_on_cycle(graph, attributes, shape, &cycle, Color::Green)?;
            continue;
        }
        return Ok(());
    }
}

fn flip_helper_on_cycle(
    graph: &UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
    cycle: &Cycle,
    target: Color,
) -> Result<(), LayoutError> {
    let (direction, dark) = if target == Color::Green {
        (Direction::Up, Color::GreenDark)
    } else {
        (Direction::Right, Color::BlueDark)
    };
    let colored = cycle
        .iter()
        .filter(|&n| attributes.try_color(n) == Some(target))
        .last()
        .unwrap_or_else(|| panic!("ordering cycle {cycle} has no {target} helper to flip"));
    let neighbors: Vec<NodeId> = graph.neighbors(colored).collect();
    assert_eq!(neighbors.len(), 2, "helper {colored} must have degree 2");
    let flip_to = if shape.is_up(neighbors[0], colored) {
        neighbors[0]
    } else {
        neighbors[1]
    };
    shape.remove_direction(colored, flip_to)?;
    shape.remove_direction(flip_to, colored)?;
    shape.set_direction(colored, flip_to, direction)?;
    shape.set_direction(flip_to, colored, direction.opposite())?;
    attributes.recolor(colored, dark);
    Ok(())
}

fn class_has_color(classes: &EquivalenceClasses, class: u32, attributes: &GraphAttributes, color: Color) -> bool {
    classes
        .members(class)
        .iter()
        .any(|&n| attributes.try_color(n) == Some(color))
}

/// Assign final coordinates by walking the topologically sorted class
/// orderings, spacing classes by [`CLASS_SPACING`] with an extra spacing
/// ahead of classes that hold fan helpers (room for their offsets).
fn assign_positions(
    graph: &UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
) -> Result<(), LayoutError> {
    resolve_ordering_inconsistencies(graph, attributes, shape)?;
    let (classes_x, classes_y) = build_equivalence_classes(shape, graph);
    let orderings = equivalence_classes_to_orderings(&classes_x, &classes_y, graph, shape);
    let order_x = topological_order(&orderings.ordering_x)
        .expect("x ordering is acyclic after inconsistency repair");
    let order_y = topological_order(&orderings.ordering_y)
        .expect("y ordering is acyclic after inconsistency repair");

    let mut xs: HashMap<NodeId, i32> = HashMap::new();
    let mut current = -CLASS_SPACING;
    for class in order_x {
        let mut next = current + CLASS_SPACING;
        if class_has_color(&classes_x, class, attributes, Color::Blue) {
            next += CLASS_SPACING;
        }
        for &node in classes_x.members(class) {
            xs.insert(node, next);
        }
        current = next;
    }
    let mut ys: HashMap<NodeId, i32> = HashMap::new();
    let mut current = -CLASS_SPACING;
    for class in order_y {
        let mut next = current + CLASS_SPACING;
        if class_has_color(&classes_y, class, attributes, Color::Green) {
            next += CLASS_SPACING;
        }
        for &node in classes_y.members(class) {
            ys.insert(node, next);
        }
        current = next;
    }
    for node in graph.nodes() {
        attributes.set_position(node, xs[&node], ys[&node]);
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
}

fn along(attributes: &GraphAttributes, axis: Axis, node: NodeId) -> i32 {
    match axis {
        Axis::X => attributes.x(node),
        Axis::Y => attributes.y(node),
    }
}

fn across(attributes: &GraphAttributes, axis: Axis, node: NodeId) -> i32 {
    match axis {
        Axis::X => attributes.y(node),
        Axis::Y => attributes.x(node),
    }
}

fn set_across(attributes: &mut GraphAttributes, axis: Axis, node: NodeId, value: i32) {
    match axis {
        Axis::X => attributes.set_y(node, value),
        Axis::Y => attributes.set_x(node, value),
    }
}

/// Separate the edges fanning out of every side of each high-degree node
/// by [`SHIFT_STEP`]-sized perpendicular offsets, translating everything
/// on that side of the node along with them. Afterwards no two edges of
/// the node leave through the same port: same-direction edges sit on
/// distinct lanes.
fn shift_overlapped_edges(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
) -> Result<(), LayoutError> {
    let high_nodes: Vec<NodeId> = graph.nodes().filter(|&n| graph.degree(n) > 4).collect();
    for node in high_nodes {
        let mut sides: HashMap<Direction, Vec<NodeId>> = HashMap::new();
        for neighbor in graph.neighbors(node) {
            let direction = shape.direction(node, neighbor).expect("complete shape");
            sides.entry(direction).or_default().push(neighbor);
        }
        let right = sides.remove(&Direction::Right).unwrap_or_default();
        let up = sides.remove(&Direction::Up).unwrap_or_default();
        let left = sides.remove(&Direction::Left).unwrap_or_default();
        let down = sides.remove(&Direction::Down).unwrap_or_default();
        for (side, side_direction, axis, increasing, color) in [
            (right, Direction::Right, Axis::X, Direction::Up, Color::Green),
            (up, Direction::Up, Axis::Y, Direction::Right, Color::Blue),
            (left, Direction::Left, Axis::X, Direction::Up, Color::GreenDark),
            (down, Direction::Down, Axis::Y, Direction::Right, Color::BlueDark),
        ] {
            shift_side(graph, attributes, shape, node, side, side_direction, axis, increasing, color)?;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn shift_side(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    shape: &mut Shape,
    node: NodeId,
    mut side: Vec<NodeId>,
    side_direction: Direction,
    axis: Axis,
    increasing: Direction,
    color: Color,
) -> Result<(), LayoutError> {
    if side.len() <= 1 {
        return Ok(());
    }
    let decreasing = increasing.opposite();
    // decreasing-bound lanes first (innermost nearest the node), then the
    // straight rank, then increasing-bound lanes from outermost inwards
    side.sort_by_key(|&n| {
        if attributes.color(n) == Color::Black {
            return (1, 0);
        }
        let far = other_neighbor(graph, n, node);
        let lane = shape.direction(n, far).expect("complete shape");
        if lane == decreasing {
            (0, along(attributes, axis, n))
        } else if lane == increasing {
            (2, -along(attributes, axis, n))
        } else {
            (1, 0)
        }
    });
    let fixed_index = side
        .iter()
        .position(|&n| attributes.color(n) == Color::Black)
        .unwrap_or(side.len() / 2);
    let fixed = fixed_index as i32;
    let count = side.len() as i32;
    let anchor = across(attributes, axis, node);

    let everyone: Vec<NodeId> = graph.nodes().collect();
    for n in everyone {
        let value = across(attributes, axis, n);
        if value > anchor {
            set_across(attributes, axis, n, value + SHIFT_STEP * (count - fixed - 1));
        } else if value < anchor {
            set_across(attributes, axis, n, value - SHIFT_STEP * fixed);
        }
    }

    for (index, &side_node) in side.iter().enumerate() {
        if index == fixed_index {
            continue;
        }
        let offset = (index as i32 - fixed) * SHIFT_STEP;
        // a member with no second neighbor has no lane of its own and
        // continues straight through its spacer
        let lane = graph
            .neighbors(side_node)
            .find(|&n| n != node)
            .map(|far| shape.direction(side_node, far).expect("complete shape"))
            .unwrap_or(side_direction);
        let spacer = graph.add_node();
        attributes.set_color(spacer, color);
        // the member stays on this side of the node, displaced onto its own
        // lane; the spacer is the corner between the side and the lane
        shape.set_direction(node, spacer, side_direction)?;
        shape.set_direction(spacer, node, side_direction.opposite())?;
        shape.set_direction(spacer, side_node, lane)?;
        shape.set_direction(side_node, spacer, lane.opposite())?;
        shape.remove_direction(node, side_node)?;
        shape.remove_direction(side_node, node)?;
        graph.remove_edge(node, side_node)?;
        graph.add_edge(node, spacer)?;
        graph.add_edge(spacer, side_node)?;
        let (node_x, node_y) = attributes.position(node);
        match axis {
            Axis::X => attributes.set_position(spacer, node_x, anchor + offset),
            Axis::Y => attributes.set_position(spacer, anchor + offset, node_y),
        }
        set_across(attributes, axis, side_node, anchor + offset);
    }
    Ok(())
}

/// Translate the drawing so every coordinate is non-negative.
fn fix_negative_positions(graph: &UndirectedGraph, attributes: &mut GraphAttributes) {
    let min_x = graph.nodes().map(|n| attributes.x(n)).min().unwrap_or(0);
    let min_y = graph.nodes().map(|n| attributes.y(n)).min().unwrap_or(0);
    if min_x < 0 {
        for node in graph.nodes() {
            let x = attributes.x(node);
            attributes.set_x(node, x - min_x);
        }
    }
    if min_y < 0 {
        for node in graph.nodes() {
            let y = attributes.y(node);
            attributes.set_y(node, y - min_y);
        }
    }
}

/// Remove slack: cap every gap between consecutive occupied coordinates at
/// [`CLASS_SPACING`] per axis and re-anchor the drawing at the origin.
/// Order and equality of coordinates are preserved, so the shape and the
/// crossing structure are untouched.
fn compact_area(graph: &UndirectedGraph, attributes: &mut GraphAttributes) {
    for axis in [Axis::X, Axis::Y] {
        let mut occupied: Vec<i32> = graph.nodes().map(|n| along(attributes, axis, n)).collect();
        occupied.sort_unstable();
        occupied.dedup();
        let mut remap: HashMap<i32, i32> = HashMap::new();
        let mut compacted = 0;
        let mut previous: Option<i32> = None;
        for &coordinate in &occupied {
            if let Some(previous) = previous {
                compacted += (coordinate - previous).min(CLASS_SPACING);
            }
            remap.insert(coordinate, compacted);
            previous = Some(coordinate);
        }
        for node in graph.nodes() {
            let old = along(attributes, axis, node);
            match axis {
                Axis::X => attributes.set_x(node, remap[&old]),
                Axis::Y => attributes.set_y(node, remap[&old]),
            }
        }
    }
}
