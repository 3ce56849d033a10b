//! Per-axis equivalence classes of nodes and their precedence DAGs.
//!
//! Nodes joined by a horizontal edge must share a y coordinate, nodes
//! joined by a vertical edge must share an x coordinate. Walking only the
//! edges of one axis therefore partitions the nodes into classes of equal
//! coordinate on the other axis; directed edges between distinct classes
//! then dictate a strict coordinate order.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::graph::{DirectedGraph, NodeId, UndirectedGraph};
use crate::shape::Shape;

/// Identifier of an equivalence class.
pub type ClassId = u32;

/// A partition of node ids into classes.
#[derive(Clone, Debug, Default)]
pub struct EquivalenceClasses {
    elem_to_class: HashMap<NodeId, ClassId>,
    class_to_elems: HashMap<ClassId, HashSet<NodeId>>,
}

impl EquivalenceClasses {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, elem: NodeId, class: ClassId) {
        let previous = self.elem_to_class.insert(elem, class);
        assert!(previous.is_none(), "node {elem} already has a class");
        self.class_to_elems.entry(class).or_default().insert(elem);
    }

    pub fn has_class(&self, elem: NodeId) -> bool {
        self.elem_to_class.contains_key(&elem)
    }

    pub fn class_of(&self, elem: NodeId) -> ClassId {
        *self
            .elem_to_class
            .get(&elem)
            .unwrap_or_else(|| panic!("node {elem} has no class"))
    }

    pub fn members(&self, class: ClassId) -> &HashSet<NodeId> {
        self.class_to_elems
            .get(&class)
            .unwrap_or_else(|| panic!("class {class} does not exist"))
    }

    pub fn classes(&self) -> impl Iterator<Item = ClassId> + '_ {
        self.class_to_elems.keys().copied()
    }

    pub fn class_count(&self) -> usize {
        self.class_to_elems.len()
    }
}

fn expand_class(
    shape: &Shape,
    graph: &UndirectedGraph,
    start: NodeId,
    class: ClassId,
    classes: &mut EquivalenceClasses,
    walk_horizontal: bool,
) {
    classes.assign(start, class);
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        for neighbor in graph.neighbors(node) {
            if classes.has_class(neighbor) {
                continue;
            }
            if shape.is_horizontal(node, neighbor) != walk_horizontal {
                continue;
            }
            classes.assign(neighbor, class);
            stack.push(neighbor);
        }
    }
}

/// Partition the nodes into x classes (walking vertical edges) and
/// y classes (walking horizontal edges). The shape must cover every
/// incidence of the graph.
pub fn build_equivalence_classes(
    shape: &Shape,
    graph: &UndirectedGraph,
) -> (EquivalenceClasses, EquivalenceClasses) {
    let mut classes_x = EquivalenceClasses::new();
    let mut classes_y = EquivalenceClasses::new();
    let mut next_class_x: ClassId = 0;
    let mut next_class_y: ClassId = 0;
    for node in graph.nodes() {
        if !classes_y.has_class(node) {
            expand_class(shape, graph, node, next_class_y, &mut classes_y, true);
            next_class_y += 1;
        }
        if !classes_x.has_class(node) {
            expand_class(shape, graph, node, next_class_x, &mut classes_x, false);
            next_class_x += 1;
        }
    }
    (classes_x, classes_y)
}

/// Arc witnesses: for each ordering arc, one graph edge that induced it.
pub type WitnessMap = HashMap<(ClassId, ClassId), (NodeId, NodeId)>;

/// The per-axis precedence structure derived from a shape.
pub struct AxisOrderings {
    pub ordering_x: DirectedGraph,
    pub ordering_y: DirectedGraph,
    pub witness_x: WitnessMap,
    pub witness_y: WitnessMap,
    /// Edges whose endpoints fell into one class on the axis they should
    /// separate; each certifies an inconsistent shape on its own.
    pub degenerate_x: Vec<(NodeId, NodeId)>,
    pub degenerate_y: Vec<(NodeId, NodeId)>,
}

/// Build both ordering DAGs: an arc per `right` edge between distinct
/// x classes and per `up` edge between distinct y classes, keeping the
/// first witness edge of every arc.
pub fn equivalence_classes_to_orderings(
    classes_x: &EquivalenceClasses,
    classes_y: &EquivalenceClasses,
    graph: &UndirectedGraph,
    shape: &Shape,
) -> AxisOrderings {
    let mut ordering_x = DirectedGraph::new();
    let mut ordering_y = DirectedGraph::new();
    for class in classes_x.classes() {
        ordering_x.add_node_with_id(class).expect("distinct class id");
    }
    for class in classes_y.classes() {
        ordering_y.add_node_with_id(class).expect("distinct class id");
    }
    let mut witness_x = WitnessMap::new();
    let mut witness_y = WitnessMap::new();
    let mut degenerate_x = Vec::new();
    let mut degenerate_y = Vec::new();
    for node in graph.nodes() {
        for neighbor in graph.neighbors(node) {
            if shape.is_right(node, neighbor) {
                let from = classes_x.class_of(node);
                let to = classes_x.class_of(neighbor);
                if from == to {
                    degenerate_x.push((node, neighbor));
                } else if !ordering_x.has_edge(from, to) {
                    ordering_x.add_edge(from, to).expect("fresh arc");
                    witness_x.insert((from, to), (node, neighbor));
                }
            } else if shape.is_up(node, neighbor) {
                let from = classes_y.class_of(node);
                let to = classes_y.class_of(neighbor);
                if from == to {
                    degenerate_y.push((node, neighbor));
                } else if !ordering_y.has_edge(from, to) {
                    ordering_y.add_edge(from, to).expect("fresh arc");
                    witness_y.insert((from, to), (node, neighbor));
                }
            }
        }
    }
    AxisOrderings {
        ordering_x,
        ordering_y,
        witness_x,
        witness_y,
        degenerate_x,
        degenerate_y,
    }
}
