//! Boolean variables of the shape formula.
//!
//! Every undirected edge owns four variables, one per direction, numbered
//! consecutively from 1 in edge enumeration order. Edges are canonicalized
//! by endpoint order; querying an incidence against the canonical order
//! flips the direction, since traversing the edge backwards reverses it.

use std::collections::HashMap;

use fixedbitset::FixedBitSet;

use crate::graph::{NodeId, UndirectedGraph};
use crate::shape::Direction;

fn direction_offset(direction: Direction) -> i32 {
    match direction {
        Direction::Up => 0,
        Direction::Down => 1,
        Direction::Right => 2,
        Direction::Left => 3,
    }
}

/// Bidirectional mapping between edge directions and CNF variables.
pub struct VariableTable {
    edge_to_base: HashMap<(NodeId, NodeId), i32>,
    edges: Vec<(NodeId, NodeId)>,
}

impl VariableTable {
    pub fn new(graph: &UndirectedGraph) -> Self {
        let mut edge_to_base = HashMap::new();
        let mut edges = Vec::with_capacity(graph.edge_count());
        for (index, (u, v)) in graph.edges().enumerate() {
            edge_to_base.insert((u, v), 4 * index as i32 + 1);
            edges.push((u, v));
        }
        Self { edge_to_base, edges }
    }

    /// Total number of variables, i.e. four per edge.
    pub fn variable_count(&self) -> i32 {
        4 * self.edges.len() as i32
    }

    /// The variable stating that the incidence `(u, v)` points in
    /// `direction`. Valid in either endpoint order.
    pub fn variable(&self, u: NodeId, v: NodeId, direction: Direction) -> i32 {
        let (key, direction) = if u < v {
            ((u, v), direction)
        } else {
            ((v, u), direction.opposite())
        };
        let base = *self
            .edge_to_base
            .get(&key)
            .unwrap_or_else(|| panic!("edge ({u}, {v}) has no variables"));
        base + direction_offset(direction)
    }

    /// The canonical edge a variable belongs to.
    pub fn edge_of_variable(&self, variable: i32) -> (NodeId, NodeId) {
        assert!(
            variable >= 1 && variable <= self.variable_count(),
            "variable {variable} out of range"
        );
        self.edges[(variable - 1) as usize / 4]
    }

    /// Decode the direction of `(u, v)` from a satisfying assignment.
    pub fn direction_of_edge(
        &self,
        u: NodeId,
        v: NodeId,
        assignment: &FixedBitSet,
    ) -> Direction {
        for direction in Direction::ALL {
            if assignment.contains(self.variable(u, v, direction) as usize) {
                return direction;
            }
        }
        panic!("no direction assigned for edge ({u}, {v})");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_edge_graph() -> UndirectedGraph {
        let mut graph = UndirectedGraph::new();
        for id in 0..3 {
            graph.add_node_with_id(id).unwrap();
        }
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(2, 1).unwrap();
        graph
    }

    #[test]
    fn four_variables_per_edge() {
        let table = VariableTable::new(&two_edge_graph());
        assert_eq!(table.variable_count(), 8);
        let mut seen: Vec<i32> = Vec::new();
        for (u, v) in [(0, 1), (1, 2)] {
            for direction in Direction::ALL {
                seen.push(table.variable(u, v, direction));
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn reversed_lookup_flips_direction() {
        let table = VariableTable::new(&two_edge_graph());
        assert_eq!(
            table.variable(0, 1, Direction::Up),
            table.variable(1, 0, Direction::Down)
        );
        assert_eq!(
            table.variable(0, 1, Direction::Left),
            table.variable(1, 0, Direction::Right)
        );
    }

    #[test]
    fn variables_map_back_to_their_edge() {
        let graph = two_edge_graph();
        let table = VariableTable::new(&graph);
        for (u, v) in graph.edges() {
            for direction in Direction::ALL {
                let var = table.variable(u, v, direction);
                let (a, b) = table.edge_of_variable(var);
                assert_eq!((a.min(b), a.max(b)), (u.min(v), u.max(v)));
            }
        }
    }

    #[test]
    fn assignment_decoding() {
        let graph = two_edge_graph();
        let table = VariableTable::new(&graph);
        let mut assignment = FixedBitSet::with_capacity(table.variable_count() as usize + 1);
        assignment.insert(table.variable(0, 1, Direction::Right) as usize);
        assignment.insert(table.variable(1, 2, Direction::Up) as usize);
        assert_eq!(table.direction_of_edge(0, 1, &assignment), Direction::Right);
        assert_eq!(table.direction_of_edge(1, 0, &assignment), Direction::Left);
        assert_eq!(table.direction_of_edge(2, 1, &assignment), Direction::Down);
    }
}
