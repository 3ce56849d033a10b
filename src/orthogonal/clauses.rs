//! Clause builders for the shape formula.

use crate::graph::cycle::Cycle;
use crate::graph::{NodeId, UndirectedGraph};
use crate::orthogonal::variables::VariableTable;
use crate::sat::Cnf;
use crate::shape::Direction;

fn add_at_most_one(cnf: &mut Cnf, variables: &[i32]) {
    for (i, &a) in variables.iter().enumerate() {
        for &b in &variables[i + 1..] {
            cnf.add_clause(vec![-a, -b]);
        }
    }
}

/// Exactly one of the four direction variables of every edge is true.
pub fn add_one_direction_per_edge_clauses(
    graph: &UndirectedGraph,
    cnf: &mut Cnf,
    table: &VariableTable,
) {
    for (u, v) in graph.edges() {
        let variables: Vec<i32> = Direction::ALL
            .iter()
            .map(|&d| table.variable(u, v, d))
            .collect();
        cnf.add_clause(variables.clone());
        add_at_most_one(cnf, &variables);
    }
}

fn add_at_least_one_in_direction(
    graph: &UndirectedGraph,
    cnf: &mut Cnf,
    table: &VariableTable,
    node: NodeId,
    direction: Direction,
) {
    let clause: Vec<i32> = graph
        .neighbors(node)
        .map(|neighbor| table.variable(node, neighbor, direction))
        .collect();
    cnf.add_clause(clause);
}

fn add_port_clauses_for_direction(
    graph: &UndirectedGraph,
    cnf: &mut Cnf,
    table: &VariableTable,
    node: NodeId,
    direction: Direction,
) {
    let variables: Vec<i32> = graph
        .neighbors(node)
        .map(|neighbor| table.variable(node, neighbor, direction))
        .collect();
    match variables.len() {
        // all four ports in use: some edge must take this one
        4 => cnf.add_clause(variables),
        2 | 3 => add_at_most_one(cnf, &variables),
        0 | 1 => {}
        degree => unreachable!("port clauses on node {node} of degree {degree}"),
    }
}

/// Per-node port constraints.
///
/// Nodes of degree at most four get at most (and for degree four, exactly)
/// one edge per direction. Higher degrees only demand that every direction
/// is used; their surplus incidences are split off onto helper nodes later.
pub fn add_node_clauses(graph: &UndirectedGraph, cnf: &mut Cnf, table: &VariableTable) {
    for node in graph.nodes() {
        if graph.degree(node) <= 4 {
            for direction in Direction::ALL {
                add_port_clauses_for_direction(graph, cnf, table, node, direction);
            }
        } else {
            for direction in Direction::ALL {
                add_at_least_one_in_direction(graph, cnf, table, node, direction);
            }
        }
    }
}

/// Every basis cycle must traverse all four directions, a necessary
/// condition for its drawing to close up rectilinearly.
pub fn add_cycle_clauses(cnf: &mut Cnf, cycles: &[Cycle], table: &VariableTable) {
    for cycle in cycles {
        for direction in Direction::ALL {
            let clause: Vec<i32> = (0..cycle.len())
                .map(|i| table.variable(cycle.at(i), cycle.at(i + 1), direction))
                .collect();
            cnf.add_clause(clause);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> UndirectedGraph {
        let mut graph = UndirectedGraph::new();
        for id in 0..3 {
            graph.add_node_with_id(id).unwrap();
        }
        graph.add_edge(0, 1).unwrap();
        graph.add_edge(1, 2).unwrap();
        graph.add_edge(0, 2).unwrap();
        graph
    }

    #[test]
    fn edge_clauses_count() {
        let graph = triangle();
        let table = VariableTable::new(&graph);
        let mut cnf = Cnf::new();
        add_one_direction_per_edge_clauses(&graph, &mut cnf, &table);
        // per edge: one at-least-one clause and six exclusion pairs
        assert_eq!(cnf.clause_count(), 3 * 7);
        assert_eq!(cnf.variable_count(), table.variable_count());
    }

    #[test]
    fn node_clauses_by_degree() {
        let graph = triangle();
        let table = VariableTable::new(&graph);
        let mut cnf = Cnf::new();
        add_node_clauses(&graph, &mut cnf, &table);
        // degree two everywhere: one exclusion pair per node and direction
        assert_eq!(cnf.clause_count(), 3 * 4);
        assert!(cnf.clauses().all(|clause| clause.len() == 2));
        assert!(cnf.clauses().flatten().all(|&lit| lit < 0));
    }

    #[test]
    fn high_degree_node_gets_at_least_one_per_direction() {
        let mut graph = UndirectedGraph::new();
        for id in 0..6 {
            graph.add_node_with_id(id).unwrap();
        }
        for leaf in 1..6 {
            graph.add_edge(0, leaf).unwrap();
        }
        let table = VariableTable::new(&graph);
        let mut cnf = Cnf::new();
        add_node_clauses(&graph, &mut cnf, &table);
        let five_wide = cnf.clauses().filter(|clause| clause.len() == 5).count();
        // four covering clauses for the hub; leaves add no constraint
        assert_eq!(five_wide, 4);
        assert_eq!(cnf.clause_count(), 4);
    }

    #[test]
    fn cycle_clauses_cover_all_directions() {
        let graph = triangle();
        let table = VariableTable::new(&graph);
        let cycles = vec![Cycle::new(vec![0, 1, 2])];
        let mut cnf = Cnf::new();
        add_cycle_clauses(&mut cnf, &cycles, &table);
        assert_eq!(cnf.clause_count(), 4);
        assert!(cnf.clauses().all(|clause| clause.len() == 3));
    }
}
