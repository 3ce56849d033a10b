//! Shape search: solve the CNF, and on refutation split an edge named by
//! the proof with a corner node, then solve again.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use fixedbitset::FixedBitSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::attributes::{Color, GraphAttributes};
use crate::error::LayoutError;
use crate::graph::cycle::Cycle;
use crate::graph::{NodeId, UndirectedGraph};
use crate::orthogonal::clauses::{
    add_cycle_clauses, add_node_clauses, add_one_direction_per_edge_clauses,
};
use crate::orthogonal::variables::VariableTable;
use crate::sat::{Cnf, SatOracle, SatOutcome};
use crate::shape::Shape;

/// Knobs of the shape search.
#[derive(Clone, Copy, Debug)]
pub struct ShapeConfig {
    /// Seed the proof-literal choice from system entropy instead of the
    /// fixed seed 42.
    pub randomize: bool,
    /// Upper bound on corner insertions before the search gives up.
    pub max_corner_insertions: usize,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            randomize: false,
            max_corner_insertions: 512,
        }
    }
}

/// Optional append-only diagnostics sinks.
///
/// Multiple pipelines in one process may share the sinks, hence the
/// mutexes. Writing is best effort and never affects layout results.
#[derive(Default)]
pub struct ShapeLogs {
    cnf: Option<Mutex<Box<dyn Write + Send>>>,
    unit_clauses: Option<Mutex<Box<dyn Write + Send>>>,
}

impl ShapeLogs {
    pub fn new(
        cnf: Option<Box<dyn Write + Send>>,
        unit_clauses: Option<Box<dyn Write + Send>>,
    ) -> Self {
        Self {
            cnf: cnf.map(Mutex::new),
            unit_clauses: unit_clauses.map(Mutex::new),
        }
    }

    /// Sinks appending to the two files at `cnf_path` and `units_path`.
    pub fn appending_to(
        cnf_path: impl AsRef<Path>,
        units_path: impl AsRef<Path>,
    ) -> Result<Self, LayoutError> {
        let open = |path: &Path| -> Result<Box<dyn Write + Send>, LayoutError> {
            let file: File = OpenOptions::new().create(true).append(true).open(path)?;
            Ok(Box::new(file))
        };
        Ok(Self::new(
            Some(open(cnf_path.as_ref())?),
            Some(open(units_path.as_ref())?),
        ))
    }

    fn record_cnf(&self, variables: i32, clauses: usize) {
        if let Some(sink) = &self.cnf {
            if let Ok(mut sink) = sink.lock() {
                let _ = writeln!(sink, "v {variables} c {clauses}");
            }
        }
    }

    fn record_units(&self, count: usize) {
        if let Some(sink) = &self.unit_clauses {
            if let Ok(mut sink) = sink.lock() {
                let _ = writeln!(sink, "units {count}");
            }
        }
    }
}

/// Search a complete orthogonal shape for `graph`.
///
/// `cycles` is the rectilinearity cycle basis; corner insertions rewrite
/// both the graph and the cycles in place, so the caller sees the repaired
/// basis. Every corner node is colored [`Color::Red`] in `attributes`.
pub fn build_shape(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    cycles: &mut Vec<Cycle>,
    oracle: &dyn SatOracle,
    config: &ShapeConfig,
    logs: Option<&ShapeLogs>,
) -> Result<Shape, LayoutError> {
    let mut rng = if config.randomize {
        StdRng::from_entropy()
    } else {
        StdRng::seed_from_u64(42)
    };
    for _ in 0..config.max_corner_insertions {
        if let Some(shape) = solve_or_add_corner(graph, attributes, cycles, oracle, &mut rng, logs)?
        {
            return Ok(shape);
        }
    }
    Err(LayoutError::PipelineDivergence {
        stage: "corner insertion",
        limit: config.max_corner_insertions,
    })
}

fn solve_or_add_corner(
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    cycles: &mut Vec<Cycle>,
    oracle: &dyn SatOracle,
    rng: &mut StdRng,
    logs: Option<&ShapeLogs>,
) -> Result<Option<Shape>, LayoutError> {
    let table = VariableTable::new(graph);
    let mut cnf = Cnf::new();
    cnf.add_comment("one direction per edge");
    add_one_direction_per_edge_clauses(graph, &mut cnf, &table);
    cnf.add_comment("node ports");
    add_node_clauses(graph, &mut cnf, &table);
    cnf.add_comment("cycle rectilinearity");
    add_cycle_clauses(&mut cnf, cycles, &table);
    if let Some(logs) = logs {
        logs.record_cnf(cnf.variable_count(), cnf.clause_count());
    }
    debug!(
        variables = cnf.variable_count(),
        clauses = cnf.clause_count(),
        cycles = cycles.len(),
        "solving shape formula"
    );

    match oracle.solve(&cnf)? {
        SatOutcome::Satisfiable { assignment } => {
            let shape = decode_shape(graph, &table, &assignment)?;
            Ok(Some(shape))
        }
        SatOutcome::Unsatisfiable { proof } => {
            let (u, v) = select_edge_to_split(&proof, rng, &table, cycles, logs)?;
            trace!(u, v, "splitting edge with a corner node");
            add_corner_inside_edge(u, v, graph, attributes, cycles)?;
            Ok(None)
        }
    }
}

fn decode_shape(
    graph: &UndirectedGraph,
    table: &VariableTable,
    assignment: &[i32],
) -> Result<Shape, LayoutError> {
    let mut truth = FixedBitSet::with_capacity(table.variable_count() as usize + 1);
    for &literal in assignment {
        if literal > 0 && literal <= table.variable_count() {
            truth.insert(literal as usize);
        }
    }
    let mut shape = Shape::new();
    for node in graph.nodes() {
        for neighbor in graph.neighbors(node) {
            shape.set_direction(node, neighbor, table.direction_of_edge(node, neighbor, &truth))?;
        }
    }
    Ok(shape)
}

/// Parse one DRAT line into its literals, tolerating `d` deletion markers.
fn parse_proof_line(line: &str) -> Result<Vec<i32>, LayoutError> {
    let mut literals = Vec::new();
    let mut terminated = false;
    for token in line.split_whitespace() {
        if token == "d" {
            continue;
        }
        let literal: i32 = token
            .parse()
            .map_err(|_| LayoutError::InvalidInput(format!("invalid proof line {line:?}")))?;
        if literal == 0 {
            terminated = true;
            break;
        }
        literals.push(literal);
    }
    if !terminated {
        return Err(LayoutError::InvalidInput(format!(
            "unterminated proof line {line:?}"
        )));
    }
    Ok(literals)
}

/// Pick the edge to split from an UNSAT proof.
///
/// Unit clauses over original variables are collected from the end of the
/// proof backwards and one of the first two is chosen at random. Proofs
/// without such unit clauses fall back to the last proof literal over an
/// original variable, and failing that to a random edge on some cycle.
fn select_edge_to_split(
    proof: &[String],
    rng: &mut StdRng,
    table: &VariableTable,
    cycles: &[Cycle],
    logs: Option<&ShapeLogs>,
) -> Result<(NodeId, NodeId), LayoutError> {
    let original_variables = table.variable_count();
    let mut unit_variables = Vec::new();
    let mut last_variable = None;
    for line in proof.iter().rev() {
        let literals = parse_proof_line(line)?;
        if literals.len() == 1 && literals[0].abs() <= original_variables {
            unit_variables.push(literals[0].abs());
        }
        if last_variable.is_none() {
            last_variable = literals
                .iter()
                .map(|l| l.abs())
                .find(|&v| v <= original_variables);
        }
    }
    if let Some(logs) = logs {
        logs.record_units(unit_variables.len());
    }
    debug!(units = unit_variables.len(), "mined refutation proof");

    if !unit_variables.is_empty() {
        let pick = rng.gen_range(0..unit_variables.len().min(2));
        return Ok(table.edge_of_variable(unit_variables[pick]));
    }
    if let Some(variable) = last_variable {
        return Ok(table.edge_of_variable(variable));
    }
    // degenerate proof: split anywhere on the constrained cycles
    let cycle_edges: Vec<(NodeId, NodeId)> = cycles
        .iter()
        .flat_map(|cycle| (0..cycle.len()).map(|i| (cycle.at(i), cycle.at(i + 1))))
        .collect();
    if cycle_edges.is_empty() {
        return Err(LayoutError::SatOracleFailure(
            "refutation proof names no splittable edge".into(),
        ));
    }
    Ok(cycle_edges[rng.gen_range(0..cycle_edges.len())])
}

/// Split `{u, v}` with a fresh red corner node and patch every cycle that
/// traverses the edge.
fn add_corner_inside_edge(
    u: NodeId,
    v: NodeId,
    graph: &mut UndirectedGraph,
    attributes: &mut GraphAttributes,
    cycles: &mut [Cycle],
) -> Result<(), LayoutError> {
    let corner = graph.add_node();
    attributes.set_color(corner, Color::Red);
    graph.remove_edge(u, v)?;
    graph.add_edge(u, corner)?;
    graph.add_edge(v, corner)?;
    for cycle in cycles {
        cycle.add_between(u, v, corner);
    }
    Ok(())
}
