//! CNF formulas and the SAT oracle boundary.
//!
//! The layout core never solves SAT itself: it builds a [`Cnf`] and hands
//! it to a [`SatOracle`]. A satisfiable result carries the assignment as
//! signed DIMACS literals; an unsatisfiable one carries the textual DRAT
//! proof lines, which the shape builder mines for unit clauses.

mod varisat;

pub use self::varisat::VarisatOracle;

use crate::error::LayoutError;

/// One row of a CNF in emission order: a clause or a free-form comment.
/// Comments are ignored by solvers but keep the formula auditable.
#[derive(Clone, Debug)]
pub enum CnfRow {
    Clause(Vec<i32>),
    Comment(String),
}

/// A CNF formula under construction.
#[derive(Clone, Debug, Default)]
pub struct Cnf {
    rows: Vec<CnfRow>,
    variable_count: i32,
    clause_count: usize,
}

impl Cnf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a clause of non-zero signed literals.
    pub fn add_clause(&mut self, clause: Vec<i32>) {
        debug_assert!(clause.iter().all(|&lit| lit != 0));
        for &lit in &clause {
            self.variable_count = self.variable_count.max(lit.abs());
        }
        self.clause_count += 1;
        self.rows.push(CnfRow::Clause(clause));
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.rows.push(CnfRow::Comment(comment.into()));
    }

    pub fn variable_count(&self) -> i32 {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[i32]> + '_ {
        self.rows.iter().filter_map(|row| match row {
            CnfRow::Clause(clause) => Some(clause.as_slice()),
            CnfRow::Comment(_) => None,
        })
    }

    /// Render the formula in DIMACS text form, comments included.
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.variable_count, self.clause_count);
        for row in &self.rows {
            match row {
                CnfRow::Comment(comment) => {
                    out.push_str("c ");
                    out.push_str(comment);
                    out.push('\n');
                }
                CnfRow::Clause(clause) => {
                    for lit in clause {
                        out.push_str(&lit.to_string());
                        out.push(' ');
                    }
                    out.push_str("0\n");
                }
            }
        }
        out
    }
}

/// Outcome of one oracle invocation.
#[derive(Clone, Debug)]
pub enum SatOutcome {
    /// A model: the non-zero literals, sign carrying the truth value.
    Satisfiable { assignment: Vec<i32> },
    /// No model: the DRAT refutation, one clause (or `d` deletion) per line.
    Unsatisfiable { proof: Vec<String> },
}

/// A synchronous SAT solver.
pub trait SatOracle {
    fn solve(&self, cnf: &Cnf) -> Result<SatOutcome, LayoutError>;
}
