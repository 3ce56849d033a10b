//! Reference [`SatOracle`] backed by the varisat CDCL solver.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use varisat::{ExtendFormula, Lit, ProofFormat, Solver};

use crate::error::LayoutError;
use crate::sat::{Cnf, SatOracle, SatOutcome};

static PROOF_FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn unique_proof_path() -> PathBuf {
    let counter = PROOF_FILE_COUNTER.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("orthograph-{}-{counter}.drat", process::id()))
}

/// Solves formulas in-process with varisat, capturing DRAT proofs on
/// unsatisfiable instances through a temporary file.
#[derive(Clone, Copy, Debug, Default)]
pub struct VarisatOracle;

impl VarisatOracle {
    pub fn new() -> Self {
        VarisatOracle
    }
}

impl SatOracle for VarisatOracle {
    fn solve(&self, cnf: &Cnf) -> Result<SatOutcome, LayoutError> {
        let proof_path = unique_proof_path();
        let proof_file = BufWriter::new(File::create(&proof_path)?);

        let mut solver = Solver::new();
        solver.write_proof(proof_file, ProofFormat::Drat);
        let mut literals = Vec::new();
        for clause in cnf.clauses() {
            literals.clear();
            literals.extend(clause.iter().map(|&lit| Lit::from_dimacs(lit as isize)));
            solver.add_clause(&literals);
        }

        let satisfiable = solver
            .solve()
            .map_err(|error| LayoutError::SatOracleFailure(error.to_string()))?;

        let outcome = if satisfiable {
            let assignment = solver
                .model()
                .unwrap_or_default()
                .iter()
                .map(|lit| lit.to_dimacs() as i32)
                .collect();
            Ok(SatOutcome::Satisfiable { assignment })
        } else {
            let _ = solver.close_proof();
            drop(solver);
            let proof = fs::read_to_string(&proof_path)?
                .lines()
                .map(str::to_owned)
                .collect();
            Ok(SatOutcome::Unsatisfiable { proof })
        };
        let _ = fs::remove_file(&proof_path);
        outcome
    }
}
