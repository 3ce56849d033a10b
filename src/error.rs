use std::io;

use thiserror::Error;

/// Errors surfaced by the public layout operations.
///
/// Violations of internal invariants (asymmetric shapes, missing attribute
/// entries and the like) are bugs and panic instead of being reported here.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Malformed input: duplicate ids, self loops, parallel edges, or an
    /// unparsable file.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation needs a connected graph.
    #[error("graph is not connected")]
    NotConnected,

    /// The SAT oracle reported a failure of its own.
    #[error("sat oracle failure: {0}")]
    SatOracleFailure(String),

    /// A repair loop ran past its configured cap without converging.
    #[error("{stage} exceeded its limit of {limit} iterations")]
    PipelineDivergence {
        stage: &'static str,
        limit: usize,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
