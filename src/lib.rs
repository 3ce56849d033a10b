//! **orthograph** computes orthogonal grid drawings of simple undirected
//! graphs.
//!
//! Every edge of the drawing is a chain of axis-aligned segments, every node
//! sits on an integer grid point, and the layout heuristically keeps bends,
//! crossings and area small. The drawing is found in two stages:
//!
//! 1. A *shape*, one of `{up, down, left, right}` for every directed
//!    incidence, is searched for by encoding the local node constraints and
//!    the rectilinearity of a cycle basis as CNF and handing it to a
//!    [`SatOracle`](sat::SatOracle). Unsatisfiable instances are repaired by
//!    splitting an edge named by the proof with a synthetic corner node and
//!    solving again.
//! 2. The shape is *metrized*: nodes are partitioned into per-axis
//!    equivalence classes, the classes are ordered by two precedence DAGs,
//!    and a topological walk assigns integer coordinates. Nodes of degree
//!    above four are expanded with helper nodes so each side of the node can
//!    carry several edges.
//!
//! The entry point is [`make_orthogonal_drawing`]; the result bundles the
//! augmented graph, its attributes (colors and positions) and the shape.
//!
//! ```
//! use orthograph::{make_orthogonal_drawing, DrawingConfig, UndirectedGraph};
//! use orthograph::sat::VarisatOracle;
//!
//! let mut graph = UndirectedGraph::new();
//! for id in 0..4 {
//!     graph.add_node_with_id(id).unwrap();
//! }
//! for (u, v) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
//!     graph.add_edge(u, v).unwrap();
//! }
//! let drawing =
//!     make_orthogonal_drawing(&graph, &VarisatOracle::new(), &DrawingConfig::default(), None)
//!         .unwrap();
//! assert_eq!(drawing.graph.node_count(), 4);
//! ```

pub mod attributes;
mod error;
pub mod graph;
pub mod orthogonal;
pub mod sat;
pub mod shape;

pub use crate::attributes::{Color, GraphAttributes};
pub use crate::error::LayoutError;
pub use crate::graph::{DirectedGraph, NodeId, UndirectedGraph};
pub use crate::graph::cycle::Cycle;
pub use crate::orthogonal::builder::{make_orthogonal_drawing, DrawingConfig};
pub use crate::orthogonal::drawing::OrthogonalDrawing;
pub use crate::orthogonal::shape_builder::{ShapeConfig, ShapeLogs};
pub use crate::orthogonal::stats::{compute_stats, OrthogonalStats};
pub use crate::shape::{Direction, Shape};
