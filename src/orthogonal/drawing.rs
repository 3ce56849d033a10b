//! The finished drawing and its JSON interchange format.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::attributes::{Color, GraphAttributes};
use crate::error::LayoutError;
use crate::graph::{NodeId, UndirectedGraph};
use crate::shape::{Direction, Shape};

/// A complete orthogonal drawing: the input graph augmented with corner
/// and helper nodes, a color and an integer position per node, and a
/// direction per directed incidence.
#[derive(Clone, Debug)]
pub struct OrthogonalDrawing {
    pub graph: UndirectedGraph,
    pub attributes: GraphAttributes,
    pub shape: Shape,
    /// Cycles in the basis the shape search started from.
    pub initial_cycle_count: usize,
    /// Cycles appended by metric repairs.
    pub added_cycle_count: usize,
    /// Flat corners contracted after the shape settled.
    pub removed_bend_count: usize,
}

#[derive(Deserialize, Serialize)]
struct ShapeRecord {
    u: NodeId,
    v: NodeId,
    dir: String,
}

/// On-disk model of a drawing. Maps are keyed by stringified node ids and
/// kept sorted so output is deterministic.
#[derive(Deserialize, Serialize)]
struct DrawingFile {
    nodes: Vec<NodeId>,
    edges: Vec<(NodeId, NodeId)>,
    node_colors: BTreeMap<String, String>,
    node_positions: BTreeMap<String, (i32, i32)>,
    shape: Vec<ShapeRecord>,
}

impl OrthogonalDrawing {
    pub fn to_json_string(&self) -> Result<String, LayoutError> {
        let mut nodes: Vec<NodeId> = self.graph.nodes().collect();
        nodes.sort_unstable();
        let mut edges: Vec<(NodeId, NodeId)> = self.graph.edges().collect();
        edges.sort_unstable();

        let mut node_colors = BTreeMap::new();
        let mut node_positions = BTreeMap::new();
        for &node in &nodes {
            let color = self.attributes.try_color(node).ok_or_else(|| {
                LayoutError::InvalidInput(format!("node {node} has no color"))
            })?;
            let position = self.attributes.try_position(node).ok_or_else(|| {
                LayoutError::InvalidInput(format!("node {node} has no position"))
            })?;
            node_colors.insert(node.to_string(), color.as_str().to_owned());
            node_positions.insert(node.to_string(), position);
        }

        let mut shape = Vec::with_capacity(edges.len());
        for &(u, v) in &edges {
            let direction = self.shape.direction(u, v).ok_or_else(|| {
                LayoutError::InvalidInput(format!("no direction set for edge ({u}, {v})"))
            })?;
            shape.push(ShapeRecord {
                u,
                v,
                dir: direction.as_str().to_owned(),
            });
        }

        let file = DrawingFile {
            nodes,
            edges,
            node_colors,
            node_positions,
            shape,
        };
        serde_json::to_string_pretty(&file)
            .map_err(|error| LayoutError::InvalidInput(error.to_string()))
    }

    pub fn from_json_str(input: &str) -> Result<Self, LayoutError> {
        let file: DrawingFile = serde_json::from_str(input)
            .map_err(|error| LayoutError::InvalidInput(error.to_string()))?;
        let mut graph = UndirectedGraph::new();
        for &node in &file.nodes {
            graph.add_node_with_id(node)?;
        }
        for &(u, v) in &file.edges {
            graph.add_edge(u, v)?;
        }

        let mut attributes = GraphAttributes::new();
        for (id, color) in &file.node_colors {
            let node: NodeId = id
                .parse()
                .map_err(|_| LayoutError::InvalidInput(format!("bad node id {id:?}")))?;
            let color = Color::from_str(color)
                .ok_or_else(|| LayoutError::InvalidInput(format!("unknown color {color:?}")))?;
            attributes.set_color(node, color);
        }
        for (id, &(x, y)) in &file.node_positions {
            let node: NodeId = id
                .parse()
                .map_err(|_| LayoutError::InvalidInput(format!("bad node id {id:?}")))?;
            attributes.set_position(node, x, y);
        }

        let mut shape = Shape::new();
        for record in &file.shape {
            let direction = Direction::from_str(&record.dir).ok_or_else(|| {
                LayoutError::InvalidInput(format!("unknown direction {:?}", record.dir))
            })?;
            shape.set_direction(record.u, record.v, direction)?;
            shape.set_direction(record.v, record.u, direction.opposite())?;
        }

        Ok(Self {
            graph,
            attributes,
            shape,
            initial_cycle_count: 0,
            added_cycle_count: 0,
            removed_bend_count: 0,
        })
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), LayoutError> {
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
