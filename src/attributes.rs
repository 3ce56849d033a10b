//! Per-node drawing attributes: colors and grid positions.

use std::collections::HashMap;
use std::fmt;

use crate::graph::NodeId;

/// Role marker of a node in the augmented drawing graph.
///
/// `Black` marks nodes of the input graph. `Red` marks corner nodes
/// inserted while repairing unsatisfiable shape instances. `Green`/`Blue`
/// mark helper nodes fanning a high-degree node out along one axis; the
/// dark variants mark helpers that were flipped or placed on the far side
/// of their port during overlap resolution.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    Black,
    Red,
    RedSpecial,
    Green,
    GreenDark,
    Blue,
    BlueDark,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::Red => "red",
            Color::RedSpecial => "darkred",
            Color::Green => "green",
            Color::GreenDark => "darkgreen",
            Color::Blue => "blue",
            Color::BlueDark => "darkblue",
        }
    }

    pub fn from_str(s: &str) -> Option<Color> {
        match s {
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "darkred" => Some(Color::RedSpecial),
            "green" => Some(Color::Green),
            "darkgreen" => Some(Color::GreenDark),
            "blue" => Some(Color::Blue),
            "darkblue" => Some(Color::BlueDark),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse per-node attribute maps.
///
/// Exactly two attributes exist: a color and an integer grid position.
/// The panicking accessors (`color`, `position`, `x`, `y`) are for pipeline
/// stages whose invariants guarantee presence; the `try_` variants report
/// absence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphAttributes {
    colors: HashMap<NodeId, Color>,
    positions: HashMap<NodeId, (i32, i32)>,
}

impl GraphAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the color of a node that has none yet.
    pub fn set_color(&mut self, node: NodeId, color: Color) {
        let previous = self.colors.insert(node, color);
        assert!(previous.is_none(), "color already set for node {node}");
    }

    /// Overwrite the color of an already colored node.
    pub fn recolor(&mut self, node: NodeId, color: Color) {
        let previous = self.colors.insert(node, color);
        assert!(previous.is_some(), "node {node} has no color to change");
    }

    pub fn color(&self, node: NodeId) -> Color {
        self.try_color(node)
            .unwrap_or_else(|| panic!("no color set for node {node}"))
    }

    pub fn try_color(&self, node: NodeId) -> Option<Color> {
        self.colors.get(&node).copied()
    }

    pub fn set_position(&mut self, node: NodeId, x: i32, y: i32) {
        self.positions.insert(node, (x, y));
    }

    pub fn set_x(&mut self, node: NodeId, x: i32) {
        let position = self
            .positions
            .get_mut(&node)
            .unwrap_or_else(|| panic!("no position set for node {node}"));
        position.0 = x;
    }

    pub fn set_y(&mut self, node: NodeId, y: i32) {
        let position = self
            .positions
            .get_mut(&node)
            .unwrap_or_else(|| panic!("no position set for node {node}"));
        position.1 = y;
    }

    pub fn position(&self, node: NodeId) -> (i32, i32) {
        self.try_position(node)
            .unwrap_or_else(|| panic!("no position set for node {node}"))
    }

    pub fn try_position(&self, node: NodeId) -> Option<(i32, i32)> {
        self.positions.get(&node).copied()
    }

    pub fn x(&self, node: NodeId) -> i32 {
        self.position(node).0
    }

    pub fn y(&self, node: NodeId) -> i32 {
        self.position(node).1
    }

    pub fn has_position(&self, node: NodeId) -> bool {
        self.positions.contains_key(&node)
    }

    pub fn remove_position(&mut self, node: NodeId) {
        self.positions.remove(&node);
    }

    pub fn clear_positions(&mut self) {
        self.positions.clear();
    }

    /// Drop every attribute of `node`.
    pub fn remove_node(&mut self, node: NodeId) {
        self.colors.remove(&node);
        self.positions.remove(&node);
    }
}
