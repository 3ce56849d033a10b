//! Orthogonal directions and the shape of a drawing.

use std::collections::HashMap;
use std::fmt;

use crate::error::LayoutError;
use crate::graph::NodeId;

/// One of the four orthogonal directions an edge can leave a node in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn rotated_90(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    pub fn from_str(s: &str) -> Option<Direction> {
        match s {
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partial map from directed incidences `(u, v)` to directions.
///
/// Symmetry is a caller obligation: whoever records `(u, v)` records
/// `(v, u)` with the opposite direction. A complete shape therefore
/// satisfies `direction(u, v) == direction(v, u).opposite()` for every
/// edge of its graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Shape {
    directions: HashMap<(NodeId, NodeId), Direction>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the direction of `(u, v)`; the incidence must be unmapped.
    pub fn set_direction(
        &mut self,
        u: NodeId,
        v: NodeId,
        direction: Direction,
    ) -> Result<(), LayoutError> {
        if let Some(existing) = self.directions.get(&(u, v)) {
            return Err(LayoutError::InvalidInput(format!(
                "direction already set for ({u}, {v}): {existing} vs {direction}"
            )));
        }
        self.directions.insert((u, v), direction);
        Ok(())
    }

    /// Forget the direction of `(u, v)`; the incidence must be mapped.
    pub fn remove_direction(&mut self, u: NodeId, v: NodeId) -> Result<(), LayoutError> {
        self.directions
            .remove(&(u, v))
            .map(|_| ())
            .ok_or_else(|| LayoutError::InvalidInput(format!("no direction set for ({u}, {v})")))
    }

    pub fn direction(&self, u: NodeId, v: NodeId) -> Option<Direction> {
        self.directions.get(&(u, v)).copied()
    }

    pub fn contains(&self, u: NodeId, v: NodeId) -> bool {
        self.directions.contains_key(&(u, v))
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Direction of a mapped incidence. Panics on unmapped input; use
    /// [`Shape::direction`] when absence is expected.
    fn known_direction(&self, u: NodeId, v: NodeId) -> Direction {
        self.direction(u, v)
            .unwrap_or_else(|| panic!("no direction set for ({u}, {v})"))
    }

    pub fn is_up(&self, u: NodeId, v: NodeId) -> bool {
        self.known_direction(u, v) == Direction::Up
    }

    pub fn is_down(&self, u: NodeId, v: NodeId) -> bool {
        self.known_direction(u, v) == Direction::Down
    }

    pub fn is_left(&self, u: NodeId, v: NodeId) -> bool {
        self.known_direction(u, v) == Direction::Left
    }

    pub fn is_right(&self, u: NodeId, v: NodeId) -> bool {
        self.known_direction(u, v) == Direction::Right
    }

    pub fn is_horizontal(&self, u: NodeId, v: NodeId) -> bool {
        self.known_direction(u, v).is_horizontal()
    }

    pub fn is_vertical(&self, u: NodeId, v: NodeId) -> bool {
        self.known_direction(u, v).is_vertical()
    }

    pub fn iter(&self) -> impl Iterator<Item = ((NodeId, NodeId), Direction)> + '_ {
        self.directions.iter().map(|(&k, &d)| (k, d))
    }
}
