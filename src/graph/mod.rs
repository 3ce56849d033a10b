//! Adjacency-table graph containers keyed by integer node ids.
//!
//! Both containers store pure id-indexed adjacency: nodes and edges carry no
//! payload and algorithms receive the graph explicitly. Neighbor iteration
//! order is unspecified but stable within one instance between mutations.

pub mod algo;
pub mod cycle;
pub mod generate;
pub mod io;

use indexmap::{IndexMap, IndexSet};

use crate::error::LayoutError;

/// Identifier of a graph node. Ids are dense but need not be contiguous.
pub type NodeId = u32;

/// A simple undirected graph: no self loops, no parallel edges.
///
/// The adjacency is symmetric by construction; the edge count is maintained
/// explicitly so `edge_count` is O(1).
#[derive(Clone, Debug, Default)]
pub struct UndirectedGraph {
    adjacency: IndexMap<NodeId, IndexSet<NodeId>>,
    edge_count: usize,
    next_id: NodeId,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fresh node, picking the lowest unused id at or above the
    /// internal cursor.
    pub fn add_node(&mut self) -> NodeId {
        while self.has_node(self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.adjacency.insert(id, IndexSet::new());
        self.next_id += 1;
        id
    }

    /// Add a node under a caller-chosen id.
    pub fn add_node_with_id(&mut self, id: NodeId) -> Result<(), LayoutError> {
        if self.has_node(id) {
            return Err(LayoutError::InvalidInput(format!("node {id} already exists")));
        }
        self.adjacency.insert(id, IndexSet::new());
        Ok(())
    }

    /// Connect `u` and `v`. Both endpoints must exist, `u != v`, and the
    /// edge must not be present yet.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId) -> Result<(), LayoutError> {
        if u == v {
            return Err(LayoutError::InvalidInput(format!("self loop on node {u}")));
        }
        if !self.has_node(u) || !self.has_node(v) {
            return Err(LayoutError::InvalidInput(format!("edge ({u}, {v}) references a missing node")));
        }
        if self.has_edge(u, v) {
            return Err(LayoutError::InvalidInput(format!("edge ({u}, {v}) already exists")));
        }
        self.adjacency[&u].insert(v);
        self.adjacency[&v].insert(u);
        self.edge_count += 1;
        Ok(())
    }

    /// Remove `u` together with all incident edges.
    pub fn remove_node(&mut self, u: NodeId) -> Result<(), LayoutError> {
        let neighbors = self
            .adjacency
            .swap_remove(&u)
            .ok_or_else(|| LayoutError::InvalidInput(format!("node {u} does not exist")))?;
        for v in &neighbors {
            self.adjacency[v].swap_remove(&u);
        }
        self.edge_count -= neighbors.len();
        Ok(())
    }

    pub fn remove_edge(&mut self, u: NodeId, v: NodeId) -> Result<(), LayoutError> {
        if !self.has_edge(u, v) {
            return Err(LayoutError::InvalidInput(format!("edge ({u}, {v}) does not exist")));
        }
        self.adjacency[&u].swap_remove(&v);
        self.adjacency[&v].swap_remove(&u);
        self.edge_count -= 1;
        Ok(())
    }

    pub fn has_node(&self, u: NodeId) -> bool {
        self.adjacency.contains_key(&u)
    }

    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.adjacency.get(&u).is_some_and(|n| n.contains(&v))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn degree(&self, u: NodeId) -> usize {
        self.adjacency.get(&u).map_or(0, IndexSet::len)
    }

    pub fn max_degree(&self) -> usize {
        self.adjacency.values().map(IndexSet::len).max().unwrap_or(0)
    }

    /// Iterate over all node ids.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.keys().copied()
    }

    /// Iterate over the neighbors of `u`; empty if `u` is absent.
    pub fn neighbors(&self, u: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency.get(&u).into_iter().flatten().copied()
    }

    /// Iterate over every undirected edge once, as `(u, v)` with `u < v`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.adjacency
            .iter()
            .flat_map(|(&u, ns)| ns.iter().filter(move |&&v| u < v).map(move |&v| (u, v)))
    }
}

impl PartialEq for UndirectedGraph {
    fn eq(&self, other: &Self) -> bool {
        // the id cursor is bookkeeping, not graph identity
        self.edge_count == other.edge_count && self.adjacency == other.adjacency
    }
}

/// A simple directed graph: no self loops, no parallel arcs.
#[derive(Clone, Debug, Default)]
pub struct DirectedGraph {
    out_adjacency: IndexMap<NodeId, IndexSet<NodeId>>,
    in_adjacency: IndexMap<NodeId, IndexSet<NodeId>>,
    arc_count: usize,
    next_id: NodeId,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self) -> NodeId {
        while self.has_node(self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.out_adjacency.insert(id, IndexSet::new());
        self.in_adjacency.insert(id, IndexSet::new());
        self.next_id += 1;
        id
    }

    pub fn add_node_with_id(&mut self, id: NodeId) -> Result<(), LayoutError> {
        if self.has_node(id) {
            return Err(LayoutError::InvalidInput(format!("node {id} already exists")));
        }
        self.out_adjacency.insert(id, IndexSet::new());
        self.in_adjacency.insert(id, IndexSet::new());
        Ok(())
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), LayoutError> {
        if from == to {
            return Err(LayoutError::InvalidInput(format!("self loop on node {from}")));
        }
        if !self.has_node(from) || !self.has_node(to) {
            return Err(LayoutError::InvalidInput(format!("arc ({from}, {to}) references a missing node")));
        }
        if self.has_edge(from, to) {
            return Err(LayoutError::InvalidInput(format!("arc ({from}, {to}) already exists")));
        }
        self.out_adjacency[&from].insert(to);
        self.in_adjacency[&to].insert(from);
        self.arc_count += 1;
        Ok(())
    }

    pub fn remove_node(&mut self, u: NodeId) -> Result<(), LayoutError> {
        let out = self
            .out_adjacency
            .swap_remove(&u)
            .ok_or_else(|| LayoutError::InvalidInput(format!("node {u} does not exist")))?;
        let inc = self.in_adjacency.swap_remove(&u).unwrap_or_default();
        for v in &out {
            self.in_adjacency[v].swap_remove(&u);
        }
        for v in &inc {
            self.out_adjacency[v].swap_remove(&u);
        }
        self.arc_count -= out.len() + inc.len();
        Ok(())
    }

    pub fn remove_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), LayoutError> {
        if !self.has_edge(from, to) {
            return Err(LayoutError::InvalidInput(format!("arc ({from}, {to}) does not exist")));
        }
        self.out_adjacency[&from].swap_remove(&to);
        self.in_adjacency[&to].swap_remove(&from);
        self.arc_count -= 1;
        Ok(())
    }

    pub fn has_node(&self, u: NodeId) -> bool {
        self.out_adjacency.contains_key(&u)
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.out_adjacency.get(&from).is_some_and(|n| n.contains(&to))
    }

    pub fn node_count(&self) -> usize {
        self.out_adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.arc_count
    }

    pub fn out_degree(&self, u: NodeId) -> usize {
        self.out_adjacency.get(&u).map_or(0, IndexSet::len)
    }

    pub fn in_degree(&self, u: NodeId) -> usize {
        self.in_adjacency.get(&u).map_or(0, IndexSet::len)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.out_adjacency.keys().copied()
    }

    pub fn out_neighbors(&self, u: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_adjacency.get(&u).into_iter().flatten().copied()
    }

    pub fn in_neighbors(&self, u: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.in_adjacency.get(&u).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_add_remove() {
        let mut g = UndirectedGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        let c = g.add_node();
        assert_eq!((a, b, c), (0, 1, 2));

        g.add_edge(a, b).unwrap();
        g.add_edge(b, c).unwrap();
        assert_eq!(g.edge_count(), 2);
        assert!(g.has_edge(b, a));
        assert_eq!(g.degree(b), 2);

        g.remove_node(b).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert!(!g.has_node(b));
        assert!(!g.has_edge(a, b));
    }

    #[test]
    fn undirected_rejects_duplicates_and_loops() {
        let mut g = UndirectedGraph::new();
        g.add_node_with_id(7).unwrap();
        assert!(g.add_node_with_id(7).is_err());

        let a = g.add_node();
        assert!(g.add_edge(a, a).is_err());
        g.add_edge(7, a).unwrap();
        assert!(g.add_edge(a, 7).is_err());
        assert!(g.add_edge(a, 99).is_err());
    }

    #[test]
    fn add_node_skips_taken_ids() {
        let mut g = UndirectedGraph::new();
        g.add_node_with_id(0).unwrap();
        g.add_node_with_id(1).unwrap();
        assert_eq!(g.add_node(), 2);
        g.add_node_with_id(3).unwrap();
        assert_eq!(g.add_node(), 4);
    }

    #[test]
    fn directed_mirrors_arcs() {
        let mut g = DirectedGraph::new();
        let a = g.add_node();
        let b = g.add_node();
        g.add_edge(a, b).unwrap();
        assert!(g.has_edge(a, b));
        assert!(!g.has_edge(b, a));
        assert_eq!(g.in_neighbors(b).collect::<Vec<_>>(), vec![a]);
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.in_degree(a), 0);

        g.remove_node(b).unwrap();
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.out_degree(a), 0);
    }

    #[test]
    fn edges_are_reported_once() {
        let mut g = UndirectedGraph::new();
        for _ in 0..3 {
            g.add_node();
        }
        g.add_edge(2, 0).unwrap();
        g.add_edge(1, 2).unwrap();
        let mut edges: Vec<_> = g.edges().collect();
        edges.sort_unstable();
        assert_eq!(edges, vec![(0, 2), (1, 2)]);
    }
}
