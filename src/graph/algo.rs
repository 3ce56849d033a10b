//! Graph algorithms used by the layout pipeline: connectivity, spanning
//! trees, cycle bases, topological orderings, cycle detection, biconnected
//! components and bipartitions.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::LayoutError;
use crate::graph::cycle::Cycle;
use crate::graph::{DirectedGraph, NodeId, UndirectedGraph};

/// Whether the graph is connected. The empty graph counts as connected.
pub fn is_connected(graph: &UndirectedGraph) -> bool {
    let Some(start) = graph.nodes().next() else {
        return true;
    };
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        for neighbor in graph.neighbors(node) {
            if !visited.contains(&neighbor) {
                stack.push(neighbor);
            }
        }
    }
    visited.len() == graph.node_count()
}

/// A BFS spanning tree as parent pointers away from the root.
pub struct SpanningTree {
    root: NodeId,
    parent: HashMap<NodeId, NodeId>,
}

impl SpanningTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `{u, v}` is a tree edge.
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.parent.get(&u) == Some(&v) || self.parent.get(&v) == Some(&u)
    }

    /// The node sequence from the root down to `node`, both inclusive.
    pub fn path_from_root(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(&p) = self.parent.get(&current) {
            path.push(p);
            current = p;
        }
        path.reverse();
        path
    }
}

/// BFS spanning tree from an arbitrary root. The graph must be connected
/// and non-empty for the tree to span it; unreached nodes are simply absent.
pub fn spanning_tree(graph: &UndirectedGraph) -> Option<SpanningTree> {
    let root = graph.nodes().next()?;
    let mut parent = HashMap::new();
    let mut visited = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(node) = queue.pop_front() {
        for neighbor in graph.neighbors(node) {
            if visited.insert(neighbor) {
                parent.insert(neighbor, node);
                queue.push_back(neighbor);
            }
        }
    }
    Some(SpanningTree { root, parent })
}

/// Fundamental cycle basis of a connected graph.
///
/// For every non-tree edge `{u, v}` with `u < v` the cycle closes the two
/// tree paths from their lowest common ancestor. Fails with
/// [`LayoutError::NotConnected`] on disconnected input.
pub fn cycle_basis(graph: &UndirectedGraph) -> Result<Vec<Cycle>, LayoutError> {
    if !is_connected(graph) {
        return Err(LayoutError::NotConnected);
    }
    let Some(tree) = spanning_tree(graph) else {
        return Ok(Vec::new());
    };
    let mut cycles = Vec::new();
    for (u, v) in graph.edges() {
        if tree.has_edge(u, v) {
            continue;
        }
        let path_u = tree.path_from_root(u);
        let path_v = tree.path_from_root(v);
        let mut lca_index = 0;
        while lca_index + 1 < path_u.len()
            && lca_index + 1 < path_v.len()
            && path_u[lca_index + 1] == path_v[lca_index + 1]
        {
            lca_index += 1;
        }
        let mut nodes: Vec<NodeId> = path_u[lca_index..].to_vec();
        nodes.extend(path_v[lca_index + 1..].iter().rev());
        cycles.push(Cycle::new(nodes));
    }
    Ok(cycles)
}

/// Kahn topological ordering of a directed graph, or `None` if it has a
/// cycle.
pub fn topological_order(graph: &DirectedGraph) -> Option<Vec<NodeId>> {
    let (order, complete) = kahn_order(graph);
    complete.then_some(order)
}

/// Kahn ordering together with a completeness flag; on cyclic input the
/// order covers only the acyclic prefix.
pub(crate) fn kahn_order(graph: &DirectedGraph) -> (Vec<NodeId>, bool) {
    let mut in_degree: HashMap<NodeId, usize> =
        graph.nodes().map(|n| (n, graph.in_degree(n))).collect();
    let mut queue: VecDeque<NodeId> = graph
        .nodes()
        .filter(|&n| in_degree[&n] == 0)
        .collect();
    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for neighbor in graph.out_neighbors(node) {
            let d = in_degree.get_mut(&neighbor).expect("neighbor tracked");
            *d -= 1;
            if *d == 0 {
                queue.push_back(neighbor);
            }
        }
    }
    let complete = order.len() == graph.node_count();
    (order, complete)
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Gray,
    Black,
}

/// Find some directed cycle, if one exists.
pub fn find_cycle_directed(graph: &DirectedGraph) -> Option<Cycle> {
    let mut marks: HashMap<NodeId, Mark> = HashMap::new();
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    for root in graph.nodes() {
        if marks.contains_key(&root) {
            continue;
        }
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> =
            vec![(root, graph.out_neighbors(root).collect(), 0)];
        marks.insert(root, Mark::Gray);
        while let Some(frame) = stack.last_mut() {
            let (node, neighbors, cursor) = (frame.0, &frame.1, &mut frame.2);
            if *cursor < neighbors.len() {
                let next = neighbors[*cursor];
                *cursor += 1;
                match marks.get(&next) {
                    None => {
                        parent.insert(next, node);
                        marks.insert(next, Mark::Gray);
                        stack.push((next, graph.out_neighbors(next).collect(), 0));
                    }
                    Some(Mark::Gray) => {
                        let mut nodes = Vec::new();
                        let mut current = node;
                        while current != next {
                            nodes.push(current);
                            current = parent[&current];
                        }
                        nodes.push(next);
                        nodes.reverse();
                        return Some(Cycle::new(nodes));
                    }
                    Some(Mark::Black) => {}
                }
            } else {
                marks.insert(node, Mark::Black);
                stack.pop();
            }
        }
    }
    None
}

/// Find some cycle of an undirected graph, if one exists.
///
/// Depth-first search over tree edges; the first back edge to a gray
/// ancestor closes the cycle, which is read off the parent chain.
pub fn find_cycle_undirected(graph: &UndirectedGraph) -> Option<Cycle> {
    let mut marks: HashMap<NodeId, Mark> = HashMap::new();
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    for root in graph.nodes() {
        if marks.contains_key(&root) {
            continue;
        }
        let mut stack: Vec<(NodeId, Vec<NodeId>, usize)> =
            vec![(root, graph.neighbors(root).collect(), 0)];
        marks.insert(root, Mark::Gray);
        while let Some(frame) = stack.last_mut() {
            let (node, neighbors, cursor) = (frame.0, &frame.1, &mut frame.2);
            if *cursor < neighbors.len() {
                let next = neighbors[*cursor];
                *cursor += 1;
                if parent.get(&node) == Some(&next) {
                    continue;
                }
                match marks.get(&next) {
                    None => {
                        parent.insert(next, node);
                        marks.insert(next, Mark::Gray);
                        stack.push((next, graph.neighbors(next).collect(), 0));
                    }
                    Some(Mark::Gray) => {
                        // back edge to an ancestor: walk the chain back up
                        let mut nodes = Vec::new();
                        let mut current = node;
                        while current != next {
                            nodes.push(current);
                            current = parent[&current];
                        }
                        nodes.push(next);
                        nodes.reverse();
                        return Some(Cycle::new(nodes));
                    }
                    Some(Mark::Black) => {}
                }
            } else {
                marks.insert(node, Mark::Black);
                stack.pop();
            }
        }
    }
    None
}

/// Two-coloring of a bipartite graph, or `None` if some component has an
/// odd cycle.
pub fn bipartition(graph: &UndirectedGraph) -> Option<HashMap<NodeId, bool>> {
    let mut side: HashMap<NodeId, bool> = HashMap::new();
    for start in graph.nodes() {
        if side.contains_key(&start) {
            continue;
        }
        side.insert(start, false);
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            let color = side[&node];
            for neighbor in graph.neighbors(node) {
                match side.get(&neighbor) {
                    None => {
                        side.insert(neighbor, !color);
                        queue.push_back(neighbor);
                    }
                    Some(&c) if c == color => return None,
                    Some(_) => {}
                }
            }
        }
    }
    Some(side)
}

/// Connected components as standalone subgraphs.
pub fn connected_components(graph: &UndirectedGraph) -> Vec<UndirectedGraph> {
    let mut visited = HashSet::new();
    let mut components = Vec::new();
    for start in graph.nodes() {
        if visited.contains(&start) {
            continue;
        }
        let mut component = UndirectedGraph::new();
        component.add_node_with_id(start).expect("fresh component");
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for neighbor in graph.neighbors(node) {
                if !component.has_node(neighbor) {
                    component.add_node_with_id(neighbor).expect("absent node");
                }
                if !component.has_edge(node, neighbor) {
                    component.add_edge(node, neighbor).expect("absent edge");
                }
                if !visited.contains(&neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        components.push(component);
    }
    components
}

pub fn connected_component_count(graph: &UndirectedGraph) -> usize {
    let mut visited = HashSet::new();
    let mut count = 0;
    for start in graph.nodes() {
        if visited.contains(&start) {
            continue;
        }
        count += 1;
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            stack.extend(graph.neighbors(node).filter(|n| !visited.contains(n)));
        }
    }
    count
}

/// Biconnected components with their cut vertices. Isolated nodes form
/// one-node components.
pub struct BiconnectedComponents {
    pub cut_vertices: HashSet<NodeId>,
    pub components: Vec<UndirectedGraph>,
}

struct BiconnectedState<'g> {
    graph: &'g UndirectedGraph,
    number: HashMap<NodeId, usize>,
    low: HashMap<NodeId, usize>,
    parent: HashMap<NodeId, NodeId>,
    next_number: usize,
    cut_vertices: HashSet<NodeId>,
    components: Vec<UndirectedGraph>,
}

impl BiconnectedState<'_> {
    fn visit(
        &mut self,
        node: NodeId,
        nodes_below: &mut Vec<NodeId>,
        edges_below: &mut Vec<(NodeId, NodeId)>,
    ) {
        self.number.insert(node, self.next_number);
        self.low.insert(node, self.next_number);
        self.next_number += 1;
        let mut children = 0;
        for neighbor in self.graph.neighbors(node) {
            if self.parent.get(&node) == Some(&neighbor) {
                continue;
            }
            if !self.number.contains_key(&neighbor) {
                children += 1;
                self.parent.insert(neighbor, node);
                let mut child_nodes = vec![neighbor];
                let mut child_edges = vec![(node, neighbor)];
                self.visit(neighbor, &mut child_nodes, &mut child_edges);
                if self.low[&neighbor] < self.low[&node] {
                    let low = self.low[&neighbor];
                    self.low.insert(node, low);
                }
                if self.low[&neighbor] >= self.number[&node] {
                    // node separates the subtree: flush it as one component
                    child_nodes.push(node);
                    self.components.push(build_component(&child_nodes, &child_edges));
                    if self.parent.contains_key(&node) {
                        self.cut_vertices.insert(node);
                    }
                } else {
                    nodes_below.append(&mut child_nodes);
                    edges_below.append(&mut child_edges);
                }
            } else if self.number[&neighbor] < self.number[&node] {
                edges_below.push((node, neighbor));
                if self.number[&neighbor] < self.low[&node] {
                    let low = self.number[&neighbor];
                    self.low.insert(node, low);
                }
            }
        }
        if !self.parent.contains_key(&node) {
            if children >= 2 {
                self.cut_vertices.insert(node);
            } else if children == 0 {
                let mut isolated = UndirectedGraph::new();
                isolated.add_node_with_id(node).expect("fresh component");
                self.components.push(isolated);
            }
        }
    }
}

fn build_component(nodes: &[NodeId], edges: &[(NodeId, NodeId)]) -> UndirectedGraph {
    let mut component = UndirectedGraph::new();
    for &n in nodes {
        if !component.has_node(n) {
            component.add_node_with_id(n).expect("absent node");
        }
    }
    for &(u, v) in edges {
        if !component.has_edge(u, v) {
            component.add_edge(u, v).expect("absent edge");
        }
    }
    component
}

pub fn biconnected_components(graph: &UndirectedGraph) -> BiconnectedComponents {
    let mut state = BiconnectedState {
        graph,
        number: HashMap::new(),
        low: HashMap::new(),
        parent: HashMap::new(),
        next_number: 0,
        cut_vertices: HashSet::new(),
        components: Vec::new(),
    };
    for root in graph.nodes() {
        if !state.number.contains_key(&root) {
            let mut nodes = Vec::new();
            let mut edges = Vec::new();
            state.visit(root, &mut nodes, &mut edges);
        }
    }
    BiconnectedComponents {
        cut_vertices: state.cut_vertices,
        components: state.components,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph(n: u32) -> UndirectedGraph {
        let mut g = UndirectedGraph::new();
        for id in 0..n {
            g.add_node_with_id(id).unwrap();
        }
        for id in 1..n {
            g.add_edge(id - 1, id).unwrap();
        }
        g
    }

    #[test]
    fn connectivity() {
        assert!(is_connected(&UndirectedGraph::new()));
        let mut g = path_graph(4);
        assert!(is_connected(&g));
        g.add_node_with_id(9).unwrap();
        assert!(!is_connected(&g));
    }

    #[test]
    fn cycle_basis_of_square_with_chord() {
        let mut g = path_graph(4);
        g.add_edge(3, 0).unwrap();
        g.add_edge(0, 2).unwrap();
        let cycles = cycle_basis(&g).unwrap();
        assert_eq!(cycles.len(), 2);
        for cycle in &cycles {
            assert!(cycle.len() >= 3);
            for (i, node) in cycle.iter().enumerate() {
                assert!(g.has_edge(node, cycle.at(i + 1)));
            }
        }
    }

    #[test]
    fn cycle_basis_rejects_disconnected() {
        let mut g = path_graph(3);
        g.add_node_with_id(10).unwrap();
        assert!(matches!(cycle_basis(&g), Err(LayoutError::NotConnected)));
    }

    #[test]
    fn topological_order_respects_arcs() {
        let mut g = DirectedGraph::new();
        for id in 0..5 {
            g.add_node_with_id(id).unwrap();
        }
        for (a, b) in [(0, 2), (1, 2), (2, 3), (2, 4), (1, 4)] {
            g.add_edge(a, b).unwrap();
        }
        let order = topological_order(&g).unwrap();
        let index: HashMap<_, _> = order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        for (a, b) in [(0, 2), (1, 2), (2, 3), (2, 4), (1, 4)] {
            assert!(index[&a] < index[&b]);
        }

        g.add_edge(4, 1).unwrap();
        assert!(topological_order(&g).is_none());
    }

    #[test]
    fn directed_cycle_is_found_and_closed() {
        let mut g = DirectedGraph::new();
        for id in 0..4 {
            g.add_node_with_id(id).unwrap();
        }
        g.add_edge(0, 1).unwrap();
        g.add_edge(1, 2).unwrap();
        g.add_edge(2, 3).unwrap();
        assert!(find_cycle_directed(&g).is_none());

        g.add_edge(3, 1).unwrap();
        let cycle = find_cycle_directed(&g).unwrap();
        assert_eq!(cycle.len(), 3);
        for (i, node) in cycle.iter().enumerate() {
            assert!(g.has_edge(node, cycle.at(i + 1)));
        }
    }

    #[test]
    fn undirected_cycle_is_found_and_closed() {
        let mut g = path_graph(5);
        assert!(find_cycle_undirected(&g).is_none());
        g.add_edge(4, 1).unwrap();
        let cycle = find_cycle_undirected(&g).unwrap();
        assert_eq!(cycle.len(), 4);
        for (i, node) in cycle.iter().enumerate() {
            assert!(g.has_edge(node, cycle.at(i + 1)));
        }
    }

    #[test]
    fn bipartition_of_even_and_odd_cycles() {
        let mut even = path_graph(4);
        even.add_edge(3, 0).unwrap();
        let sides = bipartition(&even).unwrap();
        for (u, v) in even.edges() {
            assert_ne!(sides[&u], sides[&v]);
        }

        let mut odd = path_graph(3);
        odd.add_edge(2, 0).unwrap();
        assert!(bipartition(&odd).is_none());
    }

    #[test]
    fn components_split_and_count() {
        let mut g = path_graph(3);
        g.add_node_with_id(7).unwrap();
        g.add_node_with_id(8).unwrap();
        g.add_edge(7, 8).unwrap();
        assert_eq!(connected_component_count(&g), 2);
        let components = connected_components(&g);
        assert_eq!(components.len(), 2);
        let sizes: Vec<_> = {
            let mut s: Vec<_> = components.iter().map(UndirectedGraph::node_count).collect();
            s.sort_unstable();
            s
        };
        assert_eq!(sizes, vec![2, 3]);
    }

    #[test]
    fn biconnected_two_triangles_sharing_a_node() {
        let mut g = UndirectedGraph::new();
        for id in 0..5 {
            g.add_node_with_id(id).unwrap();
        }
        for (u, v) in [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 2)] {
            g.add_edge(u, v).unwrap();
        }
        let result = biconnected_components(&g);
        assert_eq!(result.cut_vertices, HashSet::from([2]));
        assert_eq!(result.components.len(), 2);
        for component in &result.components {
            assert_eq!(component.node_count(), 3);
            assert_eq!(component.edge_count(), 3);
        }
    }

    #[test]
    fn biconnected_isolated_node() {
        let mut g = UndirectedGraph::new();
        g.add_node_with_id(3).unwrap();
        let result = biconnected_components(&g);
        assert!(result.cut_vertices.is_empty());
        assert_eq!(result.components.len(), 1);
        assert_eq!(result.components[0].node_count(), 1);
    }
}
