//! Read-only graph view consumed by the diffusion engine and the generators.
//!
//! The core never mutates a graph and never assumes a storage layout: it
//! only needs node enumeration, neighbor lookup and degrees, expressed by
//! the [`Graph`] trait. [`AdjacencyGraph`] is a small in-memory
//! implementation for callers that do not bring their own graph type.

use rand::Rng;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Marker trait for node identifiers.
///
/// `Ord` is only used to report influenced sets in a stable order.
pub trait Node: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<T> Node for T where T: Copy + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

/// A static graph, directed or undirected.
///
/// # Implementing
///
/// ```ignore
/// impl Graph for MyGraph {
///     type Node = u32;
///     fn nodes(&self) -> impl Iterator<Item = u32> + '_ { self.ids.iter().copied() }
///     fn neighbors(&self, n: u32) -> impl Iterator<Item = u32> + '_ { self.adj[&n].iter().copied() }
///     fn degree(&self, n: u32) -> usize { self.adj[&n].len() }
///     fn number_of_nodes(&self) -> usize { self.ids.len() }
///     fn number_of_edges(&self) -> usize { self.edges }
/// }
/// ```
pub trait Graph: Sync {
    /// Node identifier type.
    type Node: Node;

    /// Enumerates every node. The order must be stable across calls, since
    /// key-based orderings break ties by it.
    fn nodes(&self) -> impl Iterator<Item = Self::Node> + '_;

    /// Enumerates the nodes whose influence counts toward `node`'s threshold.
    fn neighbors(&self, node: Self::Node) -> impl Iterator<Item = Self::Node> + '_;

    /// Degree of `node` (in + out for directed graphs).
    fn degree(&self, node: Self::Node) -> usize;

    /// Number of nodes.
    fn number_of_nodes(&self) -> usize;

    /// Number of edges.
    fn number_of_edges(&self) -> usize;
}

/// Largest degree in the graph, 0 for an empty graph.
pub fn max_degree<G: Graph>(graph: &G) -> usize {
    graph.nodes().map(|n| graph.degree(n)).max().unwrap_or(0)
}

/// Edge density: edges over the number of possible edges.
pub fn density<G: Graph>(graph: &G, directed: bool) -> f64 {
    let n = graph.number_of_nodes() as f64;
    if n < 2.0 {
        return 0.0;
    }
    let possible = if directed { n * (n - 1.0) } else { n * (n - 1.0) / 2.0 };
    graph.number_of_edges() as f64 / possible
}

/// Adjacency-list graph keyed by arbitrary node identifiers.
///
/// Nodes are enumerated in insertion order. Self-loops and parallel edges
/// are ignored. For directed graphs, [`Graph::neighbors`] yields successors
/// and [`Graph::degree`] counts both directions.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph<N> {
    directed: bool,
    nodes: Vec<N>,
    index: HashMap<N, usize>,
    out: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
    edges: usize,
}

impl<N: Node> AdjacencyGraph<N> {
    /// Creates an empty undirected graph.
    pub fn undirected() -> Self {
        Self::empty(false)
    }

    /// Creates an empty directed graph.
    pub fn directed() -> Self {
        Self::empty(true)
    }

    fn empty(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            index: HashMap::new(),
            out: Vec::new(),
            in_degree: Vec::new(),
            edges: 0,
        }
    }

    /// Builds an undirected graph from an edge list.
    pub fn from_edges(edges: impl IntoIterator<Item = (N, N)>) -> Self {
        let mut graph = Self::undirected();
        for (u, v) in edges {
            graph.add_edge(u, v);
        }
        graph
    }

    /// Whether edges are directed.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Adds a node if absent and returns its internal index.
    pub fn add_node(&mut self, node: N) -> usize {
        if let Some(&i) = self.index.get(&node) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(node);
        self.index.insert(node, i);
        self.out.push(Vec::new());
        self.in_degree.push(0);
        i
    }

    /// Adds an edge, creating missing endpoints.
    ///
    /// Returns `false` when the edge was a self-loop or already present.
    pub fn add_edge(&mut self, u: N, v: N) -> bool {
        let ui = self.add_node(u);
        let vi = self.add_node(v);
        if ui == vi || self.out[ui].contains(&vi) {
            return false;
        }
        self.out[ui].push(vi);
        if self.directed {
            self.in_degree[vi] += 1;
        } else {
            self.out[vi].push(ui);
        }
        self.edges += 1;
        true
    }

    /// Whether `node` belongs to the graph.
    pub fn contains(&self, node: N) -> bool {
        self.index.contains_key(&node)
    }

    /// Edge list, each undirected edge reported once.
    pub fn edge_list(&self) -> Vec<(N, N)> {
        let mut edges = Vec::with_capacity(self.edges);
        for (u, targets) in self.out.iter().enumerate() {
            for &v in targets {
                if self.directed || u < v {
                    edges.push((self.nodes[u], self.nodes[v]));
                }
            }
        }
        edges
    }
}

impl AdjacencyGraph<usize> {
    /// Path graph `0 - 1 - ... - (n-1)`.
    pub fn path(n: usize) -> Self {
        let mut graph = Self::undirected();
        for i in 0..n {
            graph.add_node(i);
        }
        for i in 1..n {
            graph.add_edge(i - 1, i);
        }
        graph
    }

    /// Erdős–Rényi `G(n, p)` random graph over nodes `0..n`.
    pub fn gnp<R: Rng>(n: usize, p: f64, rng: &mut R) -> Self {
        let p = p.clamp(0.0, 1.0);
        let mut graph = Self::undirected();
        for i in 0..n {
            graph.add_node(i);
        }
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.random_bool(p) {
                    graph.add_edge(u, v);
                }
            }
        }
        graph
    }
}

impl<N: Node> Graph for AdjacencyGraph<N> {
    type Node = N;

    fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().copied()
    }

    fn neighbors(&self, node: N) -> impl Iterator<Item = N> + '_ {
        let targets: &[usize] = match self.index.get(&node) {
            Some(&i) => &self.out[i],
            None => &[],
        };
        targets.iter().map(move |&j| self.nodes[j])
    }

    fn degree(&self, node: N) -> usize {
        match self.index.get(&node) {
            Some(&i) => self.out[i].len() + self.in_degree[i],
            None => 0,
        }
    }

    fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    fn number_of_edges(&self) -> usize {
        self.edges
    }
}
