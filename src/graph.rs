//! A module for working with graphs.

use std::collections::HashMap;

use log::trace;

use crate::{betweenness, edge::Edge};

/// How many entries the ranked lists hold.
pub const TOP_N: usize = 5;

/// An undirected multigraph, made up of named nodes and the relationships between them.
///
/// Nodes are kept in first-seen order: the position of a node in [`Graph::nodes`] is its index,
/// and that index is reused by every computation on the graph (ranking ties, initial community
/// labels). Duplicate edges and self-loops are kept as-is and count separately everywhere.
///
/// A graph is immutable once built. Analysing new input means building a new graph.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    /// Node identifiers in first-seen order.
    nodes: Vec<String>,
    /// The edges in declaration order.
    edges: Vec<Edge>,
    /// A mapping of node identifiers to their position in `nodes`.
    index: HashMap<String, usize>,
}

impl Graph {
    /// Creates an empty graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// let graph = Graph::new();
    /// assert!(graph.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from `(source, target)` pairs, registering each identifier the first time
    /// it appears.
    ///
    /// No validation is done on the identifiers, see [`parse`](crate::parse::parse) for the
    /// tolerant text front-end.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// let graph = Graph::from_edges([("a", "b"), ("b", "c"), ("a", "b")]);
    ///
    /// assert_eq!(graph.nodes(), ["a", "b", "c"]);
    /// assert_eq!(graph.edge_count(), 3);
    /// ```
    pub fn from_edges<I, S>(edges: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut graph = Self::new();
        for (source, target) in edges {
            graph.insert(Edge::new(source, target));
        }

        graph
    }

    /// Returns the node identifiers in first-seen order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Returns the edges in declaration order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the first-seen index of a node.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Checks if the graph contains a node.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Returns the node count of the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the edge count of the graph, duplicates included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the graph has no nodes, in which case there is nothing to analyse.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Computes the density of the graph, the ratio of edges with respect to the maximum possible
    /// edges of a simple graph on the same nodes.
    ///
    /// Graphs with fewer than two nodes have a density of `0`. Duplicates and self-loops are
    /// counted, so a multigraph can exceed `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// assert_eq!(Graph::new().density(), 0.0);
    ///
    /// let graph = Graph::from_edges([("a", "b")]);
    /// assert_eq!(graph.density(), 1.0);
    ///
    /// let graph = Graph::from_edges([("a", "b"), ("a", "c")]);
    /// assert_eq!(graph.density(), 2.0 / 3.0);
    /// ```
    pub fn density(&self) -> f64 {
        let nc = self.node_count() as f64;
        let ec = self.edge_count() as f64;

        if self.node_count() < 2 {
            return 0.0;
        }

        2.0 * ec / (nc * (nc - 1.0))
    }

    /// Constructs the undirected adjacency list of the graph, indexed like [`Graph::nodes`].
    ///
    /// Neighbours are listed in edge declaration order. Every edge adds its target to its source's
    /// list and its source to its target's list, so a self-loop lists the node twice in its own
    /// entry.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.node_count()];

        for edge in &self.edges {
            // Safety: both endpoints are registered when the edge is inserted.
            let (i, j) = (self.index[edge.source()], self.index[edge.target()]);

            adjacency[i].push(j);
            adjacency[j].push(i);
        }

        adjacency
    }

    /// Returns the degree of each node, indexed like [`Graph::nodes`].
    ///
    /// Every edge increments both endpoints, so a self-loop counts twice for its node and the sum
    /// of all degrees is always twice the edge count.
    pub fn degrees(&self) -> Vec<u32> {
        let mut degrees = vec![0; self.node_count()];

        for edge in &self.edges {
            degrees[self.index[edge.source()]] += 1;
            degrees[self.index[edge.target()]] += 1;
        }

        degrees
    }

    /// Returns a mapping of nodes to their degree centrality (number of connections) in the graph.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// let graph = Graph::from_edges([("a", "b"), ("a", "c")]);
    /// let degree_centrality = graph.degree_centrality();
    ///
    /// assert_eq!(degree_centrality["a"], 2);
    /// assert_eq!(degree_centrality["b"], 1);
    /// ```
    pub fn degree_centrality(&self) -> HashMap<String, u32> {
        self.keyed(self.degrees())
    }

    /// Returns the betweenness score of each node, indexed like [`Graph::nodes`].
    ///
    /// This is an accumulated path-count proxy, not the classical ratio of shortest paths. One
    /// breadth-first traversal is run from every node `s`, carrying a `paths` counter per node
    /// that starts at `1` for `s` and `0` elsewhere. When a neighbour is reached for the first
    /// time it inherits the counter of the node being expanded; when it was already reached, the
    /// expanded node's counter is added to it instead, whether or not the edge lies on a shortest
    /// path. Once the traversal finishes, every node other than `s` adds its counter to its score.
    ///
    /// Runs in `O(V·(V+E))`.
    pub fn betweenness(&self) -> Vec<f64> {
        let adjacency = self.adjacency();
        trace!(
            "betweenness: {} sources, {} edges",
            adjacency.len(),
            self.edge_count()
        );

        betweenness::compute_betweenness(&adjacency)
    }

    /// Returns a mapping of nodes to their betweenness score, see [`Graph::betweenness`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// let graph = Graph::from_edges([("a", "b"), ("b", "c"), ("c", "d")]);
    /// let betweenness_centrality = graph.betweenness_centrality();
    ///
    /// assert_eq!(betweenness_centrality["a"], 3.0);
    /// assert_eq!(betweenness_centrality["b"], 6.0);
    /// ```
    pub fn betweenness_centrality(&self) -> HashMap<String, f64> {
        self.keyed(self.betweenness())
    }

    /// Same as [`Graph::betweenness`], with the traversals spread over `num_threads` workers.
    ///
    /// The result is bit-for-bit identical to the single-threaded computation.
    pub fn betweenness_parallel(&self, num_threads: usize) -> Vec<f64> {
        betweenness::compute_betweenness_parallel(self.adjacency(), num_threads)
    }

    /// Returns a mapping of nodes to their betweenness score, computed with `num_threads`
    /// workers.
    pub fn betweenness_centrality_parallel(&self, num_threads: usize) -> HashMap<String, f64> {
        self.keyed(self.betweenness_parallel(num_threads))
    }

    /// Ranks nodes by the per-node `values` (indexed like [`Graph::nodes`]), highest first, and
    /// returns the first [`TOP_N`].
    ///
    /// The sort is stable: nodes with equal values keep their first-seen order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// let graph = Graph::from_edges([("a", "b"), ("c", "b")]);
    ///
    /// assert_eq!(
    ///     graph.rank(&graph.degrees()),
    ///     vec![("b".to_owned(), 2), ("a".to_owned(), 1), ("c".to_owned(), 1)]
    /// );
    /// ```
    pub fn rank<V>(&self, values: &[V]) -> Vec<(String, V)>
    where
        V: PartialOrd + Copy,
    {
        let mut ranked: Vec<(usize, V)> = values.iter().copied().enumerate().collect();

        // `sort_by` is stable, equal values are never reordered. NaNs compare as equal.
        ranked.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

        ranked
            .into_iter()
            .take(TOP_N)
            .map(|(i, value)| (self.nodes[i].clone(), value))
            .collect()
    }

    //
    // Private
    //

    /// Inserts an edge, registering any endpoint seen for the first time (source first).
    fn insert(&mut self, edge: Edge) {
        self.register(edge.source());
        self.register(edge.target());

        self.edges.push(edge);
    }

    fn register(&mut self, id: &str) {
        if !self.index.contains_key(id) {
            self.index.insert(id.to_owned(), self.nodes.len());
            self.nodes.push(id.to_owned());
        }
    }

    /// Pairs per-node values with their node identifiers.
    fn keyed<V>(&self, values: Vec<V>) -> HashMap<String, V> {
        self.nodes.iter().cloned().zip(values).collect()
    }
}
