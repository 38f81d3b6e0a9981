//! Aggregated, read-only analytics of a graph.

use std::{collections::HashMap, time::Instant};

use log::info;
use serde::Serialize;

use crate::{community::group_by_label, graph::Graph};

/// The metrics of a single node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeMetrics {
    pub id: String,
    pub degree: u32,
    pub betweenness: f64,
    pub community: usize,
}

/// Everything computed about a graph, in one immutable value.
///
/// A snapshot is always computed in full from a graph and never patched. Computing it twice from
/// the same graph yields identical values.
///
/// # Examples
///
/// ```
/// use sociograph::{parse::parse, report::AnalyticsSnapshot};
///
/// let graph = parse("Alice,Bob\nAlice,Charlie\nBob,David\nCharlie,David");
/// let snapshot = AnalyticsSnapshot::compute(&graph);
///
/// assert_eq!(snapshot.node_count, 4);
/// assert_eq!(snapshot.degree("Alice"), Some(2));
/// assert!((snapshot.density - 0.6667).abs() < 1e-4);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnalyticsSnapshot {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    /// Per-node metrics, in the graph's node order.
    pub nodes: Vec<NodeMetrics>,
    /// The highest degrees, ties in node order.
    pub top_by_degree: Vec<(String, u32)>,
    /// The highest betweenness scores, ties in node order.
    pub top_by_betweenness: Vec<(String, f64)>,
    /// Node identifiers grouped by community, groups ordered by their first member.
    pub communities: Vec<Vec<String>>,
    /// A mapping of node identifiers to their position in `nodes`.
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl AnalyticsSnapshot {
    /// Computes every metric of `graph`.
    ///
    /// Degenerate graphs (no nodes, a single node, no edges) produce trivial values rather than
    /// failing.
    pub fn compute(graph: &Graph) -> Self {
        let start = Instant::now();

        let degrees = graph.degrees();
        let betweenness = graph.betweenness();
        let labels = graph.community_labels();

        let top_by_degree = graph.rank(&degrees);
        let top_by_betweenness = graph.rank(&betweenness);
        let communities = group_by_label(graph.nodes(), &labels);

        let nodes: Vec<NodeMetrics> = graph
            .nodes()
            .iter()
            .zip(degrees.into_iter().zip(betweenness).zip(labels))
            .map(|(id, ((degree, betweenness), community))| NodeMetrics {
                id: id.clone(),
                degree,
                betweenness,
                community,
            })
            .collect();

        let index = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        info!(
            "analysed {} nodes, {} edges, {} communities in {:?}",
            graph.node_count(),
            graph.edge_count(),
            communities.len(),
            start.elapsed()
        );

        Self {
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            density: graph.density(),
            nodes,
            top_by_degree,
            top_by_betweenness,
            communities,
            index,
        }
    }

    /// The metrics of a node, if it is part of the graph.
    pub fn node(&self, id: &str) -> Option<&NodeMetrics> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// The degree of a node, if it is part of the graph.
    pub fn degree(&self, id: &str) -> Option<u32> {
        self.node(id).map(|m| m.degree)
    }

    /// The betweenness score of a node, if it is part of the graph.
    pub fn betweenness(&self, id: &str) -> Option<f64> {
        self.node(id).map(|m| m.betweenness)
    }

    /// The community label of a node, if it is part of the graph.
    pub fn community(&self, id: &str) -> Option<usize> {
        self.node(id).map(|m| m.community)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{parse, SAMPLE};

    const SQUARE: &str = "Alice,Bob\nAlice,Charlie\nBob,David\nCharlie,David";

    #[test]
    fn square() {
        let snapshot = AnalyticsSnapshot::compute(&parse(SQUARE));

        assert_eq!(snapshot.node_count, 4);
        assert_eq!(snapshot.edge_count, 4);
        assert_eq!(snapshot.density, 2.0 * 4.0 / (4.0 * 3.0));

        for id in ["Alice", "Bob", "Charlie", "David"] {
            assert_eq!(snapshot.degree(id), Some(2));
        }

        let ranked: Vec<&str> = snapshot
            .top_by_degree
            .iter()
            .map(|(id, _)| id.as_str())
            .collect();
        assert_eq!(ranked, ["Alice", "Bob", "Charlie", "David"]);
    }

    #[test]
    fn empty() {
        let snapshot = AnalyticsSnapshot::compute(&Graph::new());

        assert_eq!(snapshot.node_count, 0);
        assert_eq!(snapshot.density, 0.0);
        assert!(snapshot.nodes.is_empty());
        assert!(snapshot.top_by_degree.is_empty());
        assert!(snapshot.top_by_betweenness.is_empty());
        assert!(snapshot.communities.is_empty());
    }

    #[test]
    fn single_node() {
        let snapshot = AnalyticsSnapshot::compute(&parse("a,a"));

        assert_eq!(snapshot.node_count, 1);
        assert_eq!(snapshot.density, 0.0);
        assert_eq!(snapshot.degree("a"), Some(2));
        assert_eq!(snapshot.betweenness("a"), Some(0.0));
        assert_eq!(snapshot.communities, vec![vec!["a"]]);
    }

    #[test]
    fn unknown_node() {
        let snapshot = AnalyticsSnapshot::compute(&parse(SQUARE));

        assert_eq!(snapshot.node("Eve"), None);
        assert_eq!(snapshot.community("Eve"), None);
    }

    #[test]
    fn sample() {
        let graph = parse(SAMPLE);
        let snapshot = AnalyticsSnapshot::compute(&graph);

        assert_eq!(snapshot.node_count, 6);
        assert_eq!(snapshot.edge_count, 9);
        assert_eq!(snapshot.density, 18.0 / 30.0);
        assert_eq!(snapshot.top_by_degree.len(), 5);
        assert_eq!(snapshot.top_by_betweenness.len(), 5);

        let degree_sum: u32 = snapshot.nodes.iter().map(|m| m.degree).sum();
        assert_eq!(degree_sum, 18);

        // Every node lands in exactly one community.
        let members: usize = snapshot.communities.iter().map(Vec::len).sum();
        assert_eq!(members, 6);

        for metrics in &snapshot.nodes {
            assert_eq!(
                snapshot.degree(&metrics.id),
                Some(graph.degree_centrality()[&metrics.id])
            );
        }
    }

    #[test]
    fn lookups_match_node_order() {
        let graph = parse(SAMPLE);
        let snapshot = AnalyticsSnapshot::compute(&graph);
        let labels = graph.community_labels();
        let betweenness = graph.betweenness();

        for (i, id) in graph.nodes().iter().enumerate() {
            assert_eq!(snapshot.node(id), Some(&snapshot.nodes[i]));
            assert_eq!(snapshot.betweenness(id), Some(betweenness[i]));
            assert_eq!(snapshot.community(id), Some(labels[i]));
        }
    }

    #[test]
    fn rankings_are_sorted() {
        let snapshot = AnalyticsSnapshot::compute(&parse(SAMPLE));

        assert!(snapshot
            .top_by_betweenness
            .windows(2)
            .all(|w| w[0].1 >= w[1].1));
        assert!(snapshot.top_by_degree.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn deterministic() {
        let first = serde_json::to_string(&AnalyticsSnapshot::compute(&parse(SAMPLE))).unwrap();
        let second = serde_json::to_string(&AnalyticsSnapshot::compute(&parse(SAMPLE))).unwrap();

        assert_eq!(first, second);
    }
}
