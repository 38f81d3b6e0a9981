//! Community detection by synchronous label propagation.
//!
//! Every node starts with its own first-seen index as label. For a fixed number of rounds, every
//! node adopts the most frequent label among its neighbours, all nodes reading the labels of the
//! previous round. There is no convergence check, so the result may not be a stable partition when
//! the structure needs more rounds to settle (or oscillates, as bipartite structures do).

use std::collections::HashMap;

use crate::graph::Graph;

/// The number of propagation rounds.
pub const ITERATIONS: usize = 5;

impl Graph {
    /// Returns the community label of each node, indexed like [`Graph::nodes`].
    ///
    /// Labels are plain integers, neither contiguous nor stable across different input orderings.
    pub fn community_labels(&self) -> Vec<usize> {
        propagate_labels(&self.adjacency(), ITERATIONS)
    }

    /// Returns a mapping of nodes to their community label.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::graph::Graph;
    ///
    /// let graph = Graph::from_edges([
    ///     ("a", "b"), ("a", "c"), ("a", "d"), ("b", "c"), ("b", "d"), ("c", "d"),
    ///     ("e", "f"), ("e", "g"), ("e", "h"), ("f", "g"), ("f", "h"), ("g", "h"),
    /// ]);
    /// let communities = graph.label_propagation();
    ///
    /// assert_eq!(communities["a"], communities["d"]);
    /// assert_ne!(communities["a"], communities["e"]);
    /// ```
    pub fn label_propagation(&self) -> HashMap<String, usize> {
        self.nodes()
            .iter()
            .cloned()
            .zip(self.community_labels())
            .collect()
    }
}

/// Runs `iterations` synchronous rounds of label propagation over an adjacency list.
pub fn propagate_labels(adjacency: &[Vec<usize>], iterations: usize) -> Vec<usize> {
    let mut labels: Vec<usize> = (0..adjacency.len()).collect();

    for _ in 0..iterations {
        labels = adjacency
            .iter()
            .enumerate()
            .map(|(i, neighbours)| dominant_label(neighbours, &labels).unwrap_or(labels[i]))
            .collect();
    }

    labels
}

/// Returns the most frequent label among `neighbours`, or `None` for an isolated node.
///
/// Among equally frequent labels, the one whose first occurrence comes earliest in the neighbour
/// list wins.
fn dominant_label(neighbours: &[usize], labels: &[usize]) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    for &n in neighbours {
        *counts.entry(labels[n]).or_default() += 1;
    }

    let max = counts.values().copied().max()?;

    neighbours
        .iter()
        .map(|&n| labels[n])
        .find(|label| counts[label] == max)
}

/// Groups node identifiers by label.
///
/// Groups are ordered by the first node (in `ids` order) carrying each label, and members keep
/// their relative order.
///
/// # Examples
///
/// ```
/// use sociograph::community::group_by_label;
///
/// let ids = ["a", "b", "c", "d"].map(String::from);
///
/// assert_eq!(
///     group_by_label(&ids, &[7, 2, 7, 2]),
///     vec![vec!["a", "c"], vec!["b", "d"]]
/// );
/// ```
pub fn group_by_label(ids: &[String], labels: &[usize]) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut position: HashMap<usize, usize> = HashMap::new();

    for (id, label) in ids.iter().zip(labels) {
        let group = *position.entry(*label).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });

        groups[group].push(id.clone());
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::graph;

    /// Every pair among `ids` becomes an edge.
    fn clique<'a>(ids: &[&'a str]) -> Vec<(&'a str, &'a str)> {
        let mut edges = Vec::new();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                edges.push((*a, *b));
            }
        }

        edges
    }

    #[test]
    fn empty() {
        assert!(Graph::new().community_labels().is_empty());
        assert!(group_by_label(&[], &[]).is_empty());
    }

    #[test]
    fn isolated_node_keeps_its_label() {
        // Graphs built from edges have no neighbourless nodes, use a raw adjacency list.
        let adjacency = vec![vec![1], vec![0], vec![]];

        assert_eq!(propagate_labels(&adjacency, ITERATIONS)[2], 2);
    }

    #[test]
    fn ties_break_on_first_neighbour() {
        // Labels 3 and 5 both occur twice, 5 is met first.
        let labels = vec![0, 3, 5, 5, 3];

        assert_eq!(dominant_label(&[2, 1, 3, 4], &labels), Some(5));
        assert_eq!(dominant_label(&[1, 2, 3, 4], &labels), Some(3));
        assert_eq!(dominant_label(&[], &labels), None);
    }

    #[test]
    fn majority_wins_over_first_neighbour() {
        let labels = vec![0, 1, 2, 2];

        assert_eq!(dominant_label(&[1, 2, 3], &labels), Some(2));
    }

    #[test]
    fn rounds_are_synchronous() {
        // a - b - c. With in-place updates b would read a's new label in the first round.
        let adjacency = vec![vec![1], vec![0, 2], vec![1]];

        assert_eq!(propagate_labels(&adjacency, 1), vec![1, 0, 1]);
        assert_eq!(propagate_labels(&adjacency, 2), vec![0, 1, 0]);
    }

    #[test]
    fn exactly_five_rounds() {
        // A single edge swaps labels every round, so the parity of the round count shows.
        let graph = Graph::from_edges([("a", "b")]);

        assert_eq!(graph.community_labels(), vec![1, 0]);
    }

    #[test]
    fn disjoint_components_each_get_one_label() {
        let mut edges = clique(&["a", "b", "c", "d"]);
        edges.extend(clique(&["e", "f", "g", "h"]).into_iter().rev());
        edges.extend(clique(&["i", "j", "k", "l", "m"]));

        let graph = Graph::from_edges(edges);
        let labels = graph.label_propagation();

        let components: [&[&str]; 3] = [
            &["a", "b", "c", "d"],
            &["e", "f", "g", "h"],
            &["i", "j", "k", "l", "m"],
        ];
        for component in components {
            assert!(component.iter().all(|id| labels[*id] == labels[component[0]]));
        }

        assert_ne!(labels["a"], labels["e"]);
        assert_ne!(labels["a"], labels["i"]);
        assert_ne!(labels["e"], labels["i"]);
    }

    #[test]
    fn labels_never_cross_components() {
        let graph = graph!(["a", "b", "c", "a"], ["d", "e"], ["f", "g", "h", "i", "f"]);
        let labels = graph.community_labels();

        // A label can only originate from a node's own component.
        let component = |i: usize| match i {
            0..=2 => 0,
            3..=4 => 1,
            _ => 2,
        };
        for (i, label) in labels.iter().enumerate() {
            assert_eq!(component(i), component(*label));
        }
    }

    #[test]
    fn group_by_label_preserves_first_appearance() {
        let ids: Vec<String> = ["a", "b", "c", "d", "e"].iter().map(|s| s.to_string()).collect();

        assert_eq!(
            group_by_label(&ids, &[4, 1, 4, 0, 1]),
            vec![vec!["a", "c"], vec!["b", "e"], vec!["d"]]
        );
    }
}
