//! A module for working with edges.

/// A pair of node identifiers representing a relationship. Edges don't have a direction, despite
/// the `source`-`target` nomenclature used.
///
/// Self-loops (`source == target`) are legal and are never collapsed.
#[derive(Clone, Debug, Eq)]
pub struct Edge {
    source: String,
    target: String,
}

impl Edge {
    /// Creates a new edge from two node identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::edge::Edge;
    ///
    /// let edge = Edge::new("Alice", "Bob");
    /// assert_eq!(edge, Edge::new("Bob", "Alice"));
    /// ```
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns the first identifier forming the edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::edge::Edge;
    ///
    /// let edge = Edge::new("Alice", "Bob");
    /// assert_eq!(edge.source(), "Alice");
    /// ```
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the second identifier forming the edge.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::edge::Edge;
    ///
    /// let edge = Edge::new("Alice", "Bob");
    /// assert_eq!(edge.target(), "Bob");
    /// ```
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns whether the edge touches the given node.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::edge::Edge;
    ///
    /// let edge = Edge::new("Alice", "Bob");
    ///
    /// assert_eq!(edge.contains("Alice"), true);
    /// assert_eq!(edge.contains("Bob"), true);
    /// assert_eq!(edge.contains("Carol"), false);
    /// ```
    pub fn contains(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// Returns the endpoint opposite to `id`, or `None` if the edge doesn't touch `id`.
    ///
    /// For a self-loop the opposite endpoint is the node itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use sociograph::edge::Edge;
    ///
    /// let edge = Edge::new("Alice", "Bob");
    ///
    /// assert_eq!(edge.other("Alice"), Some("Bob"));
    /// assert_eq!(edge.other("Carol"), None);
    /// ```
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(&self.target)
        } else if self.target == id {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Returns whether both endpoints are the same node.
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

//
// Trait implementations
//

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (&self.source, &self.target);
        let (c, d) = (&other.source, &other.target);

        a == d && b == c || a == c && b == d
    }
}
