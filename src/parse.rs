//! Tolerant construction of graphs from relationship text.
//!
//! The accepted format is one relationship per line, `Source,Target[,ignored...]`. Only the first
//! two comma-separated fields are read, each is trimmed, and a line is dropped if either ends up
//! empty. There is no header row. LF and CRLF line endings are both accepted.

use std::{convert::Infallible, str::FromStr};

use log::debug;

use crate::{error::LineError, graph::Graph};

/// A small demonstration network.
pub const SAMPLE: &str = "Alice,Bob
Alice,Charlie
Bob,David
Charlie,David
David,Eve
Eve,Frank
Frank,Alice
Charlie,Eve
Bob,Frank";

/// Builds a graph from relationship text, silently dropping malformed lines.
///
/// Returns an empty graph when no line qualifies; callers should check
/// [`Graph::is_empty`] before analysing.
///
/// # Examples
///
/// ```
/// use sociograph::parse::parse;
///
/// let graph = parse("Alice,Bob\n\n  Bob , Carol, since 2019\nnot a relationship\n");
///
/// assert_eq!(graph.nodes(), ["Alice", "Bob", "Carol"]);
/// assert_eq!(graph.edge_count(), 2);
///
/// assert!(parse("   \n  ").is_empty());
/// ```
pub fn parse(text: &str) -> Graph {
    let (graph, dropped) = parse_with_diagnostics(text);

    if !dropped.is_empty() {
        debug!("parse: dropped {} malformed line(s)", dropped.len());
    }

    graph
}

/// Builds a graph from relationship text and also reports every dropped line.
///
/// Blank and whitespace-only lines are skipped without a report.
///
/// # Examples
///
/// ```
/// use sociograph::{error::LineError, parse::parse_with_diagnostics};
///
/// let (graph, dropped) = parse_with_diagnostics("a,b\nc\n,d\n");
///
/// assert_eq!(graph.edge_count(), 1);
/// assert_eq!(
///     dropped,
///     vec![
///         LineError::MissingField { line: 2 },
///         LineError::EmptySource { line: 3 },
///     ]
/// );
/// ```
pub fn parse_with_diagnostics(text: &str) -> (Graph, Vec<LineError>) {
    let mut edges = Vec::new();
    let mut dropped = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line, i + 1) {
            Ok(edge) => edges.push(edge),
            Err(e) => {
                debug!("parse: {e}");
                dropped.push(e);
            }
        }
    }

    (Graph::from_edges(edges), dropped)
}

/// Extracts the trimmed `(source, target)` pair from a single non-blank line.
fn parse_line(line: &str, number: usize) -> Result<(&str, &str), LineError> {
    let mut fields = line.split(',');

    let (Some(source), Some(target)) = (fields.next(), fields.next()) else {
        return Err(LineError::MissingField { line: number });
    };

    let (source, target) = (source.trim(), target.trim());

    if source.is_empty() {
        return Err(LineError::EmptySource { line: number });
    }

    if target.is_empty() {
        return Err(LineError::EmptyTarget { line: number });
    }

    Ok((source, target))
}

//
// Trait implementations
//

impl FromStr for Graph {
    type Err = Infallible;

    /// Equivalent to [`parse`], parsing never fails.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse(s))
    }
}
