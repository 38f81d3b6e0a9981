//! Sociograph is a small engine for analysing relationship lists ("A connects to B") and laying
//! them out for display.
//!
//! # Basic usage
//!
//! The library is centered around the [`Graph`](graph::Graph) structure, built from relationship
//! text by [`parse`](parse::parse). Once constructed, an
//! [`AnalyticsSnapshot`](report::AnalyticsSnapshot) gathers degree centrality, an approximate
//! betweenness score and a label-propagation community partition, and a
//! [`LayoutSimulator`](layout::LayoutSimulator) places the nodes with a force-directed simulation
//! stepped by the host.
//!
//! ```rust
//! use sociograph::{layout::LayoutSimulator, parse::parse, report::AnalyticsSnapshot};
//!
//! // Malformed lines are dropped silently.
//! let graph = parse(
//!     "Alice,Bob
//!      Alice,Charlie
//!      Bob,David
//!      Charlie,David
//!      this line is ignored",
//! );
//!
//! // Compute the metrics on that graph.
//! let snapshot = AnalyticsSnapshot::compute(&graph);
//! assert_eq!(snapshot.degree("Alice"), Some(2));
//! assert_eq!(snapshot.top_by_degree[0].0, "Alice");
//!
//! // Lay it out, one step per frame.
//! let mut simulator = LayoutSimulator::new();
//! simulator.load(&graph);
//! simulator.apply_analytics(&snapshot);
//!
//! for _ in 0..60 {
//!     for node in simulator.step() {
//!         // draw `node.position` with `node.radius` and `node.color_hex()`...
//!         let _ = (node.x(), node.y());
//!     }
//! }
//! ```
//!
//! The crate logs through the [`log`] facade and never installs a logger itself.

mod betweenness;
pub mod community;
pub mod edge;
pub mod engine;
pub mod error;
pub mod graph;
pub mod layout;
pub mod parse;
pub mod report;
