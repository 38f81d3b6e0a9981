//! Host-owned application state tying the pieces together.
//!
//! The [`Engine`] holds the active graph, its analytics and the layout, and models whether a
//! visualization is currently showing the graph. It never schedules anything: the host calls
//! [`Engine::step`] (or [`Engine::tick`]) from its own frame loop.

use log::debug;

use crate::{
    graph::Graph,
    layout::{LayoutSimulator, NodeState},
    parse::parse,
    report::AnalyticsSnapshot,
};

/// The analytics and layout state of one session.
///
/// # Examples
///
/// ```
/// use sociograph::{engine::Engine, parse::SAMPLE};
///
/// let mut engine = Engine::new();
///
/// let snapshot = engine.ingest(SAMPLE).expect("sample has relationships");
/// assert_eq!(snapshot.node_count, 6);
///
/// engine.show_graph();
/// let positions = engine.step();
/// assert_eq!(positions.len(), 6);
///
/// assert!(engine.ingest("no relationships here").is_none());
/// assert!(engine.step().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    graph: Option<Graph>,
    analytics: Option<AnalyticsSnapshot>,
    layout: LayoutSimulator,
    /// Whether a visualization target is currently showing the graph.
    visible: bool,
}

impl Engine {
    /// Creates an engine with no graph and the default layout parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine driving the given simulator, e.g. one built with custom parameters.
    pub fn with_layout(layout: LayoutSimulator) -> Self {
        Self {
            layout,
            ..Default::default()
        }
    }

    /// Replaces the active graph with one built from `text` and analyses it.
    ///
    /// Returns `None` when no line qualifies; the previous graph, its analytics and the layout
    /// are dropped in that case too. If the graph is showing, the layout restarts from fresh
    /// random positions.
    pub fn ingest(&mut self, text: &str) -> Option<&AnalyticsSnapshot> {
        let graph = parse(text);

        if graph.is_empty() {
            debug!("engine: nothing to analyse");

            self.graph = None;
            self.analytics = None;
            self.layout.clear();

            return None;
        }

        self.analytics = Some(AnalyticsSnapshot::compute(&graph));
        self.graph = Some(graph);

        if self.visible {
            self.restart_layout();
        }

        self.analytics.as_ref()
    }

    /// Marks the visualization as showing and (re)starts the layout of the active graph.
    pub fn show_graph(&mut self) {
        self.visible = true;
        self.restart_layout();
    }

    /// Marks the visualization as withdrawn, the layout stops.
    pub fn hide_graph(&mut self) {
        self.visible = false;
        self.layout.clear();
    }

    /// Checks if the visualization is showing the graph.
    pub fn is_showing(&self) -> bool {
        self.visible
    }

    /// The active graph, if any.
    pub fn graph(&self) -> Option<&Graph> {
        self.graph.as_ref()
    }

    /// The analytics of the active graph, if any.
    pub fn analytics(&self) -> Option<&AnalyticsSnapshot> {
        self.analytics.as_ref()
    }

    /// The layout simulator.
    pub fn layout(&self) -> &LayoutSimulator {
        &self.layout
    }

    /// Advances the layout by one step. Returns nothing while there's no graph or it isn't
    /// showing.
    pub fn step(&mut self) -> &[NodeState] {
        self.layout.step()
    }

    /// Advances the layout by `dt` seconds, see [`LayoutSimulator::tick`].
    pub fn tick(&mut self, dt: f64) -> &[NodeState] {
        self.layout.tick(dt)
    }

    //
    // Private
    //

    fn restart_layout(&mut self) {
        match (&self.graph, &self.analytics) {
            (Some(graph), Some(analytics)) => {
                self.layout.load(graph);
                self.layout.apply_analytics(analytics);
            }
            _ => self.layout.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{layout::node_radius, parse::SAMPLE};

    #[test]
    fn ingest_without_showing() {
        let mut engine = Engine::new();

        assert!(engine.ingest(SAMPLE).is_some());
        assert_eq!(engine.graph().map(Graph::node_count), Some(6));
        assert!(!engine.layout().is_running());
        assert!(engine.step().is_empty());
    }

    #[test]
    fn show_and_hide() {
        let mut engine = Engine::new();
        engine.ingest(SAMPLE);

        engine.show_graph();
        assert!(engine.is_showing());
        assert!(engine.layout().is_running());
        assert_eq!(engine.step().len(), 6);

        engine.hide_graph();
        assert!(!engine.layout().is_running());
        assert!(engine.step().is_empty());

        // Showing again starts over.
        engine.show_graph();
        assert_eq!(engine.layout().steps_taken(), 0);
    }

    #[test]
    fn show_before_ingest() {
        let mut engine = Engine::new();
        engine.show_graph();

        assert!(!engine.layout().is_running());

        engine.ingest("a,b");
        assert!(engine.layout().is_running());
        assert_eq!(engine.tick(1.0 / 60.0).len(), 2);
    }

    #[test]
    fn new_input_replaces_layout() {
        let mut engine = Engine::new();
        engine.ingest(SAMPLE);
        engine.show_graph();

        for _ in 0..20 {
            engine.step();
        }

        engine.ingest("x,y");

        assert_eq!(engine.layout().steps_taken(), 0);
        assert_eq!(engine.layout().nodes().len(), 2);
        assert!(engine.layout().node("Alice").is_none());
    }

    #[test]
    fn empty_input_clears_everything() {
        let mut engine = Engine::new();
        engine.ingest(SAMPLE);
        engine.show_graph();

        assert!(engine.ingest("   \n").is_none());
        assert!(engine.graph().is_none());
        assert!(engine.analytics().is_none());
        assert!(!engine.layout().is_running());
    }

    #[test]
    fn layout_is_styled_from_analytics() {
        let mut engine = Engine::new();
        engine.ingest(SAMPLE);
        engine.show_graph();

        let radius = node_radius(engine.analytics().and_then(|a| a.degree("Alice")).unwrap());
        assert_eq!(engine.layout().node("Alice").map(|n| n.radius), Some(radius));
    }
}
