//! Force-directed node placement.
//!
//! The [`LayoutSimulator`] owns the only continuously evolving state of the crate: a position and
//! velocity per node. It never schedules itself, a host calls [`LayoutSimulator::step`] (or
//! [`LayoutSimulator::tick`] with the elapsed time) once per frame and reads the positions back.
//!
//! Each step, every node in turn sums three forces:
//!
//! - repulsion from every other node, `repulsion / d²` along the line from the other node,
//! - spring attraction towards every neighbour, `d · spring`,
//! - gravity towards the canvas centre, `(centre - position) · gravity`,
//!
//! with `d` floored at `1`. The velocity becomes `(velocity + force) · damping` and the position
//! moves by the velocity, clamped inside the canvas margin. Nodes are updated one after the other,
//! so later nodes see the new positions of earlier ones. Damping is "hot" for the first
//! `cooling_step` steps and "cool" afterwards. None of this conserves energy or guarantees
//! convergence.

use log::debug;
use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{error::ParametersError, graph::Graph, report::AnalyticsSnapshot};

/// Radius of a node before any analytics are applied.
pub const DEFAULT_RADIUS: f64 = 12.0;
/// Bounds of the degree-derived radius.
pub const MIN_RADIUS: f64 = 10.0;
pub const MAX_RADIUS: f64 = 25.0;
const RADIUS_PER_DEGREE: f64 = 4.0;

/// Community colours, indexed by [`palette_index`].
pub const PALETTE: [&str; 6] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#ec4899",
];

/// Backlog bound for [`LayoutSimulator::tick`], a host that stalls doesn't get a burst of steps.
const MAX_STEPS_PER_TICK: usize = 10;

/// Returns the display radius of a node with the given degree.
///
/// # Examples
///
/// ```
/// use sociograph::layout::node_radius;
///
/// assert_eq!(node_radius(1), 10.0);
/// assert_eq!(node_radius(3), 12.0);
/// assert_eq!(node_radius(9), 25.0);
/// ```
pub fn node_radius(degree: u32) -> f64 {
    (RADIUS_PER_DEGREE * degree as f64).clamp(MIN_RADIUS, MAX_RADIUS)
}

/// Maps a community label onto the [`PALETTE`].
pub fn palette_index(community: usize) -> usize {
    community % PALETTE.len()
}

/// Tuning constants of the simulation.
///
/// Missing fields take their default when deserialized.
///
/// # Examples
///
/// ```
/// use sociograph::layout::SimulationParameters;
///
/// let parameters = SimulationParameters {
///     width: 1024.0,
///     height: 768.0,
///     ..Default::default()
/// };
///
/// assert!(parameters.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Repulsion constant between every pair of nodes.
    pub repulsion: f64,
    /// Spring constant along edges.
    pub spring: f64,
    /// Pull towards the canvas centre.
    pub gravity: f64,
    /// Damping applied while `steps < cooling_step`.
    pub hot_damping: f64,
    /// Damping applied afterwards.
    pub cool_damping: f64,
    pub cooling_step: u64,
    /// Distance kept between nodes and the canvas edges.
    pub margin: f64,
    pub width: f64,
    pub height: f64,
    /// Half-width of the square around the centre new positions are drawn from.
    pub spawn_radius: f64,
    /// Steps per second of elapsed time, used by [`LayoutSimulator::tick`].
    pub tick_rate: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            repulsion: 2000.0,
            spring: 0.015,
            gravity: 0.002,
            hot_damping: 0.85,
            cool_damping: 0.95,
            cooling_step: 300,
            margin: 40.0,
            width: 800.0,
            height: 600.0,
            spawn_radius: 100.0,
            tick_rate: 60.0,
        }
    }
}

impl SimulationParameters {
    /// Checks the parameters describe a usable simulation.
    pub fn validate(&self) -> Result<(), ParametersError> {
        let fields = [
            ("repulsion", self.repulsion),
            ("spring", self.spring),
            ("gravity", self.gravity),
            ("hot_damping", self.hot_damping),
            ("cool_damping", self.cool_damping),
            ("margin", self.margin),
            ("width", self.width),
            ("height", self.height),
            ("spawn_radius", self.spawn_radius),
            ("tick_rate", self.tick_rate),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ParametersError::NotFinite { name, value });
            }

            if value < 0.0 {
                return Err(ParametersError::Negative { name, value });
            }
        }

        for (name, value) in [
            ("hot_damping", self.hot_damping),
            ("cool_damping", self.cool_damping),
        ] {
            if value >= 1.0 {
                return Err(ParametersError::Damping { name, value });
            }
        }

        if self.width <= 2.0 * self.margin || self.height <= 2.0 * self.margin {
            return Err(ParametersError::CanvasTooSmall {
                width: self.width,
                height: self.height,
                margin: self.margin,
            });
        }

        if self.tick_rate == 0.0 {
            return Err(ParametersError::TickRate(self.tick_rate));
        }

        Ok(())
    }

    /// The centre of the canvas, where gravity pulls towards.
    pub fn center(&self) -> Vector2<f64> {
        Vector2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamps a position into the canvas, inset by the margin.
    fn clamp(&self, position: Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            position.x.clamp(self.margin, self.width - self.margin),
            position.y.clamp(self.margin, self.height - self.margin),
        )
    }
}

/// Whether the simulator currently has nodes to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SimulationState {
    Idle,
    Running,
}

/// The placement of a single node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeState {
    pub id: String,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
    /// Display radius, see [`node_radius`].
    pub radius: f64,
    /// Index into [`PALETTE`].
    pub color: usize,
}

impl NodeState {
    /// The horizontal position.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// The vertical position.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// The CSS colour of the node.
    pub fn color_hex(&self) -> &'static str {
        PALETTE[palette_index(self.color)]
    }
}

/// Advances node positions under the simulated forces.
///
/// # Examples
///
/// ```
/// use sociograph::{
///     layout::{LayoutSimulator, SimulationState},
///     parse::parse,
/// };
///
/// let graph = parse("Alice,Bob\nBob,Carol");
/// let mut simulator = LayoutSimulator::new();
///
/// simulator.load(&graph);
/// assert_eq!(simulator.state(), SimulationState::Running);
///
/// for _ in 0..100 {
///     simulator.step();
/// }
///
/// let nodes = simulator.nodes();
/// assert_eq!(nodes.len(), 3);
/// assert!(nodes.iter().all(|n| (40.0..=760.0).contains(&n.x())));
///
/// simulator.clear();
/// assert_eq!(simulator.state(), SimulationState::Idle);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LayoutSimulator {
    parameters: SimulationParameters,
    nodes: Vec<NodeState>,
    /// Indexed like `nodes`, one entry per incident edge.
    neighbours: Vec<Vec<usize>>,
    /// Steps taken since the last load.
    steps: u64,
    /// Elapsed time not yet converted into steps.
    accumulator: f64,
}

impl LayoutSimulator {
    /// Creates an idle simulator with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an idle simulator with custom parameters.
    pub fn with_parameters(parameters: SimulationParameters) -> Result<Self, ParametersError> {
        parameters.validate()?;

        Ok(Self {
            parameters,
            ..Default::default()
        })
    }

    /// The parameters the simulator runs with.
    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Running while a graph is loaded, idle otherwise.
    pub fn state(&self) -> SimulationState {
        if self.nodes.is_empty() {
            SimulationState::Idle
        } else {
            SimulationState::Running
        }
    }

    /// Checks if the simulator is running.
    pub fn is_running(&self) -> bool {
        self.state() == SimulationState::Running
    }

    /// The current node placements, in the graph's node order. Empty when idle.
    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    /// The placement of a node by identifier.
    pub fn node(&self, id: &str) -> Option<&NodeState> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Steps taken since the current graph was loaded.
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// The damping the next step will apply.
    pub fn damping(&self) -> f64 {
        if self.steps < self.parameters.cooling_step {
            self.parameters.hot_damping
        } else {
            self.parameters.cool_damping
        }
    }

    /// Makes `graph` the active target, with fresh random positions and zero velocities.
    ///
    /// Any previous state is discarded. An empty graph leaves the simulator idle.
    pub fn load(&mut self, graph: &Graph) {
        self.load_with_rng(graph, &mut rand::thread_rng());
    }

    /// Same as [`LayoutSimulator::load`], drawing positions from `rng`.
    pub fn load_with_rng<R: Rng>(&mut self, graph: &Graph, rng: &mut R) {
        self.clear();

        if graph.is_empty() {
            return;
        }

        let parameters = &self.parameters;
        let center = parameters.center();
        let r = parameters.spawn_radius;

        let nodes: Vec<NodeState> = graph
            .nodes()
            .iter()
            .map(|id| {
                let offset = Vector2::new(
                    rng.gen::<f64>() * 2.0 * r - r,
                    rng.gen::<f64>() * 2.0 * r - r,
                );

                NodeState {
                    id: id.clone(),
                    position: parameters.clamp(center + offset),
                    velocity: Vector2::zeros(),
                    radius: DEFAULT_RADIUS,
                    color: 0,
                }
            })
            .collect();

        self.nodes = nodes;
        self.neighbours = graph.adjacency();

        debug!("layout: running with {} nodes", self.nodes.len());
    }

    /// Drops the active graph, the simulator becomes idle.
    pub fn clear(&mut self) {
        if self.is_running() {
            debug!("layout: idle");
        }

        self.nodes.clear();
        self.neighbours.clear();
        self.steps = 0;
        self.accumulator = 0.0;
    }

    /// Sizes nodes by degree and colours them by community.
    ///
    /// Nodes missing from the snapshot keep their current look.
    pub fn apply_analytics(&mut self, snapshot: &AnalyticsSnapshot) {
        for node in &mut self.nodes {
            if let Some(m) = snapshot.node(&node.id) {
                node.radius = node_radius(m.degree);
                node.color = palette_index(m.community);
            }
        }
    }

    /// Advances the simulation by one step and returns the new placements.
    ///
    /// Does nothing while idle.
    pub fn step(&mut self) -> &[NodeState] {
        if self.nodes.is_empty() {
            return &self.nodes;
        }

        let damping = self.damping();
        let center = self.parameters.center();

        for i in 0..self.nodes.len() {
            let force = self.net_force(i, center);

            let parameters = &self.parameters;
            let node = &mut self.nodes[i];

            node.velocity = (node.velocity + force) * damping;
            node.position = parameters.clamp(node.position + node.velocity);
        }

        self.steps += 1;

        &self.nodes
    }

    /// Advances the simulation by the number of steps `dt` seconds amount to at the configured
    /// tick rate, carrying the remainder over to the next call.
    ///
    /// At most a fixed number of steps are taken per call, a larger backlog is dropped.
    pub fn tick(&mut self, dt: f64) -> &[NodeState] {
        if self.nodes.is_empty() || !dt.is_finite() || dt <= 0.0 {
            return &self.nodes;
        }

        let interval = 1.0 / self.parameters.tick_rate;
        self.accumulator += dt;

        // The epsilon absorbs rounding when `dt` is a whole number of intervals.
        let due = (self.accumulator / interval + 1e-9).floor() as usize;

        if due > MAX_STEPS_PER_TICK {
            self.accumulator = 0.0;
        } else {
            self.accumulator = (self.accumulator - due as f64 * interval).max(0.0);
        }

        for _ in 0..due.min(MAX_STEPS_PER_TICK) {
            self.step();
        }

        &self.nodes
    }

    //
    // Private
    //

    /// Sums the forces acting on node `i` given the current placements.
    fn net_force(&self, i: usize, center: Vector2<f64>) -> Vector2<f64> {
        let parameters = &self.parameters;
        let position = self.nodes[i].position;
        let mut force = Vector2::zeros();

        for (j, other) in self.nodes.iter().enumerate() {
            if j == i {
                continue;
            }

            if let Some((direction, distance)) = unit_and_distance(position - other.position) {
                force += direction * (parameters.repulsion / (distance * distance));
            }
        }

        for &j in &self.neighbours[i] {
            let delta = self.nodes[j].position - position;
            if let Some((direction, distance)) = unit_and_distance(delta) {
                force += direction * (distance * parameters.spring);
            }
        }

        force + (center - position) * parameters.gravity
    }
}

/// Splits `delta` into its unit direction and its length floored at `1`.
///
/// Coincident positions have no direction and exert no force on each other.
fn unit_and_distance(delta: Vector2<f64>) -> Option<(Vector2<f64>, f64)> {
    let norm = delta.norm();
    if norm == 0.0 {
        return None;
    }

    Some((delta / norm, norm.max(1.0)))
}
