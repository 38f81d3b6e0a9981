//! Error types.
//!
//! None of these are raised by the analytics themselves: text input always degrades to a
//! (possibly empty) graph. [`LineError`] is only surfaced through
//! [`parse_with_diagnostics`](crate::parse::parse_with_diagnostics) and [`ParametersError`] only
//! when a host supplies its own [`SimulationParameters`](crate::layout::SimulationParameters).

use thiserror::Error;

/// Why a line of relationship text was dropped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("line {line}: expected at least two comma-separated fields")]
    MissingField { line: usize },
    #[error("line {line}: source identifier is empty")]
    EmptySource { line: usize },
    #[error("line {line}: target identifier is empty")]
    EmptyTarget { line: usize },
}

impl LineError {
    /// The 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::MissingField { line } | Self::EmptySource { line } | Self::EmptyTarget { line } => {
                *line
            }
        }
    }
}

/// Rejected layout tuning parameters.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParametersError {
    #[error("`{name}` must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },
    #[error("`{name}` must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("`{name}` must lie in [0, 1), got {value}")]
    Damping { name: &'static str, value: f64 },
    #[error("canvas {width}x{height} leaves no room inside a margin of {margin}")]
    CanvasTooSmall { width: f64, height: f64, margin: f64 },
    #[error("`tick_rate` must be positive, got {0}")]
    TickRate(f64),
}
