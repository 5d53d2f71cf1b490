//! Error types for the SMART core.

use thiserror::Error;

/// Errors raised while building parameters, forcing, state, or grids.
///
/// The numeric step itself never fails; everything here is caught at
/// configuration time.
#[derive(Error, Debug)]
pub enum SmartError {
    /// A parameter value fell outside its physical bounds.
    #[error("{name} = {value} is out of bounds [{min}, {max}]")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Wrong number of values in a flat parameter array.
    #[error("expected {expected} parameters, got {actual}")]
    ParameterCount { expected: usize, actual: usize },

    /// Wrong number of values in a flat state array.
    #[error("expected {expected} state elements, got {actual}")]
    StateLength { expected: usize, actual: usize },

    /// Array length does not match the grid or timeseries length.
    #[error("{name} has {actual} elements, expected {expected}")]
    ShapeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Forcing data rejected during validation.
    #[error("invalid forcing: {0}")]
    InvalidForcing(String),

    /// A state holds a layer outside `[0, capacity]`, a negative store, or NaN.
    #[error("state of cell {cell} is outside physical bounds")]
    UnphysicalState { cell: usize },

    /// A checkpoint does not fit the run it is restored into.
    #[error("checkpoint mismatch: {0}")]
    CheckpointMismatch(String),

    /// Run configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SmartError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            name,
            expected,
            actual,
        }
    }
}

pub type Result<T> = std::result::Result<T, SmartError>;
