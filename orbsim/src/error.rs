//! Error types for loading scenarios and stepping the simulation.

use thiserror::Error;

/// Failures while reading or validating a scenario file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("line {line}: expected {expected} fields separated by ';', found {found}")]
    FieldCount { line: usize, expected: usize, found: usize },

    #[error("line {line}: invalid {field} value {value:?}")]
    InvalidNumber { line: usize, field: &'static str, value: String },

    #[error("expected exactly 2 bodies, found {0}")]
    BodyCount(usize),

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: String, value: f64 },

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: String, value: f64 },

    #[error("vector {field} of body {body:?} needs 2 components, found {found}")]
    Dimension { body: String, field: &'static str, found: usize },

    #[error("scenario file is empty")]
    Empty,
}

/// Arithmetic failures raised while integrating
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("singularity: {body} and {other} share the same position")]
    Singularity { body: String, other: String },

    #[error("state of {body} became non-finite")]
    NonFinite { body: String },

    #[error("all {0} iterations have already been run")]
    Exhausted(u64),
}
