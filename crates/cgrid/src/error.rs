//! Error types for grid construction and generation.

use thiserror::Error;

/// Errors that can occur while building or editing a C-grid.
#[derive(Error, Debug)]
pub enum GridError {
    /// Arrays have mismatched or unusable shapes.
    #[error("shape error: {0}")]
    Shape(String),

    /// An argument has an invalid value.
    #[error("value error: {0}")]
    Value(String),

    /// A coordinate or position lies outside its allowed range.
    #[error("range error: {0}")]
    Range(String),

    /// An external collaborator (solver program, projection) is missing.
    #[error("resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// The external solver ran but did not produce a grid.
    #[error("solver failed: {0}")]
    SolverFailed(String),

    /// Projection setup error.
    #[error("projection error: {0}")]
    Projection(#[from] projection::ProjectionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML (de)serialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl GridError {
    /// Create a Shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Create a Value error.
    pub fn value(msg: impl Into<String>) -> Self {
        Self::Value(msg.into())
    }

    /// Create a Range error.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Create a ResourceUnavailable error.
    pub fn resource_unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    /// Create a SolverFailed error.
    pub fn solver_failed(msg: impl Into<String>) -> Self {
        Self::SolverFailed(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors raised by input validation before any computation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Shape(_) | Self::Value(_) | Self::Range(_))
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
