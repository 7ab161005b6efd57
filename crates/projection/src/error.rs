//! Error types for projection setup.

use thiserror::Error;

/// Errors raised while constructing a projection.
///
/// Forward and inverse transforms never fail; points outside the domain of a
/// projection come back as NaN so they flow into the grid mask model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// A projection parameter is outside its valid range.
    #[error("invalid projection parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    /// The requested ellipsoid is not known.
    #[error("unknown ellipsoid: {0}")]
    UnknownEllipsoid(String),
}

impl ProjectionError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

/// Result type for projection construction.
pub type Result<T> = std::result::Result<T, ProjectionError>;
