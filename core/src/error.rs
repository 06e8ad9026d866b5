use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::BoxError;

#[derive(Debug, Error)]
pub enum StrataError {
    /// `where` received an operator token outside the supported set
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// `order_by_token` received an unknown direction
    #[error("Invalid order direction: {0}")]
    InvalidDirection(String),

    /// A paginator was asked for pages of zero records
    #[error("Page size must be at least 1")]
    InvalidPageSize,

    /// An `_or_fail` lookup came back empty
    #[error("No query results for model [{0}]")]
    ModelNotFound(&'static str),

    /// A relation path segment names no relation on the model
    #[error("Unknown relation '{relation}' on model [{model}]")]
    UnknownRelation {
        model: &'static str,
        relation: String,
    },

    /// Error raised by the remote store, passed through unchanged
    #[error(transparent)]
    Remote(#[from] BoxError),

    /// Error loading configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl StrataError {
    /// Returns the backend error when this is a passthrough remote failure.
    pub fn remote(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Remote(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, StrataError>;
