//! Error types for the association layer
//!
//! Provides error handling for model hydration, query execution,
//! and association declaration.

use std::fmt;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// ORM error type alias
pub type OrmError = ModelError;

/// ORM result type alias
pub type OrmResult<T> = ModelResult<T>;

/// Error types for model and query operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Database backend or storage error
    Database(String),
    /// Model not found in the backing store
    NotFound(String),
    /// Association declaration or loading failed
    Association(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Query building error
    Query(String),
    /// Configuration error
    Configuration(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Database(msg) => write!(f, "Database error: {}", msg),
            ModelError::NotFound(table) => write!(f, "Record not found in table '{}'", table),
            ModelError::Association(msg) => write!(f, "Association error: {}", msg),
            ModelError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ModelError::Query(msg) => write!(f, "Query error: {}", msg),
            ModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

// Convert from serde_json errors
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

/// Error types for association operations
#[derive(Debug, Clone, PartialEq)]
pub enum AssociationError {
    /// Association not found in the registry
    NotFound(String),
    /// Invalid association configuration
    InvalidConfiguration(String),
}

impl fmt::Display for AssociationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssociationError::NotFound(msg) => write!(f, "Association not found: {}", msg),
            AssociationError::InvalidConfiguration(msg) => {
                write!(f, "Invalid association configuration: {}", msg)
            }
        }
    }
}

impl std::error::Error for AssociationError {}

impl From<AssociationError> for ModelError {
    fn from(err: AssociationError) -> Self {
        ModelError::Association(err.to_string())
    }
}
