// Central Error Type for the Engine Side

use thiserror::Error;

/// Engine-level error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Domain error: {0}")]
    Domain(#[from] crate::domain::DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Non-unique result: query for {entity} matched {count} rows")]
    NonUnique { entity: &'static str, count: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

// From implementation for infra crates (to avoid circular dependency)
impl From<String> for EngineError {
    fn from(err: String) -> Self {
        EngineError::Database(err)
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to EngineError::Database(String)
