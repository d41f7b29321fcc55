//! Error types for the in-memory connector.

use relink_query::error::QueryError;
use thiserror::Error;

/// Result type for in-memory connector operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Error type for in-memory connector operations.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the file.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML.
    #[error("Invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A record with the same id already exists.
    #[error("Duplicate id {id} for model {model}")]
    DuplicateId {
        /// Model name.
        model: String,
        /// The conflicting id.
        id: String,
    },

    /// The numeric id sequence cannot advance any further.
    #[error("Id sequence exhausted for model {0}")]
    IdExhausted(String),

    /// A collection was registered under a model name with a different type.
    #[error("Collection for model {0} was created with a different entity type")]
    CollectionType(String),
}

impl MemoryError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a duplicate id error.
    pub fn duplicate_id(model: impl Into<String>, id: impl ToString) -> Self {
        Self::DuplicateId {
            model: model.into(),
            id: id.to_string(),
        }
    }
}

impl From<MemoryError> for QueryError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::Config(msg) => QueryError::configuration(msg),
            MemoryError::Io { .. } | MemoryError::Toml(_) => {
                QueryError::configuration(err.to_string()).with_source(err)
            }
            MemoryError::DuplicateId { ref model, .. } => {
                QueryError::unique_violation(model.clone(), "id").with_help(err.to_string())
            }
            MemoryError::IdExhausted(ref model) => QueryError::database(err.to_string())
                .with_model(model.clone())
                .with_field("id")
                .with_help("Supply ids explicitly once the sequence has reached i64::MAX"),
            MemoryError::CollectionType(model) => {
                QueryError::internal(format!("collection type mismatch for {}", model))
                    .with_model(model)
            }
        }
    }
}
