//! Error types for repository and relation operations.
//!
//! Every failure surfaced by Relink is a [`QueryError`] carrying:
//! - An [`ErrorCode`] for programmatic handling
//! - Context about the model, field or relations involved
//! - Suggestions and help text for fixing the issue
//!
//! # Error Codes
//!
//! Error codes follow a pattern: P{category}{number}
//! - 1xxx: Query errors (not found, invalid include, invalid relation)
//! - 2xxx: Constraint violations
//! - 5xxx: Execution errors
//! - 6xxx: Data errors
//! - 7xxx: Configuration errors
//! - 9xxx: Internal errors
//!
//! ```rust
//! use relink_query::{ErrorCode, QueryError};
//!
//! let err = QueryError::not_found("Customer");
//! assert_eq!(err.code, ErrorCode::RecordNotFound);
//! assert!(err.to_string().contains("Customer"));
//!
//! let err = QueryError::invalid_include(["home"]);
//! assert!(err.is_invalid_include());
//! assert_eq!(err.invalid_relations(), ["home".to_string()]);
//! ```

use std::fmt;
use thiserror::Error;

/// Result type for repository operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Query errors (1xxx)
    /// Record not found (P1001).
    RecordNotFound = 1001,
    /// Invalid include request (P1004).
    InvalidInclude = 1004,
    /// Invalid relation definition (P1006).
    InvalidRelation = 1006,
    /// Field is not defined on the model (P1007).
    UnknownField = 1007,

    // Constraint errors (2xxx)
    /// Unique constraint violation (P2001).
    UniqueConstraint = 2001,

    // Query execution errors (5xxx)
    /// Invalid parameter (P5003).
    InvalidParameter = 5003,
    /// General database error (P5005).
    DatabaseError = 5005,

    // Data errors (6xxx)
    /// Invalid data type (P6001).
    InvalidDataType = 6001,
    /// Serialization error (P6002).
    SerializationError = 6002,
    /// Deserialization error (P6003).
    DeserializationError = 6003,

    // Configuration errors (7xxx)
    /// Invalid configuration (P7001).
    InvalidConfiguration = 7001,
    /// Target repository of a relation is not available (P7004).
    RepositoryUnavailable = 7004,

    // Internal errors (9xxx)
    /// Internal error (P9001).
    Internal = 9001,
}

impl ErrorCode {
    /// Get the error code string (e.g., "P1001").
    pub fn code(&self) -> String {
        format!("P{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::RecordNotFound => "Record not found",
            Self::InvalidInclude => "Invalid include",
            Self::InvalidRelation => "Invalid relation definition",
            Self::UnknownField => "Unknown field",
            Self::UniqueConstraint => "Unique constraint violation",
            Self::InvalidParameter => "Invalid parameter",
            Self::DatabaseError => "Database error",
            Self::InvalidDataType => "Invalid data type",
            Self::SerializationError => "Serialization error",
            Self::DeserializationError => "Deserialization error",
            Self::InvalidConfiguration => "Invalid configuration",
            Self::RepositoryUnavailable => "Repository unavailable",
            Self::Internal => "Internal error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Suggestion for fixing an error.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggestion text.
    pub text: String,
    /// Optional code example.
    pub code: Option<String>,
}

impl Suggestion {
    /// Create a new suggestion.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            code: None,
        }
    }

    /// Add a code example.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Additional context for an error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation that was being performed.
    pub operation: Option<String>,
    /// The model involved.
    pub model: Option<String>,
    /// The field involved.
    pub field: Option<String>,
    /// Relation names the error refers to.
    pub relations: Vec<String>,
    /// Suggestions for fixing the error.
    pub suggestions: Vec<Suggestion>,
    /// Help text.
    pub help: Option<String>,
}

/// Errors that can occur during repository operations.
#[derive(Error, Debug)]
pub struct QueryError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// Additional context.
    pub context: ErrorContext,
    /// The source error (if any).
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl QueryError {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add context about the operation.
    pub fn with_context(mut self, operation: impl Into<String>) -> Self {
        self.context.operation = Some(operation.into());
        self
    }

    /// Add a suggestion for fixing the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(suggestion));
        self
    }

    /// Add a code suggestion.
    pub fn with_code_suggestion(mut self, text: impl Into<String>, code: impl Into<String>) -> Self {
        self.context.suggestions.push(Suggestion::new(text).with_code(code));
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.context.help = Some(help.into());
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.context.model = Some(model.into());
        self
    }

    /// Set the field.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }

    /// Set the relation names involved.
    pub fn with_relations(mut self, relations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.context.relations = relations.into_iter().map(Into::into).collect();
        self
    }

    /// Set the source error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // ============== Constructor Functions ==============

    /// Create a not found error.
    pub fn not_found(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::RecordNotFound,
            format!("No {} record found matching the query", model),
        )
        .with_model(&model)
        .with_suggestion(format!("Verify the {} exists before querying", model))
    }

    /// Create an entity-not-found error for a specific id.
    pub fn entity_not_found(model: impl Into<String>, id: impl fmt::Display) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::RecordNotFound,
            format!("Entity not found: {} with id {}", model, id),
        )
        .with_model(&model)
    }

    /// Create an invalid include error naming every unresolvable relation.
    ///
    /// The message lists each entry the way it was requested, e.g.
    /// `Invalid "filter.include" entries: {"relation":"home"}`.
    pub fn invalid_include(relations: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let relations: Vec<String> = relations.into_iter().map(Into::into).collect();
        let entries = relations
            .iter()
            .map(|name| serde_json::json!({ "relation": name }).to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(
            ErrorCode::InvalidInclude,
            format!("Invalid \"filter.include\" entries: {}", entries),
        )
        .with_relations(relations)
        .with_suggestion("Register an inclusion resolver for the relation before including it")
        .with_code_suggestion(
            "Relation factories register their resolver on creation",
            "repo.create_has_many_repository_factory_for(definition, getter)?",
        )
    }

    /// Create an invalid relation definition error.
    pub fn invalid_relation(relation: impl Into<String>, message: impl Into<String>) -> Self {
        let relation = relation.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidRelation,
            format!("Invalid relation `{}`: {}", relation, message),
        )
        .with_relations([relation])
    }

    /// Create an unknown field error.
    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        let model = model.into();
        let field = field.into();
        Self::new(
            ErrorCode::UnknownField,
            format!("`{}` is not defined in the model `{}`", field, model),
        )
        .with_model(&model)
        .with_field(&field)
    }

    /// Create a unique constraint violation error.
    pub fn unique_violation(model: impl Into<String>, field: impl Into<String>) -> Self {
        let model = model.into();
        let field = field.into();
        Self::new(
            ErrorCode::UniqueConstraint,
            format!("Unique constraint violated on {}.{}", model, field),
        )
        .with_model(&model)
        .with_field(&field)
        .with_suggestion(format!("A record with this {} already exists", field))
    }

    /// Create an invalid input error.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        Self::new(
            ErrorCode::InvalidParameter,
            format!("Invalid input for {}: {}", field, message),
        )
        .with_field(&field)
    }

    /// Create a repository unavailable error.
    pub fn repository_unavailable(model: impl Into<String>) -> Self {
        let model = model.into();
        Self::new(
            ErrorCode::RepositoryUnavailable,
            format!("Target repository for {} is not available", model),
        )
        .with_model(&model)
        .with_suggestion("Bind the deferred getter once the target repository is constructed")
        .with_help("Deferred getters hold a weak reference; keep the target repository alive")
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfiguration, message.into())
    }

    /// Create a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message.into())
    }

    /// Create a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            ErrorCode::DeserializationError,
            format!("Failed to deserialize result: {}", message),
        )
        .with_suggestion("Check that the included relation matches the requested type")
    }

    /// Create a general database error.
    pub fn database(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::DatabaseError, message)
            .with_suggestion("Check the data source logs for more details")
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ErrorCode::Internal, format!("Internal error: {}", message))
            .with_help("This is likely a bug in Relink - please report it")
    }

    // ============== Error Checks ==============

    /// Check if this is a not found error.
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::RecordNotFound
    }

    /// Check if this is an invalid include error.
    pub fn is_invalid_include(&self) -> bool {
        self.code == ErrorCode::InvalidInclude
    }

    /// Check if this is a constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self.code, ErrorCode::UniqueConstraint)
    }

    /// Relation names an invalid include error refers to.
    pub fn invalid_relations(&self) -> &[String] {
        if self.is_invalid_include() {
            &self.context.relations
        } else {
            &[]
        }
    }

    // ============== Display Functions ==============

    /// Display the full error with all context and suggestions.
    pub fn display_full(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Error [{}]: {}\n", self.code.code(), self.message));

        if let Some(ref op) = self.context.operation {
            output.push_str(&format!("  → While: {}\n", op));
        }
        if let Some(ref model) = self.context.model {
            output.push_str(&format!("  → Model: {}\n", model));
        }
        if let Some(ref field) = self.context.field {
            output.push_str(&format!("  → Field: {}\n", field));
        }
        if !self.context.relations.is_empty() {
            output.push_str(&format!("  → Relations: {}\n", self.context.relations.join(", ")));
        }

        if !self.context.suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for (i, suggestion) in self.context.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion.text));
                if let Some(ref code) = suggestion.code {
                    output.push_str(&format!("     ```\n     {}\n     ```\n", code.replace('\n', "\n     ")));
                }
            }
        }

        if let Some(ref help) = self.context.help {
            output.push_str(&format!("\nHelp: {}\n", help));
        }

        output
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::serialization(err.to_string()).with_source(err)
    }
}

/// Helper for creating errors with context.
#[macro_export]
macro_rules! query_error {
    ($code:expr, $msg:expr) => {
        $crate::error::QueryError::new($code, $msg)
    };
    ($code:expr, $msg:expr, $($key:ident = $value:expr),+ $(,)?) => {{
        let mut err = $crate::error::QueryError::new($code, $msg);
        $(
            err = err.$key($value);
        )+
        err
    }};
}
