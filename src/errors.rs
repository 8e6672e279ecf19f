use std::borrow::Cow;

use thiserror::Error;

/// Top-level error type returned by the query/mutation surface.
#[derive(Debug, Error)]
pub enum AppError {
    /// No active session was supplied for an operation that requires one.
    #[error("User not authenticated")]
    Unauthenticated,

    /// The actor is not the owner of the resource it tried to mutate.
    #[error("{message}")]
    Unauthorized { message: Cow<'static, str> },

    /// A referenced user, blog, or interaction does not exist.
    #[error("{entity} not found")]
    NotFound { entity: Cow<'static, str> },

    /// A guarded state transition was attempted twice (duplicate follow,
    /// duplicate registration).
    #[error("{message}")]
    Conflict { message: Cow<'static, str> },

    /// Validation failed for one or more fields.
    #[error("validation failed")]
    Validation(#[from] ValidationError),

    /// Underlying store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AppError {
    pub fn not_found(entity: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { entity: entity.into() }
    }

    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the document-store and blob-store seams.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying Redis command failed.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// A stored document could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Target document was missing when applying a mutation.
    #[error("document not found")]
    Missing { key: Option<String> },

    /// Unique constraint violation: the value already exists on another document.
    #[error("unique constraint violation on {field}: {value}")]
    UniqueViolation { field: String, value: String },

    /// Invalid input supplied to a store operation (malformed cursor, zero page size).
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{message}")]
    Other { message: Cow<'static, str> },
}

impl StoreError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Collection of validation issues encountered while preparing a mutation.
#[derive(Debug, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new<I>(issues: I) -> Self
    where
        I: IntoIterator<Item = ValidationIssue>,
    {
        Self {
            issues: issues.into_iter().collect(),
        }
    }

    /// Convenience helper for constructing a single-field validation error.
    pub fn single(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new([ValidationIssue::new(field, code, message)])
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Detailed validation failure for a single field.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}
