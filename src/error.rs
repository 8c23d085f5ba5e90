//! Application error type.
//!
//! Content-level problems (a malformed page document, a missing page) are
//! not errors: they surface as outcomes of the lookup functions. `AppError`
//! covers store and request failures that end a request.

use thiserror::Error;

/// The primary error type for store and editor operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (website, page).
    #[error("{0} not found")]
    NotFound(String),

    /// One or more field validation failures.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Resource already exists (second website for an account, duplicate name).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Authenticated, but not the owner of the resource.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Missing or unknown credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Persistence file could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }
}

/// A specialized Result type for store and editor operations.
pub type Result<T> = std::result::Result<T, AppError>;
