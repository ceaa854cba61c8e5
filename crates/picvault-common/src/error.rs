//! Common error type used throughout picvault.
//!
//! All crates funnel their failures into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status code via
//! [`Error::http_status`] and a client-safe message via
//! [`Error::public_message`].

/// Common error type for picvault.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shared initialization secret did not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A request field failed its format, length or content rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No row matched both the id and the owner hash.
    ///
    /// A missing id and an id owned by someone else are reported the same
    /// way so callers cannot probe for other owners' records.
    #[error("Record not found or UID mismatch.")]
    NotFoundOrOwnerMismatch,

    /// A storage operation failed.
    #[error("{context}: {source}")]
    Database {
        /// What the service was doing, safe to show to clients.
        context: String,
        /// The underlying backend error. Logged, never returned to clients.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Unauthorized(_) => 403,
            Error::Validation(_) => 400,
            Error::NotFoundOrOwnerMismatch => 404,
            Error::Database { .. } => 500,
        }
    }

    /// Short machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Unauthorized(_) => "unauthorized",
            Error::Validation(_) => "validation_error",
            Error::NotFoundOrOwnerMismatch => "not_found",
            Error::Database { .. } => "database_error",
        }
    }

    /// The message a client is allowed to see.
    ///
    /// Storage failures only expose their context, never the backend error.
    pub fn public_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Database { context, .. } => context.clone(),
            other => other.to_string(),
        }
    }

    /// Create a new Validation error.
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new Database error.
    pub fn database(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Database {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
