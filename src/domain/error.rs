//! Error types for the docseek plugin.
//!
//! Two families live here. [`DocseekError`] covers plugin-level failures
//! (configuration, themes, I/O) and backs the crate-wide [`Result`] alias.
//! [`ProviderError`] describes a failed call to the remote search service; it
//! never propagates as a `Result` error out of the event handler but is stored
//! in the query state and rendered inline.

use thiserror::Error;

/// The main error type for docseek plugin operations.
///
/// # Examples
///
/// ```
/// use docseek::domain::DocseekError;
///
/// fn validate() -> Result<(), DocseekError> {
///     Err(DocseekError::Config("missing site_key".to_string()))
/// }
/// assert!(validate().is_err());
/// ```
#[derive(Debug, Error)]
pub enum DocseekError {
    /// Configuration is invalid or missing.
    ///
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Theme parsing or loading failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a single request to the remote search service.
///
/// Stored in [`QueryState::error`](crate::query::QueryState) when the most
/// recent dispatch settles unsuccessfully. Not retried: the next keystroke
/// schedules a fresh request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The service answered with a non-success HTTP status.
    #[error("search service returned {code}: {message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Message extracted from the response body, if any.
        message: String,
    },

    /// The response body could not be decoded into a result set.
    #[error("malformed search response: {0}")]
    Decode(String),

    /// The site key is missing from the plugin configuration.
    #[error("search provider is not configured (set site_key)")]
    NotConfigured,
}

/// A specialized `Result` type for docseek operations.
pub type Result<T> = std::result::Result<T, DocseekError>;
