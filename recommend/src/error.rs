//! Error types for the recommendation service.

use thiserror::Error;

/// Result type for recommendation operations.
pub type Result<T> = std::result::Result<T, RecommendError>;

/// Errors that can occur while producing song suggestions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecommendError {
    // ═══════════════════════════════════════════════════════════════════════
    // Configuration / input
    // ═══════════════════════════════════════════════════════════════════════
    /// No API key configured for the language model.
    #[error("Missing ANTHROPIC_API_KEY")]
    MissingApiKey,

    /// Request carries neither a mood nor a genre.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ═══════════════════════════════════════════════════════════════════════
    // Upstream
    // ═══════════════════════════════════════════════════════════════════════
    /// HTTP request failed (connect, timeout, TLS).
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Rate limited - too many requests.
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid API key.
    #[error("Unauthorized - invalid API key")]
    Unauthorized,

    /// API returned an error status.
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Response could not be parsed.
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The model returned no usable suggestions.
    #[error("No usable song suggestions, try a different mood")]
    Unavailable,
}

impl RecommendError {
    /// Returns `true` if the caller sent a bad request.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}
