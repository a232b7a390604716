//! Error types for the OAuth session lifecycle.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for login, session refresh and authenticated provider calls.
///
/// Variants are grouped by the stage that produces them. Callback-stage
/// failures map onto a short login error code (see [`AuthError::login_error_code`])
/// so the presentation layer can redirect with a reason instead of a raw 500.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Configuration
    // ═══════════════════════════════════════════════════════════

    /// A required secret or URL is not configured.
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ═══════════════════════════════════════════════════════════
    // Callback Stage
    // ═══════════════════════════════════════════════════════════

    /// The provider reported an error instead of an authorization code.
    #[error("Provider denied authorization: {error}")]
    ProviderDenied {
        /// Error code returned by the provider (e.g. `access_denied`).
        error: String,
        /// Optional human-readable description from the provider.
        description: Option<String>,
    },

    /// `code` or `state` missing from the callback query.
    #[error("Missing callback parameters")]
    MissingParameters,

    /// State token absent from the store, malformed, or not matching.
    #[error("Invalid OAuth state parameter")]
    InvalidState,

    /// Token exchange or profile fetch failed during the callback.
    #[error("Upstream authentication failure: {0}")]
    UpstreamAuthFailure(String),

    // ═══════════════════════════════════════════════════════════
    // Token Endpoint
    // ═══════════════════════════════════════════════════════════

    /// Authorization-code exchange returned a non-success status.
    #[error("Token exchange failed with status {status}")]
    TokenExchangeFailed {
        /// HTTP status returned by the token endpoint.
        status: u16,
    },

    /// Token endpoint answered successfully but without an access token.
    #[error("Token response did not contain an access token")]
    MissingAccessToken,

    /// Refresh grant rejected by the provider.
    #[error("Token refresh failed with status {status}")]
    RefreshFailed {
        /// HTTP status returned by the token endpoint.
        status: u16,
    },

    // ═══════════════════════════════════════════════════════════
    // Session Errors
    // ═══════════════════════════════════════════════════════════

    /// Credentials are expired or revoked and cannot be renewed.
    ///
    /// The session has been discarded; the user must log in again.
    #[error("Re-authentication required")]
    ReauthRequired,

    /// Persisted session material could not be encoded or decoded.
    #[error("Session codec error: {0}")]
    SessionCodec(String),

    // ═══════════════════════════════════════════════════════════
    // Provider Resource API
    // ═══════════════════════════════════════════════════════════

    /// Non-authentication failure from the provider (4xx/5xx other than 401,
    /// network failure, unparseable body).
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    UpstreamError {
        /// HTTP status, if a response was received at all.
        status: Option<u16>,
        /// Description for logs and user-facing messages.
        message: String,
    },

    /// Network-level failure (connect, timeout, TLS) talking to the provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A provider response body did not match the documented shape.
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Internal error (should not be exposed to users).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Error code appended to the login page redirect (`/login?error=<code>`).
    ///
    /// # Examples
    ///
    /// ```
    /// # use vibesync_auth::AuthError;
    /// assert_eq!(AuthError::MissingParameters.login_error_code(), "missing_params");
    /// assert_eq!(AuthError::InvalidState.login_error_code(), "invalid_state");
    /// ```
    #[must_use]
    pub const fn login_error_code(&self) -> &'static str {
        match self {
            Self::ProviderDenied { .. } => "oauth_error",
            Self::MissingParameters => "missing_params",
            Self::InvalidState => "invalid_state",
            _ => "callback_failed",
        }
    }

    /// Returns `true` if the caller must discard the session and force a login.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::ReauthRequired)
    }

    /// Returns `true` if this error comes from the callback stage.
    #[must_use]
    pub const fn is_callback_error(&self) -> bool {
        matches!(
            self,
            Self::ProviderDenied { .. }
                | Self::MissingParameters
                | Self::InvalidState
                | Self::UpstreamAuthFailure(_)
        )
    }

    /// Convert a token/profile failure into the callback-stage taxonomy.
    pub(crate) fn into_callback_failure(self) -> Self {
        if self.is_callback_error() {
            self
        } else {
            Self::UpstreamAuthFailure(self.to_string())
        }
    }

    /// Convert a transport/parse failure into the resource-API taxonomy.
    pub(crate) fn into_upstream(self) -> Self {
        match self {
            Self::Transport(message) | Self::MalformedResponse(message) => Self::UpstreamError {
                status: None,
                message,
            },
            other => other,
        }
    }
}
