//! Authentication configuration.
//!
//! Configuration values are provided by the application, not hardcoded.
//! Credentials are optional at construction time: a missing client id,
//! client secret or application URL is reported as
//! [`AuthError::Configuration`] when a login is attempted, so a
//! misconfigured deployment serves a setup-error response instead of
//! refusing to start.

use crate::error::{AuthError, Result};
use std::time::Duration;

/// Path of the OAuth callback route, relative to the application URL.
pub const CALLBACK_PATH: &str = "/api/auth/callback";

/// Post-login destination used when the caller does not ask for one.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// Login page that receives `?error=<code>` on callback failures.
pub const LOGIN_PATH: &str = "/login";

/// Full permission set requested up front on every login.
///
/// Profile read, playback read/modify, library read/modify and playlist
/// read/modify, plus listening history used for recommendations.
pub const DEFAULT_SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-library-read",
    "user-library-modify",
    "playlist-read-private",
    "playlist-modify-private",
    "playlist-modify-public",
    "user-top-read",
    "user-read-recently-played",
];

/// OAuth client and provider endpoint configuration.
#[derive(Clone)]
pub struct OAuthConfig {
    /// OAuth client identifier.
    pub client_id: Option<String>,

    /// OAuth client secret (keep confidential).
    pub client_secret: Option<String>,

    /// Public base URL of this application (e.g., `https://app.example.com`).
    ///
    /// The redirect URI is `{app_url}/api/auth/callback`.
    pub app_url: Option<String>,

    /// Scopes requested at login.
    pub scopes: Vec<String>,

    /// Force the provider's consent dialog on every login.
    ///
    /// Default: false
    pub show_dialog: bool,

    /// Base URL of the provider's accounts service (authorize + token).
    pub accounts_url: String,

    /// Base URL of the provider's resource API.
    pub api_url: String,

    /// Timeout applied to every outbound request.
    ///
    /// Default: 10 seconds
    pub http_timeout: Duration,
}

impl OAuthConfig {
    /// Create configuration with the given credentials and default endpoints.
    #[must_use]
    pub fn new(
        client_id: Option<String>,
        client_secret: Option<String>,
        app_url: Option<String>,
    ) -> Self {
        Self {
            client_id: non_blank(client_id),
            client_secret: non_blank(client_secret),
            app_url: non_blank(app_url).map(|url| url.trim_end_matches('/').to_string()),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
            show_dialog: false,
            accounts_url: "https://accounts.spotify.com".to_string(),
            api_url: "https://api.spotify.com/v1".to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }

    /// Set custom scopes.
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Force the consent dialog on every login.
    #[must_use]
    pub const fn with_show_dialog(mut self, show: bool) -> Self {
        self.show_dialog = show;
        self
    }

    /// Override the accounts service base URL.
    #[must_use]
    pub fn with_accounts_url(mut self, url: impl Into<String>) -> Self {
        self.accounts_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the resource API base URL.
    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the outbound request timeout.
    #[must_use]
    pub const fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Client identifier, or a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the client id is not set.
    pub fn require_client_id(&self) -> Result<&str> {
        self.client_id
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("SPOTIFY_CLIENT_ID is not set".to_string()))
    }

    /// Client secret, or a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the client secret is not set.
    pub fn require_client_secret(&self) -> Result<&str> {
        self.client_secret.as_deref().ok_or_else(|| {
            AuthError::Configuration("SPOTIFY_CLIENT_SECRET is not set".to_string())
        })
    }

    /// Application base URL, or a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the application URL is not set.
    pub fn require_app_url(&self) -> Result<&str> {
        self.app_url
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("APP_URL is not set".to_string()))
    }

    /// Redirect URI registered with the provider.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the application URL is not set.
    pub fn redirect_uri(&self) -> Result<String> {
        Ok(format!("{}{CALLBACK_PATH}", self.require_app_url()?))
    }

    /// Authorization endpoint.
    #[must_use]
    pub fn authorize_endpoint(&self) -> String {
        format!("{}/authorize", self.accounts_url)
    }

    /// Token endpoint.
    #[must_use]
    pub fn token_endpoint(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .field("app_url", &self.app_url)
            .field("scopes", &self.scopes)
            .field("show_dialog", &self.show_dialog)
            .field("accounts_url", &self.accounts_url)
            .field("api_url", &self.api_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

/// Cookie persistence settings.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    /// Set the `Secure` flag (production).
    ///
    /// Default: true
    pub secure: bool,

    /// Lifetime of the refresh-token cookie.
    ///
    /// Default: 30 days
    pub refresh_token_max_age: chrono::Duration,

    /// Lifetime of the cached profile cookie.
    ///
    /// Default: 24 hours
    pub user_info_max_age: chrono::Duration,

    /// Lifetime of the in-flight login state cookie.
    ///
    /// Default: 10 minutes
    pub login_state_max_age: chrono::Duration,
}

impl CookieSettings {
    /// Create settings with the given `Secure` flag and default lifetimes.
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self {
            secure,
            refresh_token_max_age: chrono::Duration::days(30),
            user_info_max_age: chrono::Duration::hours(24),
            login_state_max_age: chrono::Duration::minutes(10),
        }
    }

    /// Set the refresh-token cookie lifetime.
    #[must_use]
    pub const fn with_refresh_token_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.refresh_token_max_age = max_age;
        self
    }

    /// Set the profile cookie lifetime.
    #[must_use]
    pub const fn with_user_info_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.user_info_max_age = max_age;
        self
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self::new(true)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
