//! Spotify accounts-service client.

use crate::config::OAuthConfig;
use crate::error::{AuthError, Result};
use crate::providers::OAuthExchangeClient;
use crate::state::{DEFAULT_TOKEN_TTL_SECONDS, TokenSet};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

/// Spotify OAuth 2.0 exchange client.
///
/// Authenticates to the token endpoint with HTTP Basic client
/// credentials and posts form-encoded grants.
///
/// # Example
///
/// ```no_run
/// use vibesync_auth::config::OAuthConfig;
/// use vibesync_auth::providers::SpotifyOAuthClient;
///
/// # fn main() -> vibesync_auth::Result<()> {
/// let config = OAuthConfig::new(
///     std::env::var("SPOTIFY_CLIENT_ID").ok(),
///     std::env::var("SPOTIFY_CLIENT_SECRET").ok(),
///     std::env::var("APP_URL").ok(),
/// );
/// let client = SpotifyOAuthClient::new(config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SpotifyOAuthClient {
    config: OAuthConfig,
    http_client: Client,
}

impl SpotifyOAuthClient {
    /// Create a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if the HTTP client cannot be built.
    pub fn new(config: OAuthConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AuthError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Post a grant to the token endpoint.
    ///
    /// Returns the HTTP status on rejection so callers can pick their own
    /// error variant.
    async fn post_grant(
        &self,
        params: &[(&str, &str)],
    ) -> Result<std::result::Result<TokenSet, StatusCode>> {
        let client_id = self.config.require_client_id()?;
        let client_secret = self.config.require_client_secret()?;

        let response = self
            .http_client
            .post(self.config.token_endpoint())
            .basic_auth(client_id, Some(client_secret))
            .form(params)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                body = %error_body,
                "Spotify token endpoint rejected grant"
            );
            return Ok(Err(status));
        }

        let body: SpotifyTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::MalformedResponse(e.to_string()))?;

        Ok(Ok(body.into_token_set()?))
    }
}

impl OAuthExchangeClient for SpotifyOAuthClient {
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String> {
        let client_id = self.config.require_client_id()?;
        let scope = self.config.scopes.join(" ");

        let mut params = vec![
            ("client_id", client_id),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("state", state),
        ];

        if self.config.show_dialog {
            params.push(("show_dialog", "true"));
        }

        let query = serde_urlencoded::to_string(&params)
            .map_err(|e| AuthError::Internal(format!("Failed to build URL: {e}")))?;

        Ok(format!("{}?{query}", self.config.authorize_endpoint()))
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenSet> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        self.post_grant(&params)
            .await?
            .map_err(|status| AuthError::TokenExchangeFailed {
                status: status.as_u16(),
            })
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet> {
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ];

        self.post_grant(&params)
            .await?
            .map_err(|status| AuthError::RefreshFailed {
                status: status.as_u16(),
            })
    }
}

/// Spotify token endpoint response.
///
/// Every field is optional so a missing access token is reported as
/// [`AuthError::MissingAccessToken`] rather than a parse failure.
#[derive(Debug, Deserialize)]
struct SpotifyTokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

impl SpotifyTokenResponse {
    fn into_token_set(self) -> Result<TokenSet> {
        let access_token = self
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingAccessToken)?;

        Ok(TokenSet {
            access_token,
            refresh_token: self.refresh_token.filter(|token| !token.is_empty()),
            expires_in_seconds: self
                .expires_in
                .filter(|ttl| *ttl > 0)
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS),
        })
    }
}
