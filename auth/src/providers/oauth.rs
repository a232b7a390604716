//! OAuth exchange client trait.

use crate::error::Result;
use crate::state::TokenSet;
use std::future::Future;

/// Token-endpoint client.
///
/// Isolates token semantics (endpoint, client authentication scheme,
/// field names) from session lifecycle policy.
pub trait OAuthExchangeClient: Send + Sync {
    /// Build the provider authorization URL.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`](crate::AuthError::Configuration)
    /// if the client identifier is not configured.
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String>;

    /// Exchange an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider answers with a non-success status (`TokenExchangeFailed`)
    /// - The response carries no access token (`MissingAccessToken`)
    /// - The request cannot be sent (`Transport`)
    fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> impl Future<Output = Result<TokenSet>> + Send;

    /// Obtain a new access token with a refresh token.
    ///
    /// A refresh token in the result is optional; when absent the caller
    /// keeps the one it already has.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider rejects the grant (`RefreshFailed`)
    /// - The response carries no access token (`MissingAccessToken`)
    /// - The request cannot be sent (`Transport`)
    fn refresh_token(&self, refresh_token: &str)
    -> impl Future<Output = Result<TokenSet>> + Send;
}
