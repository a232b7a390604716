//! Authenticated API gateway.
//!
//! Every call to the provider resource API goes through [`ApiGateway::call`],
//! which routes through the freshness check first and handles a rejected
//! token with at most one refresh-and-retry cycle.

use crate::error::{AuthError, Result};
use crate::manager::SessionManager;
use crate::providers::{
    ApiRequest, ApiResponse, OAuthExchangeClient, ResourceTransport, SessionStore,
};
use crate::state::Session;
use std::sync::Arc;

/// Gateway to the provider resource API.
pub struct ApiGateway<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    manager: Arc<SessionManager<O, S, T>>,
}

impl<O, S, T> Clone for ApiGateway<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<O, S, T> ApiGateway<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    /// Create a gateway over a session manager.
    #[must_use]
    pub const fn new(manager: Arc<SessionManager<O, S, T>>) -> Self {
        Self { manager }
    }

    /// Session manager behind this gateway.
    #[must_use]
    pub fn manager(&self) -> &SessionManager<O, S, T> {
        &self.manager
    }

    /// Issue `request` on behalf of `session`.
    ///
    /// 1. Ensure the session is fresh (refreshing if stale).
    /// 2. Send with the current access token.
    /// 3. On 401, invalidate the access token, refresh, and retry once. A
    ///    second 401, or a failed refresh, discards the session.
    /// 4. Any other non-success status is returned as `UpstreamError`
    ///    without retry.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The session cannot be renewed (`ReauthRequired`)
    /// - The provider answers with a non-success status, or cannot be
    ///   reached (`UpstreamError`)
    pub async fn call(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
        request: &ApiRequest,
    ) -> Result<ApiResponse> {
        self.manager.ensure_fresh_session(ctx, session).await?;

        let response = self.send(request, &session.access_token).await?;
        if !response.is_unauthorized() {
            return Self::check_status(request, response);
        }

        tracing::warn!(path = %request.path, "Access token rejected, refreshing once");
        session.invalidate_access();

        if let Err(e) = self.manager.ensure_fresh_session(ctx, session).await {
            tracing::warn!(error = %e, "Refresh after rejection failed");
            self.manager.logout(ctx);
            return Err(AuthError::ReauthRequired);
        }

        let retry = self.send(request, &session.access_token).await?;
        if retry.is_unauthorized() {
            tracing::warn!(path = %request.path, "Refreshed token rejected, discarding session");
            self.manager.logout(ctx);
            return Err(AuthError::ReauthRequired);
        }

        Self::check_status(request, retry)
    }

    async fn send(&self, request: &ApiRequest, access_token: &str) -> Result<ApiResponse> {
        self.manager
            .environment()
            .transport
            .send(request, access_token)
            .await
            .map_err(AuthError::into_upstream)
    }

    fn check_status(request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse> {
        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .error_message()
            .unwrap_or_else(|| format!("{} {} failed", request.method, request.path));

        tracing::warn!(
            path = %request.path,
            status = response.status,
            message = %message,
            "Provider request failed"
        );

        Err(AuthError::UpstreamError {
            status: Some(response.status),
            message,
        })
    }
}
