//! OAuth login, callback and logout handlers.

use super::{found, to_app_error};
use crate::config::LOGIN_PATH;
use crate::manager::CallbackParams;
use crate::providers::{OAuthExchangeClient, ResourceTransport};
use crate::router::AuthHttpState;
use axum::{
    Json,
    extract::{Query, State},
    response::Response,
};
use axum_extra::extract::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use vibesync_web::AppError;

/// Query parameters for login initiation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginQuery {
    /// Post-login destination (site-relative path, defaults to `/dashboard`).
    pub redirect_to: Option<String>,
}

/// Logout response body.
#[derive(Debug, Clone, Serialize)]
pub struct LogoutResponse {
    /// Confirmation message.
    pub message: &'static str,
}

/// Start the authorization-code flow.
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/login?redirect_to=/dashboard
/// ```
///
/// # Response
///
/// `302 Found` to the provider consent page, with the login state cookie
/// set. `500` with `{error, details}` when the client id or application
/// URL is not configured.
///
/// # Errors
///
/// Returns [`AppError`] if the authorization URL cannot be built.
#[allow(clippy::unused_async)]
pub async fn login<O, T>(
    State(state): State<AuthHttpState<O, T>>,
    mut jar: PrivateCookieJar,
    Query(query): Query<LoginQuery>,
) -> Result<(PrivateCookieJar, Response), AppError>
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
{
    match state
        .manager
        .initiate_login(&mut jar, query.redirect_to.as_deref())
    {
        Ok(url) => Ok((jar, found(url))),
        Err(e) => {
            tracing::error!(error = %e, "Cannot start OAuth login");
            Err(to_app_error(&e))
        }
    }
}

/// Complete the authorization-code flow.
///
/// # Endpoint
///
/// ```text
/// GET /api/auth/callback?code=...&state=...[&error=...]
/// ```
///
/// # Response
///
/// - Success: `302` to `{app_url}{redirect_to}?login=success` with the
///   session cookies set
/// - Failure: `302` to `{app_url}/login?error=<code>`, no session cookies
pub async fn callback<O, T>(
    State(state): State<AuthHttpState<O, T>>,
    mut jar: PrivateCookieJar,
    Query(params): Query<CallbackParams>,
) -> (PrivateCookieJar, Response)
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
{
    let app_url = state
        .manager
        .config()
        .app_url
        .clone()
        .unwrap_or_default();

    match state.manager.handle_callback(&mut jar, params).await {
        Ok(outcome) => {
            let location = format!("{app_url}{}?login=success", outcome.redirect_to);
            (jar, found(location))
        }
        Err(e) => {
            tracing::warn!(error = %e, code = e.login_error_code(), "OAuth callback failed");
            let location = format!("{app_url}{LOGIN_PATH}?error={}", e.login_error_code());
            (jar, found(location))
        }
    }
}

/// Destroy the session.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/logout
/// ```
///
/// Always succeeds, including when there is no session.
#[allow(clippy::unused_async)]
pub async fn logout<O, T>(
    State(state): State<AuthHttpState<O, T>>,
    mut jar: PrivateCookieJar,
) -> (PrivateCookieJar, Json<LogoutResponse>)
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
{
    state.manager.logout(&mut jar);
    (
        jar,
        Json(LogoutResponse {
            message: "Logged out successfully",
        }),
    )
}
