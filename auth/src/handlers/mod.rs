//! HTTP handlers for authentication endpoints.
//!
//! Handlers work on the request's [`PrivateCookieJar`](axum_extra::extract::PrivateCookieJar)
//! and return it so session changes reach the browser as `Set-Cookie`
//! headers.

pub mod oauth;
pub mod user;

use crate::error::AuthError;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use vibesync_web::AppError;

/// Map an authentication error onto a JSON error response.
///
/// Callback-stage errors never reach this function; the callback handler
/// turns them into login-page redirects.
#[must_use]
pub fn to_app_error(err: &AuthError) -> AppError {
    match err {
        AuthError::Configuration(details) => {
            AppError::internal("Missing configuration").with_details(details.clone())
        }
        AuthError::ReauthRequired | AuthError::MissingAccessToken => {
            AppError::unauthorized("Re-authentication required")
                .with_details("Your session has expired. Please log in again.")
        }
        AuthError::UpstreamError { message, .. } => {
            AppError::bad_gateway("Provider request failed").with_details(message.clone())
        }
        AuthError::Transport(message) | AuthError::MalformedResponse(message) => {
            AppError::bad_gateway("Provider request failed").with_details(message.clone())
        }
        other => AppError::internal("Internal server error").with_details(other.to_string()),
    }
}

/// `302 Found` to `location`.
pub(crate) fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
