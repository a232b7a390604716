//! Current-user handler.

use super::to_app_error;
use crate::error::AuthError;
use crate::providers::{OAuthExchangeClient, ResourceTransport};
use crate::router::AuthHttpState;
use crate::state::{SessionStatus, UserProfile};
use axum::{Json, extract::State};
use axum_extra::extract::PrivateCookieJar;
use serde::Serialize;
use vibesync_web::AppError;

/// Avatar size reported for the cached image.
const AVATAR_SIZE: u32 = 300;

/// `GET /api/user` body.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// Current user.
    pub user: UserView,
}

/// Public view of a profile.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserView {
    /// Provider user id.
    pub id: String,
    /// Display name.
    pub name: Option<String>,
    /// Email.
    pub email: Option<String>,
    /// Country code, `"Unknown"` when not shared.
    pub country: String,
    /// Follower count.
    pub followers: u64,
    /// Avatar images.
    pub images: Vec<ImageView>,
    /// Subscription tier, `"free"` when not reported.
    pub product: String,
}

/// Avatar image.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ImageView {
    /// Image URL.
    pub url: String,
    /// Height in pixels.
    pub height: u32,
    /// Width in pixels.
    pub width: u32,
}

impl From<&UserProfile> for UserView {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.display_name.clone(),
            email: profile.email.clone(),
            country: profile
                .country
                .clone()
                .unwrap_or_else(|| "Unknown".to_string()),
            followers: profile.followers,
            images: profile
                .image_url
                .iter()
                .map(|url| ImageView {
                    url: url.clone(),
                    height: AVATAR_SIZE,
                    width: AVATAR_SIZE,
                })
                .collect(),
            product: profile
                .product
                .clone()
                .unwrap_or_else(|| "free".to_string()),
        }
    }
}

/// Return the authenticated user.
///
/// Serves the cached profile snapshot without any provider call when
/// present and the session is usable or renewable; otherwise fetches it
/// from the provider (refreshing first if needed) and caches it.
///
/// # Endpoint
///
/// ```text
/// GET /api/user
/// ```
///
/// # Errors
///
/// - `401` when there is no session or it cannot be renewed
/// - `502` when the provider fails
pub async fn current_user<O, T>(
    State(state): State<AuthHttpState<O, T>>,
    mut jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Json<UserResponse>), (PrivateCookieJar, AppError)>
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
{
    let mut session = match state.manager.current_session(&jar) {
        Ok(Some(session)) => session,
        Ok(None) => return Err((jar, AppError::unauthorized("Not authenticated"))),
        Err(e) => return Err((jar, to_app_error(&e))),
    };

    // A cached snapshot is served as is while the session can still be renewed
    let renewable = session.status(state.manager.now()) != SessionStatus::Invalid;
    if let Some(profile) = session.user_profile.as_ref().filter(|_| renewable) {
        let user = UserView::from(profile);
        return Ok((jar, Json(UserResponse { user })));
    }

    if let Err(e) = state.manager.ensure_fresh_session(&mut jar, &mut session).await {
        return Err((jar, unauthenticated_or(e)));
    }

    let profile = match state.resources.current_user(&mut jar, &mut session).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to fetch user profile");
            return Err((jar, unauthenticated_or(e)));
        }
    };

    let user = UserView::from(&profile);
    if let Err(e) = state
        .manager
        .remember_profile(&mut jar, &mut session, profile)
    {
        tracing::warn!(error = %e, "Could not cache user profile");
    }

    Ok((jar, Json(UserResponse { user })))
}

fn unauthenticated_or(err: AuthError) -> AppError {
    if err.requires_reauth() {
        AppError::unauthorized("Not authenticated")
    } else {
        to_app_error(&err)
    }
}
