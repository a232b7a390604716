//! Authentication router composition.

use crate::gateway::ApiGateway;
use crate::handlers::{oauth, user};
use crate::manager::SessionManager;
use crate::providers::{OAuthExchangeClient, ResourceTransport};
use crate::resources::SpotifyResources;
use crate::stores::CookieSessionStore;
use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

/// Session manager persisting to browser cookies.
pub type CookieSessionManager<O, T> = SessionManager<O, CookieSessionStore, T>;

/// Shared state of the authentication routes.
pub struct AuthHttpState<O, T>
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
{
    /// Session manager.
    pub manager: Arc<CookieSessionManager<O, T>>,

    /// Provider resources (through the gateway).
    pub resources: SpotifyResources<O, CookieSessionStore, T>,

    /// Cookie encryption key.
    pub key: Key,
}

impl<O, T> AuthHttpState<O, T>
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
{
    /// Build the state from a manager and a cookie key.
    #[must_use]
    pub fn new(manager: Arc<CookieSessionManager<O, T>>, key: Key) -> Self {
        let resources = SpotifyResources::new(ApiGateway::new(Arc::clone(&manager)));
        Self {
            manager,
            resources,
            key,
        }
    }
}

impl<O, T> Clone for AuthHttpState<O, T>
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
{
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
            resources: self.resources.clone(),
            key: self.key.clone(),
        }
    }
}

impl<O, T> FromRef<AuthHttpState<O, T>> for Key
where
    O: OAuthExchangeClient,
    T: ResourceTransport,
{
    fn from_ref(state: &AuthHttpState<O, T>) -> Self {
        state.key.clone()
    }
}

/// Create the authentication router.
///
/// # Routes
///
/// - `GET /api/auth/login` - Redirect to the provider consent page
/// - `GET /api/auth/callback` - Complete login, set session cookies
/// - `POST /api/auth/logout` - Clear session cookies
/// - `GET /api/user` - Current user profile
///
/// # Example
///
/// ```rust,ignore
/// let state = AuthHttpState::new(Arc::new(manager), key);
/// let app = Router::new().merge(auth_router(state));
/// ```
pub fn auth_router<O, T>(state: AuthHttpState<O, T>) -> Router
where
    O: OAuthExchangeClient + 'static,
    T: ResourceTransport + 'static,
{
    Router::new()
        .route("/api/auth/login", get(oauth::login::<O, T>))
        .route("/api/auth/callback", get(oauth::callback::<O, T>))
        .route("/api/auth/logout", post(oauth::logout::<O, T>))
        .route("/api/user", get(user::current_user::<O, T>))
        .with_state(state)
}
