//! # VibeSync Authentication
//!
//! OAuth 2.0 authorization-code login against Spotify, with the session
//! kept in encrypted browser cookies and every provider call routed through
//! a freshness check.
//!
//! ## Components
//!
//! - **Token Store** ([`providers::SessionStore`], [`stores::CookieSessionStore`])
//! - **OAuth Exchange Client** ([`providers::OAuthExchangeClient`], [`providers::SpotifyOAuthClient`])
//! - **Session Manager** ([`SessionManager`]): login, callback, refresh-on-demand, logout
//! - **Authenticated API Gateway** ([`ApiGateway`]): bearer auth, one refresh-and-retry on 401
//! - **Provider resources** ([`resources::SpotifyResources`]): profile, search, playlists
//!
//! ## Session states
//!
//! ```text
//!            now < expires_at          expired, refresh token         no refresh token
//! Usable ◄──────────────────── Stale ─────────────────────────► Invalid (discard)
//!   ▲        refresh succeeds    │      refresh rejected
//!   └────────────────────────────┘──────────────────────────────► Invalid
//! ```
//!
//! ## Example: OAuth login
//!
//! ```rust,ignore
//! use vibesync_auth::*;
//!
//! // 1. Redirect the browser to the provider
//! let url = manager.initiate_login(&mut jar, Some("/dashboard"))?;
//!
//! // 2. Provider redirects back to /api/auth/callback
//! let outcome = manager.handle_callback(&mut jar, params).await?;
//!
//! // 3. Later requests go through the gateway
//! let response = gateway.call(&mut jar, &mut session, &ApiRequest::get("/me")).await?;
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod environment;
pub mod error;
pub mod gateway;
pub mod manager;
pub mod providers;
pub mod resources;
pub mod state;
pub mod stores;

// HTTP handlers (requires axum feature)
#[cfg(feature = "axum")]
pub mod handlers;
#[cfg(feature = "axum")]
pub mod router;

// Mocks for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use config::{CookieSettings, OAuthConfig};
pub use environment::{AuthEnvironment, Clock, SystemClock};
pub use error::{AuthError, Result};
pub use gateway::ApiGateway;
pub use manager::{CallbackOutcome, CallbackParams, SessionManager};
pub use providers::{ApiRequest, ApiResponse};
pub use state::{OAuthStateToken, Session, SessionStatus, TokenSet, UserProfile};

#[cfg(feature = "axum")]
pub use router::{AuthHttpState, CookieSessionManager, auth_router};
