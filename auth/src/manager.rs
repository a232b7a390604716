//! Session manager.
//!
//! Orchestrates the OAuth session lifecycle:
//!
//! ```text
//! initiate_login ──► provider consent ──► handle_callback ──► Session (persisted)
//!                                                               │
//!              ensure_fresh_session ◄── every resource call ────┘
//!                     │ stale: refresh grant, persist
//!                     │ rejected: clear, ReauthRequired
//!                     ▼
//!                  logout (clear, idempotent)
//! ```
//!
//! The manager holds no per-user state. Each operation receives the
//! request's store context and works on the session persisted there.

use crate::config::OAuthConfig;
use crate::environment::AuthEnvironment;
use crate::error::{AuthError, Result};
use crate::providers::{ApiRequest, OAuthExchangeClient, ResourceTransport, SessionStore};
use crate::resources;
use crate::state::{OAuthStateToken, Session, SessionStatus, UserProfile};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Query parameters delivered to the OAuth callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackParams {
    /// Authorization code.
    pub code: Option<String>,

    /// Serialized [`OAuthStateToken`].
    pub state: Option<String>,

    /// Provider error code (e.g. `access_denied`).
    pub error: Option<String>,

    /// Provider error description.
    pub error_description: Option<String>,
}

/// Result of a successful callback.
#[derive(Debug, Clone)]
pub struct CallbackOutcome {
    /// Newly persisted session.
    pub session: Session,

    /// Post-login destination decoded from the state token.
    pub redirect_to: String,
}

/// Session lifecycle orchestrator.
pub struct SessionManager<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    config: OAuthConfig,
    env: AuthEnvironment<O, S, T>,
}

impl<O, S, T> SessionManager<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    /// Create a manager.
    #[must_use]
    pub const fn new(config: OAuthConfig, env: AuthEnvironment<O, S, T>) -> Self {
        Self { config, env }
    }

    /// OAuth configuration.
    #[must_use]
    pub const fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Environment (clients, store, clock).
    #[must_use]
    pub const fn environment(&self) -> &AuthEnvironment<O, S, T> {
        &self.env
    }

    /// Current instant according to the environment clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.env.clock.now()
    }

    // ═══════════════════════════════════════════════════════════════════
    // Login
    // ═══════════════════════════════════════════════════════════════════

    /// Build the provider authorization URL and record the login nonce.
    ///
    /// `redirect_to` is the post-login destination; anything other than a
    /// site-relative path falls back to the default landing page.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the client identifier or the
    /// application URL is not configured. Nothing is recorded in that case.
    pub fn initiate_login(&self, ctx: &mut S::Context, redirect_to: Option<&str>) -> Result<String> {
        self.config.require_client_id()?;
        let redirect_uri = self.config.redirect_uri()?;

        let state = OAuthStateToken::generate(redirect_to);
        let url = self
            .env
            .oauth
            .authorization_url(&state.encode()?, &redirect_uri)?;

        self.env.sessions.save_login_state(ctx, &state.nonce);

        tracing::info!(redirect_to = %state.redirect_to, "Initiating OAuth login");
        Ok(url)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Callback
    // ═══════════════════════════════════════════════════════════════════

    /// Complete a login from the provider's callback parameters.
    ///
    /// On success the session (tokens and profile) is persisted in one
    /// write. On any failure nothing is persisted. The recorded login
    /// nonce is consumed in every case.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The provider reported an error (`ProviderDenied`)
    /// - `code` or `state` is missing (`MissingParameters`)
    /// - The state is malformed, unknown or already used (`InvalidState`)
    /// - The token exchange or the profile fetch fails (`UpstreamAuthFailure`)
    pub async fn handle_callback(
        &self,
        ctx: &mut S::Context,
        params: CallbackParams,
    ) -> Result<CallbackOutcome> {
        // Single use, whatever the outcome
        let expected_nonce = self.env.sessions.take_login_state(ctx);

        if let Some(error) = params.error.filter(|e| !e.is_empty()) {
            tracing::warn!(error = %error, "Provider denied authorization");
            return Err(AuthError::ProviderDenied {
                error,
                description: params.error_description,
            });
        }

        let (Some(code), Some(raw_state)) = (
            params.code.filter(|c| !c.is_empty()),
            params.state.filter(|s| !s.is_empty()),
        ) else {
            tracing::warn!("Callback missing code or state");
            return Err(AuthError::MissingParameters);
        };

        let state = OAuthStateToken::decode(&raw_state)?;
        if expected_nonce.as_deref() != Some(state.nonce.as_str()) {
            tracing::warn!(
                recorded = expected_nonce.is_some(),
                "Callback state does not match an in-flight login"
            );
            return Err(AuthError::InvalidState);
        }

        let redirect_uri = self.config.redirect_uri()?;

        let tokens = self
            .env
            .oauth
            .exchange_code(&code, &redirect_uri)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Authorization code exchange failed");
                e.into_callback_failure()
            })?;

        let profile = self.fetch_profile(&tokens.access_token).await.map_err(|e| {
            tracing::error!(error = %e, "Profile fetch after code exchange failed");
            e.into_callback_failure()
        })?;

        let session = Session::from_tokens(tokens, self.now(), Some(profile));
        self.env
            .sessions
            .save(ctx, &session)
            .map_err(AuthError::into_callback_failure)?;

        tracing::info!(
            user_id = session.user_profile.as_ref().map_or("", |p| p.id.as_str()),
            "OAuth login completed"
        );

        Ok(CallbackOutcome {
            session,
            redirect_to: state.redirect_to,
        })
    }

    /// Fetch `/me` with a bare access token (no refresh).
    async fn fetch_profile(&self, access_token: &str) -> Result<UserProfile> {
        let response = self
            .env
            .transport
            .send(&ApiRequest::get("/me"), access_token)
            .await?;

        if !response.is_success() {
            return Err(AuthError::UpstreamError {
                status: Some(response.status),
                message: response
                    .error_message()
                    .unwrap_or_else(|| "Profile request failed".to_string()),
            });
        }

        resources::parse_profile(&response)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Freshness
    // ═══════════════════════════════════════════════════════════════════

    /// Guarantee `session` carries a usable access token.
    ///
    /// A usable session is left untouched without any network call. A stale
    /// one is refreshed exactly once and persisted.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - There is no refresh token, or the provider rejects it
    ///   (`ReauthRequired`; the store has been cleared)
    /// - The token endpoint cannot be reached (`UpstreamError`; the session
    ///   is left in place)
    pub async fn ensure_fresh_session(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
    ) -> Result<()> {
        let refresh_token = match session.status(self.now()) {
            SessionStatus::Usable => return Ok(()),
            SessionStatus::Invalid => {
                tracing::info!("Session expired without refresh token");
                self.env.sessions.clear(ctx);
                return Err(AuthError::ReauthRequired);
            }
            SessionStatus::Stale => match &session.refresh_token {
                Some(token) => token.clone(),
                None => return Err(AuthError::ReauthRequired),
            },
        };

        match self.env.oauth.refresh_token(&refresh_token).await {
            Ok(tokens) => {
                session.apply_refresh(tokens, self.now());
                self.env.sessions.save(ctx, session)?;
                tracing::debug!(expires_at = %session.expires_at, "Access token refreshed");
                Ok(())
            }
            Err(AuthError::RefreshFailed { status }) => {
                tracing::warn!(status, "Refresh token rejected, discarding session");
                self.env.sessions.clear(ctx);
                Err(AuthError::ReauthRequired)
            }
            Err(e) => {
                tracing::error!(error = %e, "Token refresh did not complete");
                Err(e.into_upstream())
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Persistence
    // ═══════════════════════════════════════════════════════════════════

    /// Load the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub fn current_session(&self, ctx: &S::Context) -> Result<Option<Session>> {
        self.env.sessions.load(ctx)
    }

    /// Replace the cached profile snapshot and persist the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionCodec`] if the session cannot be encoded.
    pub fn remember_profile(
        &self,
        ctx: &mut S::Context,
        session: &mut Session,
        profile: UserProfile,
    ) -> Result<()> {
        session.user_profile = Some(profile);
        self.env.sessions.save(ctx, session)
    }

    /// Destroy all persisted session material. Idempotent.
    pub fn logout(&self, ctx: &mut S::Context) {
        self.env.sessions.clear(ctx);
        tracing::info!("Session cleared");
    }
}
