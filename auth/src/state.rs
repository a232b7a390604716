//! Session state types.
//!
//! All types are `Clone` and serializable so a session can be persisted
//! in a cookie (or any other opaque blob) and reloaded unchanged.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_LANDING_PATH;
use crate::error::{AuthError, Result};

/// Token lifetime assumed when the provider omits `expires_in`.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

const STATE_NONCE_LEN: usize = 32;

// ═══════════════════════════════════════════════════════════════════════
// Token Endpoint Results
// ═══════════════════════════════════════════════════════════════════════

/// Result of an authorization-code exchange or a refresh grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    /// Access token for resource API calls.
    pub access_token: String,

    /// Refresh token, when the provider issued (or rotated) one.
    pub refresh_token: Option<String>,

    /// Provider-reported lifetime of the access token.
    pub expires_in_seconds: i64,
}

impl TokenSet {
    /// Absolute expiry of the access token when issued at `issued_at`.
    #[must_use]
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        let ttl = if self.expires_in_seconds > 0 {
            self.expires_in_seconds
        } else {
            DEFAULT_TOKEN_TTL_SECONDS
        };
        issued_at + Duration::seconds(ttl)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// User Profile
// ═══════════════════════════════════════════════════════════════════════

/// Profile snapshot of the authenticated user.
///
/// Informational only; nothing in the session lifecycle depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider user id.
    pub id: String,

    /// Display name.
    pub display_name: Option<String>,

    /// Account email.
    pub email: Option<String>,

    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,

    /// Follower count.
    #[serde(default)]
    pub followers: u64,

    /// Avatar URL (first image reported by the provider).
    pub image_url: Option<String>,

    /// Subscription tier (`free`, `premium`, ...).
    pub product: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// Session
// ═══════════════════════════════════════════════════════════════════════

/// Usability of a session at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Access token present and not expired.
    Usable,
    /// Access token expired (or missing) but a refresh token is available.
    Stale,
    /// Neither a live access token nor a refresh token; discard.
    Invalid,
}

/// Authenticated state for one browser.
///
/// Created at a successful callback, mutated in place on refresh, and
/// destroyed on logout or on an irrecoverable 401.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Access token (secret).
    pub access_token: String,

    /// Refresh token (secret), absent when the provider did not issue one.
    pub refresh_token: Option<String>,

    /// Instant at which the access token stops being accepted.
    pub expires_at: DateTime<Utc>,

    /// Cached profile snapshot.
    pub user_profile: Option<UserProfile>,
}

impl Session {
    /// Build a session from a fresh token set.
    #[must_use]
    pub fn from_tokens(
        tokens: TokenSet,
        issued_at: DateTime<Utc>,
        user_profile: Option<UserProfile>,
    ) -> Self {
        let expires_at = tokens.expires_at(issued_at);
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at,
            user_profile,
        }
    }

    /// Classify the session at `now`.
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> SessionStatus {
        if !self.access_token.is_empty() && now < self.expires_at {
            SessionStatus::Usable
        } else if self.refresh_token.is_some() {
            SessionStatus::Stale
        } else {
            SessionStatus::Invalid
        }
    }

    /// Returns `true` if the access token can be used at `now`.
    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == SessionStatus::Usable
    }

    /// Apply the result of a refresh grant.
    ///
    /// The refresh token is replaced only when the provider rotated it.
    pub fn apply_refresh(&mut self, tokens: TokenSet, now: DateTime<Utc>) {
        self.expires_at = tokens.expires_at(now);
        self.access_token = tokens.access_token;
        if let Some(rotated) = tokens.refresh_token {
            self.refresh_token = Some(rotated);
        }
    }

    /// Mark the access token as no longer trusted.
    ///
    /// Used when the provider rejects a token the session believed fresh.
    pub fn invalidate_access(&mut self) {
        self.expires_at = DateTime::<Utc>::UNIX_EPOCH;
    }

    /// Remaining lifetime of the access token at `now` (zero when expired).
    #[must_use]
    pub fn remaining_ttl(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).max(Duration::zero())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("user_profile", &self.user_profile)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// OAuth State Token
// ═══════════════════════════════════════════════════════════════════════

/// Correlation value round-tripped through the authorization redirect.
///
/// Carries a random nonce (matched against the value recorded at login)
/// and the post-login destination path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthStateToken {
    /// Random nonce.
    pub nonce: String,

    /// Post-login destination (site-relative path).
    #[serde(rename = "redirectTo")]
    pub redirect_to: String,
}

impl OAuthStateToken {
    /// Generate a token with a fresh nonce.
    ///
    /// Destinations that are not site-relative paths fall back to the
    /// default landing path.
    #[must_use]
    pub fn generate(redirect_to: Option<&str>) -> Self {
        let nonce = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(STATE_NONCE_LEN)
            .map(char::from)
            .collect();

        let redirect_to = redirect_to
            .filter(|path| is_site_relative(path))
            .unwrap_or(DEFAULT_LANDING_PATH)
            .to_string();

        Self { nonce, redirect_to }
    }

    /// Serialize for the `state` query parameter (base64url JSON).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Internal`] if serialization fails.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)
            .map_err(|e| AuthError::Internal(format!("Failed to encode state: {e}")))?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    /// Parse a `state` query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidState`] if the value is not valid
    /// base64url JSON, the nonce is empty, or the destination is not a
    /// site-relative path.
    pub fn decode(raw: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.trim())
            .map_err(|_| AuthError::InvalidState)?;
        let token: Self = serde_json::from_slice(&bytes).map_err(|_| AuthError::InvalidState)?;

        if token.nonce.is_empty() || !is_site_relative(&token.redirect_to) {
            return Err(AuthError::InvalidState);
        }

        Ok(token)
    }
}

/// A path on this site: starts with `/` but is not protocol-relative.
fn is_site_relative(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}
