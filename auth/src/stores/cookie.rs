//! Cookie-backed session store.
//!
//! Session material is written to an encrypted and authenticated cookie
//! jar (`axum-extra`'s [`PrivateCookieJar`]), so the browser holds the
//! only durable copy and the server keeps no per-user state.
//!
//! # Cookies
//!
//! | Name            | Content                          | Max-Age              |
//! |-----------------|----------------------------------|----------------------|
//! | `access_token`  | JSON `{token, expires_at}`       | remaining token TTL  |
//! | `refresh_token` | raw refresh token                | 30 days              |
//! | `user_info`     | JSON profile snapshot            | 24 hours             |
//! | `oauth_state`   | nonce of the in-flight login     | 10 minutes           |
//!
//! All cookies are `HttpOnly`, `SameSite=Lax` and `Secure` when configured.
//! The login state cookie is scoped to `/api/auth`; the others to `/`.

use crate::config::CookieSettings;
use crate::environment::{Clock, SystemClock};
use crate::error::{AuthError, Result};
use crate::providers::SessionStore;
use crate::state::{Session, UserProfile};
use axum_extra::extract::PrivateCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Access token cookie name.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Refresh token cookie name.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
/// Profile snapshot cookie name.
pub const USER_INFO_COOKIE: &str = "user_info";
/// In-flight login state cookie name.
pub const LOGIN_STATE_COOKIE: &str = "oauth_state";

const SESSION_PATH: &str = "/";
const LOGIN_STATE_PATH: &str = "/api/auth";

/// Access token plus its absolute expiry.
#[derive(Debug, Serialize, Deserialize)]
struct AccessTokenCookie {
    token: String,
    expires_at: DateTime<Utc>,
}

/// Session store over a [`PrivateCookieJar`].
#[derive(Clone)]
pub struct CookieSessionStore {
    settings: CookieSettings,
    clock: Arc<dyn Clock>,
}

impl CookieSessionStore {
    /// Create a store with the given cookie settings.
    #[must_use]
    pub fn new(settings: CookieSettings) -> Self {
        Self {
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used to compute the access cookie lifetime.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Cookie settings.
    #[must_use]
    pub const fn settings(&self) -> &CookieSettings {
        &self.settings
    }

    fn build_cookie(
        &self,
        name: &'static str,
        value: String,
        path: &'static str,
        max_age: chrono::Duration,
    ) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.settings.secure)
            .same_site(SameSite::Lax)
            .path(path)
            .max_age(time::Duration::seconds(max_age.num_seconds().max(0)))
            .build()
    }

    fn removal_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
        Cookie::build((name, "")).path(path).build()
    }

    fn read_access(jar: &PrivateCookieJar) -> Option<AccessTokenCookie> {
        let cookie = jar.get(ACCESS_TOKEN_COOKIE)?;
        match serde_json::from_str(cookie.value()) {
            Ok(access) => Some(access),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable access token cookie");
                None
            }
        }
    }

    fn read_profile(jar: &PrivateCookieJar) -> Option<UserProfile> {
        let cookie = jar.get(USER_INFO_COOKIE)?;
        match serde_json::from_str(cookie.value()) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding undecodable user info cookie");
                None
            }
        }
    }
}

impl std::fmt::Debug for CookieSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSessionStore")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl SessionStore for CookieSessionStore {
    type Context = PrivateCookieJar;

    fn load(&self, jar: &PrivateCookieJar) -> Result<Option<Session>> {
        let access = Self::read_access(jar);
        let refresh_token = jar
            .get(REFRESH_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|token| !token.is_empty());

        if access.is_none() && refresh_token.is_none() {
            return Ok(None);
        }

        let (access_token, expires_at) = access.map_or_else(
            || (String::new(), DateTime::<Utc>::UNIX_EPOCH),
            |a| (a.token, a.expires_at),
        );

        Ok(Some(Session {
            access_token,
            refresh_token,
            expires_at,
            user_profile: Self::read_profile(jar),
        }))
    }

    fn save(&self, jar: &mut PrivateCookieJar, session: &Session) -> Result<()> {
        // Encode everything before touching the jar.
        let access = serde_json::to_string(&AccessTokenCookie {
            token: session.access_token.clone(),
            expires_at: session.expires_at,
        })
        .map_err(|e| AuthError::SessionCodec(e.to_string()))?;

        let profile = session
            .user_profile
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| AuthError::SessionCodec(e.to_string()))?;

        let now = self.clock.now();
        let mut updated = jar.clone().add(self.build_cookie(
            ACCESS_TOKEN_COOKIE,
            access,
            SESSION_PATH,
            session.remaining_ttl(now),
        ));

        updated = match &session.refresh_token {
            Some(refresh) => updated.add(self.build_cookie(
                REFRESH_TOKEN_COOKIE,
                refresh.clone(),
                SESSION_PATH,
                self.settings.refresh_token_max_age,
            )),
            None => updated.remove(Self::removal_cookie(REFRESH_TOKEN_COOKIE, SESSION_PATH)),
        };

        updated = match profile {
            Some(profile) => updated.add(self.build_cookie(
                USER_INFO_COOKIE,
                profile,
                SESSION_PATH,
                self.settings.user_info_max_age,
            )),
            None => updated.remove(Self::removal_cookie(USER_INFO_COOKIE, SESSION_PATH)),
        };

        *jar = updated;
        Ok(())
    }

    fn clear(&self, jar: &mut PrivateCookieJar) {
        *jar = jar
            .clone()
            .remove(Self::removal_cookie(ACCESS_TOKEN_COOKIE, SESSION_PATH))
            .remove(Self::removal_cookie(REFRESH_TOKEN_COOKIE, SESSION_PATH))
            .remove(Self::removal_cookie(USER_INFO_COOKIE, SESSION_PATH));
    }

    fn save_login_state(&self, jar: &mut PrivateCookieJar, nonce: &str) {
        *jar = jar.clone().add(self.build_cookie(
            LOGIN_STATE_COOKIE,
            nonce.to_string(),
            LOGIN_STATE_PATH,
            self.settings.login_state_max_age,
        ));
    }

    fn take_login_state(&self, jar: &mut PrivateCookieJar) -> Option<String> {
        let nonce = jar.get(LOGIN_STATE_COOKIE).map(|c| c.value().to_string())?;
        *jar = jar
            .clone()
            .remove(Self::removal_cookie(LOGIN_STATE_COOKIE, LOGIN_STATE_PATH));
        Some(nonce).filter(|n| !n.is_empty())
    }
}
