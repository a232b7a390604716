//! Configuration management for the VibeSync server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Provider credentials are optional here: their absence surfaces as a
//! configuration error on the first login, not at startup.

use axum_extra::extract::cookie::Key;
use std::time::Duration;
use thiserror::Error;
use vibesync_auth::{CookieSettings, OAuthConfig};
use vibesync_recommend::RecommenderConfig;

/// Minimum length of `SESSION_SECRET`, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// Errors in the environment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// `SESSION_SECRET` is shorter than [`MIN_SESSION_SECRET_LEN`] bytes.
    #[error("SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes")]
    SessionSecretTooShort,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

impl ListenConfig {
    /// `host:port` bind address.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// HTTP listener
    pub listen: ListenConfig,
    /// OAuth client and provider endpoints
    pub oauth: OAuthConfig,
    /// Session cookie attributes
    pub cookies: CookieSettings,
    /// Cookie encryption key material
    session_secret: Option<String>,
    /// Recommendation service
    pub recommender: RecommenderConfig,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `PORT` or `HTTP_TIMEOUT_SECS`
    /// cannot be parsed, and [`ConfigError::SessionSecretTooShort`] for a
    /// short `SESSION_SECRET`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let flag = |name: &str| {
            var(name).is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 9002,
        };

        let timeout_secs: u64 = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "HTTP_TIMEOUT_SECS",
                value: raw,
            })?,
            None => 10,
        };
        let http_timeout = Duration::from_secs(timeout_secs);

        let session_secret = var("SESSION_SECRET");
        if session_secret
            .as_ref()
            .is_some_and(|s| s.len() < MIN_SESSION_SECRET_LEN)
        {
            return Err(ConfigError::SessionSecretTooShort);
        }

        let mut oauth = OAuthConfig::new(
            var("SPOTIFY_CLIENT_ID"),
            var("SPOTIFY_CLIENT_SECRET"),
            var("NEXT_PUBLIC_APP_URL").or_else(|| var("APP_URL")),
        )
        .with_show_dialog(flag("SPOTIFY_SHOW_DIALOG"))
        .with_http_timeout(http_timeout);
        if let Some(url) = var("SPOTIFY_ACCOUNTS_URL") {
            oauth = oauth.with_accounts_url(url);
        }
        if let Some(url) = var("SPOTIFY_API_URL") {
            oauth = oauth.with_api_url(url);
        }

        let secure = flag("COOKIE_SECURE") || var("APP_ENV").as_deref() == Some("production");

        let mut recommender =
            RecommenderConfig::new(var("ANTHROPIC_API_KEY")).with_timeout(http_timeout * 3);
        if let Some(model) = var("ANTHROPIC_MODEL") {
            recommender = recommender.with_model(model);
        }
        if let Some(url) = var("ANTHROPIC_API_URL") {
            recommender = recommender.with_api_url(url);
        }
        if let Some(language) = var("RECOMMENDATION_LANGUAGE") {
            recommender = recommender.with_language(language);
        }

        let log_format = if var("LOG_FORMAT").is_some_and(|v| v.eq_ignore_ascii_case("json")) {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        };

        Ok(Self {
            listen: ListenConfig {
                host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port,
            },
            oauth,
            cookies: CookieSettings::new(secure),
            session_secret,
            recommender,
            log_format,
        })
    }

    /// Cookie encryption key.
    ///
    /// Derived from `SESSION_SECRET` when set. Otherwise a random key is
    /// generated, so sessions do not survive a restart.
    #[must_use]
    pub fn cookie_key(&self) -> Key {
        if let Some(secret) = &self.session_secret {
            if let Ok(key) = Key::try_from(secret.as_bytes()) {
                return key;
            }
        }
        tracing::warn!("SESSION_SECRET not set, using an ephemeral cookie key");
        Key::generate()
    }

    /// Returns `true` if a session secret is configured.
    #[must_use]
    pub const fn has_session_secret(&self) -> bool {
        self.session_secret.is_some()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("listen", &self.listen)
            .field("oauth", &self.oauth)
            .field("cookies", &self.cookies)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("recommender", &self.recommender)
            .field("log_format", &self.log_format)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.listen.address(), "0.0.0.0:9002");
        assert_eq!(config.oauth.client_id, None);
        assert_eq!(config.oauth.http_timeout, Duration::from_secs(10));
        assert!(!config.cookies.secure);
        assert!(!config.oauth.show_dialog);
        assert_eq!(config.recommender.api_key, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.has_session_secret());
    }

    #[test]
    fn test_full_environment() {
        let secret = "s".repeat(64);
        let config = load(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("SPOTIFY_CLIENT_ID", "client"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("NEXT_PUBLIC_APP_URL", "https://vibesync.example.com"),
            ("APP_URL", "https://ignored.example.com"),
            ("SPOTIFY_SHOW_DIALOG", "true"),
            ("SPOTIFY_API_URL", "http://localhost:9999/v1"),
            ("APP_ENV", "production"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("SESSION_SECRET", secret.as_str()),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("ANTHROPIC_MODEL", "model-x"),
            ("RECOMMENDATION_LANGUAGE", "Korean"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();

        assert_eq!(config.listen.address(), "127.0.0.1:8080");
        assert_eq!(config.oauth.client_id.as_deref(), Some("client"));
        assert_eq!(
            config.oauth.app_url.as_deref(),
            Some("https://vibesync.example.com")
        );
        assert!(config.oauth.show_dialog);
        assert_eq!(config.oauth.api_url, "http://localhost:9999/v1");
        assert_eq!(config.oauth.http_timeout, Duration::from_secs(5));
        assert!(config.cookies.secure);
        assert_eq!(config.recommender.model, "model-x");
        assert_eq!(config.recommender.language.as_deref(), Some("Korean"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.has_session_secret());
    }

    #[test]
    fn test_app_url_fallback() {
        let config = load(&[("APP_URL", "http://localhost:9002")]).unwrap();
        assert_eq!(
            config.oauth.app_url.as_deref(),
            Some("http://localhost:9002")
        );
    }

    #[test]
    fn test_invalid_port() {
        assert_eq!(
            load(&[("PORT", "http")]).unwrap_err(),
            ConfigError::Invalid {
                name: "PORT",
                value: "http".to_string(),
            }
        );
    }

    #[test]
    fn test_short_session_secret_is_rejected() {
        assert_eq!(
            load(&[("SESSION_SECRET", "too-short")]).unwrap_err(),
            ConfigError::SessionSecretTooShort
        );
    }

    #[test]
    fn test_cookie_key_is_stable_for_a_secret() {
        let secret = "k".repeat(80);
        let config = load(&[("SESSION_SECRET", secret.as_str())]).unwrap();
        assert_eq!(config.cookie_key().master(), config.cookie_key().master());

        let ephemeral = load(&[]).unwrap();
        assert_ne!(ephemeral.cookie_key().master(), ephemeral.cookie_key().master());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let secret = "s".repeat(64);
        let config = load(&[
            ("SESSION_SECRET", secret.as_str()),
            ("SPOTIFY_CLIENT_SECRET", "spotify-secret-value"),
            ("ANTHROPIC_API_KEY", "sk-ant-secret-value"),
        ])
        .unwrap();

        let debug = format!("{config:?}");
        assert!(!debug.contains(&secret));
        assert!(!debug.contains("spotify-secret-value"));
        assert!(!debug.contains("sk-ant-secret-value"));
        assert!(debug.contains("<redacted>"));
    }
}
