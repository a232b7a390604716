//! Mock OAuth exchange client for testing.

use crate::error::{AuthError, Result};
use crate::providers::OAuthExchangeClient;
use crate::state::TokenSet;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted outcome of a token-endpoint call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// Return tokens.
    Succeed,
    /// Provider rejects the grant (`400`).
    Reject,
    /// Provider answers without an access token.
    MissingToken,
    /// No response at all.
    NetworkFailure,
}

/// Mock OAuth exchange client.
///
/// Returns predefined tokens and counts calls so tests can assert that
/// the fast path makes no network calls.
#[derive(Debug, Clone)]
pub struct MockOAuthClient {
    exchange: MockOutcome,
    refresh: MockOutcome,
    rotate_refresh_token: bool,
    expires_in_seconds: i64,
    exchange_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
}

impl MockOAuthClient {
    /// Access token returned by a successful code exchange.
    pub const ACCESS_TOKEN: &'static str = "mock_access_token";
    /// Refresh token returned by a successful code exchange.
    pub const REFRESH_TOKEN: &'static str = "mock_refresh_token";
    /// Refresh token returned when rotation is enabled.
    pub const ROTATED_REFRESH_TOKEN: &'static str = "mock_rotated_refresh_token";

    /// Create a mock that succeeds on every call.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exchange: MockOutcome::Succeed,
            refresh: MockOutcome::Succeed,
            rotate_refresh_token: false,
            expires_in_seconds: 3600,
            exchange_calls: Arc::new(AtomicUsize::new(0)),
            refresh_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Script the code exchange.
    #[must_use]
    pub const fn with_exchange(mut self, outcome: MockOutcome) -> Self {
        self.exchange = outcome;
        self
    }

    /// Script the refresh grant.
    #[must_use]
    pub const fn with_refresh(mut self, outcome: MockOutcome) -> Self {
        self.refresh = outcome;
        self
    }

    /// Rotate the refresh token on every refresh.
    #[must_use]
    pub const fn with_rotation(mut self, rotate: bool) -> Self {
        self.rotate_refresh_token = rotate;
        self
    }

    /// Token lifetime reported by the mock.
    #[must_use]
    pub const fn with_expires_in(mut self, seconds: i64) -> Self {
        self.expires_in_seconds = seconds;
        self
    }

    /// Number of code exchanges performed.
    #[must_use]
    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    /// Number of refresh grants performed.
    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    fn outcome(
        outcome: MockOutcome,
        tokens: TokenSet,
        rejected: AuthError,
    ) -> Result<TokenSet> {
        match outcome {
            MockOutcome::Succeed => Ok(tokens),
            MockOutcome::Reject => Err(rejected),
            MockOutcome::MissingToken => Err(AuthError::MissingAccessToken),
            MockOutcome::NetworkFailure => {
                Err(AuthError::Transport("connection refused".to_string()))
            }
        }
    }
}

impl Default for MockOAuthClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OAuthExchangeClient for MockOAuthClient {
    fn authorization_url(&self, state: &str, redirect_uri: &str) -> Result<String> {
        let query = serde_urlencoded::to_string([
            ("client_id", "mock-client"),
            ("response_type", "code"),
            ("redirect_uri", redirect_uri),
            ("state", state),
        ])
        .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(format!("https://accounts.mock/authorize?{query}"))
    }

    fn exchange_code(
        &self,
        _code: &str,
        _redirect_uri: &str,
    ) -> impl Future<Output = Result<TokenSet>> + Send {
        self.exchange_calls.fetch_add(1, Ordering::SeqCst);
        let result = Self::outcome(
            self.exchange,
            TokenSet {
                access_token: Self::ACCESS_TOKEN.to_string(),
                refresh_token: Some(Self::REFRESH_TOKEN.to_string()),
                expires_in_seconds: self.expires_in_seconds,
            },
            AuthError::TokenExchangeFailed { status: 400 },
        );

        async move { result }
    }

    fn refresh_token(&self, _refresh_token: &str) -> impl Future<Output = Result<TokenSet>> + Send {
        let call = self.refresh_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let result = Self::outcome(
            self.refresh,
            TokenSet {
                access_token: format!("mock_refreshed_access_token_{call}"),
                refresh_token: self
                    .rotate_refresh_token
                    .then(|| Self::ROTATED_REFRESH_TOKEN.to_string()),
                expires_in_seconds: self.expires_in_seconds,
            },
            AuthError::RefreshFailed { status: 400 },
        );

        async move { result }
    }
}
