//! Authentication environment.
//!
//! Bundles the external dependencies of the session lifecycle so they can
//! be swapped for mocks in tests.

use crate::providers::{OAuthExchangeClient, ResourceTransport, SessionStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Clock abstraction for freshness decisions.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Authentication environment.
///
/// # Type Parameters
///
/// - `O`: OAuth exchange client (token endpoint)
/// - `S`: Session store (token persistence)
/// - `T`: Resource transport (provider REST API)
#[derive(Clone)]
pub struct AuthEnvironment<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    /// OAuth exchange client.
    pub oauth: O,

    /// Session store.
    pub sessions: S,

    /// Resource API transport.
    pub transport: T,

    /// Clock.
    pub clock: Arc<dyn Clock>,
}

impl<O, S, T> AuthEnvironment<O, S, T>
where
    O: OAuthExchangeClient,
    S: SessionStore,
    T: ResourceTransport,
{
    /// Create an environment backed by the system clock.
    #[must_use]
    pub fn new(oauth: O, sessions: S, transport: T) -> Self {
        Self {
            oauth,
            sessions,
            transport,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
