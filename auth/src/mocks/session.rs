//! In-memory session store for testing.

use crate::error::Result;
use crate::providers::SessionStore;
use crate::state::Session;

/// Per-test stand-in for a browser cookie jar.
#[derive(Debug, Clone, Default)]
pub struct MemoryJar {
    /// Persisted session.
    pub session: Option<Session>,

    /// Recorded login nonce.
    pub login_state: Option<String>,

    /// Number of successful saves.
    pub saves: usize,
}

impl MemoryJar {
    /// Jar already holding `session`.
    #[must_use]
    pub const fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
            login_state: None,
            saves: 0,
        }
    }
}

/// In-memory session store.
///
/// Stateless like the cookie store: all data lives in the [`MemoryJar`]
/// passed to each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySessionStore;

impl MemorySessionStore {
    /// Create a new store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl SessionStore for MemorySessionStore {
    type Context = MemoryJar;

    fn load(&self, jar: &MemoryJar) -> Result<Option<Session>> {
        Ok(jar.session.clone())
    }

    fn save(&self, jar: &mut MemoryJar, session: &Session) -> Result<()> {
        jar.session = Some(session.clone());
        jar.saves += 1;
        Ok(())
    }

    fn clear(&self, jar: &mut MemoryJar) {
        jar.session = None;
    }

    fn save_login_state(&self, jar: &mut MemoryJar, nonce: &str) {
        jar.login_state = Some(nonce.to_string());
    }

    fn take_login_state(&self, jar: &mut MemoryJar) -> Option<String> {
        jar.login_state.take()
    }
}
