//! Session store trait.

use crate::error::Result;
use crate::state::Session;

/// Session store.
///
/// A narrow capability over wherever the session lives between requests.
/// The store itself holds no per-user state: every operation works on a
/// per-request [`Context`](SessionStore::Context) (the request's cookie
/// jar, or an in-memory jar in tests) that the caller threads through.
///
/// # Implementation Notes
///
/// - Writes must be all-or-nothing from the caller's perspective
/// - Undecodable material is treated as absent, never as an error
/// - `clear` is idempotent
pub trait SessionStore: Send + Sync {
    /// Per-request carrier of persisted material.
    type Context: Send;

    /// Load the session, if any.
    ///
    /// # Returns
    ///
    /// `None` when neither an access token nor a refresh token is
    /// persisted.
    ///
    /// # Errors
    ///
    /// Returns error if the backing store cannot be read.
    fn load(&self, ctx: &Self::Context) -> Result<Option<Session>>;

    /// Persist the session, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SessionCodec`](crate::AuthError::SessionCodec)
    /// if the session cannot be encoded. Nothing is written in that case.
    fn save(&self, ctx: &mut Self::Context, session: &Session) -> Result<()>;

    /// Remove all persisted session material.
    fn clear(&self, ctx: &mut Self::Context);

    /// Record the nonce of an in-flight login.
    fn save_login_state(&self, ctx: &mut Self::Context, nonce: &str);

    /// Consume the recorded login nonce.
    ///
    /// Returns `None` if no login is in flight (or it was already consumed).
    fn take_login_state(&self, ctx: &mut Self::Context) -> Option<String>;
}
