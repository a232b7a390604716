//! Authentication providers.
//!
//! Traits for every external dependency of the session lifecycle, plus
//! the production implementations.
//!
//! ```text
//! SessionManager ──► OAuthExchangeClient   (token endpoint)
//!       │        ──► ResourceTransport     (resource API: /me, search, playlists)
//!       └────────► SessionStore            (cookie jar / in-memory)
//! ```
//!
//! Mocks for all three live in [`crate::mocks`].

pub mod oauth;
pub mod session;
pub mod spotify;
pub mod transport;

pub use oauth::OAuthExchangeClient;
pub use session::SessionStore;
pub use spotify::SpotifyOAuthClient;
pub use transport::{ApiRequest, ApiResponse, HttpResourceTransport, ResourceTransport};
