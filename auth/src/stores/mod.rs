//! Storage implementations for the session lifecycle.
//!
//! - **Cookie Session Store** - encrypted browser cookies (production)
//!
//! An in-memory store for tests lives in [`crate::mocks`].

pub mod cookie;

pub use cookie::CookieSessionStore;
