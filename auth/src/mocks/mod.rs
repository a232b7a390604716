//! Mock provider implementations for testing.
//!
//! Simple, in-memory implementations of every provider trait for use in
//! unit and integration tests.

pub mod clock;
pub mod oauth;
pub mod session;
pub mod transport;

pub use clock::MockClock;
pub use oauth::{MockOAuthClient, MockOutcome};
pub use session::{MemoryJar, MemorySessionStore};
pub use transport::{MockResourceTransport, RecordedRequest};
