//! Shared session core for the roster server, SPA and CLI.
//!
//! This crate owns the wire types used by `roster-server`, `roster-client`
//! and `roster-cli`, plus the client-side authentication model: the token
//! store, the auth client, the auth state container and the route guard.
//!
//! DESIGN
//! ======
//! Nothing here performs I/O directly. Durable storage and HTTP are reached
//! through the [`DurableStorage`] and [`Transport`] traits so the browser,
//! the CLI and tests each plug in their own backend.

pub mod client;
pub mod guard;
pub mod state;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::{AuthClient, AuthClientError, HttpRequest, HttpResponse, Method, Transport, TransportError, attach_auth};
pub use guard::{GuardDecision, LOGIN_PATH, decide};
pub use state::{AuthAction, AuthPhase, AuthState, AuthStore};
pub use storage::{DurableStorage, MemoryStorage, TOKEN_KEY, TokenStore, USER_KEY};
pub use types::{Role, Session, User};
