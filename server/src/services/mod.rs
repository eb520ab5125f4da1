//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation, password handling and persistence calls
//! so route handlers can stay focused on protocol translation and auth
//! plumbing.

pub mod auth;
pub mod session;
pub mod store;
#[cfg(test)]
pub mod store_memory;
pub mod users;
