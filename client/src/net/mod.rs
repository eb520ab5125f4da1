//! Network layer for HTTP calls to the roster API.

pub mod api;
