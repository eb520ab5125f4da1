//! Route guard decision.
//!
//! Protected views ask [`decide`] what to show. Storage is consulted in
//! addition to the container so a token written by a parallel tab or an
//! early startup read still lets the view through while state catches up.

use crate::state::AuthState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the protected content.
    Render,
    /// Validation in flight; show a loading indicator.
    Loading,
    /// Navigate to [`LOGIN_PATH`].
    RedirectToLogin,
}

#[must_use]
pub fn decide(state: &AuthState, token_in_storage: bool) -> GuardDecision {
    if state.loading() {
        GuardDecision::Loading
    } else if state.is_authenticated() || token_in_storage {
        GuardDecision::Render
    } else {
        GuardDecision::RedirectToLogin
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
