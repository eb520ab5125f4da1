//! Auth state container.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`AuthStore`] lives for the whole client process. The SPA keeps it in
//! a Leptos signal provided through context; the CLI owns it in `main`.
//! Every change goes through [`AuthStore::dispatch`], which keeps the
//! in-memory state and durable storage in step.
//!
//! DESIGN
//! ======
//! Phases form an explicit machine:
//!
//! ```text
//!  anonymous --LoadPending--> pending --LoadFulfilled--> authenticated
//!                                 \---LoadRejected---> error
//!                                  \--LoadFulfilled, no token--> error
//!  any --CredentialsSet--> authenticated      any --Logout--> anonymous
//! ```
//!
//! `pending` is not authenticated, so `is_authenticated` implies both a
//! token and a user at every instant. Rejected and logged-out credentials are
//! removed from storage here and nowhere else.

use crate::client::{AuthClient, AuthClientError, Transport};
use crate::guard::{GuardDecision, decide};
use crate::storage::{DurableStorage, TokenStore};
use crate::types::{Session, User};

/// Fallback error when a failed validation carries no server message.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load user";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AuthPhase {
    /// No credential.
    #[default]
    Anonymous,
    /// Credential present, validation in flight.
    Pending,
    /// Credential validated and user known.
    Authenticated,
    /// Validation failed; credential discarded.
    Error,
}

/// Snapshot of the session as seen by views and guards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    phase: AuthPhase,
    user: Option<User>,
    token: Option<String>,
    loading: bool,
    error: Option<String>,
}

impl AuthState {
    #[must_use]
    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn anonymous(error: Option<String>) -> Self {
        Self { error, ..Self::default() }
    }
}

/// Transitions accepted by [`AuthStore::dispatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthAction {
    CredentialsSet { user: User, token: String },
    Logout,
    LoadPending,
    LoadFulfilled(User),
    LoadRejected(String),
    ErrorSet(String),
    ErrorCleared,
}

// =============================================================================
// STORE
// =============================================================================

/// Owns the auth state and the token store it mirrors.
#[derive(Clone, Debug)]
pub struct AuthStore<S> {
    tokens: TokenStore<S>,
    state: AuthState,
}

impl<S: DurableStorage> AuthStore<S> {
    /// Build the container from whatever is already persisted.
    ///
    /// A stored token starts the container in `pending` so the caller knows
    /// to validate it; otherwise it starts `anonymous`.
    pub fn new(storage: S) -> Self {
        let tokens = TokenStore::new(storage);
        let state = match tokens.token() {
            Some(token) => AuthState {
                phase: AuthPhase::Pending,
                token: Some(token),
                loading: true,
                ..AuthState::default()
            },
            None => AuthState::default(),
        };
        Self { tokens, state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn tokens(&self) -> &TokenStore<S> {
        &self.tokens
    }

    pub fn storage(&self) -> &S {
        self.tokens.storage()
    }

    pub fn token_in_storage(&self) -> bool {
        self.tokens.token().is_some()
    }

    /// Route-guard decision for the current state and storage.
    pub fn guard(&self) -> GuardDecision {
        decide(&self.state, self.token_in_storage())
    }

    /// Apply one transition. Transitions are applied in call order.
    pub fn dispatch(&mut self, action: AuthAction) {
        match action {
            AuthAction::CredentialsSet { user, token } => {
                if token.is_empty() {
                    log::warn!("ignoring credentials with an empty token");
                    return;
                }
                self.tokens.set_credential(Some(&token));
                self.tokens.persist_user(&user);
                self.state = AuthState {
                    phase: AuthPhase::Authenticated,
                    user: Some(user),
                    token: Some(token),
                    loading: false,
                    error: self.state.error.take(),
                };
            }
            AuthAction::Logout => {
                self.tokens.clear();
                self.state = AuthState::anonymous(self.state.error.take());
            }
            AuthAction::LoadPending => {
                self.state = AuthState {
                    phase: AuthPhase::Pending,
                    user: None,
                    token: self.tokens.token(),
                    loading: true,
                    error: self.state.error.take(),
                };
            }
            AuthAction::LoadFulfilled(user) => {
                if self.state.phase != AuthPhase::Pending {
                    log::debug!("ignoring load result outside pending phase ({:?})", self.state.phase);
                    return;
                }
                if self.state.token.is_none() {
                    // A user without a credential cannot be authenticated.
                    self.dispatch(AuthAction::LoadRejected(LOAD_FAILED_MESSAGE.to_owned()));
                    return;
                }
                self.tokens.persist_user(&user);
                self.state.phase = AuthPhase::Authenticated;
                self.state.user = Some(user);
                self.state.loading = false;
            }
            AuthAction::LoadRejected(message) => {
                if self.state.phase != AuthPhase::Pending {
                    log::debug!("ignoring load rejection outside pending phase ({:?})", self.state.phase);
                    return;
                }
                self.tokens.clear();
                self.state = AuthState { phase: AuthPhase::Error, error: Some(message), ..AuthState::default() };
            }
            AuthAction::ErrorSet(message) => self.state.error = Some(message),
            AuthAction::ErrorCleared => self.state.error = None,
        }
    }

    /// Translate the outcome of [`AuthClient::load_current_user`] into a transition.
    pub fn apply_load_result(&mut self, result: Result<Session, AuthClientError>) {
        match result {
            Ok(session) => self.dispatch(AuthAction::LoadFulfilled(session.user)),
            Err(e) => {
                log::warn!("session validation failed: {e}");
                let message = e.server_message().unwrap_or(LOAD_FAILED_MESSAGE).to_owned();
                self.dispatch(AuthAction::LoadRejected(message));
            }
        }
    }

    /// Validate the persisted credential: `pending`, then `authenticated` or `error`.
    pub async fn load_current_user<T: Transport>(&mut self, client: &AuthClient<T>) -> AuthPhase {
        self.dispatch(AuthAction::LoadPending);
        let result = client.load_current_user(&self.tokens).await;
        self.apply_load_result(result);
        self.state.phase
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
