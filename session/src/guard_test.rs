use super::*;
use crate::state::{AuthAction, AuthStore};
use crate::storage::{DurableStorage, MemoryStorage, TOKEN_KEY};
use crate::test_support::sample_user;

#[test]
fn anonymous_without_token_redirects() {
    assert_eq!(decide(&AuthState::default(), false), GuardDecision::RedirectToLogin);
}

#[test]
fn anonymous_with_stored_token_renders_optimistically() {
    assert_eq!(decide(&AuthState::default(), true), GuardDecision::Render);
}

#[test]
fn loading_takes_precedence() {
    let mut storage = MemoryStorage::new();
    storage.set(TOKEN_KEY, "tok");
    let store = AuthStore::new(storage);
    assert_eq!(decide(store.state(), true), GuardDecision::Loading);
    assert_eq!(decide(store.state(), false), GuardDecision::Loading);
}

#[test]
fn authenticated_renders_even_if_storage_was_wiped() {
    let mut store = AuthStore::new(MemoryStorage::new());
    store.dispatch(AuthAction::CredentialsSet { user: sample_user(), token: "t".into() });
    assert_eq!(decide(store.state(), false), GuardDecision::Render);
}

#[test]
fn login_path_is_root_relative() {
    assert_eq!(LOGIN_PATH, "/login");
}
