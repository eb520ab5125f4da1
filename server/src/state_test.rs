use super::*;
use crate::services::session;

#[tokio::test]
async fn users_and_sessions_share_the_memory_store() {
    let (state, store) = test_helpers::memory_state();
    let (user, token) = test_helpers::seed_session(&state, "alice", roster_session::Role::User).await;

    assert_eq!(store.session_count(), 1);
    let resolved = session::resolve(state.sessions.as_ref(), &token).await.unwrap();
    assert_eq!(resolved.map(|u| u.id), Some(user.id));
}

#[tokio::test]
async fn cloned_state_sees_the_same_records() {
    let (state, _store) = test_helpers::memory_state();
    let clone = state.clone();
    test_helpers::seed_user(state.users.as_ref(), "bob", roster_session::Role::User).await;
    assert_eq!(clone.users.list().await.unwrap().len(), 1);
    assert_eq!(clone.session_ttl_hours, test_helpers::TEST_SESSION_TTL_HOURS);
}
