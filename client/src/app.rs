//! Root application component with routing and the auth context.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};
use roster_session::{AuthPhase, AuthStore};

use crate::components::private_route::PrivateRoute;
use crate::pages::{dashboard::DashboardPage, login::LoginPage};
use crate::util::storage::BrowserStorage;

/// The app's single auth container, provided through context.
pub type AuthSignal = RwSignal<AuthStore<BrowserStorage>>;

/// Root application component.
///
/// Builds the auth container from `localStorage`, kicks off validation of a
/// persisted token, and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let auth: AuthSignal = RwSignal::new(AuthStore::new(BrowserStorage));
    provide_context(auth);

    if auth.with_untracked(|store| store.state().phase() == AuthPhase::Pending) {
        validate_stored_session(auth);
    }

    view! {
        <Title text="Roster"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route
                    path=StaticSegment("")
                    view=|| view! { <PrivateRoute><DashboardPage/></PrivateRoute> }
                />
            </Routes>
        </Router>
    }
}

/// Check the persisted token with `GET /api/users/me`.
///
/// The container is already `pending` (it was built from a stored token), so
/// only the outcome is applied here.
fn validate_stored_session(auth: AuthSignal) {
    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        let tokens = auth.with_untracked(|store| store.tokens().clone());
        let result = crate::net::api::api_client().load_current_user(&tokens).await;
        auth.update(|store| store.apply_load_result(result));
    });
    #[cfg(not(feature = "csr"))]
    {
        let _ = auth;
    }
}
