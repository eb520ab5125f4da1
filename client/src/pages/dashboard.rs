//! Dashboard page for signed-in users.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered inside `PrivateRoute`. Logging out dispatches `Logout`, which
//! clears storage; the guard then sends the visitor to `/login`. Admins also
//! get the user management panel.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use roster_session::{AuthAction, User};

use crate::app::AuthSignal;
use crate::components::user_admin_panel::UserAdminPanel;

fn welcome_line(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("Welcome, {}!", user.username),
        None => "Welcome!".to_owned(),
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthSignal>();

    let welcome = move || auth.with(|store| welcome_line(store.state().user()));
    let is_admin = move || auth.with(|store| store.state().user().is_some_and(|u| u.role.is_admin()));

    let on_logout = move |_: leptos::ev::MouseEvent| {
        let token = auth.with_untracked(|store| store.state().token().map(str::to_owned));
        auth.update(|store| store.dispatch(AuthAction::Logout));

        // Server-side revocation is best effort; local state is already clear.
        #[cfg(feature = "csr")]
        {
            if let Some(token) = token {
                leptos::task::spawn_local(async move {
                    if let Err(e) = crate::net::api::api_client().logout(&token).await {
                        log::warn!("server logout failed: {e}");
                    }
                });
            }
        }
        #[cfg(not(feature = "csr"))]
        let _ = token;
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>"Dashboard"</h1>
                <button class="dashboard-logout" on:click=on_logout>"Log out"</button>
            </header>
            <section class="dashboard-welcome">
                <h2>{welcome}</h2>
                <p>"This is your personal dashboard."</p>
            </section>
            <Show when=is_admin>
                <UserAdminPanel/>
            </Show>
        </div>
    }
}
