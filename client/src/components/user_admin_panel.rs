//! Admin-only user table: list, change role, delete.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered by the dashboard when the signed-in user is an admin. The
//! server enforces the role on every call; hiding the panel for others is
//! cosmetic. A 401 from any call ends the session through the auth store.

#[cfg(test)]
#[path = "user_admin_panel_test.rs"]
mod user_admin_panel_test;

use leptos::prelude::*;
use roster_session::{Role, User};

use crate::app::AuthSignal;

/// The role an admin toggles `current` to.
fn toggled_role(current: Role) -> Role {
    match current {
        Role::User => Role::Admin,
        Role::Admin => Role::User,
    }
}

/// Swap in `updated` wherever a user with the same id is listed.
fn replace_user(users: &mut [User], updated: User) {
    if let Some(slot) = users.iter_mut().find(|u| u.id == updated.id) {
        *slot = updated;
    }
}

fn remove_user(users: &mut Vec<User>, id: &str) {
    users.retain(|u| u.id != id);
}

#[component]
pub fn UserAdminPanel() -> impl IntoView {
    let auth = expect_context::<AuthSignal>();
    let users = RwSignal::new(Vec::<User>::new());
    let info = RwSignal::new(String::new());

    let token = move || auth.with_untracked(|store| store.state().token().map(str::to_owned));

    #[cfg(feature = "csr")]
    let fail = move |e: roster_session::AuthClientError| {
        if crate::net::api::session_rejected(&e) {
            auth.update(|store| store.dispatch(roster_session::AuthAction::Logout));
        }
        info.set(crate::net::api::error_message(&e));
    };

    let refresh = move || {
        let Some(token) = token() else {
            return;
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match crate::net::api::api_client().list_users(&token).await {
                Ok(list) => users.set(list),
                Err(e) => fail(e),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = token;
    };
    refresh();

    let change_role = move |user: User| {
        let Some(token) = token() else {
            return;
        };
        let next = toggled_role(user.role);
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match crate::net::api::api_client().update_role(&token, &user.id, next.as_str()).await {
                Ok(reply) => {
                    info.set(reply.message);
                    users.update(|list| replace_user(list, reply.user));
                }
                Err(e) => fail(e),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = (token, user, next);
    };

    let delete = move |id: String| {
        let Some(token) = token() else {
            return;
        };
        #[cfg(feature = "csr")]
        leptos::task::spawn_local(async move {
            match crate::net::api::api_client().delete_user(&token, &id).await {
                Ok(reply) => {
                    info.set(reply.message);
                    users.update(|list| remove_user(list, &id));
                }
                Err(e) => fail(e),
            }
        });
        #[cfg(not(feature = "csr"))]
        let _ = (token, id);
    };

    view! {
        <section class="user-admin">
            <h2>"Users"</h2>
            <Show when=move || !info.get().is_empty()>
                <p class="user-admin__info">{move || info.get()}</p>
            </Show>
            <table class="user-admin__table">
                <thead>
                    <tr>
                        <th>"Username"</th>
                        <th>"Email"</th>
                        <th>"Role"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For each=move || users.get() key=|u| (u.id.clone(), u.role) let:user>
                        {
                            let for_role = user.clone();
                            let id = user.id.clone();
                            let label = format!("Make {}", toggled_role(user.role));
                            view! {
                                <tr>
                                    <td>{user.username.clone()}</td>
                                    <td>{user.email.clone()}</td>
                                    <td>{user.role.as_str()}</td>
                                    <td>
                                        <button on:click=move |_| change_role(for_role.clone())>{label}</button>
                                        <button class="danger" on:click=move |_| delete(id.clone())>"Delete"</button>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>
        </section>
    }
}
