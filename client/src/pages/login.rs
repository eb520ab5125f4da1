//! Login page: username-or-email plus password.
//!
//! Success dispatches `CredentialsSet` and navigates home; failure
//! dispatches `ErrorSet` so the message shows under the form.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use roster_session::AuthAction;

use crate::app::AuthSignal;

const MISSING_FIELDS_MESSAGE: &str = "Enter your username or email and password.";

/// Trim the login and require both fields.
fn validate_login_input(login: &str, password: &str) -> Result<(String, String), &'static str> {
    let login = login.trim();
    if login.is_empty() || password.is_empty() {
        return Err(MISSING_FIELDS_MESSAGE);
    }
    Ok((login.to_owned(), password.to_owned()))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthSignal>();
    let navigate = use_navigate();

    let login = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Already signed in: skip the form.
    let navigate_home = navigate.clone();
    Effect::new(move || {
        if auth.with(|store| store.state().is_authenticated()) {
            navigate_home("/", NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (login_value, password_value) = match validate_login_input(&login.get(), &password.get()) {
            Ok(fields) => fields,
            Err(message) => {
                auth.update(|store| store.dispatch(AuthAction::ErrorSet(message.to_owned())));
                return;
            }
        };
        auth.update(|store| store.dispatch(AuthAction::ErrorCleared));
        busy.set(true);

        #[cfg(feature = "csr")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::api_client().login(&login_value, &password_value).await {
                    Ok(session) => {
                        auth.update(|store| {
                            store.dispatch(AuthAction::CredentialsSet { user: session.user, token: session.token });
                        });
                        navigate("/", NavigateOptions::default());
                    }
                    Err(e) => {
                        log::warn!("login failed: {e}");
                        let message = crate::net::api::error_message(&e);
                        auth.update(|store| store.dispatch(AuthAction::ErrorSet(message)));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (login_value, password_value);
            busy.set(false);
        }
    };

    let error = move || auth.with(|store| store.state().error().map(str::to_owned));

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Roster"</h1>
                <p class="login-card__subtitle">"Sign in"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="username or email"
                        prop:value=move || login.get()
                        on:input=move |ev| login.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || error().is_some()>
                    <p class="login-message">{move || error().unwrap_or_default()}</p>
                </Show>
            </div>
        </div>
    }
}
