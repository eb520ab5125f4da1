//! Route wrapper that only renders its children for signed-in visitors.
//!
//! The decision itself is `roster_session::decide`; this component maps it
//! onto a loading line, the children, or a navigation to `/login`.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use roster_session::{GuardDecision, LOGIN_PATH};

use crate::app::AuthSignal;

#[component]
pub fn PrivateRoute(children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<AuthSignal>();
    let navigate = use_navigate();

    let decision = Memo::new(move |_| auth.with(|store| store.guard()));

    Effect::new(move || {
        if decision.get() == GuardDecision::RedirectToLogin {
            navigate(LOGIN_PATH, NavigateOptions::default());
        }
    });

    move || match decision.get() {
        GuardDecision::Loading => view! { <div class="auth-loading">"Loading..."</div> }.into_any(),
        GuardDecision::Render => children().into_any(),
        GuardDecision::RedirectToLogin => ().into_any(),
    }
}
