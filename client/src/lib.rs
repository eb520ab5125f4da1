//! # roster-client
//!
//! Leptos + WASM single-page frontend for roster. Auth state lives in one
//! `AuthStore` from `roster-session`, owned by [`app::App`] and shared with
//! pages and components through Leptos context.
//!
//! Browser-only glue (localStorage, `gloo-net`) compiles behind the `csr`
//! feature; without it the crate builds natively so the non-DOM logic can
//! be unit tested.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod util;

/// WASM entry point: install logging and mount the app.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::mount_to_body(app::App);
}
