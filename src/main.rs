#![allow(non_snake_case)]

use dioxus::prelude::*;
use stores::{auth_store, settings_store};

// Modules
mod components;
mod context;
mod controllers;
mod errors;
mod hooks;
mod models;
mod routes;
mod services;
mod stores;
mod utils;

use components::toast::ToastProvider;
use context::AppContext;
use stores::auth_store::SessionStore;

fn main() {
    // Initialize panic hook for better error messages in browser console
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    }

    log::info!("Starting profile screen client");

    // Launch the Dioxus web app
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // Config and session come from LocalStorage before the first route renders
    use_context_provider(|| {
        settings_store::init_config();
        let session = SessionStore::restore();
        auth_store::sync_auth_state(&session);
        AppContext::new(session)
    });

    rsx! {
        ToastProvider {
            Router::<routes::Route> {}
        }
    }
}
