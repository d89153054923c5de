use dioxus::prelude::*;

use crate::context::AppContext;
use crate::routes::Route;
use crate::stores::auth_store::{self, AUTH_STATE};

/// Sign in with an account id, or sign out
#[component]
pub fn Authorization() -> Element {
    let ctx = use_context::<AppContext>();
    let mut user_id = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let nav = navigator();
    let auth = AUTH_STATE.read().clone();
    let signed_in_as = auth.user_id.filter(|_| auth.is_authenticated);

    let ctx_sign_in = ctx.clone();
    let sign_in = move |_| {
        let id = user_id.read().trim().to_string();
        if id.is_empty() {
            error.set(Some("Please enter your account id".to_string()));
            return;
        }
        match ctx_sign_in.session().sign_in(&id) {
            Ok(()) => {
                log::info!("Signed in as {}", id);
                auth_store::sync_auth_state(ctx_sign_in.session());
                error.set(None);
                nav.push(Route::MyProfile {});
            }
            Err(e) => {
                log::error!("{}", e);
                error.set(Some(e));
            }
        }
    };

    let sign_out = move |_| {
        ctx.session().sign_out();
        auth_store::sync_auth_state(ctx.session());
        // follow states and counts were computed for the previous viewer
        ctx.attributes().clear();
        log::info!("Signed out");
    };

    rsx! {
        div {
            class: "max-w-sm mx-auto p-4",
            h2 {
                class: "text-xl font-bold mb-6",
                "Sign in"
            }

            if let Some(current) = signed_in_as {
                div {
                    class: "flex flex-col gap-4",
                    p {
                        class: "text-muted-foreground",
                        "Signed in as {current}"
                    }
                    button {
                        class: "px-6 py-2 border border-border rounded-full font-semibold hover:bg-accent transition self-start",
                        onclick: sign_out,
                        "Sign out"
                    }
                }
            } else {
                div {
                    class: "flex flex-col gap-4",
                    input {
                        class: "px-3 py-2 border border-border rounded-lg bg-background",
                        placeholder: "Account id",
                        value: "{user_id}",
                        oninput: move |evt| user_id.set(evt.value()),
                    }
                    if let Some(message) = error.read().as_ref() {
                        p { class: "text-sm text-red-500", "{message}" }
                    }
                    button {
                        class: "px-6 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded-full font-semibold transition self-start",
                        onclick: sign_in,
                        "Sign in"
                    }
                }
            }
        }
    }
}
