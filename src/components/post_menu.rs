use dioxus::prelude::*;

use crate::controllers::SettingsAction;
use crate::models::Post;

/// Per-post action sheet
#[component]
pub fn PostMenu(
    post: Post,
    /// Offer sign-in instead of acting as the signed-in user
    show_authorize: bool,
    on_action: EventHandler<SettingsAction>,
    on_close: EventHandler<()>,
) -> Element {
    let preview: String = post.text.chars().take(80).collect();

    rsx! {
        // Backdrop to close menu when clicking outside
        div {
            class: "fixed inset-0 bg-black/30 z-40 flex items-end sm:items-center justify-center",
            onclick: move |_| on_close.call(()),

            div {
                class: "w-full sm:w-80 bg-background border border-border rounded-t-xl sm:rounded-xl shadow-lg z-50 py-1",
                onclick: move |e: MouseEvent| e.stop_propagation(),

                if !preview.is_empty() {
                    p {
                        class: "px-4 py-2 text-xs text-muted-foreground truncate",
                        "{preview}"
                    }
                    div { class: "h-px bg-border my-1" }
                }

                button {
                    class: "w-full text-left px-4 py-3 hover:bg-accent transition-colors text-red-500 hover:text-red-600",
                    onclick: move |_| on_action.call(SettingsAction::RemovePost),
                    span { class: "text-sm", "Remove post" }
                }

                if show_authorize {
                    button {
                        class: "w-full text-left px-4 py-3 hover:bg-accent transition-colors",
                        onclick: move |_| on_action.call(SettingsAction::Authorize),
                        span { class: "text-sm", "Sign in" }
                    }
                }

                div { class: "h-px bg-border my-1" }

                button {
                    class: "w-full text-left px-4 py-3 hover:bg-accent transition-colors text-muted-foreground",
                    onclick: move |_| on_close.call(()),
                    span { class: "text-sm", "Cancel" }
                }
            }
        }
    }
}
