use dioxus::prelude::*;

use crate::controllers::ConfirmPrompt;

/// Yes/no modal for a `ConfirmPrompt`
#[component]
pub fn ConfirmModal(
    prompt: ConfirmPrompt,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        // Modal overlay - clicking outside cancels
        div {
            class: "fixed inset-0 bg-black/50 z-50 flex items-center justify-center p-4",
            onclick: move |_| on_cancel.call(()),

            div {
                class: "bg-card border border-border rounded-xl max-w-sm w-full p-6 shadow-xl",
                role: "dialog",
                aria_modal: "true",
                aria_labelledby: "modal-title",
                onclick: move |e| e.stop_propagation(),

                h2 {
                    class: "text-lg font-bold mb-2",
                    id: "modal-title",
                    "{prompt.title}"
                }

                if !prompt.message.is_empty() {
                    p {
                        class: "text-muted-foreground mb-6",
                        "{prompt.message}"
                    }
                }

                div {
                    class: "flex gap-3 justify-end mt-4",

                    button {
                        class: "px-4 py-2 rounded-lg hover:bg-accent transition",
                        onclick: move |_| on_cancel.call(()),
                        "{prompt.cancel_text}"
                    }

                    button {
                        class: "px-4 py-2 bg-destructive text-destructive-foreground rounded-lg hover:bg-destructive/90 transition",
                        onclick: move |_| on_confirm.call(()),
                        "{prompt.confirm_text}"
                    }
                }
            }
        }
    }
}
