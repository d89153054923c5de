use dioxus::prelude::*;

use crate::components::icons::MoreHorizontalIcon;
use crate::models::Post;
use crate::utils::format_relative_time;

/// One row of the profile feed
#[component]
pub fn PostCard(
    post: Post,
    index: usize,
    on_menu: EventHandler<usize>,
    /// Fired with `index` once the row is mounted
    on_displayed: EventHandler<usize>,
) -> Element {
    let posted = format_relative_time(post.created_at);

    rsx! {
        article {
            class: "px-4 py-3 border-b border-border hover:bg-accent/30 transition",
            onmounted: move |_| on_displayed.call(index),

            div {
                class: "flex items-start justify-between gap-2",
                span {
                    class: "text-sm text-muted-foreground",
                    "{posted}"
                }
                button {
                    class: "p-2 rounded-full hover:bg-accent transition-colors text-muted-foreground hover:text-foreground",
                    aria_label: "Post options",
                    onclick: move |e: MouseEvent| {
                        e.stop_propagation();
                        on_menu.call(index);
                    },
                    MoreHorizontalIcon { class: "h-5 w-5" }
                }
            }

            if !post.text.is_empty() {
                p {
                    class: "whitespace-pre-wrap break-words mt-1",
                    "{post.text}"
                }
            }

            if let Some(image) = &post.image_ref {
                img {
                    class: "mt-3 rounded-xl border border-border max-h-96 w-full object-cover",
                    src: "{image}",
                    alt: "Post image",
                    loading: "lazy"
                }
            }
        }
    }
}
