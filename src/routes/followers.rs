use dioxus::prelude::*;

use crate::context::AppContext;
use crate::controllers::view::count_label;
use crate::models::FollowType;
use crate::routes::Route;

/// Follower / following list of a user
#[component]
pub fn FollowersList(user_id: String, follow_type: FollowType) -> Element {
    let ctx = use_context::<AppContext>();
    let counts = ctx.attributes().counts(&user_id);

    let heading = match follow_type {
        FollowType::Followers => "Followers",
        FollowType::Following => "Following",
    };
    let summary = counts.map(|(followers, following)| match follow_type {
        FollowType::Followers => count_label(followers, "followers"),
        FollowType::Following => count_label(following, "following"),
    });

    rsx! {
        div {
            class: "min-h-screen",
            div {
                class: "sticky top-0 z-20 bg-background/80 backdrop-blur-sm border-b border-border",
                div {
                    class: "px-4 py-3 flex items-center gap-4",
                    button {
                        class: "p-2 hover:bg-accent rounded-full transition",
                        onclick: move |_| {
                            let nav = navigator();
                            nav.go_back();
                        },
                        "←"
                    }
                    div {
                        h2 {
                            class: "text-xl font-bold",
                            "{heading}"
                        }
                        if let Some(summary) = summary {
                            p {
                                class: "text-sm text-muted-foreground",
                                "{summary}"
                            }
                        }
                    }
                }
            }

            div {
                class: "p-4",
                Link {
                    to: Route::Profile { user_id: user_id.clone() },
                    class: "text-blue-500 hover:underline",
                    "Back to profile"
                }
            }
        }
    }
}
