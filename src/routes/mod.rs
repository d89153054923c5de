use dioxus::prelude::*;

pub mod authorization;
pub mod followers;
pub mod profile;
pub mod settings;

use authorization::Authorization;
use followers::FollowersList;
use profile::{MyProfile, Profile};
use settings::EditProfile;

use crate::components::icons::{SettingsIcon, UserIcon};
use crate::models::FollowType;
use crate::stores::auth_store::AUTH_STATE;

/// App routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/")]
        MyProfile {},

        #[route("/profile/:user_id")]
        Profile { user_id: String },

        #[route("/profile/:user_id/:follow_type")]
        FollowersList { user_id: String, follow_type: FollowType },

        #[route("/settings")]
        EditProfile {},

        #[route("/sign-in")]
        Authorization {},
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    let auth = AUTH_STATE.read().clone();
    let current_route = use_route::<Route>();
    let on_own_profile = matches!(current_route, Route::MyProfile {});

    rsx! {
        div {
            class: "min-h-screen bg-background transition-colors",
            div {
                class: "flex justify-center max-w-[1000px] mx-auto",

                // Left navigation
                aside {
                    class: "w-[220px] flex-shrink-0 border-r border-border sticky top-0 h-screen hidden md:block",
                    nav {
                        class: "flex flex-col gap-1 p-4",
                        NavLink {
                            to: Route::MyProfile {},
                            active: on_own_profile,
                            icon: rsx! { UserIcon { class: "w-6 h-6" } },
                            label: "Profile"
                        }
                        if auth.is_authenticated {
                            NavLink {
                                to: Route::EditProfile {},
                                active: matches!(current_route, Route::EditProfile {}),
                                icon: rsx! { SettingsIcon { class: "w-6 h-6" } },
                                label: "Settings"
                            }
                        }
                        Link {
                            to: Route::Authorization {},
                            class: "px-4 py-2 rounded-full hover:bg-accent transition text-muted-foreground",
                            if auth.is_authenticated { "Sign out" } else { "Sign in" }
                        }
                    }
                }

                main {
                    class: "flex-1 min-w-0",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
fn NavLink(to: Route, active: bool, icon: Element, label: &'static str) -> Element {
    let font_class = if active { "font-bold" } else { "" };

    rsx! {
        Link {
            to: to,
            class: "flex items-center justify-start gap-4 px-4 py-2 rounded-full hover:bg-accent transition text-lg w-full {font_class}",
            {icon}
            span {
                "{label}"
            }
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div {
            class: "text-center py-12",
            h2 {
                class: "text-xl font-bold mb-2",
                "Page not found"
            }
            p {
                class: "text-muted-foreground mb-4",
                "/{path}"
            }
            Link {
                to: Route::MyProfile {},
                class: "text-blue-500 hover:underline",
                "Go to your profile"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_followers_route_round_trips() {
        let route = Route::FollowersList {
            user_id: "u1".to_string(),
            follow_type: FollowType::Following,
        };
        let path = route.to_string();
        assert_eq!(path, "/profile/u1/following");
        assert_eq!(path.parse::<Route>().ok(), Some(route));
    }

    #[test]
    fn test_profile_route() {
        assert_eq!(
            "/profile/u7".parse::<Route>().ok(),
            Some(Route::Profile { user_id: "u7".to_string() })
        );
    }
}
