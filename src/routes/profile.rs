use async_trait::async_trait;
use dioxus::prelude::*;
use dioxus::router::Navigator;
use futures::channel::oneshot;
use std::rc::Rc;

use crate::components::icons::{RefreshIcon, SettingsIcon};
use crate::components::toast;
use crate::components::{ConfirmModal, PostCard, PostMenu};
use crate::context::AppContext;
use crate::controllers::view::AvatarImage;
use crate::controllers::{
    ConfirmPrompt, ProfileRouter, ProfileScreenController, ProfileScreenState, ProfileView,
    ScreenPhase,
};
use crate::hooks::use_infinite_scroll;
use crate::models::{FollowType, Post, User};
use crate::routes::Route;
use crate::stores::alerts::AlertListener;
use crate::stores::auth_store::AUTH_STATE;
use crate::stores::post_adapter::PostAdapterDelegate;
use crate::stores::settings_store::APP_CONFIG;

/// A question on screen, waiting for the user's answer
struct PendingPrompt {
    prompt: ConfirmPrompt,
    reply: oneshot::Sender<bool>,
}

fn answer(mut pending: Signal<Option<PendingPrompt>>, accepted: bool) {
    if let Some(pending) = std::mem::take(&mut *pending.write()) {
        // the asking task may be gone already
        let _ = pending.reply.send(accepted);
    }
}

/// Signals the profile controller renders into
#[derive(Clone, Copy)]
struct DioxusProfileView {
    state: Signal<ProfileScreenState>,
    has_more: Signal<bool>,
    loading_more: Signal<bool>,
    empty: Signal<bool>,
    menu: Signal<Option<(Post, usize)>>,
    prompt: Signal<Option<PendingPrompt>>,
}

#[async_trait(?Send)]
impl ProfileView for DioxusProfileView {
    fn state_changed(&self, state: &ProfileScreenState) {
        let (mut current, mut has_more, mut loading_more) = (self.state, self.has_more, self.loading_more);
        current.set(state.clone());
        // the scroll hook re-arms on every write, so only write changes
        if *has_more.peek() != state.has_more {
            has_more.set(state.has_more);
        }
        if *loading_more.peek() != state.loading_more {
            loading_more.set(state.loading_more);
        }
    }

    fn show_toast(&self, message: &str) {
        toast::show_toast(message);
    }

    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        let (reply, answered) = oneshot::channel();
        let mut pending = self.prompt;
        // replacing an unanswered prompt drops its sender, which reads as "no"
        pending.set(Some(PendingPrompt { prompt, reply }));
        answered.await.unwrap_or(false)
    }

    async fn present_registration_prompt(&self) -> bool {
        self.confirm(ConfirmPrompt::registration()).await
    }
}

impl PostAdapterDelegate for DioxusProfileView {
    fn show_settings_menu(&self, post: &Post, index: usize) {
        let mut menu = self.menu;
        menu.set(Some((post.clone(), index)));
    }

    fn show_placeholder_for_empty_data_set(&self) {
        let mut empty = self.empty;
        empty.set(true);
    }

    fn requested_view_update(&self) {
        let mut empty = self.empty;
        if *empty.peek() {
            empty.set(false);
        }
    }
}

/// Navigation through the app router; alerts become toasts
struct AppRouter {
    navigator: Navigator,
}

impl AlertListener for AppRouter {
    fn show_alert(&self, title: &str, message: &str) {
        toast::show_alert(title, message);
    }
}

impl ProfileRouter for AppRouter {
    fn show_edit_profile(&self) {
        self.navigator.push(Route::EditProfile {});
    }

    fn show_authorization(&self) {
        self.navigator.push(Route::Authorization {});
    }

    fn show_followers_list(&self, user: &User, follow_type: FollowType) {
        self.navigator.push(Route::FollowersList {
            user_id: user.id.clone(),
            follow_type,
        });
    }
}

/// The signed-in viewer's own profile
#[component]
pub fn MyProfile() -> Element {
    let auth = AUTH_STATE.read().clone();

    match auth.user_id.filter(|_| auth.is_authenticated) {
        Some(user_id) => rsx! {
            ProfileScreen { user_id }
        },
        None => rsx! {
            div {
                class: "text-center py-12",
                p {
                    class: "text-muted-foreground mb-4",
                    "Sign in to see your profile"
                }
                Link {
                    to: Route::Authorization {},
                    class: "px-6 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded-full font-semibold transition",
                    "Sign in"
                }
            }
        },
    }
}

#[component]
pub fn Profile(user_id: String) -> Element {
    rsx! {
        ProfileScreen { user_id }
    }
}

#[component]
fn ProfileScreen(user_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let state = use_signal(ProfileScreenState::default);
    let has_more = use_signal(|| false);
    let loading_more = use_signal(|| false);
    let empty = use_signal(|| false);
    let mut menu = use_signal(|| None::<(Post, usize)>);
    let prompt = use_signal(|| None::<PendingPrompt>);
    let nav = navigator();

    let ctx_for_screen = ctx.clone();
    let screen = use_hook(move || {
        let view = Rc::new(DioxusProfileView {
            state,
            has_more,
            loading_more,
            empty,
            menu,
            prompt,
        });
        let router = Rc::new(AppRouter { navigator: nav });
        let locator = ctx_for_screen.locator(&APP_CONFIG.peek());
        ProfileScreenController::new(locator, router, view)
    });

    // Rebuild services when the settings page saves a new config
    let screen_for_config = screen.clone();
    use_effect(move || {
        let config = APP_CONFIG.read().clone();
        screen_for_config.set_locator(ctx.locator(&config));
    });

    let screen_for_appear = screen.clone();
    use_effect(move || screen_for_appear.view_did_appear());

    let screen_for_load = screen.clone();
    use_effect(use_reactive(&user_id, move |user_id| {
        let screen = screen_for_load.clone();
        spawn(async move {
            if let Err(e) = screen.set_user_id(&user_id).await {
                log::warn!("Could not open profile {}: {}", user_id, e);
            }
        });
    }));

    let screen_for_scroll = screen.clone();
    let sentinel_id = use_infinite_scroll(
        move || {
            let screen = screen_for_scroll.clone();
            spawn(async move {
                if let Err(e) = screen.load_more().await {
                    log::debug!("Load more failed: {}", e);
                }
            });
        },
        has_more,
        loading_more,
    );

    let current = state.read().clone();
    let header = current.header.clone();
    let button = current.follow_button;
    let button_label = if button.busy { "..." } else { button.label() };
    let title = header.title.clone().unwrap_or_default();
    let username = header.username.clone().unwrap_or_default();
    let initial = username.chars().next().map(|c| c.to_uppercase().to_string()).unwrap_or_default();
    let pending_prompt = prompt.read().as_ref().map(|pending| pending.prompt.clone());
    let open_menu = menu.read().clone();
    let show_authorize = !AUTH_STATE.read().is_authenticated;
    let initial_loading = current.phase != ScreenPhase::Rendered && current.posts.is_empty();

    let screen_refresh = screen.clone();
    let screen_settings = screen.clone();
    let screen_follow = screen.clone();
    let screen_followers = screen.clone();
    let screen_following = screen.clone();
    let screen_menu = screen.clone();
    let screen_displayed = screen.clone();
    let screen_action = screen.clone();

    rsx! {
        div {
            class: "min-h-screen",

            // Header bar
            div {
                class: "sticky top-0 z-20 bg-background/80 backdrop-blur-sm border-b border-border",
                div {
                    class: "px-4 py-3 flex items-center justify-between gap-4",
                    h2 {
                        class: "text-xl font-bold",
                        "{title}"
                    }
                    div {
                        class: "flex items-center gap-2",
                        button {
                            class: "p-2 hover:bg-accent rounded-full transition disabled:opacity-50",
                            aria_label: "Refresh",
                            disabled: current.refreshing || current.user.is_none(),
                            onclick: move |_| {
                                let screen = screen_refresh.clone();
                                spawn(async move {
                                    if let Err(e) = screen.pull_to_refresh().await {
                                        log::debug!("Refresh failed: {}", e);
                                    }
                                });
                            },
                            if current.refreshing {
                                span {
                                    class: "inline-block w-5 h-5 border-2 border-current border-t-transparent rounded-full animate-spin"
                                }
                            } else {
                                RefreshIcon { class: "w-5 h-5" }
                            }
                        }
                        if header.settings_enabled {
                            button {
                                class: "p-2 hover:bg-accent rounded-full transition",
                                aria_label: "Settings",
                                onclick: move |_| screen_settings.settings_tapped(),
                                SettingsIcon { class: "w-5 h-5" }
                            }
                        }
                    }
                }
            }

            // Avatar, name and follow control
            div {
                class: "px-4 pt-6 pb-4 border-b border-border",
                div {
                    class: "flex items-start justify-between",
                    match &header.avatar {
                        AvatarImage::Loaded(src) => rsx! {
                            img {
                                class: "w-24 h-24 rounded-full border-4 border-background bg-background object-cover",
                                src: "{src}",
                                alt: "Avatar"
                            }
                        },
                        AvatarImage::Placeholder => rsx! {
                            div {
                                class: "w-24 h-24 rounded-full bg-blue-600 flex items-center justify-center text-white text-3xl font-bold",
                                "{initial}"
                            }
                        },
                    }

                    if !button.hidden && current.user.is_some() {
                        button {
                            class: if button.is_selected() {
                                "px-6 py-2 border border-border rounded-full font-semibold hover:bg-accent transition disabled:opacity-50"
                            } else {
                                "px-6 py-2 bg-foreground text-background rounded-full font-semibold hover:opacity-90 transition disabled:opacity-50"
                            },
                            disabled: !button.accepts_taps(),
                            onclick: move |_| {
                                let screen = screen_follow.clone();
                                spawn(async move {
                                    if let Err(e) = screen.follow_tapped().await {
                                        log::debug!("Follow tap not completed: {}", e);
                                    }
                                });
                            },
                            "{button_label}"
                        }
                    }
                }

                h1 {
                    class: "text-2xl font-bold mt-3",
                    "{username}"
                }

                // Follower counts
                div {
                    class: "flex gap-4 mt-3",
                    if let Some(text) = &header.followers_text {
                        button {
                            class: "hover:underline text-muted-foreground",
                            onclick: move |_| {
                                screen_followers.followers_tapped();
                            },
                            "{text}"
                        }
                    }
                    if let Some(text) = &header.following_text {
                        button {
                            class: "hover:underline text-muted-foreground",
                            onclick: move |_| {
                                screen_following.following_tapped();
                            },
                            "{text}"
                        }
                    }
                }
            }

            // Feed
            div {
                if current.activity_shown && !initial_loading {
                    div {
                        class: "flex justify-center py-2",
                        span {
                            class: "inline-block w-4 h-4 border-2 border-current border-t-transparent rounded-full animate-spin text-muted-foreground"
                        }
                    }
                }

                if initial_loading {
                    div {
                        class: "flex justify-center py-12",
                        span {
                            class: "inline-block w-8 h-8 border-2 border-current border-t-transparent rounded-full animate-spin text-muted-foreground"
                        }
                    }
                } else if *empty.read() {
                    div {
                        class: "text-center py-12",
                        p {
                            class: "text-muted-foreground",
                            "No posts yet"
                        }
                    }
                } else {
                    for (index, post) in current.posts.iter().cloned().enumerate() {
                        PostCard {
                            key: "{post.id}",
                            post,
                            index,
                            on_menu: {
                                let screen = screen_menu.clone();
                                move |index| screen.post_menu_tapped(index)
                            },
                            on_displayed: {
                                let screen = screen_displayed.clone();
                                move |index: usize| {
                                    if index == 0 {
                                        screen.first_post_displayed();
                                    }
                                }
                            },
                        }
                    }

                    // Infinite scroll sentinel / loading indicator
                    if current.has_more {
                        div {
                            id: "{sentinel_id}",
                            class: "p-8 flex justify-center",
                            if current.loading_more {
                                span {
                                    class: "flex items-center gap-2 text-muted-foreground",
                                    span {
                                        class: "inline-block w-5 h-5 border-2 border-current border-t-transparent rounded-full animate-spin"
                                    }
                                    "Loading more..."
                                }
                            }
                        }
                    } else if !current.posts.is_empty() {
                        div {
                            class: "p-8 text-center text-muted-foreground",
                            "You've reached the end"
                        }
                    }
                }
            }
        }

        if let Some(question) = pending_prompt {
            ConfirmModal {
                prompt: question,
                on_confirm: move |_| answer(prompt, true),
                on_cancel: move |_| answer(prompt, false),
            }
        }

        if let Some((post, index)) = open_menu {
            PostMenu {
                post,
                show_authorize,
                on_action: move |action| {
                    menu.set(None);
                    screen_action.handle_settings_action(index, action);
                },
                on_close: move |_| menu.set(None),
            }
        }
    }
}
