use dioxus::prelude::*;

use crate::stores::settings_store::{self, AppConfig, DEFAULT_API_BASE_URL};

/// Own-profile settings: backend address, page size and toast duration
#[component]
pub fn EditProfile() -> Element {
    let initial = settings_store::current_config();
    let mut api_base_url = use_signal(|| initial.api_base_url.clone());
    let mut page_size = use_signal(|| initial.page_size.to_string());
    let mut toast_secs = use_signal(|| initial.toast_duration_secs.to_string());
    let mut save_status = use_signal(|| None::<Result<String, String>>);

    let save = move |_| {
        let current = settings_store::current_config();
        let config = match parse_form(
            &current,
            &api_base_url.read(),
            &page_size.read(),
            &toast_secs.read(),
        ) {
            Ok(config) => config,
            Err(e) => {
                save_status.set(Some(Err(e)));
                return;
            }
        };

        match settings_store::save_config(config) {
            Ok(()) => {
                log::info!("Settings saved");
                save_status.set(Some(Ok("Settings saved".to_string())));
            }
            Err(e) => {
                log::error!("Failed to save settings: {}", e);
                save_status.set(Some(Err(e)));
            }
        }

        spawn(async move {
            // Clear message after 3 seconds
            gloo_timers::future::TimeoutFuture::new(3000).await;
            save_status.set(None);
        });
    };

    rsx! {
        div {
            class: "max-w-xl mx-auto p-4",
            h2 {
                class: "text-xl font-bold mb-6",
                "Settings"
            }

            div {
                class: "flex flex-col gap-4",

                label {
                    class: "flex flex-col gap-1",
                    span { class: "text-sm font-medium", "API base URL" }
                    input {
                        class: "px-3 py-2 border border-border rounded-lg bg-background",
                        r#type: "url",
                        placeholder: DEFAULT_API_BASE_URL,
                        value: "{api_base_url}",
                        oninput: move |evt| api_base_url.set(evt.value()),
                    }
                }

                label {
                    class: "flex flex-col gap-1",
                    span { class: "text-sm font-medium", "Posts per page" }
                    input {
                        class: "px-3 py-2 border border-border rounded-lg bg-background",
                        r#type: "number",
                        min: "1",
                        value: "{page_size}",
                        oninput: move |evt| page_size.set(evt.value()),
                    }
                }

                label {
                    class: "flex flex-col gap-1",
                    span { class: "text-sm font-medium", "Toast duration (seconds)" }
                    input {
                        class: "px-3 py-2 border border-border rounded-lg bg-background",
                        r#type: "number",
                        min: "1",
                        value: "{toast_secs}",
                        oninput: move |evt| toast_secs.set(evt.value()),
                    }
                }

                button {
                    class: "px-6 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded-full font-semibold transition self-start",
                    onclick: save,
                    "Save"
                }

                match save_status.read().clone() {
                    Some(Ok(message)) => rsx! {
                        p { class: "text-sm text-green-600", "{message}" }
                    },
                    Some(Err(message)) => rsx! {
                        p { class: "text-sm text-red-500", "{message}" }
                    },
                    None => rsx! {},
                }
            }
        }
    }
}

/// Build a config from the form fields, keeping everything else from `current`
fn parse_form(
    current: &AppConfig,
    api_base_url: &str,
    page_size: &str,
    toast_secs: &str,
) -> Result<AppConfig, String> {
    let page_size = page_size
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("Invalid page size: {}", e))?;
    let toast_duration_secs = toast_secs
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("Invalid toast duration: {}", e))?;

    let config = AppConfig {
        api_base_url: api_base_url.trim().to_string(),
        page_size,
        toast_duration_secs,
        ..current.clone()
    };
    config.validate()?;
    Ok(config)
}
