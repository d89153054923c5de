/// App configuration, persisted in LocalStorage
use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Runtime configuration of the client
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Posts requested per infinite-scroll page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_toast_duration_secs")]
    pub toast_duration_secs: u64,
    #[serde(default)]
    pub version: u32, // Config schema version
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_toast_duration_secs() -> u64 {
    3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            page_size: default_page_size(),
            toast_duration_secs: default_toast_duration_secs(),
            version: 1,
        }
    }
}

impl AppConfig {
    /// Reject values the client cannot work with
    pub fn validate(&self) -> Result<(), String> {
        let url = self.api_base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(format!("API base URL must be http(s): {}", url));
        }
        if self.page_size == 0 {
            return Err("Page size must be positive".to_string());
        }
        Ok(())
    }
}

const STORAGE_KEY_CONFIG: &str = "profile_app_config";

/// Live configuration
pub static APP_CONFIG: GlobalSignal<AppConfig> = Signal::global(AppConfig::default);

/// Load the stored configuration, falling back to defaults
pub fn init_config() {
    match LocalStorage::get::<AppConfig>(STORAGE_KEY_CONFIG) {
        Ok(config) => match config.validate() {
            Ok(()) => {
                log::info!("Loaded config, API at {}", config.api_base_url);
                *APP_CONFIG.write() = config;
            }
            Err(e) => log::warn!("Ignoring stored config: {}", e),
        },
        Err(e) => log::debug!("No stored config, using defaults: {}", e),
    }
}

pub fn current_config() -> AppConfig {
    APP_CONFIG.read().clone()
}

/// Validate, persist and publish a new configuration
pub fn save_config(config: AppConfig) -> Result<(), String> {
    config.validate()?;
    LocalStorage::set(STORAGE_KEY_CONFIG, &config)
        .map_err(|e| format!("Failed to save config: {}", e))?;
    *APP_CONFIG.write() = config;
    Ok(())
}
