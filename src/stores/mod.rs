// Global state management
// Stores provide shared state across the application

pub mod alerts;
pub mod attributes_cache;
pub mod auth_store;
pub mod post_adapter;
pub mod settings_store;
