/// Application Context
///
/// Owns the stores shared by every screen (session, attributes cache, alert
/// manager) and builds service locators over them, so components only need
/// `use_context::<AppContext>()`.
use std::rc::Rc;

use crate::services::{ApiClient, ServiceLocator};
use crate::stores::alerts::AlertManager;
use crate::stores::attributes_cache::AttributesCache;
use crate::stores::auth_store::SessionStore;
use crate::stores::settings_store::AppConfig;

#[derive(Clone)]
pub struct AppContext {
    session: SessionStore,
    attributes: AttributesCache,
    alerts: AlertManager,
}

impl AppContext {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            attributes: AttributesCache::new(),
            alerts: AlertManager::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn attributes(&self) -> &AttributesCache {
        &self.attributes
    }

    /// Locator talking to the backend described by `config`.
    ///
    /// Every locator built here shares this context's session, cache and alert manager.
    pub fn locator(&self, config: &AppConfig) -> ServiceLocator {
        let client = Rc::new(ApiClient::new(config, self.session.clone()));
        ServiceLocator::with_api_client(client)
            .with_attributes_cache(self.attributes.clone())
            .with_alerts(self.alerts.clone())
    }
}
