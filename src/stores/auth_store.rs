use dioxus::prelude::*;
use gloo_storage::{LocalStorage, Storage};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Authentication state of the viewer
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    pub user_id: Option<String>,
    pub is_authenticated: bool,
}

const STORAGE_KEY_SESSION: &str = "profile_session";

/// Reactive mirror of the session for rendering
pub static AUTH_STATE: GlobalSignal<AuthState> = Signal::global(AuthState::default);

/// Copy the session into `AUTH_STATE`
pub fn sync_auth_state(session: &SessionStore) {
    *AUTH_STATE.write() = session.state();
}

/// Process-wide session handle. Clones share the same state.
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    state: Arc<RwLock<AuthState>>,
}

impl SessionStore {
    /// Anonymous session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_state(AuthState {
            user_id: Some(user_id.into()),
            is_authenticated: true,
        });
        store
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    pub fn set_state(&self, state: AuthState) {
        *self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// The "not authorized" flag: no signed-in account
    pub fn is_not_authorized(&self) -> bool {
        let state = self.state();
        !state.is_authenticated || state.user_id.is_none()
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.state().user_id
    }

    /// Restore the last session from LocalStorage
    pub fn restore() -> Self {
        let store = Self::new();
        match LocalStorage::get::<AuthState>(STORAGE_KEY_SESSION) {
            Ok(state) => {
                log::info!("Restored session for {:?}", state.user_id);
                store.set_state(state);
            }
            Err(e) => log::debug!("No stored session: {}", e),
        }
        store
    }

    pub fn sign_in(&self, user_id: &str) -> Result<(), String> {
        let state = AuthState {
            user_id: Some(user_id.to_string()),
            is_authenticated: true,
        };
        LocalStorage::set(STORAGE_KEY_SESSION, &state)
            .map_err(|e| format!("Failed to persist session: {}", e))?;
        self.set_state(state);
        Ok(())
    }

    pub fn sign_out(&self) {
        LocalStorage::delete(STORAGE_KEY_SESSION);
        self.set_state(AuthState::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_is_not_authorized() {
        let session = SessionStore::new();
        assert!(session.is_not_authorized());
        assert_eq!(session.current_user_id(), None);
    }

    #[test]
    fn test_authenticated_session() {
        let session = SessionStore::authenticated("viewer");
        assert!(!session.is_not_authorized());
        assert_eq!(session.current_user_id().as_deref(), Some("viewer"));
    }

    #[test]
    fn test_clones_share_state() {
        let session = SessionStore::new();
        let other = session.clone();
        other.set_state(AuthState {
            user_id: Some("u9".to_string()),
            is_authenticated: true,
        });
        assert!(!session.is_not_authorized());
    }

    #[test]
    fn test_read_only_identity_is_not_authorized() {
        let session = SessionStore::new();
        session.set_state(AuthState {
            user_id: Some("lurker".to_string()),
            is_authenticated: false,
        });
        assert!(session.is_not_authorized());
    }
}
