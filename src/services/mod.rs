// Backend collaborators
// Traits consumed by the controllers, plus the concrete HTTP implementations

pub mod api_client;
pub mod reachability;

use async_trait::async_trait;
use std::rc::Rc;

use crate::errors::ProfileResult;
use crate::models::{Post, User};
use crate::stores::alerts::AlertManager;
use crate::stores::attributes_cache::AttributesCache;
use crate::stores::auth_store::SessionStore;

pub use api_client::ApiClient;
pub use reachability::BrowserReachability;

#[async_trait(?Send)]
pub trait UserService {
    async fn fetch_user(&self, user_id: &str) -> ProfileResult<User>;
}

#[async_trait(?Send)]
pub trait PostService {
    /// First page of a user's feed
    async fn load_posts(&self, user: &User) -> ProfileResult<Vec<Post>>;
    /// Page starting at `offset` posts into the feed
    async fn load_paged_posts(&self, user: &User, offset: usize) -> ProfileResult<Vec<Post>>;
}

#[async_trait(?Send)]
pub trait ActivityService {
    async fn check_is_following(&self, user: &User) -> ProfileResult<bool>;
    async fn follow_user_eventually(&self, user: &User) -> ProfileResult<bool>;
    async fn unfollow_user_eventually(&self, user: &User) -> ProfileResult<bool>;
    /// (followers, following)
    async fn fetch_followers_quantity(&self, user: &User) -> ProfileResult<(u64, u64)>;
}

pub trait ReachabilityService {
    fn is_reachable(&self) -> bool;
}

#[async_trait(?Send)]
pub trait ImageService {
    /// Resolve an avatar reference into something an `img` can display
    async fn load_avatar(&self, avatar_ref: &str) -> ProfileResult<String>;
}

/// Typed access to every collaborator a profile screen needs.
///
/// Cloning is cheap; all clones share the same services and stores.
#[derive(Clone)]
pub struct ServiceLocator {
    users: Rc<dyn UserService>,
    posts: Rc<dyn PostService>,
    activity: Rc<dyn ActivityService>,
    reachability: Rc<dyn ReachabilityService>,
    images: Rc<dyn ImageService>,
    attributes: AttributesCache,
    session: SessionStore,
    alerts: AlertManager,
}

impl ServiceLocator {
    pub fn new(
        users: Rc<dyn UserService>,
        posts: Rc<dyn PostService>,
        activity: Rc<dyn ActivityService>,
        reachability: Rc<dyn ReachabilityService>,
        images: Rc<dyn ImageService>,
    ) -> Self {
        Self {
            users,
            posts,
            activity,
            reachability,
            images,
            attributes: AttributesCache::new(),
            session: SessionStore::new(),
            alerts: AlertManager::new(),
        }
    }

    /// Locator backed by one HTTP client for every remote service
    pub fn with_api_client(client: Rc<ApiClient>) -> Self {
        let session = client.session().clone();
        Self::new(
            client.clone(),
            client.clone(),
            client.clone(),
            Rc::new(BrowserReachability),
            client,
        )
        .with_session(session)
    }

    pub fn with_attributes_cache(mut self, attributes: AttributesCache) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_session(mut self, session: SessionStore) -> Self {
        self.session = session;
        self
    }

    pub fn with_alerts(mut self, alerts: AlertManager) -> Self {
        self.alerts = alerts;
        self
    }

    pub fn user_service(&self) -> Rc<dyn UserService> {
        self.users.clone()
    }

    pub fn post_service(&self) -> Rc<dyn PostService> {
        self.posts.clone()
    }

    pub fn activity_service(&self) -> Rc<dyn ActivityService> {
        self.activity.clone()
    }

    pub fn reachability(&self) -> Rc<dyn ReachabilityService> {
        self.reachability.clone()
    }

    pub fn image_service(&self) -> Rc<dyn ImageService> {
        self.images.clone()
    }

    pub fn attributes(&self) -> &AttributesCache {
        &self.attributes
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }
}
