//! Sequencing of profile loads
//!
//! Binds a user, triggers the header render and the first page of posts, and
//! handles pull-to-refresh and infinite scroll. Stale replies are detected with
//! two counters:
//! - the bind generation, bumped on every (re)bind
//! - the reload ticket, bumped on every Reload request
//!
//! A Reload reply applies only with the latest ticket; a LoadMore reply applies
//! only if no Reload was issued while it was in flight.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::errors::{ProfileError, ProfileResult};
use crate::models::{Post, User};
use crate::services::ServiceLocator;
use crate::stores::post_adapter::{PostAdapter, PostAdapterDelegate, UpdateMode};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScreenPhase {
    #[default]
    Unbound,
    Loading,
    Rendered,
}

/// What happened to a load request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Reply merged into the feed (number of posts received)
    Applied(usize),
    /// Reply arrived for a superseded request and was dropped
    Discarded,
    /// Request not issued (nothing bound, or an equivalent load is in flight)
    Skipped,
}

/// Receives the side effects of loads
#[async_trait(?Send)]
pub trait LoadObserver {
    /// Fill header, follow state and counts for a newly bound user
    async fn render(&self, user: &User, generation: u64);
    /// The attributes cache was cleared after a refresh
    async fn attributes_cleared(&self, user: &User, generation: u64);
    /// Busy flags, posts or phase changed
    fn loads_changed(&self);
}

#[derive(Default)]
pub struct ProfileLoadCoordinator {
    adapter: RefCell<PostAdapter>,
    user: RefCell<Option<User>>,
    generation: Cell<u64>,
    user_request: Cell<u64>,
    reload_ticket: Cell<u64>,
    reloading: Cell<bool>,
    initial_load_done: Cell<bool>,
    refreshing: Cell<bool>,
    loading_more: Cell<bool>,
    has_more: Cell<bool>,
}

impl ProfileLoadCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_delegate(&self, delegate: &Rc<dyn PostAdapterDelegate>) {
        self.adapter.borrow_mut().set_delegate(delegate);
    }

    pub fn user(&self) -> Option<User> {
        self.user.borrow().clone()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    pub fn phase(&self) -> ScreenPhase {
        if self.user.borrow().is_none() {
            ScreenPhase::Unbound
        } else if !self.initial_load_done.get() || self.refreshing.get() {
            ScreenPhase::Loading
        } else {
            ScreenPhase::Rendered
        }
    }

    pub fn initial_load_done(&self) -> bool {
        self.initial_load_done.get()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.get()
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more.get()
    }

    pub fn has_more(&self) -> bool {
        self.has_more.get()
    }

    pub fn post_quantity(&self) -> usize {
        self.adapter.borrow().post_quantity()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.adapter.borrow().posts().to_vec()
    }

    /// Remove one post. No notification is sent; the caller redraws.
    pub fn remove_post(&self, index: usize) -> Post {
        self.adapter.borrow_mut().remove_post(index)
    }

    pub fn request_settings_menu(&self, index: usize) {
        self.adapter.borrow().request_settings_menu(index);
    }

    fn bind(&self, user: User) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.user_request.set(self.user_request.get() + 1);
        *self.user.borrow_mut() = Some(user);

        self.reloading.set(false);
        self.initial_load_done.set(false);
        self.refreshing.set(false);
        self.loading_more.set(false);
        self.has_more.set(false);
        // posts of the previous user must not stay on screen
        self.adapter.borrow_mut().update(Vec::new(), UpdateMode::Reload);
        generation
    }

    /// Bind `user`, then render it and load its first page concurrently
    pub async fn load_by_user(
        &self,
        locator: &ServiceLocator,
        host: &dyn LoadObserver,
        user: User,
    ) -> ProfileResult<LoadOutcome> {
        log::info!("Loading profile {}", user.id);
        let generation = self.bind(user.clone());
        host.loads_changed();

        let (_, posts) = futures::join!(
            host.render(&user, generation),
            self.load_posts(locator, host, &user, UpdateMode::Reload)
        );
        posts
    }

    /// Resolve `user_id` remotely, then proceed as [`Self::load_by_user`].
    /// On failure the screen keeps whatever it showed before.
    pub async fn load_by_user_id(
        &self,
        locator: &ServiceLocator,
        host: &dyn LoadObserver,
        user_id: &str,
    ) -> ProfileResult<LoadOutcome> {
        let request = self.user_request.get() + 1;
        self.user_request.set(request);

        match locator.user_service().fetch_user(user_id).await {
            Ok(user) => {
                if self.user_request.get() != request {
                    log::debug!("Dropping superseded lookup of {}", user_id);
                    return Ok(LoadOutcome::Discarded);
                }
                self.load_by_user(locator, host, user).await
            }
            Err(e) => {
                log::debug!("Failed to fetch user {}: {}", user_id, e);
                Err(e)
            }
        }
    }

    /// Fetch posts for `user` and merge them with `mode`.
    /// Failures are logged and leave the current posts in place.
    pub async fn load_posts(
        &self,
        locator: &ServiceLocator,
        host: &dyn LoadObserver,
        user: &User,
        mode: UpdateMode,
    ) -> ProfileResult<LoadOutcome> {
        let generation = self.generation.get();
        let service = locator.post_service();

        let (ticket, result) = match mode {
            UpdateMode::Reload => {
                let ticket = self.reload_ticket.get() + 1;
                self.reload_ticket.set(ticket);
                self.reloading.set(true);
                (ticket, service.load_posts(user).await)
            }
            UpdateMode::LoadMore => {
                let ticket = self.reload_ticket.get();
                let offset = self.post_quantity();
                (ticket, service.load_paged_posts(user, offset).await)
            }
        };

        if !self.is_current(generation) || self.reload_ticket.get() != ticket {
            log::debug!("Discarding stale {:?} reply for {}", mode, user.id);
            return Ok(LoadOutcome::Discarded);
        }

        let outcome = match result {
            Ok(posts) => {
                let received = posts.len();
                self.has_more.set(received > 0);
                self.adapter.borrow_mut().update(posts, mode);
                Ok(LoadOutcome::Applied(received))
            }
            Err(e) => {
                log::debug!("Failed to load posts for {}: {}", user.id, e);
                if mode == UpdateMode::LoadMore {
                    // stop infinite scroll from retrying in a loop
                    self.has_more.set(false);
                }
                Err(e)
            }
        };

        if mode == UpdateMode::Reload {
            self.reloading.set(false);
            self.initial_load_done.set(true);
        }
        host.loads_changed();
        outcome
    }

    fn check_reachable(&self, locator: &ServiceLocator) -> ProfileResult<()> {
        if locator.reachability().is_reachable() {
            Ok(())
        } else {
            locator.alerts().handle(&ProfileError::NetworkUnreachable);
            Err(ProfileError::NetworkUnreachable)
        }
    }

    /// Reload the feed; on success clear the attributes cache so counts are re-derived
    pub async fn pull_to_refresh(
        &self,
        locator: &ServiceLocator,
        host: &dyn LoadObserver,
    ) -> ProfileResult<LoadOutcome> {
        if self.refreshing.get() {
            return Ok(LoadOutcome::Skipped);
        }
        let Some(user) = self.user() else {
            return Ok(LoadOutcome::Skipped);
        };
        self.check_reachable(locator)?;

        let generation = self.generation.get();
        self.refreshing.set(true);
        host.loads_changed();

        let result = self.load_posts(locator, host, &user, UpdateMode::Reload).await;

        if self.is_current(generation) {
            self.refreshing.set(false);
            host.loads_changed();
        }
        if let Ok(LoadOutcome::Applied(_)) = result {
            locator.attributes().clear();
            host.attributes_cleared(&user, generation).await;
        }
        result
    }

    /// Append the next page, offset = current post count
    pub async fn load_more(
        &self,
        locator: &ServiceLocator,
        host: &dyn LoadObserver,
    ) -> ProfileResult<LoadOutcome> {
        if self.loading_more.get() || self.reloading.get() || !self.has_more.get() {
            return Ok(LoadOutcome::Skipped);
        }
        let Some(user) = self.user() else {
            return Ok(LoadOutcome::Skipped);
        };
        self.check_reachable(locator)?;

        let generation = self.generation.get();
        self.loading_more.set(true);
        host.loads_changed();

        let result = self.load_posts(locator, host, &user, UpdateMode::LoadMore).await;

        if self.is_current(generation) {
            self.loading_more.set(false);
            host.loads_changed();
        }
        result
    }
}
