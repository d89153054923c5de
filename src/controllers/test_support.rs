//! Scriptable fakes for controller tests

use async_trait::async_trait;
use futures::channel::oneshot;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ops::Range;
use std::rc::Rc;

use super::view::{ConfirmPrompt, ProfileRouter, ProfileScreenState, ProfileView};
use super::load_coordinator::LoadObserver;
use crate::errors::{ProfileError, ProfileResult};
use crate::models::{FollowType, Post, User};
use crate::services::{
    ActivityService, ImageService, PostService, ReachabilityService, ServiceLocator, UserService,
};
use crate::stores::alerts::AlertListener;
use crate::stores::auth_store::SessionStore;
use crate::stores::post_adapter::PostAdapterDelegate;

enum Reply<T> {
    Ready(ProfileResult<T>),
    Pending(oneshot::Receiver<ProfileResult<T>>),
}

/// Queue of replies for one backend call, consumed in order
pub struct Script<T> {
    replies: RefCell<VecDeque<Reply<T>>>,
    calls: Cell<usize>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: RefCell::new(VecDeque::new()),
            calls: Cell::new(0),
        }
    }
}

impl<T> Script<T> {
    pub fn push_ready(&self, reply: ProfileResult<T>) {
        self.replies.borrow_mut().push_back(Reply::Ready(reply));
    }

    /// Queue a reply that resolves when the returned sender fires
    pub fn push_pending(&self) -> oneshot::Sender<ProfileResult<T>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Pending(rx));
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    async fn next(&self) -> ProfileResult<T> {
        self.calls.set(self.calls.get() + 1);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Pending(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ProfileError::remote("reply dropped"))),
            None => Err(ProfileError::remote("no scripted reply")),
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    pub users: Script<User>,
    pub reloads: Script<Vec<Post>>,
    pub pages: Script<Vec<Post>>,
    pub page_offsets: RefCell<Vec<usize>>,
    pub follow_checks: Script<bool>,
    pub follows: Script<bool>,
    pub unfollows: Script<bool>,
    pub quantities: Script<(u64, u64)>,
    pub avatars: Script<String>,
    pub reachable: Cell<bool>,
}

impl FakeBackend {
    pub fn new() -> Rc<Self> {
        let backend = Self::default();
        backend.reachable.set(true);
        Rc::new(backend)
    }
}

#[async_trait(?Send)]
impl UserService for FakeBackend {
    async fn fetch_user(&self, _user_id: &str) -> ProfileResult<User> {
        self.users.next().await
    }
}

#[async_trait(?Send)]
impl PostService for FakeBackend {
    async fn load_posts(&self, _user: &User) -> ProfileResult<Vec<Post>> {
        self.reloads.next().await
    }

    async fn load_paged_posts(&self, _user: &User, offset: usize) -> ProfileResult<Vec<Post>> {
        self.page_offsets.borrow_mut().push(offset);
        self.pages.next().await
    }
}

#[async_trait(?Send)]
impl ActivityService for FakeBackend {
    async fn check_is_following(&self, _user: &User) -> ProfileResult<bool> {
        self.follow_checks.next().await
    }

    async fn follow_user_eventually(&self, _user: &User) -> ProfileResult<bool> {
        self.follows.next().await
    }

    async fn unfollow_user_eventually(&self, _user: &User) -> ProfileResult<bool> {
        self.unfollows.next().await
    }

    async fn fetch_followers_quantity(&self, _user: &User) -> ProfileResult<(u64, u64)> {
        self.quantities.next().await
    }
}

impl ReachabilityService for FakeBackend {
    fn is_reachable(&self) -> bool {
        self.reachable.get()
    }
}

#[async_trait(?Send)]
impl ImageService for FakeBackend {
    async fn load_avatar(&self, _avatar_ref: &str) -> ProfileResult<String> {
        self.avatars.next().await
    }
}

/// Records everything the controllers push to the view
#[derive(Default)]
pub struct FakeView {
    pub states: RefCell<Vec<ProfileScreenState>>,
    pub toasts: RefCell<Vec<String>>,
    pub prompts: RefCell<Vec<ConfirmPrompt>>,
    pub confirm_replies: RefCell<VecDeque<bool>>,
    confirm_gates: RefCell<VecDeque<oneshot::Receiver<bool>>>,
    pub registration_reply: Cell<bool>,
    pub registration_prompts: Cell<usize>,
    pub notifications: RefCell<Vec<&'static str>>,
    pub menus: RefCell<Vec<(String, usize)>>,
}

impl FakeView {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Hold the next confirmation until the returned sender fires
    pub fn gate_confirmation(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        self.confirm_gates.borrow_mut().push_back(rx);
        tx
    }

    pub fn last_state(&self) -> Option<ProfileScreenState> {
        self.states.borrow().last().cloned()
    }

    pub fn last_notification(&self) -> Option<&'static str> {
        self.notifications.borrow().last().copied()
    }
}

#[async_trait(?Send)]
impl ProfileView for FakeView {
    fn state_changed(&self, state: &ProfileScreenState) {
        self.states.borrow_mut().push(state.clone());
    }

    fn show_toast(&self, message: &str) {
        self.toasts.borrow_mut().push(message.to_string());
    }

    async fn confirm(&self, prompt: ConfirmPrompt) -> bool {
        self.prompts.borrow_mut().push(prompt);
        let gate = self.confirm_gates.borrow_mut().pop_front();
        match gate {
            Some(rx) => rx.await.unwrap_or(false),
            None => self.confirm_replies.borrow_mut().pop_front().unwrap_or(false),
        }
    }

    async fn present_registration_prompt(&self) -> bool {
        self.registration_prompts.set(self.registration_prompts.get() + 1);
        self.registration_reply.get()
    }
}

impl PostAdapterDelegate for FakeView {
    fn show_settings_menu(&self, post: &Post, index: usize) {
        self.menus.borrow_mut().push((post.id.clone(), index));
    }

    fn show_placeholder_for_empty_data_set(&self) {
        self.notifications.borrow_mut().push("placeholder");
    }

    fn requested_view_update(&self) {
        self.notifications.borrow_mut().push("update");
    }
}

#[derive(Default)]
pub struct FakeRouter {
    pub edit_profile: Cell<usize>,
    pub authorizations: Cell<usize>,
    pub followers_lists: RefCell<Vec<(String, FollowType)>>,
    /// Alert titles
    pub alerts: RefCell<Vec<String>>,
}

impl FakeRouter {
    /// Router registered as the locator's alert listener
    pub fn register(locator: &ServiceLocator) -> Rc<Self> {
        let router = Rc::new(Self::default());
        let listener: Rc<dyn AlertListener> = router.clone();
        locator.alerts().register_alert_listener(&listener);
        router
    }
}

impl AlertListener for FakeRouter {
    fn show_alert(&self, title: &str, _message: &str) {
        self.alerts.borrow_mut().push(title.to_string());
    }
}

impl ProfileRouter for FakeRouter {
    fn show_edit_profile(&self) {
        self.edit_profile.set(self.edit_profile.get() + 1);
    }

    fn show_authorization(&self) {
        self.authorizations.set(self.authorizations.get() + 1);
    }

    fn show_followers_list(&self, user: &User, follow_type: FollowType) {
        self.followers_lists
            .borrow_mut()
            .push((user.id.clone(), follow_type));
    }
}

/// Observer that only records calls
#[derive(Default)]
pub struct FakeHost {
    pub renders: RefCell<Vec<(String, u64)>>,
    pub cleared: Cell<usize>,
    pub changes: Cell<usize>,
}

#[async_trait(?Send)]
impl LoadObserver for FakeHost {
    async fn render(&self, user: &User, generation: u64) {
        self.renders.borrow_mut().push((user.id.clone(), generation));
    }

    async fn attributes_cleared(&self, _user: &User, _generation: u64) {
        self.cleared.set(self.cleared.get() + 1);
    }

    fn loads_changed(&self) {
        self.changes.set(self.changes.get() + 1);
    }
}

/// Locator over `backend` with "viewer" signed in
pub fn locator(backend: &Rc<FakeBackend>) -> ServiceLocator {
    ServiceLocator::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
    )
    .with_session(SessionStore::authenticated("viewer"))
}

pub fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        username: format!("{}_name", id),
        avatar_ref: None,
        is_current_user: false,
    }
}

pub fn own_user(id: &str) -> User {
    User {
        is_current_user: true,
        ..user(id)
    }
}

pub fn posts(range: Range<usize>) -> Vec<Post> {
    range
        .map(|i| Post {
            id: format!("p{}", i),
            author_id: "u1".to_string(),
            text: format!("post {}", i),
            image_ref: None,
            created_at: i as i64,
        })
        .collect()
}
