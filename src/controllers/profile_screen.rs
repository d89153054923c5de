//! Profile screen controller
//!
//! Owns the follow state machine and the load coordinator for one screen and
//! folds their output, together with the header fields, into the
//! `ProfileScreenState` snapshot pushed to the view after every change.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::follow_state::FollowStateController;
use super::load_coordinator::{LoadObserver, LoadOutcome, ProfileLoadCoordinator};
use super::view::{
    count_label, AvatarImage, HeaderState, ProfileRouter, ProfileScreenState, ProfileView,
    SettingsAction, NAVIGATION_TITLE,
};
use crate::errors::ProfileResult;
use crate::models::{FollowRelationship, FollowType, Post, User};
use crate::services::ServiceLocator;
use crate::stores::alerts::AlertListener;
use crate::stores::post_adapter::PostAdapterDelegate;

pub struct ProfileScreenController {
    locator: RefCell<ServiceLocator>,
    view: Rc<dyn ProfileView>,
    delegate: Rc<dyn PostAdapterDelegate>,
    router: RefCell<Option<Rc<dyn ProfileRouter>>>,
    alert_listener: RefCell<Option<Rc<dyn AlertListener>>>,
    coordinator: ProfileLoadCoordinator,
    follow: FollowStateController,
    header: RefCell<HeaderState>,
    activity_shown: Cell<bool>,
}

impl ProfileScreenController {
    pub fn new<V, R>(locator: ServiceLocator, router: Rc<R>, view: Rc<V>) -> Rc<Self>
    where
        V: ProfileView + PostAdapterDelegate + 'static,
        R: ProfileRouter + 'static,
    {
        let delegate: Rc<dyn PostAdapterDelegate> = view.clone();
        let coordinator = ProfileLoadCoordinator::new();
        coordinator.set_delegate(&delegate);

        let screen = Rc::new(Self {
            locator: RefCell::new(locator),
            view,
            delegate,
            router: RefCell::new(None),
            alert_listener: RefCell::new(None),
            coordinator,
            follow: FollowStateController::new(),
            header: RefCell::new(HeaderState::default()),
            activity_shown: Cell::new(false),
        });
        screen.set_router(router);

        let weak = Rc::downgrade(&screen);
        screen.follow.set_observer(move |_| {
            if let Some(screen) = weak.upgrade() {
                screen.publish();
            }
        });
        screen
    }

    pub fn set_locator(&self, locator: ServiceLocator) {
        *self.locator.borrow_mut() = locator;
    }

    pub fn set_router<R: ProfileRouter + 'static>(&self, router: Rc<R>) {
        let listener: Rc<dyn AlertListener> = router.clone();
        let router: Rc<dyn ProfileRouter> = router;
        *self.alert_listener.borrow_mut() = Some(listener);
        *self.router.borrow_mut() = Some(router);
    }

    fn locator(&self) -> ServiceLocator {
        self.locator.borrow().clone()
    }

    fn router(&self) -> Option<Rc<dyn ProfileRouter>> {
        self.router.borrow().clone()
    }

    pub async fn set_user(&self, user: User) -> ProfileResult<LoadOutcome> {
        let locator = self.locator();
        self.coordinator.load_by_user(&locator, self, user).await
    }

    pub async fn set_user_id(&self, user_id: &str) -> ProfileResult<LoadOutcome> {
        let locator = self.locator();
        self.coordinator.load_by_user_id(&locator, self, user_id).await
    }

    /// Make this screen's router the target of global alerts
    pub fn view_did_appear(&self) {
        match self.alert_listener.borrow().as_ref() {
            Some(listener) => self.locator.borrow().alerts().register_alert_listener(listener),
            None => log::warn!("Profile screen appeared without a router"),
        }
    }

    pub fn user(&self) -> Option<User> {
        self.coordinator.user()
    }

    pub fn snapshot(&self) -> ProfileScreenState {
        ProfileScreenState {
            phase: self.coordinator.phase(),
            user: self.coordinator.user(),
            header: self.header.borrow().clone(),
            follow_button: self.follow.state(),
            posts: self.coordinator.posts(),
            refreshing: self.coordinator.is_refreshing(),
            loading_more: self.coordinator.is_loading_more(),
            has_more: self.coordinator.has_more(),
            activity_shown: self.activity_shown.get(),
        }
    }

    fn publish(&self) {
        let state = self.snapshot();
        self.view.state_changed(&state);
    }

    pub async fn follow_tapped(&self) -> ProfileResult<FollowRelationship> {
        let locator = self.locator();
        let router = self.router();
        self.follow
            .follow_tapped(&locator, &*self.view, router.as_deref())
            .await
    }

    pub fn settings_tapped(&self) {
        if !self.header.borrow().settings_enabled {
            return;
        }
        match self.router() {
            Some(router) => router.show_edit_profile(),
            None => log::warn!("No router to show edit profile"),
        }
    }

    /// Returns whether the followers list was opened
    pub fn followers_tapped(&self) -> bool {
        self.open_follow_list(FollowType::Followers)
    }

    /// Returns whether the following list was opened
    pub fn following_tapped(&self) -> bool {
        self.open_follow_list(FollowType::Following)
    }

    fn open_follow_list(&self, follow_type: FollowType) -> bool {
        let text = {
            let header = self.header.borrow();
            match follow_type {
                FollowType::Followers => header.followers_text.clone(),
                FollowType::Following => header.following_text.clone(),
            }
        };
        // nothing to list behind a zero count
        let opens = matches!(text.and_then(|t| t.chars().next()), Some(first) if first != '0');
        if !opens {
            return false;
        }

        match (self.coordinator.user(), self.router()) {
            (Some(user), Some(router)) => {
                router.show_followers_list(&user, follow_type);
                true
            }
            _ => false,
        }
    }

    pub async fn pull_to_refresh(&self) -> ProfileResult<LoadOutcome> {
        let locator = self.locator();
        self.coordinator.pull_to_refresh(&locator, self).await
    }

    pub async fn load_more(&self) -> ProfileResult<LoadOutcome> {
        let locator = self.locator();
        self.coordinator.load_more(&locator, self).await
    }

    pub fn post_menu_tapped(&self, index: usize) {
        self.coordinator.request_settings_menu(index);
    }

    /// Run an action picked from a post menu. Returns the removed post for `RemovePost`.
    pub fn handle_settings_action(&self, index: usize, action: SettingsAction) -> Option<Post> {
        match action {
            SettingsAction::RemovePost => {
                if index >= self.coordinator.post_quantity() {
                    log::warn!("Post {} is no longer displayed", index);
                    return None;
                }
                let removed = self.coordinator.remove_post(index);
                log::debug!("Removed post {}", removed.id);
                if self.coordinator.post_quantity() == 0 {
                    self.delegate.show_placeholder_for_empty_data_set();
                }
                self.publish();
                Some(removed)
            }
            SettingsAction::Authorize => {
                match self.router() {
                    Some(router) => router.show_authorization(),
                    None => log::warn!("No router to show authorization"),
                }
                None
            }
        }
    }

    /// The first feed row became visible
    pub fn first_post_displayed(&self) {
        if self.activity_shown.replace(false) {
            self.publish();
        }
    }

    async fn load_avatar(&self, locator: &ServiceLocator, user: &User, generation: u64) {
        let Some(avatar_ref) = user.avatar_ref.as_deref() else {
            return;
        };

        let result = locator.image_service().load_avatar(avatar_ref).await;
        if !self.coordinator.is_current(generation) {
            return;
        }
        match result {
            Ok(src) => {
                self.header.borrow_mut().avatar = AvatarImage::Loaded(src);
                self.publish();
            }
            Err(e) => {
                log::warn!("Failed to load avatar of {}: {}", user.id, e);
                self.view.show_toast(&e.to_string());
            }
        }
    }

    async fn fill_counts(&self, locator: &ServiceLocator, user: &User, generation: u64) {
        let (followers, following) = match locator.attributes().counts(&user.id) {
            Some(counts) => counts,
            None => match locator.activity_service().fetch_followers_quantity(user).await {
                Ok((followers, following)) => {
                    locator.attributes().update_counts(&user.id, followers, following);
                    (followers, following)
                }
                Err(e) => {
                    log::warn!("Failed to fetch follow counts for {}: {}", user.id, e);
                    return;
                }
            },
        };

        if !self.coordinator.is_current(generation) {
            return;
        }
        {
            let mut header = self.header.borrow_mut();
            header.followers_text = Some(count_label(followers, "followers"));
            header.following_text = Some(count_label(following, "following"));
        }
        self.publish();
    }
}

#[async_trait(?Send)]
impl LoadObserver for ProfileScreenController {
    async fn render(&self, user: &User, generation: u64) {
        *self.header.borrow_mut() = HeaderState {
            title: Some(NAVIGATION_TITLE.to_string()),
            username: Some(user.username.clone()),
            avatar: AvatarImage::Placeholder,
            followers_text: None,
            following_text: None,
            settings_enabled: user.is_current_user,
        };
        self.activity_shown.set(true);
        self.follow.bind(user);

        let locator = self.locator();
        let (_, (), ()) = futures::join!(
            self.follow.resolve(&locator),
            self.load_avatar(&locator, user, generation),
            self.fill_counts(&locator, user, generation)
        );
    }

    async fn attributes_cleared(&self, user: &User, generation: u64) {
        if self.coordinator.is_current(generation) {
            self.fill_counts(&self.locator(), user, generation).await;
        }
    }

    fn loads_changed(&self) {
        if self.coordinator.initial_load_done() && self.coordinator.post_quantity() == 0 {
            // no row will ever be displayed
            self.activity_shown.set(false);
        }
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::load_coordinator::ScreenPhase;
    use crate::controllers::test_support::{
        locator, own_user, posts, user, FakeBackend, FakeRouter, FakeView,
    };
    use crate::errors::ProfileError;

    struct Fixture {
        backend: Rc<FakeBackend>,
        locator: ServiceLocator,
        view: Rc<FakeView>,
        router: Rc<FakeRouter>,
        screen: Rc<ProfileScreenController>,
    }

    fn fixture() -> Fixture {
        let backend = FakeBackend::new();
        let locator = locator(&backend);
        let view = FakeView::new();
        let router = Rc::new(FakeRouter::default());
        let screen = ProfileScreenController::new(locator.clone(), router.clone(), view.clone());
        screen.view_did_appear();
        Fixture {
            backend,
            locator,
            view,
            router,
            screen,
        }
    }

    fn with_avatar(id: &str) -> User {
        User {
            avatar_ref: Some(format!("{}.jpg", id)),
            ..user(id)
        }
    }

    #[tokio::test]
    async fn test_renders_other_users_profile() {
        let f = fixture();
        f.backend.avatars.push_ready(Ok("data:image/png;base64,AA==".to_string()));
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((12, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..3)));

        let outcome = f.screen.set_user(with_avatar("u1")).await;

        assert_eq!(outcome, Ok(LoadOutcome::Applied(3)));
        let state = f.view.last_state().unwrap();
        assert_eq!(state.phase, ScreenPhase::Rendered);
        assert_eq!(state.header.title.as_deref(), Some("Profile"));
        assert_eq!(state.header.username.as_deref(), Some("u1_name"));
        assert_eq!(
            state.header.avatar,
            AvatarImage::Loaded("data:image/png;base64,AA==".to_string())
        );
        assert_eq!(state.header.followers_text.as_deref(), Some("12 followers"));
        assert_eq!(state.header.following_text.as_deref(), Some("0 following"));
        assert!(!state.header.settings_enabled);
        assert_eq!(state.follow_button.relationship, FollowRelationship::NotFollowing);
        assert!(state.follow_button.enabled);
        assert!(!state.follow_button.hidden);
        assert_eq!(state.posts.len(), 3);
        assert_eq!(f.locator.attributes().counts("u1"), Some((12, 0)));
    }

    #[tokio::test]
    async fn test_zero_count_does_not_navigate() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((3, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));
        f.screen.set_user(user("u1")).await.unwrap();

        assert!(f.screen.followers_tapped());
        assert!(!f.screen.following_tapped());

        assert_eq!(
            *f.router.followers_lists.borrow(),
            vec![("u1".to_string(), FollowType::Followers)]
        );
    }

    #[tokio::test]
    async fn test_counts_tap_before_counts_known() {
        let f = fixture();
        assert!(!f.screen.followers_tapped());
        assert!(f.router.followers_lists.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_own_profile_without_avatar() {
        let f = fixture();
        f.backend.quantities.push_ready(Ok((1, 2)));
        f.backend.reloads.push_ready(Ok(posts(0..2)));

        f.screen.set_user(own_user("me")).await.unwrap();
        f.screen.settings_tapped();

        let state = f.view.last_state().unwrap();
        assert!(state.follow_button.hidden);
        assert!(state.header.settings_enabled);
        assert_eq!(state.header.avatar, AvatarImage::Placeholder);
        assert_eq!(state.header.followers_text.as_deref(), Some("1 followers"));
        assert_eq!(f.backend.follow_checks.calls(), 0);
        assert_eq!(f.backend.avatars.calls(), 0);
        assert_eq!(f.router.edit_profile.get(), 1);
    }

    #[tokio::test]
    async fn test_settings_disabled_on_other_profile() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(true));
        f.backend.quantities.push_ready(Ok((1, 1)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));
        f.screen.set_user(user("u1")).await.unwrap();

        f.screen.settings_tapped();

        assert_eq!(f.router.edit_profile.get(), 0);
    }

    #[tokio::test]
    async fn test_avatar_failure_shows_toast() {
        let f = fixture();
        f.backend
            .avatars
            .push_ready(Err(ProfileError::ImageLoadFailed("status 404".to_string())));
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));

        f.screen.set_user(with_avatar("u1")).await.unwrap();

        assert_eq!(
            *f.view.toasts.borrow(),
            vec!["Failed to load image: status 404".to_string()]
        );
        assert_eq!(f.view.last_state().unwrap().header.avatar, AvatarImage::Placeholder);
    }

    #[tokio::test]
    async fn test_cached_counts_skip_fetch() {
        let f = fixture();
        f.locator.attributes().update_counts("u1", 7, 8);
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.reloads.push_ready(Ok(posts(0..1)));

        f.screen.set_user(user("u1")).await.unwrap();

        assert_eq!(f.backend.quantities.calls(), 0);
        let header = f.view.last_state().unwrap().header;
        assert_eq!(header.followers_text.as_deref(), Some("7 followers"));
        assert_eq!(header.following_text.as_deref(), Some("8 following"));
    }

    #[tokio::test]
    async fn test_rebind_discards_previous_users_counts() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        let slow_counts = f.backend.quantities.push_pending();
        f.backend.reloads.push_ready(Ok(posts(0..2)));
        f.backend.follow_checks.push_ready(Ok(true));
        f.backend.quantities.push_ready(Ok((5, 6)));
        f.backend.reloads.push_ready(Ok(posts(10..11)));

        let first = f.screen.set_user(user("u1"));
        let second = async {
            let outcome = f.screen.set_user(user("u2")).await;
            slow_counts.send(Ok((99, 99))).unwrap();
            outcome
        };
        let (_, second) = futures::join!(first, second);

        assert_eq!(second, Ok(LoadOutcome::Applied(1)));
        let state = f.view.last_state().unwrap();
        assert_eq!(state.user.map(|u| u.id), Some("u2".to_string()));
        assert_eq!(state.header.followers_text.as_deref(), Some("5 followers"));
        assert_eq!(state.follow_button.relationship, FollowRelationship::Following);
        assert_eq!(state.posts.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_post_redraws() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..3)));
        f.screen.set_user(user("u1")).await.unwrap();
        let published = f.view.states.borrow().len();

        let removed = f.screen.handle_settings_action(1, SettingsAction::RemovePost);

        assert_eq!(removed.map(|p| p.id), Some("p1".to_string()));
        assert_eq!(f.view.states.borrow().len(), published + 1);
        let ids: Vec<String> = f.view.last_state().unwrap().posts.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["p0", "p2"]);
        assert_eq!(f.screen.handle_settings_action(5, SettingsAction::RemovePost), None);
    }

    #[tokio::test]
    async fn test_removing_last_post_shows_placeholder() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));
        f.screen.set_user(user("u1")).await.unwrap();
        assert_eq!(f.view.last_notification(), Some("update"));

        f.screen.handle_settings_action(0, SettingsAction::RemovePost);

        assert_eq!(f.view.last_notification(), Some("placeholder"));
        assert!(f.view.last_state().unwrap().posts.is_empty());
    }

    #[tokio::test]
    async fn test_post_menu_and_authorize_action() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..3)));
        f.screen.set_user(user("u1")).await.unwrap();

        f.screen.post_menu_tapped(2);
        f.screen.handle_settings_action(2, SettingsAction::Authorize);

        assert_eq!(*f.view.menus.borrow(), vec![("p2".to_string(), 2)]);
        assert_eq!(f.router.authorizations.get(), 1);
    }

    #[tokio::test]
    async fn test_first_post_hides_activity_once() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..2)));
        f.screen.set_user(user("u1")).await.unwrap();
        assert!(f.screen.snapshot().activity_shown);

        f.screen.first_post_displayed();
        let published = f.view.states.borrow().len();
        f.screen.first_post_displayed();

        assert!(!f.screen.snapshot().activity_shown);
        assert_eq!(f.view.states.borrow().len(), published);
    }

    #[tokio::test]
    async fn test_empty_feed_hides_activity() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(Vec::new()));

        f.screen.set_user(user("u1")).await.unwrap();

        assert!(!f.screen.snapshot().activity_shown);
        assert_eq!(f.view.last_notification(), Some("placeholder"));
    }

    #[tokio::test]
    async fn test_refresh_rederives_counts() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((1, 2)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));
        f.screen.set_user(user("u1")).await.unwrap();
        f.backend.reloads.push_ready(Ok(posts(0..2)));
        f.backend.quantities.push_ready(Ok((3, 4)));

        f.screen.pull_to_refresh().await.unwrap();

        let state = f.view.last_state().unwrap();
        assert_eq!(state.header.followers_text.as_deref(), Some("3 followers"));
        assert_eq!(state.posts.len(), 2);
        assert!(!state.refreshing);
        assert_eq!(f.locator.attributes().counts("u1"), Some((3, 4)));
    }

    #[tokio::test]
    async fn test_offline_follow_alerts_through_router() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));
        f.screen.set_user(user("u1")).await.unwrap();
        f.backend.reachable.set(false);

        let result = f.screen.follow_tapped().await;

        assert_eq!(result, Err(ProfileError::NetworkUnreachable));
        assert_eq!(*f.router.alerts.borrow(), vec!["No connection".to_string()]);
        assert_eq!(f.backend.follows.calls(), 0);
    }

    #[tokio::test]
    async fn test_follow_tap_publishes_button_state() {
        let f = fixture();
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));
        f.screen.set_user(user("u1")).await.unwrap();
        f.backend.follows.push_ready(Ok(true));

        f.screen.follow_tapped().await.unwrap();

        let button = f.view.last_state().unwrap().follow_button;
        assert_eq!(button.relationship, FollowRelationship::Following);
        assert!(!button.busy);
    }

    #[tokio::test]
    async fn test_set_user_id_resolves_user() {
        let f = fixture();
        f.backend.users.push_ready(Ok(user("u9")));
        f.backend.follow_checks.push_ready(Ok(false));
        f.backend.quantities.push_ready(Ok((0, 0)));
        f.backend.reloads.push_ready(Ok(posts(0..1)));

        f.screen.set_user_id("u9").await.unwrap();

        assert_eq!(f.screen.user().map(|u| u.id), Some("u9".to_string()));
    }
}
