//! Follow button state machine
//!
//! Resolves whether the viewer follows the profile owner (cache first, then the
//! activity service) and runs follow/unfollow:
//! - follow is optimistic and reverted when the remote call fails
//! - unfollow waits for an explicit confirmation before calling the backend
//!
//! Every remote completion is checked against the bind generation so a reply
//! for a previously shown user never lands on the current one.

use std::cell::{Cell, RefCell};

use super::view::{ConfirmPrompt, ProfileRouter, ProfileView};
use crate::errors::{ProfileError, ProfileResult};
use crate::models::{FollowRelationship, User};
use crate::services::ServiceLocator;

/// What the follow control shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FollowButtonState {
    pub relationship: FollowRelationship,
    pub enabled: bool,
    /// Activity indicator over the button while a follow request runs
    pub busy: bool,
    /// Hidden on the viewer's own profile
    pub hidden: bool,
}

impl FollowButtonState {
    pub fn is_selected(&self) -> bool {
        self.relationship.is_following()
    }

    pub fn accepts_taps(&self) -> bool {
        self.enabled && !self.busy && !self.hidden
    }

    pub fn label(&self) -> &'static str {
        if self.is_selected() {
            "Following"
        } else {
            "Follow"
        }
    }
}

type Observer = Box<dyn Fn(&FollowButtonState)>;

#[derive(Default)]
pub struct FollowStateController {
    state: RefCell<FollowButtonState>,
    user: RefCell<Option<User>>,
    generation: Cell<u64>,
    observer: RefCell<Option<Observer>>,
}

impl FollowStateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after every state change
    pub fn set_observer(&self, observer: impl Fn(&FollowButtonState) + 'static) {
        *self.observer.borrow_mut() = Some(Box::new(observer));
    }

    pub fn state(&self) -> FollowButtonState {
        *self.state.borrow()
    }

    fn update(&self, change: impl FnOnce(&mut FollowButtonState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            change(&mut state);
            *state
        };
        if let Some(observer) = self.observer.borrow().as_ref() {
            observer(&snapshot);
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    /// Bind to a new profile owner: unknown relationship, control disabled until resolved
    pub fn bind(&self, user: &User) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        *self.user.borrow_mut() = Some(user.clone());
        self.update(|state| {
            *state = FollowButtonState {
                relationship: FollowRelationship::Unknown,
                enabled: false,
                busy: false,
                hidden: user.is_current_user,
            }
        });
        generation
    }

    fn commit(&self, generation: u64, relationship: FollowRelationship) -> bool {
        if !self.is_current(generation) {
            log::debug!("Discarding follow status for a previous profile");
            return false;
        }
        self.update(|state| {
            state.relationship = relationship;
            state.enabled = true;
        });
        true
    }

    /// Resolve the relationship for the bound user.
    ///
    /// A cached status wins; otherwise the activity service is asked and its
    /// answer is kept locally only (the cache is fed by the counts endpoint).
    pub async fn resolve(&self, locator: &ServiceLocator) -> ProfileResult<FollowRelationship> {
        let generation = self.generation.get();
        let Some(user) = self.user.borrow().clone() else {
            return Ok(FollowRelationship::Unknown);
        };

        if user.is_current_user {
            return Ok(FollowRelationship::Unknown);
        }

        if let Some(status) = locator.attributes().follow_status(&user.id) {
            let relationship = FollowRelationship::from(status);
            self.commit(generation, relationship);
            return Ok(relationship);
        }

        match locator.activity_service().check_is_following(&user).await {
            Ok(following) => {
                let relationship = FollowRelationship::from(following);
                self.commit(generation, relationship);
                Ok(relationship)
            }
            Err(e) => {
                log::warn!("Failed to check following status for {}: {}", user.id, e);
                Err(e)
            }
        }
    }

    /// Handle a tap on the follow control.
    ///
    /// Offline aborts before any state change and raises the no-connection
    /// alert. An anonymous viewer gets the registration prompt instead.
    pub async fn follow_tapped(
        &self,
        locator: &ServiceLocator,
        view: &dyn ProfileView,
        router: Option<&dyn ProfileRouter>,
    ) -> ProfileResult<FollowRelationship> {
        let state = self.state();
        if !state.accepts_taps() {
            return Ok(state.relationship);
        }

        if !locator.reachability().is_reachable() {
            locator.alerts().handle(&ProfileError::NetworkUnreachable);
            return Err(ProfileError::NetworkUnreachable);
        }

        if locator.session().is_not_authorized() {
            if view.present_registration_prompt().await {
                match router {
                    Some(router) => router.show_authorization(),
                    None => log::warn!("No router to show authorization"),
                }
            }
            return Err(ProfileError::NotAuthorized);
        }

        let Some(user) = self.user.borrow().clone() else {
            return Ok(FollowRelationship::Unknown);
        };

        if state.relationship.is_following() {
            self.unfollow(locator, view, &user).await
        } else {
            self.follow(locator, &user).await
        }
    }

    async fn follow(&self, locator: &ServiceLocator, user: &User) -> ProfileResult<FollowRelationship> {
        let generation = self.generation.get();
        self.update(|state| {
            state.relationship = FollowRelationship::Following;
            state.busy = true;
        });

        let result = locator.activity_service().follow_user_eventually(user).await;
        if matches!(result, Ok(true)) {
            locator.attributes().update_follow_status(&user.id, true);
        }
        if !self.is_current(generation) {
            log::debug!("Follow of {} finished after the profile changed", user.id);
            return result.map(|_| FollowRelationship::Following);
        }

        match result {
            Ok(succeeded) => {
                log::debug!("Attempt to follow was {}", succeeded);
                self.update(|state| state.busy = false);
                Ok(FollowRelationship::Following)
            }
            Err(e) => {
                log::warn!("Failed to follow {}: {}", user.id, e);
                self.update(|state| {
                    state.relationship = FollowRelationship::NotFollowing;
                    state.busy = false;
                });
                Err(e)
            }
        }
    }

    async fn unfollow(
        &self,
        locator: &ServiceLocator,
        view: &dyn ProfileView,
        user: &User,
    ) -> ProfileResult<FollowRelationship> {
        let generation = self.generation.get();
        self.update(|state| state.enabled = false);

        let confirmed = view.confirm(ConfirmPrompt::unfollow()).await;
        if !self.is_current(generation) {
            return Ok(self.state().relationship);
        }
        if !confirmed {
            self.update(|state| state.enabled = true);
            return Ok(FollowRelationship::Following);
        }

        let result = locator.activity_service().unfollow_user_eventually(user).await;
        if matches!(result, Ok(true)) {
            locator.attributes().update_follow_status(&user.id, false);
        }
        if !self.is_current(generation) {
            log::debug!("Unfollow of {} finished after the profile changed", user.id);
            return result.map(|_| FollowRelationship::NotFollowing);
        }

        let error = match result {
            Ok(true) => {
                self.update(|state| {
                    state.relationship = FollowRelationship::NotFollowing;
                    state.enabled = true;
                });
                return Ok(FollowRelationship::NotFollowing);
            }
            Ok(false) => ProfileError::remote("unfollow was not accepted"),
            Err(e) => e,
        };

        log::warn!("Failed to unfollow {}: {}", user.id, error);
        self.update(|state| {
            state.relationship = FollowRelationship::Following;
            state.enabled = true;
        });
        Err(error)
    }
}
