use async_trait::async_trait;

use super::follow_state::FollowButtonState;
use super::load_coordinator::ScreenPhase;
use crate::models::{FollowType, Post, User};
use crate::stores::alerts::AlertListener;

pub const NAVIGATION_TITLE: &str = "Profile";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AvatarImage {
    #[default]
    Placeholder,
    /// Displayable source (URL or data URL)
    Loaded(String),
}

/// Header fields of the profile
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderState {
    pub title: Option<String>,
    pub username: Option<String>,
    pub avatar: AvatarImage,
    pub followers_text: Option<String>,
    pub following_text: Option<String>,
    /// Settings entry point, only on the viewer's own profile
    pub settings_enabled: bool,
}

/// Everything the profile view renders
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProfileScreenState {
    pub phase: ScreenPhase,
    pub user: Option<User>,
    pub header: HeaderState,
    pub follow_button: FollowButtonState,
    pub posts: Vec<Post>,
    pub refreshing: bool,
    pub loading_more: bool,
    pub has_more: bool,
    pub activity_shown: bool,
}

/// A yes/no question put to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
    pub cancel_text: String,
}

impl ConfirmPrompt {
    pub fn unfollow() -> Self {
        Self {
            title: "Unfollow".to_string(),
            message: "Are you sure you want to unfollow?".to_string(),
            confirm_text: "Yes".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }

    pub fn registration() -> Self {
        Self {
            title: "You can't follow someone without registration".to_string(),
            message: String::new(),
            confirm_text: "Register".to_string(),
            cancel_text: "Cancel".to_string(),
        }
    }
}

/// Actions offered by the per-post menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsAction {
    RemovePost,
    Authorize,
}

/// Rendering surface driven by the profile controllers
#[async_trait(?Send)]
pub trait ProfileView {
    fn state_changed(&self, state: &ProfileScreenState);
    fn show_toast(&self, message: &str);
    /// Resolves to true when the user accepts
    async fn confirm(&self, prompt: ConfirmPrompt) -> bool;
    /// Resolves to true when the user chooses to register
    async fn present_registration_prompt(&self) -> bool;
}

/// Navigation capabilities of the profile screen. The router also receives global alerts.
pub trait ProfileRouter: AlertListener {
    fn show_edit_profile(&self);
    fn show_authorization(&self);
    fn show_followers_list(&self, user: &User, follow_type: FollowType);
}

/// "12 followers", "0 following"
pub fn count_label(count: u64, noun: &str) -> String {
    format!("{} {}", count, noun)
}
