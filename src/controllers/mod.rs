pub mod follow_state;
pub mod load_coordinator;
pub mod profile_screen;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use load_coordinator::ScreenPhase;
pub use profile_screen::ProfileScreenController;
pub use view::{ConfirmPrompt, ProfileRouter, ProfileScreenState, ProfileView, SettingsAction};
