// UI Components
// Reusable pieces of the profile screen

pub mod confirm_modal;
pub mod icons;
pub mod post_card;
pub mod post_menu;
pub mod toast;

pub use confirm_modal::ConfirmModal;
pub use post_card::PostCard;
pub use post_menu::PostMenu;
