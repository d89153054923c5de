pub mod use_infinite_scroll;

pub use use_infinite_scroll::use_infinite_scroll;
