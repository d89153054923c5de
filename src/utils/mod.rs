// Utility functions
// Helper functions for rendering

pub mod time;

pub use time::format_relative_time;
