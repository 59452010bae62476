//! Display helpers for terminal output

pub mod colors;

pub use colors::{paint_state, ColorTheme};
