//! rmd-tui: Terminal UI layer using ratatui
//!
//! Renders engine state and turns key presses into commands. All game
//! logic stays in rmd-core; this crate only draws and routes input.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::{App, UiMode};
pub use theme::Theme;
