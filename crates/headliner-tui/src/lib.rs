// Terminal UI implementation using ratatui
// News and Favorites tabs on top of headliner-core's screens

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, AppCommand, InputMode, Tab};
pub use runner::run_tui;
