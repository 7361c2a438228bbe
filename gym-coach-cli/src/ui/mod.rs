// Terminal UI module using ratatui

mod app;
mod dashboard;
mod widgets;

pub use app::{App, Loaded, Loader};
pub use dashboard::Dashboard;
