pub mod apparatus;
pub mod app;
pub mod content_pane;

pub use app::DistillationApp;
