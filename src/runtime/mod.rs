pub mod app;
pub mod console;

pub use app::{list_report, run_app, status_report};
