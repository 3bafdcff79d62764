mod app;
mod effects;
pub mod logging;
mod server;
mod ui;

pub use app::{run_app, AppConfig};
