mod app;
mod effects;
mod logging;
mod store;
mod ui;

pub use app::run_app;
