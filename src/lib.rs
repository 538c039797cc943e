pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod retry;
pub mod session;
pub mod stats;
pub mod ui;
pub mod state;
pub mod visitors;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
