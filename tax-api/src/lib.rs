//! HTTP surface of the personal income tax service.

pub mod app;
pub mod auth;
pub mod config;
pub mod csv_loader;
pub mod error;
pub mod handlers;
pub mod logging;

pub use app::{AppState, build_registry, build_router};
pub use config::{AdminCredentials, AppInfo, Config};
pub use error::ApiError;
