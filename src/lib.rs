pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod security;
pub mod session;
pub mod store;

// Re-export commonly used items for tests / external users
pub use config::{Config, DEFAULT_PASSWORD};
pub use routes::{config, AppState};
pub use security::{cors, SecurityHeaders};
