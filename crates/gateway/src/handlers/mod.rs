//! HTTP request handlers.

pub mod auth_handler;
pub mod health_handler;
pub mod user_handler;

pub use auth_handler::{auth_profile_routes, auth_routes, auth_token_routes};
pub use health_handler::health_routes;
pub use user_handler::user_routes;
