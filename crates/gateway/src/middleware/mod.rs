//! Request middleware.

mod auth;

pub use auth::{auth_middleware, user_context_middleware, CurrentUser};
