//! Service layer - business logic.

mod hashing;
mod user_service;

pub use hashing::{hash_password, verify_password};
pub use user_service::{UserManager, UserService};
