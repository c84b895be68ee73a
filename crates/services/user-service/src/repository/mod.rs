//! Repository layer for data access.

pub mod entities;
mod memory_store;
pub mod seed;
mod user_repository;

pub use memory_store::MemoryUserStore;
pub use user_repository::{UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
