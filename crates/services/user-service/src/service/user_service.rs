//! User service - administrative user management.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{CreateUser, NewUser, UpdateUser, User, MSG_EMAIL_TAKEN};

use super::hashing::hash_password;
use crate::repository::UserRepository;

/// User service trait for dependency injection.
///
/// Operations only ever see live (non-deleted) users.
#[async_trait]
pub trait UserService: Send + Sync {
    /// List all live users
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Get live user by ID
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// Number of live users
    async fn count_users(&self) -> AppResult<u64>;

    /// Create an active, unverified user with a hashed password
    async fn create_user(&self, input: CreateUser) -> AppResult<User>;

    /// Overwrite name, email, phone and address
    async fn update_user(&self, id: i64, input: UpdateUser) -> AppResult<User>;

    /// Soft delete user (sets deleted_at timestamp)
    async fn delete_user(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
}

impl UserManager {
    /// Create new user service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repo.list().await
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn count_users(&self) -> AppResult<u64> {
        self.repo.count().await
    }

    async fn create_user(&self, input: CreateUser) -> AppResult<User> {
        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict(MSG_EMAIL_TAKEN));
        }

        let password = hash_password(input.password).await?;
        let new_user = NewUser::new(input.name, input.email, password.into_string())
            .with_phone(input.phone)
            .with_address(input.address);

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn update_user(&self, id: i64, input: UpdateUser) -> AppResult<User> {
        let mut user = self.repo.find_by_id(id).await?.ok_or_not_found()?;

        if input.email != user.email {
            if let Some(owner) = self.repo.find_by_email(&input.email).await? {
                if owner.id != id {
                    return Err(AppError::conflict(MSG_EMAIL_TAKEN));
                }
            }
        }

        user.name = input.name;
        user.email = input.email;
        user.phone = Some(input.phone);
        user.address = input.address;

        self.repo.update(&user).await
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repo.find_by_id(id).await?.ok_or_not_found()?;
        self.repo.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }
}
