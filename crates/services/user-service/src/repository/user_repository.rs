//! User repository trait and the SeaORM implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity, Model};
use common::{AppError, AppResult, OptionExt};
use domain::{NewUser, User, MSG_EMAIL_TAKEN};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
///
/// Every method ignores soft-deleted records: they are invisible to reads,
/// to the email uniqueness check and to `update`/`delete`.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List live users in ascending id order
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Find live user by ID
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;

    /// Find live user by exact email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find live user by reset token. Expiry is the caller's concern.
    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>>;

    /// Insert a user, assigning id and timestamps.
    ///
    /// Fails with `Conflict` when a live user already owns the email.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Persist every mutable field of `user`.
    ///
    /// Fails with `NotFound` for an unknown id and `Conflict` when the email
    /// belongs to another live user. `created_at` is never overwritten.
    async fn update(&self, user: &User) -> AppResult<User>;

    /// Soft delete user by ID (sets deleted_at timestamp)
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Number of live users
    async fn count(&self) -> AppResult<u64>;
}

/// PostgreSQL-backed repository.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_live(&self, id: i64) -> AppResult<Option<Model>> {
        let model = UserEntity::find_by_id(id)
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(model)
    }

    async fn email_owner(&self, email: &str) -> AppResult<Option<Model>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;
        Ok(model)
    }
}

/// Unique index violations surface as `Conflict`; the pre-check can race
/// with a concurrent writer.
fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(MSG_EMAIL_TAKEN),
        _ => AppError::from(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(User::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        Ok(self.find_live(id).await?.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.email_owner(email).await?.map(User::from))
    }

    async fn find_by_reset_token(&self, token: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::PasswordResetToken.eq(token))
            .filter(user::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn create(&self, new_user: NewUser) -> AppResult<User> {
        if self.email_owner(&new_user.email).await?.is_some() {
            return Err(AppError::conflict(MSG_EMAIL_TAKEN));
        }

        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            phone: Set(new_user.phone),
            address: Set(new_user.address),
            is_active: Set(new_user.is_active),
            is_email_verified: Set(new_user.is_email_verified),
            email_verification_token: Set(new_user.email_verification_token),
            password_reset_token: Set(None),
            password_reset_expires_at: Set(None),
            last_login_at: Set(new_user.last_login_at),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        let model = active_model.insert(&self.db).await.map_err(map_write_err)?;
        Ok(User::from(model))
    }

    async fn update(&self, user: &User) -> AppResult<User> {
        let existing = self.find_live(user.id).await?.ok_or_not_found()?;

        if existing.email != user.email {
            if let Some(owner) = self.email_owner(&user.email).await? {
                if owner.id != user.id {
                    return Err(AppError::conflict(MSG_EMAIL_TAKEN));
                }
            }
        }

        let mut stored = User::from(existing.clone());
        stored.touch();
        let updated_at = stored.updated_at;

        let mut active: ActiveModel = existing.into();
        active.name = Set(user.name.clone());
        active.email = Set(user.email.clone());
        active.password_hash = Set(user.password_hash.clone());
        active.phone = Set(user.phone.clone());
        active.address = Set(user.address.clone());
        active.is_active = Set(user.is_active);
        active.is_email_verified = Set(user.is_email_verified);
        active.email_verification_token = Set(user.email_verification_token.clone());
        active.password_reset_token = Set(user.password_reset_token.clone());
        active.password_reset_expires_at = Set(user.password_reset_expires_at);
        active.last_login_at = Set(user.last_login_at);
        active.updated_at = Set(updated_at);

        let model = active.update(&self.db).await.map_err(map_write_err)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let existing = self.find_live(id).await?.ok_or_not_found()?;

        let mut stored = User::from(existing.clone());
        stored.soft_delete();

        let mut active: ActiveModel = existing.into();
        active.deleted_at = Set(stored.deleted_at);
        active.updated_at = Set(stored.updated_at);

        active.update(&self.db).await?;
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let count = UserEntity::find()
            .filter(user::Column::DeletedAt.is_null())
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
