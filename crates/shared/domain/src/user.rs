//! User domain entity and related types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Argon2 PHC string; empty for accounts created without a password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    #[serde(skip_serializing)]
    pub email_verification_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub password_reset_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete timestamp (None = live, Some = deleted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user is soft deleted
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Whether `token` is this user's reset token and it has not expired at `now`.
    ///
    /// A token without an expiry is never valid.
    pub fn reset_token_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        match (&self.password_reset_token, self.password_reset_expires_at) {
            (Some(stored), Some(expires_at)) => stored == token && now < expires_at,
            _ => false,
        }
    }

    pub fn set_reset_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.password_reset_token = Some(token);
        self.password_reset_expires_at = Some(expires_at);
    }

    pub fn clear_reset_token(&mut self) {
        self.password_reset_token = None;
        self.password_reset_expires_at = None;
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
    }

    /// Advance `updated_at`, strictly past its previous value.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Soft delete the user
    pub fn soft_delete(&mut self) {
        self.touch();
        self.deleted_at = Some(self.updated_at);
    }
}

/// Record handed to a store for insertion.
///
/// The store assigns `id`, `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub email_verification_token: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl NewUser {
    /// Active, unverified account with no security tokens.
    pub fn new(name: impl Into<String>, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            phone: None,
            address: None,
            is_active: true,
            is_email_verified: false,
            email_verification_token: None,
            last_login_at: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: Option<String>) -> Self {
        self.address = address;
        self
    }

    /// Materialize into a stored user.
    pub fn into_user(self, id: i64, now: DateTime<Utc>) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            address: self.address,
            is_active: self.is_active,
            is_email_verified: self.is_email_verified,
            email_verification_token: self.email_verification_token,
            password_reset_token: None,
            password_reset_expires_at: None,
            last_login_at: self.last_login_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// Administrative user creation
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Profile overwrite
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Self-service registration
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub address: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResetPassword {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone)]
pub struct ChangePassword {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: i64,
    /// Display name
    #[cfg_attr(feature = "openapi", schema(example = "John Doe"))]
    pub name: String,
    /// Email address
    #[cfg_attr(feature = "openapi", schema(example = "john@example.com"))]
    pub email: String,
    #[cfg_attr(feature = "openapi", schema(example = "+1234567890"))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        UserResponse::from(user.clone())
    }
}
