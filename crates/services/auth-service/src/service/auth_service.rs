//! Authentication service - registration, login, password flows and tokens.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use std::sync::Arc;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    ChangePassword, NewUser, Password, RegisterUser, ResetPassword, User,
    DEFAULT_PASSWORD_RESET_TTL_MINUTES, MSG_ACCOUNT_DEACTIVATED, MSG_EMAIL_TAKEN,
    MSG_INVALID_CREDENTIALS, MSG_INVALID_RESET_TOKEN, MSG_WRONG_CURRENT_PASSWORD,
};
use user_service_lib::repository::UserRepository;
use user_service_lib::service::{hash_password, verify_password};

use crate::notifier::ResetTokenSender;
use crate::token::{Claims, TokenIssuer, TokenResponse};

/// Verified against when the email is unknown, so a miss costs the same as
/// a wrong password.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    Password::new(&Uuid::new_v4().to_string())
        .map(Password::into_string)
        .unwrap_or_default()
});

/// Authenticated user together with a fresh access token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: TokenResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, input: RegisterUser) -> AppResult<AuthSession>;

    /// Exchange email and password for a token
    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Issue a reset token if the email is known. Never reveals whether it is.
    async fn forgot_password(&self, email: &str) -> AppResult<()>;

    /// Set a new password using a reset token
    async fn reset_password(&self, input: ResetPassword) -> AppResult<()>;

    /// Set a new password after re-checking the current one
    async fn change_password(&self, user_id: i64, input: ChangePassword) -> AppResult<()>;

    /// Verify JWT token and extract claims
    fn validate_token(&self, token: &str) -> AppResult<Claims>;

    /// Issue a new token without re-presenting a password
    async fn refresh_token(&self, user_id: i64) -> AppResult<AuthSession>;

    /// Confirm the user still exists. Tokens stay valid until they expire.
    async fn logout(&self, user_id: i64) -> AppResult<()>;
}

/// Concrete implementation of AuthService over the user repository.
pub struct Authenticator {
    repo: Arc<dyn UserRepository>,
    tokens: TokenIssuer,
    reset_sender: Arc<dyn ResetTokenSender>,
    reset_ttl: Duration,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(
        repo: Arc<dyn UserRepository>,
        tokens: TokenIssuer,
        reset_sender: Arc<dyn ResetTokenSender>,
    ) -> Self {
        Self {
            repo,
            tokens,
            reset_sender,
            reset_ttl: Duration::minutes(DEFAULT_PASSWORD_RESET_TTL_MINUTES),
        }
    }

    /// Override how long reset tokens stay valid.
    pub fn with_reset_ttl(mut self, ttl: Duration) -> Self {
        self.reset_ttl = ttl;
        self
    }

    fn session(&self, user: User) -> AppResult<AuthSession> {
        let token = self.tokens.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    async fn live_user(&self, user_id: i64) -> AppResult<User> {
        self.repo.find_by_id(user_id).await?.ok_or_not_found()
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, input: RegisterUser) -> AppResult<AuthSession> {
        Password::confirm(&input.password, &input.confirm_password)?;

        if self.repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::conflict(MSG_EMAIL_TAKEN));
        }

        let password = hash_password(input.password).await?;

        let mut new_user = NewUser::new(input.name, input.email, password.into_string())
            .with_phone(input.phone)
            .with_address(input.address);
        new_user.email_verification_token = Some(Uuid::new_v4().to_string());
        new_user.last_login_at = Some(Utc::now());

        let user = self.repo.create(new_user).await?;
        tracing::info!(user_id = user.id, "User registered");

        self.session(user)
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let Some(mut user) = self.repo.find_by_email(email).await? else {
            verify_password(DUMMY_HASH.clone(), password.to_string()).await?;
            tracing::warn!("Login failed: unknown email");
            return Err(AppError::unauthorized(MSG_INVALID_CREDENTIALS));
        };

        if !user.is_active {
            tracing::warn!(user_id = user.id, "Login refused: account deactivated");
            return Err(AppError::forbidden(MSG_ACCOUNT_DEACTIVATED));
        }

        if !verify_password(user.password_hash.clone(), password.to_string()).await? {
            tracing::warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(MSG_INVALID_CREDENTIALS));
        }

        user.record_login();
        let user = self.repo.update(&user).await?;
        tracing::info!(user_id = user.id, "User logged in");

        self.session(user)
    }

    async fn forgot_password(&self, email: &str) -> AppResult<()> {
        let Some(mut user) = self.repo.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now()
            .checked_add_signed(self.reset_ttl)
            .ok_or_else(|| AppError::internal("reset token expiry out of range"))?;
        user.set_reset_token(token.clone(), expires_at);
        let user = self.repo.update(&user).await?;

        if let Err(e) = self
            .reset_sender
            .send_reset_token(&user, &token, expires_at)
            .await
        {
            tracing::error!(user_id = user.id, "Failed to deliver reset token: {}", e);
        }

        Ok(())
    }

    async fn reset_password(&self, input: ResetPassword) -> AppResult<()> {
        Password::confirm(&input.new_password, &input.confirm_password)?;

        let user = self.repo.find_by_reset_token(&input.token).await?;
        let mut user = match user {
            Some(user) if user.reset_token_valid(&input.token, Utc::now()) => user,
            _ => return Err(AppError::validation(MSG_INVALID_RESET_TOKEN)),
        };

        let password = hash_password(input.new_password).await?;
        user.password_hash = password.into_string();
        user.clear_reset_token();
        self.repo.update(&user).await?;

        tracing::info!(user_id = user.id, "Password reset");
        Ok(())
    }

    async fn change_password(&self, user_id: i64, input: ChangePassword) -> AppResult<()> {
        Password::confirm(&input.new_password, &input.confirm_password)?;

        let mut user = self.live_user(user_id).await?;

        if !verify_password(user.password_hash.clone(), input.current_password).await? {
            return Err(AppError::validation(MSG_WRONG_CURRENT_PASSWORD));
        }

        let password = hash_password(input.new_password).await?;
        user.password_hash = password.into_string();
        self.repo.update(&user).await?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    fn validate_token(&self, token: &str) -> AppResult<Claims> {
        self.tokens.validate(token)
    }

    async fn refresh_token(&self, user_id: i64) -> AppResult<AuthSession> {
        let user = self.live_user(user_id).await?;

        if !user.is_active {
            return Err(AppError::forbidden(MSG_ACCOUNT_DEACTIVATED));
        }

        self.session(user)
    }

    async fn logout(&self, user_id: i64) -> AppResult<()> {
        self.live_user(user_id).await?;
        tracing::info!(user_id, "User logged out");
        Ok(())
    }
}
