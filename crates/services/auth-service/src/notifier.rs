//! Password reset token delivery.
//!
//! Delivery itself (email, SMS) lives outside this crate. The default
//! sender only records the event in the log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use common::AppResult;
use domain::User;

/// Hands a freshly issued reset token to its recipient.
#[async_trait]
pub trait ResetTokenSender: Send + Sync {
    async fn send_reset_token(
        &self,
        user: &User,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()>;
}

/// Logs reset requests instead of delivering them.
///
/// The token itself is only written at debug level.
#[derive(Debug, Default, Clone)]
pub struct LogResetTokenSender;

#[async_trait]
impl ResetTokenSender for LogResetTokenSender {
    async fn send_reset_token(
        &self,
        user: &User,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        tracing::info!(
            user_id = user.id,
            to = %user.email,
            expires_at = %expires_at,
            "Password reset requested (no mail transport configured)"
        );
        tracing::debug!(user_id = user.id, token = %token, "Password reset token");
        Ok(())
    }
}
