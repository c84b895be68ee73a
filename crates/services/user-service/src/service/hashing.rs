//! Password hashing off the async reactor.
//!
//! Argon2 is deliberately slow, so both directions run on the blocking pool.

use common::{AppError, AppResult};
use domain::Password;
use tokio::task;

/// Hash `plain_text`, enforcing the minimum length.
pub async fn hash_password(plain_text: String) -> AppResult<Password> {
    let password = task::spawn_blocking(move || Password::new(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??;
    Ok(password)
}

/// Verify `plain_text` against a stored hash.
pub async fn verify_password(hash: String, plain_text: String) -> AppResult<bool> {
    task::spawn_blocking(move || Password::from_hash(hash).verify(&plain_text))
        .await
        .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hash_then_verify() {
        let password = hash_password("password123".into()).await.unwrap();
        assert!(verify_password(password.as_str().to_string(), "password123".into())
            .await
            .unwrap());
        assert!(!verify_password(password.into_string(), "wrongpass".into())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_short_password_is_validation_error() {
        let err = hash_password("12345".into()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
