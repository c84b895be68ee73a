//! Access token issuance and validation (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult, JwtConfig};
use domain::{User, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    /// Stringified `user_id`
    pub sub: String,
}

/// Token returned after successful authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// Signs and verifies access tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    expiration_hours: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], expiration_hours: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            expiration_hours,
        }
    }

    pub fn from_config(config: &JwtConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.expiration_hours)
    }

    pub fn expiration_hours(&self) -> i64 {
        self.expiration_hours
    }

    /// Issue a token for `user` valid from now.
    pub fn issue(&self, user: &User) -> AppResult<TokenResponse> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token for `user` as if the current time were `issued_at`.
    pub fn issue_at(&self, user: &User, issued_at: DateTime<Utc>) -> AppResult<TokenResponse> {
        let expires_at = Duration::try_hours(self.expiration_hours)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| AppError::internal("token expiry out of range"))?;

        let claims = Claims {
            user_id: user.id,
            email: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            sub: user.id.to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;

        Ok(TokenResponse {
            access_token: token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.expiration_hours * SECONDS_PER_HOUR,
        })
    }

    /// Verify signature, algorithm and expiry, then return the claims.
    pub fn validate(&self, token: &str) -> AppResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::AppError;
    use domain::NewUser;

    const SECRET: &[u8] = b"test-secret-key-with-at-least-32-chars";

    fn user() -> User {
        NewUser::new("John Doe", "john@example.com", "").into_user(42, Utc::now())
    }

    fn rejection_message(err: AppError) -> String {
        assert_eq!(err.status().as_u16(), 401);
        err.user_message()
    }

    #[test]
    fn test_issue_and_validate() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let token = issuer.issue(&user()).unwrap();

        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 24 * 3600);

        let claims = issuer.validate(&token.access_token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "john@example.com");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuer = TokenIssuer::new(SECRET, 1);
        let token = issuer
            .issue_at(&user(), Utc::now() - Duration::hours(2))
            .unwrap();

        let err = issuer.validate(&token.access_token).unwrap_err();
        assert_eq!(rejection_message(err), "token has expired");
    }

    #[test]
    fn test_other_secret_rejected() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let other = TokenIssuer::new(b"another-secret-key-with-32-characters!", 24);
        let token = other.issue(&user()).unwrap();

        let err = issuer.validate(&token.access_token).unwrap_err();
        assert_eq!(rejection_message(err), "token signature is invalid");
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: 42,
            email: "john@example.com".into(),
            iat: now,
            exp: now + 3600,
            sub: "42".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let err = issuer.validate(&token).unwrap_err();
        assert_eq!(rejection_message(err), "unexpected signing method");
    }

    #[test]
    fn test_garbage_rejected() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let err = issuer.validate("not-a-jwt").unwrap_err();
        assert_eq!(rejection_message(err), "invalid token");
    }

    #[test]
    fn test_unrepresentable_expiry_is_error() {
        let issuer = TokenIssuer::new(SECRET, 2_000_000_000_000);
        let err = issuer.issue(&user()).unwrap_err();
        assert_eq!(err.status().as_u16(), 500);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let issuer = TokenIssuer::new(SECRET, 24);
        let printed = format!("{:?}", issuer);
        assert!(printed.contains("REDACTED"));
    }
}
