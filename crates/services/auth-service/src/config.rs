//! Auth service configuration.

use chrono::Duration;

use common::{env_var, parse_or, ConfigError, JwtConfig};
use domain::{DEFAULT_PASSWORD_RESET_TTL_MINUTES, MAX_PASSWORD_RESET_TTL_MINUTES};

/// Auth service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthServiceConfig {
    pub jwt: JwtConfig,
    /// Lifetime of password reset tokens
    pub password_reset_ttl_minutes: i64,
}

impl AuthServiceConfig {
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl = parse_or(
            lookup,
            &["PASSWORD_RESET_TTL_MINUTES"],
            DEFAULT_PASSWORD_RESET_TTL_MINUTES,
        );

        if ttl > MAX_PASSWORD_RESET_TTL_MINUTES {
            return Err(ConfigError::TooLarge {
                key: "PASSWORD_RESET_TTL_MINUTES",
                max: MAX_PASSWORD_RESET_TTL_MINUTES,
            });
        }

        Ok(Self {
            jwt: JwtConfig::from_lookup(lookup)?,
            password_reset_ttl_minutes: if ttl > 0 {
                ttl
            } else {
                DEFAULT_PASSWORD_RESET_TTL_MINUTES
            },
        })
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&env_var)
    }

    pub fn password_reset_ttl(&self) -> Duration {
        Duration::try_minutes(self.password_reset_ttl_minutes)
            .unwrap_or_else(|| Duration::minutes(DEFAULT_PASSWORD_RESET_TTL_MINUTES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_ttl_default_and_override() {
        let secret = "x".repeat(40);
        let config = AuthServiceConfig::from_lookup(&|key: &str| match key {
            "JWT_SECRET" => Some(secret.clone()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.password_reset_ttl(), Duration::hours(1));
        assert_eq!(config.jwt.expiration_hours, 24);

        let config = AuthServiceConfig::from_lookup(&|key: &str| match key {
            "JWT_SECRET" => Some(secret.clone()),
            "PASSWORD_RESET_TTL_MINUTES" => Some("15".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.password_reset_ttl(), Duration::minutes(15));
    }

    #[test]
    fn test_oversized_reset_ttl_is_error() {
        let secret = "x".repeat(40);
        let result = AuthServiceConfig::from_lookup(&|key: &str| match key {
            "JWT_SECRET" => Some(secret.clone()),
            "PASSWORD_RESET_TTL_MINUTES" => Some("9000000000000000".to_string()),
            _ => None,
        });
        assert_eq!(
            result.unwrap_err(),
            ConfigError::TooLarge {
                key: "PASSWORD_RESET_TTL_MINUTES",
                max: MAX_PASSWORD_RESET_TTL_MINUTES
            }
        );
    }

    #[test]
    fn test_short_secret_is_error() {
        let result = AuthServiceConfig::from_lookup(&|key: &str| match key {
            "JWT_SECRET" => Some("short".to_string()),
            _ => None,
        });
        assert!(matches!(result, Err(ConfigError::TooShort { .. })));
    }
}
