//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 24;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (ten years)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365 * 10;

/// Seconds per hour (for token expiration calculation)
pub const SECONDS_PER_HOUR: i64 = 3600;

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// How long a password reset token stays usable
pub const DEFAULT_PASSWORD_RESET_TTL_MINUTES: i64 = 60;

/// Longest accepted reset token lifetime (ten years)
pub const MAX_PASSWORD_RESET_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

// =============================================================================
// Messages
// =============================================================================

pub const MSG_EMAIL_TAKEN: &str = "user with this email already exists";
pub const MSG_USER_NOT_FOUND: &str = "user not found";
pub const MSG_PASSWORDS_DO_NOT_MATCH: &str = "passwords do not match";
pub const MSG_INVALID_CREDENTIALS: &str = "invalid email or password";
pub const MSG_ACCOUNT_DEACTIVATED: &str = "account is deactivated";
pub const MSG_INVALID_RESET_TOKEN: &str = "invalid or expired reset token";
pub const MSG_WRONG_CURRENT_PASSWORD: &str = "current password is incorrect";
