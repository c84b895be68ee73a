//! Auth Service Library
//!
//! Registration, login, password reset and JWT handling on top of the
//! user repository.

pub mod config;
pub mod notifier;
pub mod service;
pub mod token;

pub use config::AuthServiceConfig;
pub use notifier::{LogResetTokenSender, ResetTokenSender};
pub use service::{AuthService, AuthSession, Authenticator};
pub use token::{Claims, TokenIssuer, TokenResponse};
