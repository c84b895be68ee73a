//! Authentication handlers.

use axum::{
    extract::State,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use auth_service_lib::AuthSession;
use common::{ApiResponse, AppResult, Created};
use domain::{ChangePassword, RegisterUser, ResetPassword, User, UserResponse};

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "John Doe")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    #[schema(example = "password123")]
    pub confirm_password: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    #[schema(example = "+1-555-0101")]
    pub phone: String,
    #[schema(example = "123 Main St, New York, NY 10001")]
    pub address: Option<String>,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(req: RegisterRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            confirm_password: req.confirm_password,
            phone: req.phone,
            address: req.address,
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "john@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    /// Token delivered by the forgot-password flow
    #[validate(length(min = 1, message = "Reset token is required"))]
    pub token: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    pub confirm_password: String,
}

impl From<ResetPasswordRequest> for ResetPassword {
    fn from(req: ResetPasswordRequest) -> Self {
        Self {
            token: req.token,
            new_password: req.new_password,
            confirm_password: req.confirm_password,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,
    #[validate(length(min = 1, message = "Password confirmation is required"))]
    pub confirm_password: String,
}

impl From<ChangePasswordRequest> for ChangePassword {
    fn from(req: ChangePasswordRequest) -> Self {
        Self {
            current_password: req.current_password,
            new_password: req.new_password,
            confirm_password: req.confirm_password,
        }
    }
}

/// User plus a fresh access token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// JWT access token
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token lifetime in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserResponse::from(session.user),
            access_token: session.token.access_token,
            token_type: session.token.token_type,
            expires_in: session.token.expires_in,
        }
    }
}

/// Routes that need no token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

/// Routes behind `auth_middleware`
pub fn auth_token_routes() -> Router<AppState> {
    Router::new()
        .route("/change-password", post(change_password))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout))
}

/// Routes behind `user_context_middleware`
pub fn auth_profile_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/profile", get(me))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation error or passwords do not match"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<AuthResponse>> {
    let session = state.auth_service.register(payload.into()).await?;
    Ok(Created(ApiResponse::with_message(
        AuthResponse::from(session),
        "User registered successfully",
    )))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account is deactivated")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let session = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;
    Ok(ApiResponse::with_message(
        AuthResponse::from(session),
        "Login successful",
    ))
}

/// Request a password reset token
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Accepted whether or not the email exists"),
        (status = 400, description = "Validation error")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.forgot_password(&payload.email).await?;
    Ok(ApiResponse::message(
        "If the email exists, a password reset link has been sent",
    ))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "Authentication",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Invalid or expired token, or passwords do not match")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.reset_password(payload.into()).await?;
    Ok(ApiResponse::message("Password reset successfully"))
}

/// Change the password of the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/auth/change-password",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Wrong current password or passwords do not match"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn change_password(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .auth_service
        .change_password(current_user.id, payload.into())
        .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}

/// Issue a fresh token for the authenticated user
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh-token",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Token refreshed", body = AuthResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Account is deactivated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn refresh_token(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let session = state.auth_service.refresh_token(current_user.id).await?;
    Ok(ApiResponse::with_message(
        AuthResponse::from(session),
        "Token refreshed successfully",
    ))
}

/// Logout (tokens stay valid until they expire)
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn logout(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.auth_service.logout(current_user.id).await?;
    Ok(ApiResponse::message("Logged out successfully"))
}

/// Profile of the authenticated user
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized, unknown or deactivated user")
    )
)]
pub async fn me(Extension(user): Extension<User>) -> ApiResponse<UserResponse> {
    ApiResponse::with_message(UserResponse::from(user), "User information retrieved")
}
