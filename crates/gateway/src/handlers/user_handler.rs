//! User management handlers.

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use common::{ApiResponse, AppError, AppResult, Created};
use domain::{CreateUser, UpdateUser, UserResponse};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Administrative user creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Smith")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "password123")]
    pub password: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    #[schema(example = "+1-555-0102")]
    pub phone: String,
    pub address: Option<String>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
            address: req.address,
        }
    }
}

/// Full profile overwrite
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jane.doe@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    #[schema(example = "+1-555-0102")]
    pub phone: String,
    pub address: Option<String>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            phone: req.phone,
            address: req.address,
        }
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

/// Path ids are non-negative integers; anything else is a client error.
fn parse_user_id(raw: &str) -> AppResult<i64> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id >= 0)
        .ok_or_else(|| AppError::validation("Invalid user ID"))
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All live users with their count", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let users = state.user_service.list_users().await?;
    Ok(ApiResponse::list(
        users.into_iter().map(UserResponse::from).collect(),
        "Users retrieved successfully",
    ))
}

/// Get user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Invalid user ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get_user(parse_user_id(&id)?).await?;
    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "User retrieved successfully",
    ))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state.user_service.create_user(payload.into()).await?;
    Ok(Created(ApiResponse::with_message(
        UserResponse::from(user),
        "User created successfully",
    )))
}

/// Update user profile
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 400, description = "Invalid user ID or validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let id = parse_user_id(&id)?;
    let user = state.user_service.update_user(id, payload.into()).await?;
    Ok(ApiResponse::with_message(
        UserResponse::from(user),
        "User updated successfully",
    ))
}

/// Soft delete user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Invalid user ID"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete_user(parse_user_id(&id)?).await?;
    Ok(ApiResponse::message("User deleted successfully"))
}
