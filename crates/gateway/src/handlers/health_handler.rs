//! Health check handlers.

use axum::{extract::State, routing::get, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use common::{ApiResponse, AppError, AppResult};

use crate::state::AppState;

/// Service banner returned by `/`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RootInfo {
    pub message: String,
    #[schema(example = "0.1.0")]
    pub version: String,
}

/// Health check payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    #[schema(example = "ok")]
    pub status: String,
    pub message: String,
    /// Live users in the store
    pub users: u64,
}

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

/// Service banner
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses(
        (status = 200, description = "Service name and version", body = RootInfo)
    )
)]
pub async fn root() -> ApiResponse<RootInfo> {
    ApiResponse::with_message(
        RootInfo {
            message: "Welcome to the User API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        "Welcome",
    )
}

/// Health check endpoint - verifies the user store answers.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service healthy", body = HealthStatus),
        (status = 503, description = "User store unavailable")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> AppResult<ApiResponse<HealthStatus>> {
    let users = state.user_service.count_users().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        AppError::service_unavailable("user store")
    })?;

    Ok(ApiResponse::with_message(
        HealthStatus {
            status: "ok".to_string(),
            message: "User API is running".to_string(),
            users,
        },
        "Health check successful",
    ))
}
