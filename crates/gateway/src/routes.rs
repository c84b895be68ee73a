//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{auth_profile_routes, auth_routes, auth_token_routes, health_routes, user_routes};
use crate::middleware::{auth_middleware, user_context_middleware};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Versioned prefix for the JSON API.
pub const API_PREFIX: &str = "/api/v1";

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let auth = auth_routes()
        .merge(auth_token_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        )))
        .merge(auth_profile_routes().route_layer(middleware::from_fn_with_state(
            state.clone(),
            user_context_middleware,
        )));

    let users = user_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        auth_middleware,
    ));

    let api = Router::new().nest("/auth", auth).nest("/users", users);

    Router::new()
        // Root and health (no auth)
        .merge(health_routes())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(API_PREFIX, api)
        .with_state(state)
}
