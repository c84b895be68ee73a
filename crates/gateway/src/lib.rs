//! HTTP gateway for the user API.
//!
//! Axum routes, bearer-token middleware and OpenAPI docs over the auth and
//! user services.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub use crate::config::GatewayConfig;
pub use crate::routes::create_router;
pub use crate::state::AppState;

/// Router with request tracing and CORS applied.
pub fn create_app(state: AppState) -> Router {
    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind and serve the API.
pub async fn run_server(
    config: &GatewayConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(config.addr()).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    info!("Swagger UI at /swagger-ui");

    axum::serve(listener, app).await?;

    Ok(())
}
