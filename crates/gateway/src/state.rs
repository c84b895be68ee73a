//! Application state for dependency injection.

use std::sync::Arc;

use auth_service_lib::AuthService;
use user_service_lib::service::UserService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserService>,
    pub auth_service: Arc<dyn AuthService>,
}

impl AppState {
    pub fn new(user_service: Arc<dyn UserService>, auth_service: Arc<dyn AuthService>) -> Self {
        Self {
            user_service,
            auth_service,
        }
    }
}
