//! Bearer token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use auth_service_lib::Claims;
use common::{AppError, AppResult};

use crate::state::AppState;

const MSG_HEADER_REQUIRED: &str = "Authorization header required";
const MSG_INVALID_FORMAT: &str = "Invalid authorization format";
const MSG_USER_NOT_FOUND: &str = "User not found";
const MSG_DEACTIVATED: &str = "Account is deactivated";

/// Identity taken from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email,
        }
    }
}

/// Validates the bearer token and inserts [`CurrentUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state
        .auth_service
        .validate_token(bearer_token(request.headers())?)?;

    request.extensions_mut().insert(CurrentUser::from(claims));

    Ok(next.run(request).await)
}

/// Like [`auth_middleware`], but also loads the user and rejects accounts
/// that were deleted or deactivated after the token was issued.
///
/// Inserts both [`CurrentUser`] and the full `domain::User`.
pub async fn user_context_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = state
        .auth_service
        .validate_token(bearer_token(request.headers())?)?;

    let user = match state.user_service.get_user(claims.user_id).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => return Err(AppError::unauthorized(MSG_USER_NOT_FOUND)),
        Err(e) => return Err(e),
    };

    if !user.is_active {
        return Err(AppError::unauthorized(MSG_DEACTIVATED));
    }

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email.clone(),
    });
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> AppResult<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::unauthorized(MSG_HEADER_REQUIRED))?;

    if value.is_empty() {
        return Err(AppError::unauthorized(MSG_HEADER_REQUIRED));
    }

    let value = value
        .to_str()
        .map_err(|_| AppError::unauthorized(MSG_INVALID_FORMAT))?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AppError::unauthorized(MSG_INVALID_FORMAT)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn message(result: AppResult<&str>) -> String {
        result.unwrap_err().user_message()
    }

    #[test]
    fn test_bearer_token_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(message(bearer_token(&HeaderMap::new())), MSG_HEADER_REQUIRED);
        assert_eq!(message(bearer_token(&headers(""))), MSG_HEADER_REQUIRED);
    }

    #[test]
    fn test_malformed_header() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer", "bearer token", "Bearer a b", "token"] {
            assert_eq!(message(bearer_token(&headers(value))), MSG_INVALID_FORMAT, "{}", value);
        }
    }
}
