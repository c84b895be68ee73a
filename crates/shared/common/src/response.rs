//! JSON success envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Number of items in `data` for list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// List payload with its item count.
    pub fn list(items: Vec<T>, message: impl Into<String>) -> Self {
        let count = items.len();
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(items),
            count: Some(count),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            count: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// 201 with the envelope.
pub struct Created<T: Serialize>(pub ApiResponse<T>);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_envelope_counts_items() {
        let body = serde_json::to_value(ApiResponse::list(vec![1, 2, 3], "Users retrieved")).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "message": "Users retrieved", "data": [1, 2, 3], "count": 3 })
        );
    }

    #[test]
    fn test_message_only_envelope() {
        let body = serde_json::to_value(ApiResponse::message("Logged out")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "Logged out" }));
    }

    #[test]
    fn test_created_status() {
        let response = Created(ApiResponse::success("x")).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
